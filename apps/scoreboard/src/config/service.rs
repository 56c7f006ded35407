use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::rules::MatchConfig;
use crate::error::AppError;

pub const MAX_MATCHES_VAR: &str = "SCOREBOARD_MAX_MATCHES";
pub const DEFAULT_FORMAT_VAR: &str = "SCOREBOARD_DEFAULT_FORMAT";

pub const DEFAULT_MAX_MATCHES: usize = 256;

/// Named match format used when a match is created without an explicit config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    #[default]
    Tennis3,
    Tennis5,
    Padel,
    Fast4,
}

impl MatchFormat {
    pub const fn config(self) -> MatchConfig {
        match self {
            MatchFormat::Tennis3 => MatchConfig::tennis_best_of_3(),
            MatchFormat::Tennis5 => MatchConfig::tennis_best_of_5(),
            MatchFormat::Padel => MatchConfig::padel(),
            MatchFormat::Fast4 => MatchConfig::fast4(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MatchFormat::Tennis3 => "tennis3",
            MatchFormat::Tennis5 => "tennis5",
            MatchFormat::Padel => "padel",
            MatchFormat::Fast4 => "fast4",
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tennis3" => Ok(MatchFormat::Tennis3),
            "tennis5" => Ok(MatchFormat::Tennis5),
            "padel" => Ok(MatchFormat::Padel),
            "fast4" => Ok(MatchFormat::Fast4),
            other => Err(AppError::config(format!(
                "unknown match format '{other}' (expected tennis3, tennis5, padel or fast4)"
            ))),
        }
    }
}

/// Runtime settings for [`crate::services::matches::ScoreboardService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on matches tracked at once.
    pub max_matches: usize,
    pub default_format: MatchFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_matches: DEFAULT_MAX_MATCHES,
            default_format: MatchFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from `SCOREBOARD_MAX_MATCHES` and `SCOREBOARD_DEFAULT_FORMAT`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            max_matches: max_matches()?,
            default_format: default_format()?,
        })
    }
}

fn max_matches() -> Result<usize, AppError> {
    let Some(raw) = optional_var(MAX_MATCHES_VAR)? else {
        return Ok(DEFAULT_MAX_MATCHES);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::config(format!(
            "{MAX_MATCHES_VAR} must be a positive integer, got '{raw}'"
        ))),
        Ok(n) => Ok(n),
    }
}

fn default_format() -> Result<MatchFormat, AppError> {
    match optional_var(DEFAULT_FORMAT_VAR)? {
        Some(raw) => raw.parse(),
        None => Ok(MatchFormat::default()),
    }
}

/// Unset or blank variables count as absent; non-unicode values are an error.
fn optional_var(name: &str) -> Result<Option<String>, AppError> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
