//! Error codes for the scoreboard engine.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! surfaced to operator tooling.

use core::fmt;

/// Centralized error codes for the scoreboard engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Team identifier not in {A, B}
    InvalidTeamIdentifier,
    /// Point applied after the match finished
    MatchAlreadyCompleted,
    /// Match configuration rejected at construction
    InvalidConfiguration,
    /// Stored snapshot holds impossible values
    InconsistentSnapshot,
    /// Undo with empty history
    NothingToUndo,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// Match not found
    MatchNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Match registry full
    CapacityReached,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Internal error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidTeamIdentifier => "INVALID_TEAM_IDENTIFIER",
            Self::MatchAlreadyCompleted => "MATCH_ALREADY_COMPLETED",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::InconsistentSnapshot => "INCONSISTENT_SNAPSHOT",
            Self::NothingToUndo => "NOTHING_TO_UNDO",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::CapacityReached => "CAPACITY_REACHED",
            Self::Conflict => "CONFLICT",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
