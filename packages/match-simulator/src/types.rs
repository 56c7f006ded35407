//! Shared types for the simulator.

use clap::ValueEnum;
use scoreboard::MatchFormat;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Tennis3,
    Tennis5,
    Padel,
    Fast4,
}

impl FormatArg {
    pub fn format(self) -> MatchFormat {
        match self {
            FormatArg::Tennis3 => MatchFormat::Tennis3,
            FormatArg::Tennis5 => MatchFormat::Tennis5,
            FormatArg::Padel => MatchFormat::Padel,
            FormatArg::Fast4 => MatchFormat::Fast4,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TeamArg {
    A,
    B,
}

impl TeamArg {
    pub fn team(self) -> scoreboard::domain::TeamId {
        match self {
            TeamArg::A => scoreboard::domain::TeamId::A,
            TeamArg::B => scoreboard::domain::TeamId::B,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricsLevel {
    /// Result and per-team statistics only
    Basic,
    /// Also embed the final snapshot with its full point history
    Detailed,
}
