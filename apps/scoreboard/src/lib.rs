#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod telemetry;


// Re-exports for public API
pub use config::{MatchFormat, ServiceConfig};
pub use error::{AppError, ErrorReport};
pub use errors::{DomainError, ErrorCode};
pub use services::{MatchId, PointRecord, ScoreboardService};

// Prelude for embedding applications
pub mod prelude {
    pub use super::domain::{
        classify, MatchConfig, MatchOpening, MatchSnapshot, Situation, SituationReport, TeamId,
    };
    pub use super::error::AppError;
    pub use super::services::{MatchId, ScoreboardService};
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
