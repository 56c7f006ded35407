//! Shared helpers for scoreboard integration tests.

pub mod logging;
