pub mod matches;

pub use matches::{MatchId, PointRecord, ScoreboardService};
