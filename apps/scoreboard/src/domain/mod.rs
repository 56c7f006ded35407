//! Domain layer: pure scoring logic for tennis and padel matches.

pub mod game_clock;
pub mod match_transition;
pub mod rules;
pub mod scoring;
pub mod sets;
pub mod situation;
pub mod snapshot;
pub mod state;
pub mod tiebreak;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_situation;
#[cfg(test)]
mod tests_snapshot;

// Re-exports for ergonomics
pub use game_clock::{GameScore, PointValue, ScoreCall};
pub use match_transition::{derive_match_transitions, MatchLifecycleView, MatchTransition};
pub use rules::{MatchConfig, MatchConfigBuilder, ScoringSystem, TiebreakType};
pub use scoring::{apply_point, replay, set_court_sides, undo, PointOutcome};
pub use sets::SetScore;
pub use situation::{classify, BreakPoint, Situation, SituationReport};
pub use snapshot::{restore, snapshot, MatchSnapshot};
pub use state::{
    BreakPointTally, CourtSide, CourtSides, MatchEvent, MatchOpening, MatchState, MatchStatus,
    ServerState, TeamId,
};
pub use tiebreak::{TiebreakKind, TiebreakScore};
