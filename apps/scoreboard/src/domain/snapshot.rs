//! Public snapshot API for observing match state without exposing internals.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::domain::game_clock::{point_calls, GameScore, ScoreCall};
use crate::domain::rules::{MatchConfig, TEAMS};
use crate::domain::scoring::replay;
use crate::domain::sets::SetScore;
use crate::domain::state::{
    BreakPointTally, CourtSides, MatchEvent, MatchOpening, MatchState, MatchStatus, ServerState,
    TeamId,
};
use crate::errors::domain::DomainError;

/// Serializable view of a match. Carries the event log so it can be restored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub config: MatchConfig,
    pub opening: MatchOpening,
    pub sets: Vec<SetScore>,
    pub current_set: usize,
    pub current_game: GameScore,
    /// Calls for the point in play: ladder values, or tiebreak counts.
    pub calls: [ScoreCall; TEAMS],
    pub server: ServerState,
    pub sides: CourtSides,
    pub change_sides_due: bool,
    pub sets_won: [u8; TEAMS],
    pub games_played: u16,
    pub partner_rotation: [u8; TEAMS],
    pub break_points: BreakPointTally,
    pub status: MatchStatus,
    pub history: Vec<MatchEvent>,
}

impl MatchSnapshot {
    pub fn winner(&self) -> Option<TeamId> {
        match self.status {
            MatchStatus::Completed(t) => Some(t),
            MatchStatus::InProgress => None,
        }
    }

    /// Set scores in broadcast form, e.g. `6-4 6-7(5) 1-0(8)`. Tiebreak sets show
    /// the loser's tiebreak points.
    pub fn score_line(&self) -> String {
        let mut line = String::new();
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}-{}", set.games[0], set.games[1]);
            if let (Some(tb), Some(winner)) = (set.tiebreak, set.completed) {
                let _ = write!(line, "({})", tb.of(winner.other()));
            }
        }
        line
    }
}

/// Produce a snapshot of the current state.
pub fn snapshot(state: &MatchState) -> MatchSnapshot {
    let calls = match state.current_set().live_tiebreak() {
        Some(tb) => tb.calls(),
        None => point_calls(&state.current_game()),
    };
    MatchSnapshot {
        config: state.config,
        opening: state.opening,
        sets: state.sets.clone(),
        current_set: state.current_set,
        current_game: state.current_game,
        calls,
        server: state.server,
        sides: state.sides,
        change_sides_due: state.change_sides_due,
        sets_won: state.sets_won,
        games_played: state.games_played,
        partner_rotation: state.partner_rotation,
        break_points: state.break_points,
        status: state.status(),
        history: state.history.clone(),
    }
}

/// Rebuild a state from a snapshot. The history is replayed and must
/// reproduce every other field exactly.
pub fn restore(snap: &MatchSnapshot) -> Result<MatchState, DomainError> {
    check_structure(snap)?;

    let rebuilt = replay(snap.config, snap.opening, &snap.history)
        .map_err(|e| DomainError::inconsistent(format!("history does not replay: {e}")))?;
    let replayed = snapshot(&rebuilt);
    if replayed != *snap {
        return Err(DomainError::inconsistent(format!(
            "snapshot fields disagree with its {}-event history",
            snap.history.len()
        )));
    }
    Ok(rebuilt)
}

fn check_structure(snap: &MatchSnapshot) -> Result<(), DomainError> {
    snap.config
        .validate()
        .map_err(|e| DomainError::inconsistent(format!("snapshot config rejected: {e}")))?;
    snap.sides.validate()?;
    snap.current_game.validate()?;

    if snap.sets.is_empty() || snap.current_set != snap.sets.len() - 1 {
        return Err(DomainError::inconsistent(format!(
            "current set {} out of range for {} sets",
            snap.current_set,
            snap.sets.len()
        )));
    }
    if snap.sets.len() > snap.config.best_of() as usize {
        return Err(DomainError::inconsistent(format!(
            "{} sets recorded in a best-of-{} match",
            snap.sets.len(),
            snap.config.best_of()
        )));
    }
    for set in &snap.sets {
        set.validate(&snap.config)?;
    }

    let needed = snap.config.sets_to_win();
    if snap.sets_won.iter().any(|&n| n > needed) {
        return Err(DomainError::inconsistent(format!(
            "set tally {}-{} exceeds {needed}",
            snap.sets_won[0], snap.sets_won[1]
        )));
    }
    for team in TeamId::ALL {
        let counted = snap
            .sets
            .iter()
            .filter(|s| s.completed == Some(team))
            .count();
        if counted != snap.sets_won[team.index()] as usize {
            return Err(DomainError::inconsistent(format!(
                "team {team} credited with {} sets but won {counted}",
                snap.sets_won[team.index()]
            )));
        }
    }
    Ok(())
}
