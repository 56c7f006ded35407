use serde::{Deserialize, Serialize};

use crate::domain::rules::TEAMS;
use crate::domain::state::{CourtSides, MatchState, ServerState, TeamId};

/// The slice of match state the broadcast layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLifecycleView {
    /// Games won per team across all sets; a tiebreak counts as one.
    pub games_won: [u16; TEAMS],
    pub sets_won: [u8; TEAMS],
    pub in_tiebreak: bool,
    pub server: ServerState,
    pub sides: CourtSides,
    pub change_sides_due: bool,
    pub completed: Option<TeamId>,
}

impl MatchLifecycleView {
    pub fn of(state: &MatchState) -> Self {
        let mut games_won = [0u16; TEAMS];
        for set in state.sets() {
            games_won[0] += u16::from(set.games[0]);
            games_won[1] += u16::from(set.games[1]);
        }
        Self {
            games_won,
            sets_won: state.sets_won(),
            in_tiebreak: state.in_tiebreak(),
            server: state.server(),
            sides: state.sides(),
            change_sides_due: state.change_sides_due(),
            completed: state.completed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchTransition {
    /// Edge-triggered: a game (or tiebreak) went to `team`.
    GameWon { team: TeamId },

    /// Edge-triggered: a tiebreak or super-tiebreak began.
    TiebreakStarted,

    /// Edge-triggered: `team` took set number `set_no` (1-based).
    SetWon { team: TeamId, set_no: u8 },

    /// Edge-triggered: players are due to change ends before the next point.
    ChangeOfEnds,

    /// Edge-triggered: the teams' ends actually changed.
    SidesSwapped { sides: CourtSides },

    /// Edge-triggered: service passed to a different player.
    ServerChanged { server: ServerState },

    /// Edge-triggered: the match finished.
    MatchEnded { winner: TeamId },
}

/// Derive broadcast transitions from before/after views.
///
/// Only forward edges are reported; an undo that reverses progress yields
/// no `GameWon`/`SetWon`.
pub fn derive_match_transitions(
    before: &MatchLifecycleView,
    after: &MatchLifecycleView,
) -> Vec<MatchTransition> {
    let mut transitions = Vec::new();

    // 1. Ends swapped at the start of the point
    if before.sides != after.sides {
        transitions.push(MatchTransition::SidesSwapped { sides: after.sides });
    }

    // 2. Game won
    for team in TeamId::ALL {
        if after.games_won[team.index()] > before.games_won[team.index()] {
            transitions.push(MatchTransition::GameWon { team });
        }
    }

    // 3. Set won
    for team in TeamId::ALL {
        if after.sets_won[team.index()] > before.sets_won[team.index()] {
            let set_no = after.sets_won[0] + after.sets_won[1];
            transitions.push(MatchTransition::SetWon { team, set_no });
        }
    }

    // 4. Tiebreak start (including a set that opens as a super-tiebreak)
    if !before.in_tiebreak && after.in_tiebreak {
        transitions.push(MatchTransition::TiebreakStarted);
    }

    // 5. Match end
    if before.completed.is_none() {
        if let Some(winner) = after.completed {
            transitions.push(MatchTransition::MatchEnded { winner });
        }
    }

    // 6. Change of ends announced
    if !before.change_sides_due && after.change_sides_due {
        transitions.push(MatchTransition::ChangeOfEnds);
    }

    // 7. Server change
    if before.server != after.server && after.completed.is_none() {
        transitions.push(MatchTransition::ServerChanged {
            server: after.server,
        });
    }

    transitions
}
