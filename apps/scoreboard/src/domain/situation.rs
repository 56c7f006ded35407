//! Read-only classification of the point about to be played.
//!
//! Each side's prospects are evaluated by running a hypothetical point through
//! the same transition code as live play, on a throwaway copy of the state.

use serde::{Deserialize, Serialize};

use crate::domain::game_clock::{self, GameOutcome};
use crate::domain::scoring::advance;
use crate::domain::state::{MatchState, TeamId};

/// Highest-stakes label for the next point. Ordered by [`Situation::level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "team")]
pub enum Situation {
    None,
    GamePoint(TeamId),
    /// Kept for the wire format. Winning a tiebreak always takes the set, so
    /// [`classify`] reports [`Situation::SetPoint`] or higher instead and
    /// never emits this variant.
    TiebreakPoint(TeamId),
    SetPoint(TeamId),
    MatchPoint(TeamId),
}

impl Situation {
    pub const fn level(&self) -> u8 {
        match self {
            Situation::None => 0,
            Situation::GamePoint(_) | Situation::TiebreakPoint(_) => 1,
            Situation::SetPoint(_) => 2,
            Situation::MatchPoint(_) => 3,
        }
    }

    pub const fn team(&self) -> Option<TeamId> {
        match *self {
            Situation::None => None,
            Situation::GamePoint(t)
            | Situation::TiebreakPoint(t)
            | Situation::SetPoint(t)
            | Situation::MatchPoint(t) => Some(t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPoint {
    pub team: TeamId,
    /// Consecutive break-point opportunities. Restarts at 1 whenever the
    /// receiver regains a break point after losing it (e.g. through deuce).
    pub opportunity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationReport {
    pub situation: Situation,
    pub break_point: Option<BreakPoint>,
    pub change_sides_due: bool,
    /// Both sides stand to win the same thing on this point (golden point at
    /// deuce).
    pub deciding_point: bool,
}

/// Classify the next point. Pure: the state is never modified.
pub fn classify(state: &MatchState) -> SituationReport {
    let change_sides_due = state.change_sides_due();
    if state.completed().is_some() {
        return SituationReport {
            situation: Situation::None,
            break_point: None,
            change_sides_due,
            deciding_point: false,
        };
    }

    let [for_a, for_b] = TeamId::ALL.map(|team| situation_if_won(state, team));
    let receiver = state.server().team.other();

    let (situation, deciding_point) = match for_a.level().cmp(&for_b.level()) {
        std::cmp::Ordering::Greater => (for_a, false),
        std::cmp::Ordering::Less => (for_b, false),
        std::cmp::Ordering::Equal if for_a.level() == 0 => (Situation::None, false),
        std::cmp::Ordering::Equal => {
            let pick = if receiver == TeamId::A { for_a } else { for_b };
            (pick, true)
        }
    };

    let tally = state.break_points();
    let break_point = match break_point_position(state) {
        Some(team) if tally.live => Some(BreakPoint {
            team,
            opportunity: tally.opportunities,
        }),
        _ => None,
    };

    SituationReport {
        situation,
        break_point,
        change_sides_due,
        deciding_point,
    }
}

/// What winning the next point would mean for `team`.
fn situation_if_won(state: &MatchState, team: TeamId) -> Situation {
    let mut hypothetical = state.probe();
    let outcome = advance(&mut hypothetical, team);

    if outcome.match_won.is_some() {
        Situation::MatchPoint(team)
    } else if outcome.set_won.is_some() {
        Situation::SetPoint(team)
    } else if outcome.game_won.is_some() {
        Situation::GamePoint(team)
    } else {
        Situation::None
    }
}

/// Receiver one point away from taking the server's game. Never inside a
/// tiebreak.
pub(crate) fn break_point_position(state: &MatchState) -> Option<TeamId> {
    if state.completed().is_some() || state.in_tiebreak() {
        return None;
    }
    let receiver = state.server().team.other();
    match game_clock::next_point(state.current_game(), receiver, state.config()) {
        GameOutcome::GameWon(_) => Some(receiver),
        GameOutcome::StillPlaying(_) => None,
    }
}
