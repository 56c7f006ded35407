//! Point counting and service cadence inside a tiebreak game.

use serde::{Deserialize, Serialize};

use crate::domain::game_clock::ScoreCall;
use crate::domain::rules::TEAMS;
use crate::domain::state::{ServerState, TeamId};
use crate::errors::domain::DomainError;

/// Teams change ends every this many tiebreak points.
pub const TIEBREAK_SIDE_CHANGE_POINTS: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiebreakKind {
    /// Played at the trigger tie of a set, to 7.
    Regular,
    /// Played at the trigger tie of a set, to 10.
    Championship,
    /// Replaces the deciding set entirely.
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakScore {
    pub points: [u8; TEAMS],
    pub target_points: u8,
    pub kind: TiebreakKind,
    /// Server of point 1.
    pub first_server: ServerState,
    /// Partner of the other team who serves that team's first turn.
    pub other_first_player: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiebreakOutcome {
    StillPlaying(TiebreakScore),
    /// Final score included for display ("7-6 (5)").
    Won { winner: TeamId, score: TiebreakScore },
}

impl TiebreakScore {
    pub const fn new(
        kind: TiebreakKind,
        target_points: u8,
        first_server: ServerState,
        other_first_player: u8,
    ) -> Self {
        Self {
            points: [0, 0],
            target_points,
            kind,
            first_server,
            other_first_player,
        }
    }

    #[inline]
    pub const fn of(&self, team: TeamId) -> u8 {
        self.points[team.index()]
    }

    pub fn total_points(&self) -> u16 {
        self.points[0] as u16 + self.points[1] as u16
    }

    /// `points >= target` with a lead of at least two.
    pub fn is_won_by(&self, team: TeamId) -> bool {
        let own = self.of(team);
        let opp = self.of(team.other());
        own >= self.target_points && own.saturating_sub(opp) >= 2
    }

    pub fn winner(&self) -> Option<TeamId> {
        TeamId::ALL.into_iter().find(|&t| self.is_won_by(t))
    }

    pub fn calls(&self) -> [ScoreCall; TEAMS] {
        self.points.map(ScoreCall::TiebreakCount)
    }

    /// Server of the next point to be played, partner rotation included.
    pub fn current_server(&self, doubles: bool) -> ServerState {
        server_state_for_point(
            self.first_server,
            self.other_first_player,
            doubles,
            self.total_points(),
        )
    }

    /// Player each team serves with on its next turn once the tiebreak is over.
    pub fn rotation_after(&self, doubles: bool) -> [u8; TEAMS] {
        let mut rotation = [0u8; TEAMS];
        if !doubles {
            return rotation;
        }
        let start = self.first_server.team;
        let points = self.total_points();
        // Turns started so far: point 0 is turn 0, then two points per turn.
        let turns = if points == 0 { 0 } else { points / 2 + 1 };
        let start_turns = turns.div_ceil(2);
        let other_turns = turns / 2;
        rotation[start.index()] = self.first_server.player_index ^ (start_turns % 2) as u8;
        rotation[start.other().index()] = self.other_first_player ^ (other_turns % 2) as u8;
        rotation
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.target_points == 0 {
            return Err(DomainError::inconsistent("tiebreak target must be positive"));
        }
        let (hi, lo) = if self.points[0] >= self.points[1] {
            (self.points[0], self.points[1])
        } else {
            (self.points[1], self.points[0])
        };
        // Past the target the score can only run ahead by two (the final point).
        if hi > self.target_points && hi - lo > 2 {
            return Err(DomainError::inconsistent(format!(
                "tiebreak score {}-{} unreachable with target {}",
                self.points[0], self.points[1], self.target_points
            )));
        }
        Ok(())
    }
}

/// Record one tiebreak point for `winner`.
pub fn next_point(score: TiebreakScore, winner: TeamId) -> TiebreakOutcome {
    let mut next = score;
    next.points[winner.index()] = next.points[winner.index()].saturating_add(1);
    if next.is_won_by(winner) {
        TiebreakOutcome::Won {
            winner,
            score: next,
        }
    } else {
        TiebreakOutcome::StillPlaying(next)
    }
}

/// Team serving the 0-based `point_index` of a tiebreak: the opening server
/// takes one point, then service alternates every two points.
pub fn server_for_point(starting_server: TeamId, point_index: u16) -> TeamId {
    let turn = (point_index + 1) / 2;
    if turn % 2 == 0 {
        starting_server
    } else {
        starting_server.other()
    }
}

/// Doubles-aware variant of [`server_for_point`]: each team alternates
/// partners on every service turn it takes.
pub fn server_state_for_point(
    first: ServerState,
    other_first_player: u8,
    doubles: bool,
    point_index: u16,
) -> ServerState {
    let turn = (point_index + 1) / 2;
    let team = server_for_point(first.team, point_index);
    if !doubles {
        return ServerState::new(team, 0);
    }
    let (base, nth_turn) = if team == first.team {
        (first.player_index, turn / 2)
    } else {
        (other_first_player, (turn - 1) / 2)
    };
    ServerState::new(team, base ^ (nth_turn % 2) as u8)
}

/// Whether the ends change after `total_points` tiebreak points.
pub fn side_change_due(total_points: u16) -> bool {
    total_points > 0 && total_points % TIEBREAK_SIDE_CHANGE_POINTS == 0
}
