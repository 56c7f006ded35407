//! Point ladder inside a regular (non-tiebreak) game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::rules::{MatchConfig, TEAMS};
use crate::domain::state::TeamId;
use crate::errors::domain::DomainError;

/// Rung on the Love → 15 → 30 → 40 ladder, plus Advantage after deuce.
///
/// Ordering follows the ladder, so `Forty < Advantage`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PointValue {
    #[default]
    Love,
    Fifteen,
    Thirty,
    Forty,
    Advantage,
}

impl PointValue {
    pub const fn label(self) -> &'static str {
        match self {
            PointValue::Love => "0",
            PointValue::Fifteen => "15",
            PointValue::Thirty => "30",
            PointValue::Forty => "40",
            PointValue::Advantage => "AD",
        }
    }
}

/// Points of the game in play, indexed by [`TeamId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameScore {
    pub points: [PointValue; TEAMS],
}

impl GameScore {
    pub const fn new() -> Self {
        Self {
            points: [PointValue::Love, PointValue::Love],
        }
    }

    pub const fn from_points(a: PointValue, b: PointValue) -> Self {
        Self { points: [a, b] }
    }

    #[inline]
    pub const fn of(&self, team: TeamId) -> PointValue {
        self.points[team.index()]
    }

    pub fn is_deuce(&self) -> bool {
        self.points == [PointValue::Forty, PointValue::Forty]
    }

    pub fn advantage(&self) -> Option<TeamId> {
        TeamId::ALL
            .into_iter()
            .find(|&t| self.of(t) == PointValue::Advantage)
    }

    /// Advantage may only be held by one side, and only against Forty.
    pub fn validate(&self) -> Result<(), DomainError> {
        for team in TeamId::ALL {
            if self.of(team) == PointValue::Advantage && self.of(team.other()) != PointValue::Forty
            {
                return Err(DomainError::inconsistent(format!(
                    "team {team} holds Advantage against {:?}",
                    self.of(team.other())
                )));
            }
        }
        Ok(())
    }
}

/// What the umpire calls for one side: a ladder rung, or a plain count
/// inside a tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ScoreCall {
    Ladder(PointValue),
    TiebreakCount(u8),
}

impl fmt::Display for ScoreCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreCall::Ladder(value) => f.write_str(value.label()),
            ScoreCall::TiebreakCount(n) => write!(f, "{n}"),
        }
    }
}

/// Display calls for a regular game, indexed by team.
pub fn point_calls(score: &GameScore) -> [ScoreCall; TEAMS] {
    score.points.map(ScoreCall::Ladder)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    StillPlaying(GameScore),
    GameWon(TeamId),
}

/// Advance the game by one point won by `winner`.
pub fn next_point(score: GameScore, winner: TeamId, cfg: &MatchConfig) -> GameOutcome {
    let loser = winner.other();
    let mut next = score;

    match (score.of(winner), score.of(loser)) {
        (PointValue::Advantage, _) => return GameOutcome::GameWon(winner),
        // Advantage lost: back to deuce.
        (_, PointValue::Advantage) => {
            next.points = [PointValue::Forty, PointValue::Forty];
        }
        (PointValue::Forty, PointValue::Forty) => {
            if cfg.golden_point() {
                return GameOutcome::GameWon(winner);
            }
            next.points[winner.index()] = PointValue::Advantage;
        }
        (PointValue::Forty, _) => return GameOutcome::GameWon(winner),
        (PointValue::Love, _) => next.points[winner.index()] = PointValue::Fifteen,
        (PointValue::Fifteen, _) => next.points[winner.index()] = PointValue::Thirty,
        (PointValue::Thirty, _) => next.points[winner.index()] = PointValue::Forty,
    }

    GameOutcome::StillPlaying(next)
}
