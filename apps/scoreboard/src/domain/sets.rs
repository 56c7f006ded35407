//! Games within a set: set completion, tiebreak entry, golden game and the
//! super-tiebreak deciding set.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{MatchConfig, TiebreakType, TEAMS};
use crate::domain::state::{ServerState, TeamId};
use crate::domain::tiebreak::{self, TiebreakKind, TiebreakOutcome, TiebreakScore};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetScore {
    pub games: [u8; TEAMS],
    /// Tiebreak in play, or the final tiebreak score of a completed set.
    pub tiebreak: Option<TiebreakScore>,
    pub completed: Option<TeamId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    StillPlaying(SetScore),
    /// Games are tied at the trigger; the caller attaches the tiebreak via
    /// [`begin_tiebreak`] once it knows who serves first.
    EnterTiebreak(SetScore),
    SetWon { winner: TeamId, set: SetScore },
}

impl SetScore {
    #[inline]
    pub const fn games_of(&self, team: TeamId) -> u8 {
        self.games[team.index()]
    }

    /// Tiebreak currently being played (none once the set is complete).
    pub fn live_tiebreak(&self) -> Option<&TiebreakScore> {
        match self.completed {
            Some(_) => None,
            None => self.tiebreak.as_ref(),
        }
    }

    pub fn is_super_tiebreak(&self) -> bool {
        matches!(self.tiebreak, Some(tb) if tb.kind == TiebreakKind::Super)
    }

    /// Whether the next game at `games` decides the set outright (golden game).
    pub fn in_golden_game(&self, cfg: &MatchConfig) -> bool {
        let n = cfg.tiebreak_trigger_games();
        cfg.golden_game() && self.completed.is_none() && self.games == [n, n]
    }

    /// Structural checks used when a set comes back from storage.
    pub fn validate(&self, cfg: &MatchConfig) -> Result<(), DomainError> {
        let n = cfg.tiebreak_trigger_games();
        let cap = n + 1;
        if self.games[0] > cap || self.games[1] > cap {
            return Err(DomainError::inconsistent(format!(
                "set games {}-{} exceed {cap}",
                self.games[0], self.games[1]
            )));
        }
        if let Some(tb) = &self.tiebreak {
            tb.validate()?;
            let tied_at_trigger = self.games == [n, n];
            let tiebreak_result = self
                .completed
                .map(|w| {
                    let mut g = [n, n];
                    g[w.index()] += 1;
                    g
                })
                .is_some_and(|g| g == self.games);
            let super_set = tb.kind == TiebreakKind::Super;
            if !super_set && !tied_at_trigger && !tiebreak_result {
                return Err(DomainError::inconsistent(format!(
                    "tiebreak present at {}-{} games",
                    self.games[0], self.games[1]
                )));
            }
            if self.completed.is_some() != tb.winner().is_some() {
                return Err(DomainError::inconsistent(
                    "tiebreak winner disagrees with set completion",
                ));
            }
        }
        if let Some(w) = self.completed {
            if self.tiebreak.is_none() && !won_on_games(self.games, w, cfg) {
                return Err(DomainError::inconsistent(format!(
                    "set marked won by {w} at {}-{}",
                    self.games[0], self.games[1]
                )));
            }
        }
        Ok(())
    }
}

/// Set won on games: the games target with a lead of two (6-4, 7-5), or
/// N+1 to N after a golden game.
fn won_on_games(games: [u8; TEAMS], winner: TeamId, cfg: &MatchConfig) -> bool {
    let n = cfg.tiebreak_trigger_games();
    let own = games[winner.index()];
    let opp = games[winner.other().index()];
    if own < cfg.games_to_win_set() {
        return false;
    }
    own.saturating_sub(opp) >= 2 || (cfg.golden_game() && own == n + 1 && opp == n)
}

/// Fresh set. A deciding set of a super-tiebreak format opens straight into
/// the super-tiebreak.
pub fn start_set(
    cfg: &MatchConfig,
    deciding: bool,
    first_server: ServerState,
    other_first_player: u8,
) -> SetScore {
    let tiebreak = (deciding && cfg.replaces_final_set()).then(|| {
        TiebreakScore::new(
            TiebreakKind::Super,
            cfg.super_tiebreak_points(),
            first_server,
            other_first_player,
        )
    });
    SetScore {
        games: [0, 0],
        tiebreak,
        completed: None,
    }
}

/// Record a regular game won by `winner`.
pub fn on_game_won(set: &SetScore, winner: TeamId, cfg: &MatchConfig) -> SetOutcome {
    let n = cfg.tiebreak_trigger_games();
    let mut next = *set;
    next.games[winner.index()] += 1;

    if won_on_games(next.games, winner, cfg) {
        next.completed = Some(winner);
        return SetOutcome::SetWon { winner, set: next };
    }
    if next.games == [n, n] && !cfg.golden_game() {
        return SetOutcome::EnterTiebreak(next);
    }
    SetOutcome::StillPlaying(next)
}

/// Attach the trigger-tie tiebreak to a set returned by
/// [`SetOutcome::EnterTiebreak`].
pub fn begin_tiebreak(
    set: &SetScore,
    cfg: &MatchConfig,
    first_server: ServerState,
    other_first_player: u8,
) -> SetScore {
    let kind = match cfg.tiebreak_type() {
        TiebreakType::Championship => TiebreakKind::Championship,
        TiebreakType::Regular | TiebreakType::SuperTiebreakInsteadOfFinalSet => {
            TiebreakKind::Regular
        }
    };
    SetScore {
        tiebreak: Some(TiebreakScore::new(
            kind,
            cfg.tiebreak_type().set_tiebreak_points(),
            first_server,
            other_first_player,
        )),
        ..*set
    }
}

/// Record a tiebreak point. A won tiebreak counts as one game and takes the
/// set; a super-tiebreak set finishes 1-0.
pub fn on_tiebreak_point(set: &SetScore, winner: TeamId) -> SetOutcome {
    let Some(tb) = set.live_tiebreak() else {
        return SetOutcome::StillPlaying(*set);
    };
    match tiebreak::next_point(*tb, winner) {
        TiebreakOutcome::StillPlaying(score) => SetOutcome::StillPlaying(SetScore {
            tiebreak: Some(score),
            ..*set
        }),
        TiebreakOutcome::Won { winner, score } => {
            let mut next = *set;
            next.games[winner.index()] += 1;
            next.tiebreak = Some(score);
            next.completed = Some(winner);
            SetOutcome::SetWon { winner, set: next }
        }
    }
}
