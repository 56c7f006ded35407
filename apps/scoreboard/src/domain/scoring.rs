//! Match-level transitions: points, manual court-side overrides, undo and replay.
//!
//! Every mutation is computed on a copy and swapped in only when it succeeds,
//! so readers never observe a half-applied point.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::game_clock::{self, GameOutcome, GameScore};
use crate::domain::rules::MatchConfig;
use crate::domain::sets::{self, SetOutcome};
use crate::domain::situation::break_point_position;
use crate::domain::state::{
    BreakPointTally, CourtSides, MatchEvent, MatchOpening, MatchState, ServerState, TeamId,
};
use crate::domain::tiebreak;
use crate::errors::domain::{DomainError, ValidationKind};

/// What a single point changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOutcome {
    pub point_winner: TeamId,
    /// Ends were swapped at the start of this point.
    pub sides_changed: bool,
    pub game_won: Option<TeamId>,
    pub tiebreak_started: bool,
    pub set_won: Option<TeamId>,
    pub match_won: Option<TeamId>,
}

impl PointOutcome {
    const fn new(point_winner: TeamId) -> Self {
        Self {
            point_winner,
            sides_changed: false,
            game_won: None,
            tiebreak_started: false,
            set_won: None,
            match_won: None,
        }
    }
}

/// Apply "point won by `team`". Rejected once the match is over.
pub fn apply_point(state: &mut MatchState, team: TeamId) -> Result<PointOutcome, DomainError> {
    ensure_in_progress(state)?;

    let mut next = state.clone();
    let outcome = advance(&mut next, team);
    next.history.push(MatchEvent::Point(team));
    *state = next;
    Ok(outcome)
}

/// Manual court-side override (e.g. the operator pressed "swap").
///
/// Clears any pending change of ends; the override is logged so replays
/// reproduce it.
pub fn set_court_sides(state: &mut MatchState, sides: CourtSides) -> Result<(), DomainError> {
    ensure_in_progress(state)?;
    sides.validate()?;

    let mut next = state.clone();
    apply_court_sides(&mut next, sides);
    next.history.push(MatchEvent::CourtSides(sides));
    *state = next;
    Ok(())
}

/// Revert the most recent event by replaying the log without it.
pub fn undo(state: &mut MatchState) -> Result<MatchEvent, DomainError> {
    let Some((&last, rest)) = state.history.split_last() else {
        return Err(DomainError::validation(
            ValidationKind::NothingToUndo,
            "history is empty",
        ));
    };
    let rebuilt = replay(state.config, state.opening, rest)?;
    *state = rebuilt;
    Ok(last)
}

/// Rebuild a match from its configuration, opening and event log.
pub fn replay(
    config: MatchConfig,
    opening: MatchOpening,
    events: &[MatchEvent],
) -> Result<MatchState, DomainError> {
    let mut state = MatchState::new(config, opening)?;
    for (i, event) in events.iter().enumerate() {
        ensure_in_progress(&state).map_err(|_| {
            DomainError::inconsistent(format!(
                "event #{i} ({event:?}) recorded after the match was completed"
            ))
        })?;
        match *event {
            MatchEvent::Point(team) => {
                advance(&mut state, team);
            }
            MatchEvent::CourtSides(sides) => {
                sides.validate()?;
                apply_court_sides(&mut state, sides);
            }
        }
    }
    state.history = events.to_vec();
    Ok(state)
}

fn ensure_in_progress(state: &MatchState) -> Result<(), DomainError> {
    match state.completed {
        Some(winner) => Err(DomainError::validation(
            ValidationKind::MatchAlreadyCompleted,
            format!("match already won by team {winner}"),
        )),
        None => Ok(()),
    }
}

fn apply_court_sides(state: &mut MatchState, sides: CourtSides) {
    state.sides = sides;
    state.change_sides_due = false;
}

/// Core transition shared by live play, replay and what-if probing.
/// Does not touch `history`.
pub(crate) fn advance(state: &mut MatchState, team: TeamId) -> PointOutcome {
    let mut outcome = PointOutcome::new(team);

    if state.change_sides_due {
        state.sides = state.sides.swapped();
        state.change_sides_due = false;
        outcome.sides_changed = true;
    }

    if state.in_tiebreak() {
        play_tiebreak_point(state, team, &mut outcome);
    } else {
        match game_clock::next_point(state.current_game, team, &state.config) {
            GameOutcome::StillPlaying(score) => state.current_game = score,
            GameOutcome::GameWon(winner) => {
                state.current_game = GameScore::new();
                outcome.game_won = Some(winner);
                complete_game(state, winner, &mut outcome);
            }
        }
    }

    track_break_points(state, outcome.game_won.is_some());
    outcome
}

fn play_tiebreak_point(state: &mut MatchState, team: TeamId, outcome: &mut PointOutcome) {
    let idx = state.current_set;
    let doubles = state.config.doubles();

    match sets::on_tiebreak_point(&state.sets[idx], team) {
        SetOutcome::StillPlaying(set) | SetOutcome::EnterTiebreak(set) => {
            state.sets[idx] = set;
            if let Some(tb) = set.live_tiebreak() {
                state.server = tb.current_server(doubles);
                if tiebreak::side_change_due(tb.total_points()) {
                    state.change_sides_due = true;
                }
            }
        }
        SetOutcome::SetWon { winner, set } => {
            state.sets[idx] = set;
            outcome.game_won = Some(winner);
            state.games_played += 1;

            // Whoever received first in the tiebreak serves the next game.
            if let Some(tb) = set.tiebreak {
                state.partner_rotation = tb.rotation_after(doubles);
                let next_team = tb.first_server.team.other();
                state.server =
                    ServerState::new(next_team, state.partner_rotation[next_team.index()]);
            }
            debug!(winner = %winner, set = idx + 1, "Tiebreak won");

            finish_set(state, winner, outcome);
            if state.completed.is_none() {
                state.change_sides_due = true;
            }
        }
    }
}

fn complete_game(state: &mut MatchState, winner: TeamId, outcome: &mut PointOutcome) {
    let idx = state.current_set;
    state.games_played += 1;

    let set_outcome = sets::on_game_won(&state.sets[idx], winner, &state.config);
    pass_service(state);

    match set_outcome {
        SetOutcome::StillPlaying(set) => state.sets[idx] = set,
        SetOutcome::EnterTiebreak(set) => {
            let receiver = state.server.team.other();
            state.sets[idx] = sets::begin_tiebreak(
                &set,
                &state.config,
                state.server,
                state.partner_rotation[receiver.index()],
            );
            outcome.tiebreak_started = true;
            debug!(set = idx + 1, "Tiebreak started");
        }
        SetOutcome::SetWon { winner, set } => {
            state.sets[idx] = set;
            finish_set(state, winner, outcome);
        }
    }

    if state.completed.is_none() && (state.config.windbreak() || state.games_played % 2 == 1) {
        state.change_sides_due = true;
    }
}

/// Hand service to the other team; in doubles the outgoing team's next
/// service turn goes to the other partner.
fn pass_service(state: &mut MatchState) {
    let outgoing = state.server.team;
    if state.config.doubles() {
        state.partner_rotation[outgoing.index()] ^= 1;
    }
    let incoming = outgoing.other();
    state.server = ServerState::new(incoming, state.partner_rotation[incoming.index()]);
}

fn finish_set(state: &mut MatchState, winner: TeamId, outcome: &mut PointOutcome) {
    state.sets_won[winner.index()] += 1;
    outcome.set_won = Some(winner);
    debug!(
        winner = %winner,
        sets_a = state.sets_won[0],
        sets_b = state.sets_won[1],
        "Set won"
    );

    if state.sets_won[winner.index()] >= state.config.sets_to_win() {
        state.completed = Some(winner);
        state.change_sides_due = false;
        outcome.match_won = Some(winner);
        debug!(winner = %winner, "Match completed");
        return;
    }

    let deciding = state.config.is_deciding_set(state.sets_won);
    let receiver = state.server.team.other();
    let set = sets::start_set(
        &state.config,
        deciding,
        state.server,
        state.partner_rotation[receiver.index()],
    );
    if set.live_tiebreak().is_some() {
        outcome.tiebreak_started = true;
    }
    state.sets.push(set);
    state.current_set = state.sets.len() - 1;
    state.current_game = GameScore::new();
}

fn track_break_points(state: &mut MatchState, new_game: bool) {
    if new_game {
        state.break_points = BreakPointTally::default();
    }
    let live = break_point_position(state).is_some();
    if !live {
        state.break_points.opportunities = 0;
    } else if !state.break_points.live {
        state.break_points.opportunities = state.break_points.opportunities.saturating_add(1);
    }
    state.break_points.live = live;
}
