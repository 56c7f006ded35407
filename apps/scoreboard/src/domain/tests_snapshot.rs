use crate::domain::game_clock::{GameScore, PointValue, ScoreCall};
use crate::domain::rules::MatchConfig;
use crate::domain::snapshot::{restore, snapshot};
use crate::domain::state::{CourtSide, MatchEvent, MatchState, MatchStatus, TeamId};
use crate::domain::test_state_helpers::{hold, level_at, new_match, play, seq};
use crate::errors::domain::{DomainError, ValidationKind};
use TeamId::{A, B};

fn assert_inconsistent(result: Result<MatchState, DomainError>) {
    let err = result.expect_err("snapshot should be rejected");
    assert_eq!(
        err.validation_kind(),
        Some(&ValidationKind::InconsistentSnapshot)
    );
}

#[test]
fn snapshot_reports_ladder_calls_outside_tiebreaks() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("AAB"));
    let snap = snapshot(&state);
    assert_eq!(
        snap.calls,
        [
            ScoreCall::Ladder(PointValue::Thirty),
            ScoreCall::Ladder(PointValue::Fifteen)
        ]
    );
    assert_eq!(snap.status, MatchStatus::InProgress);
    assert_eq!(snap.winner(), None);
}

#[test]
fn snapshot_reports_counts_inside_tiebreaks() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    level_at(&mut state, 6);
    play(&mut state, &seq("ABB"));
    let snap = snapshot(&state);
    assert_eq!(
        snap.calls,
        [ScoreCall::TiebreakCount(1), ScoreCall::TiebreakCount(2)]
    );
    assert_eq!(snap.score_line(), "6-6");
}

#[test]
fn restore_round_trips_through_json() {
    let mut state = new_match(MatchConfig::padel(), B);
    for _ in 0..7 {
        hold(&mut state, A);
    }
    play(&mut state, &seq("ABBA"));

    let json = serde_json::to_string(&snapshot(&state)).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    let restored = restore(&parsed).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn restore_rejects_double_advantage() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("ABABABA"));
    let mut snap = snapshot(&state);
    snap.current_game = GameScore::from_points(PointValue::Advantage, PointValue::Advantage);
    assert_inconsistent(restore(&snap));
}

#[test]
fn restore_rejects_fields_that_disagree_with_history() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("AAAB"));

    let mut snap = snapshot(&state);
    snap.current_game = GameScore::from_points(PointValue::Forty, PointValue::Thirty);
    assert_inconsistent(restore(&snap));

    let mut snap = snapshot(&state);
    snap.sides.team_a = CourtSide::Right;
    snap.sides.team_b = CourtSide::Left;
    assert_inconsistent(restore(&snap));
}

#[test]
fn restore_rejects_impossible_set_tally() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..6 {
        hold(&mut state, A);
    }
    let mut snap = snapshot(&state);
    snap.sets_won = [3, 0];
    assert_inconsistent(restore(&snap));

    let mut snap = snapshot(&state);
    snap.sets_won = [0, 1];
    assert_inconsistent(restore(&snap));
}

#[test]
fn restore_rejects_points_after_completion() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..12 {
        hold(&mut state, A);
    }
    let mut snap = snapshot(&state);
    snap.history.push(MatchEvent::Point(B));
    assert_inconsistent(restore(&snap));
}
