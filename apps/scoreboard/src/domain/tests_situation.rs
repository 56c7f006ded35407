use crate::domain::rules::{MatchConfig, ScoringSystem};
use crate::domain::situation::{classify, BreakPoint, Situation};
use crate::domain::state::TeamId;
use crate::domain::test_state_helpers::{hold, level_at, new_match, play, seq};
use TeamId::{A, B};

#[test]
fn fresh_match_is_an_ordinary_point() {
    let state = new_match(MatchConfig::tennis_best_of_3(), A);
    let report = classify(&state);
    assert_eq!(report.situation, Situation::None);
    assert_eq!(report.break_point, None);
    assert!(!report.change_sides_due);
    assert!(!report.deciding_point);
}

#[test]
fn server_at_forty_love_has_game_point() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("AAA"));
    let report = classify(&state);
    assert_eq!(report.situation, Situation::GamePoint(A));
    assert_eq!(report.break_point, None);
}

#[test]
fn break_point_count_survives_saved_points_and_resets_at_deuce() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);

    play(&mut state, &seq("BBB"));
    let report = classify(&state);
    assert_eq!(report.situation, Situation::GamePoint(B));
    assert_eq!(
        report.break_point,
        Some(BreakPoint {
            team: B,
            opportunity: 1
        })
    );

    // 15-40: still a break point, same opportunity.
    play(&mut state, &[A]);
    assert_eq!(classify(&state).break_point.map(|b| b.opportunity), Some(1));

    // Deuce clears it.
    play(&mut state, &seq("AA"));
    let report = classify(&state);
    assert!(state.current_game().is_deuce());
    assert_eq!(report.break_point, None);
    assert_eq!(report.situation, Situation::None);
    assert_eq!(state.break_points().opportunities, 0);

    // Advantage receiver: the count starts over.
    play(&mut state, &[B]);
    assert_eq!(
        classify(&state).break_point,
        Some(BreakPoint {
            team: B,
            opportunity: 1
        })
    );

    // Advantage server: game point for A, no break point.
    play(&mut state, &seq("AA"));
    let report = classify(&state);
    assert_eq!(report.situation, Situation::GamePoint(A));
    assert_eq!(report.break_point, None);
}

#[test]
fn regained_break_point_after_deuce_restarts_at_one() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("BBBAAA"));
    assert_eq!(classify(&state).break_point, None);

    play(&mut state, &[B]);
    assert_eq!(
        classify(&state).break_point,
        Some(BreakPoint {
            team: B,
            opportunity: 1
        })
    );

    // Saved again, then regained again: still the first of a new run.
    play(&mut state, &seq("AB"));
    assert_eq!(classify(&state).break_point.map(|b| b.opportunity), Some(1));
}

#[test]
fn opportunities_reset_with_a_new_game() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    play(&mut state, &seq("BBBB"));
    assert_eq!(state.break_points().opportunities, 0);
    // B serves now; A reaching 0-40 is A's first opportunity.
    play(&mut state, &seq("AAA"));
    assert_eq!(
        classify(&state).break_point,
        Some(BreakPoint {
            team: A,
            opportunity: 1
        })
    );
}

#[test]
fn set_point_outranks_game_point() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..5 {
        hold(&mut state, A);
    }
    // 5-0, B serving, A at 0-40.
    assert_eq!(state.server().team, B);
    play(&mut state, &seq("AAA"));
    let report = classify(&state);
    assert_eq!(report.situation, Situation::SetPoint(A));
    assert_eq!(report.break_point.map(|b| b.team), Some(A));
}

#[test]
fn match_point_outranks_set_point() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..11 {
        hold(&mut state, A);
    }
    play(&mut state, &seq("AAA"));
    assert_eq!(classify(&state).situation, Situation::MatchPoint(A));
}

#[test]
fn defending_side_is_not_reported_when_opponent_has_more_at_stake() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..5 {
        hold(&mut state, A);
    }
    // 5-0, B serving at 40-15: B has game point, A has nothing.
    play(&mut state, &seq("BBBA"));
    assert_eq!(classify(&state).situation, Situation::GamePoint(B));
    // Deuce: neither side can finish the game.
    play(&mut state, &seq("AA"));
    assert_eq!(classify(&state).situation, Situation::None);
    // Advantage A: set point A.
    play(&mut state, &[A]);
    assert_eq!(classify(&state).situation, Situation::SetPoint(A));
}

#[test]
fn golden_point_deuce_reports_receiver_as_deciding_point() {
    let cfg = MatchConfig::builder()
        .scoring_system(ScoringSystem::NoAd)
        .build()
        .unwrap();
    let mut state = new_match(cfg, A);
    play(&mut state, &seq("ABABAB"));
    let report = classify(&state);
    assert!(report.deciding_point);
    assert_eq!(report.situation, Situation::GamePoint(B));
    assert_eq!(
        report.break_point,
        Some(BreakPoint {
            team: B,
            opportunity: 1
        })
    );
}

#[test]
fn tiebreak_points_are_set_points_without_break_points() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    level_at(&mut state, 6);
    play(&mut state, &seq("BBBBBB"));
    let report = classify(&state);
    assert_eq!(report.situation, Situation::SetPoint(B));
    assert_eq!(report.break_point, None);
    assert!(!report.deciding_point);

    // 6-6 in the tiebreak: nobody can win the set on the next point.
    play(&mut state, &seq("AAAAAA"));
    assert_eq!(classify(&state).situation, Situation::None);
}

#[test]
fn tiebreak_point_label_is_never_emitted() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    level_at(&mut state, 6);
    assert!(state.in_tiebreak());

    // Trade points well past 6-6, then let A close it out.
    let mut seen = Vec::new();
    for team in seq("ABABABABABABABAB").into_iter().chain([A, A]) {
        seen.push(classify(&state).situation);
        play(&mut state, &[team]);
    }
    assert!(!state.in_tiebreak());
    assert_eq!(state.sets()[0].completed, Some(A));
    assert!(seen.contains(&Situation::SetPoint(A)));
    assert!(!seen.iter().any(|s| matches!(s, Situation::TiebreakPoint(_))));
}

#[test]
fn change_of_ends_flag_is_reported() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    hold(&mut state, A);
    assert!(classify(&state).change_sides_due);
}

#[test]
fn completed_match_has_no_situation() {
    let mut state = new_match(MatchConfig::tennis_best_of_3(), A);
    for _ in 0..12 {
        hold(&mut state, B);
    }
    assert_eq!(classify(&state).situation, Situation::None);
}

#[test]
fn classification_is_pure_and_idempotent() {
    let mut state = new_match(MatchConfig::padel(), A);
    play(&mut state, &seq("ABABAB"));
    let before = state.clone();
    let first = classify(&state);
    let second = classify(&state);
    assert_eq!(first, second);
    assert_eq!(state, before);
}
