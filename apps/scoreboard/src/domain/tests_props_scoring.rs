//! Property-based tests for the scoring state machine over random point streams.

use proptest::prelude::*;

use crate::domain::game_clock::PointValue;
use crate::domain::scoring::{apply_point, replay, set_court_sides, undo};
use crate::domain::state::{MatchEvent, MatchState};
use crate::domain::{test_gens, test_prelude};

/// Apply events until the match completes; returns how many were accepted.
fn drive(state: &mut MatchState, events: &[MatchEvent]) -> usize {
    for (i, event) in events.iter().enumerate() {
        if state.completed().is_some() {
            return i;
        }
        match *event {
            MatchEvent::Point(team) => {
                apply_point(state, team).expect("in-progress match accepts points");
            }
            MatchEvent::CourtSides(sides) => {
                set_court_sides(state, sides).expect("complementary sides are accepted");
            }
        }
    }
    events.len()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: at most one side ever holds Advantage, and only against Forty.
    #[test]
    fn prop_no_double_advantage(
        (cfg, opening) in test_gens::config_and_opening(),
        points in test_gens::points(400),
    ) {
        let mut state = MatchState::new(cfg, opening).unwrap();
        for team in points {
            if state.completed().is_some() {
                break;
            }
            apply_point(&mut state, team).unwrap();
            let game = state.current_game();
            prop_assert!(game.validate().is_ok(), "bad game score {:?}", game);
            if cfg.golden_point() {
                prop_assert!(game.advantage().is_none());
            }
            prop_assert!(
                !(game.points[0] == PointValue::Advantage && game.points[1] == PointValue::Advantage)
            );
        }
    }

    /// Property: the two teams always occupy opposite ends.
    #[test]
    fn prop_sides_always_complementary(
        (cfg, opening) in test_gens::config_and_opening(),
        events in test_gens::events(300),
    ) {
        let mut state = MatchState::new(cfg, opening).unwrap();
        for event in events {
            if state.completed().is_some() {
                break;
            }
            match event {
                MatchEvent::Point(team) => { apply_point(&mut state, team).unwrap(); }
                MatchEvent::CourtSides(sides) => set_court_sides(&mut state, sides).unwrap(),
            }
            prop_assert!(state.sides().is_complementary());
        }
    }

    /// Property: undo immediately after any event restores the prior state.
    #[test]
    fn prop_undo_inverts_apply(
        (cfg, opening) in test_gens::config_and_opening(),
        events in test_gens::events(200),
        last in test_gens::team(),
    ) {
        let mut state = MatchState::new(cfg, opening).unwrap();
        drive(&mut state, &events);
        prop_assume!(state.completed().is_none());

        let before = state.clone();
        apply_point(&mut state, last).unwrap();
        let undone = undo(&mut state).unwrap();
        prop_assert_eq!(undone, MatchEvent::Point(last));
        prop_assert_eq!(state, before);
    }

    /// Property: replaying the history from the opening reproduces the live state.
    #[test]
    fn prop_replay_matches_live_state(
        (cfg, opening) in test_gens::config_and_opening(),
        events in test_gens::events(400),
    ) {
        let mut state = MatchState::new(cfg, opening).unwrap();
        drive(&mut state, &events);
        let rebuilt = replay(cfg, opening, state.history()).unwrap();
        prop_assert_eq!(rebuilt, state);
    }

    /// Property: sets won never exceed what the format allows, and completion
    /// coincides with reaching the target.
    #[test]
    fn prop_set_tally_bounded(
        (cfg, opening) in test_gens::config_and_opening(),
        points in test_gens::points(600),
    ) {
        let mut state = MatchState::new(cfg, opening).unwrap();
        let events: Vec<MatchEvent> = points.into_iter().map(MatchEvent::Point).collect();
        drive(&mut state, &events);

        let needed = cfg.sets_to_win();
        let [a, b] = state.sets_won();
        prop_assert!(a <= needed && b <= needed);
        prop_assert!(usize::from(a + b) <= usize::from(cfg.best_of()));
        match state.completed() {
            Some(winner) => prop_assert_eq!(state.sets_won()[winner.index()], needed),
            None => prop_assert!(a < needed && b < needed),
        }
        for set in state.sets() {
            prop_assert!(set.validate(&cfg).is_ok(), "bad set {:?}", set);
        }
    }
}
