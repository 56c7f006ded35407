// Proptest generators for domain types.
// Configs are valid by construction; point streams are plain A/B sequences.

use proptest::prelude::*;

use crate::domain::rules::{MatchConfig, ScoringSystem, TiebreakType};
use crate::domain::state::{CourtSide, CourtSides, MatchEvent, MatchOpening, ServerState, TeamId};

pub fn team() -> impl Strategy<Value = TeamId> {
    prop_oneof![Just(TeamId::A), Just(TeamId::B)]
}

/// Streams biased towards long rallies of one side, so sets and tiebreaks are
/// reached within a modest number of points.
pub fn points(max_len: usize) -> impl Strategy<Value = Vec<TeamId>> {
    prop::collection::vec((team(), 1usize..6), 0..max_len / 3 + 1).prop_map(move |runs| {
        runs.into_iter()
            .flat_map(|(t, n)| std::iter::repeat(t).take(n))
            .take(max_len)
            .collect()
    })
}

pub fn court_sides() -> impl Strategy<Value = CourtSides> {
    prop_oneof![
        Just(CourtSides::new(CourtSide::Left)),
        Just(CourtSides::new(CourtSide::Right)),
    ]
}

/// Mostly points, with the occasional manual side override.
pub fn events(max_len: usize) -> impl Strategy<Value = Vec<MatchEvent>> {
    prop::collection::vec(
        prop_oneof![
            12 => team().prop_map(MatchEvent::Point),
            1 => court_sides().prop_map(MatchEvent::CourtSides),
        ],
        0..max_len,
    )
}

pub fn match_config() -> impl Strategy<Value = MatchConfig> {
    prop_oneof![
        Just(MatchConfig::tennis_best_of_3()),
        Just(MatchConfig::tennis_best_of_5()),
        Just(MatchConfig::padel()),
        Just(MatchConfig::fast4()),
        custom_config(),
    ]
}

fn custom_config() -> impl Strategy<Value = MatchConfig> {
    (
        prop_oneof![Just(ScoringSystem::Classic), Just(ScoringSystem::NoAd)],
        prop_oneof![
            Just(TiebreakType::Regular),
            Just(TiebreakType::Championship),
            Just(TiebreakType::SuperTiebreakInsteadOfFinalSet),
        ],
        prop_oneof![Just(1u8), Just(3u8), Just(5u8)],
        2u8..=6,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(system, tiebreak, best_of, trigger, golden_game, windbreak, doubles)| {
                let tiebreak = match (tiebreak, best_of, golden_game) {
                    (TiebreakType::SuperTiebreakInsteadOfFinalSet, 1, _) => TiebreakType::Regular,
                    (TiebreakType::Championship, _, true) => TiebreakType::Regular,
                    (t, _, _) => t,
                };
                MatchConfig::builder()
                    .scoring_system(system)
                    .tiebreak_type(tiebreak)
                    .best_of(best_of)
                    .tiebreak_trigger_games(trigger)
                    .golden_game(golden_game)
                    .windbreak(windbreak)
                    .doubles(doubles)
                    .build()
                    .expect("generator only builds valid configs")
            },
        )
}

/// Opening consistent with `config` (player indices only used in doubles).
pub fn opening_for(config: MatchConfig) -> impl Strategy<Value = MatchOpening> {
    let max_player = u8::from(config.doubles());
    (team(), 0..=max_player, 0..=max_player, court_sides()).prop_map(
        |(first, player, receiver_first_player, sides)| MatchOpening {
            first_server: ServerState::new(first, player),
            receiver_first_player,
            sides,
        },
    )
}

pub fn config_and_opening() -> impl Strategy<Value = (MatchConfig, MatchOpening)> {
    match_config().prop_flat_map(|cfg| (Just(cfg), opening_for(cfg)))
}
