#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use scoreboard::domain::{MatchSnapshot, TeamId};
use scoreboard::{MatchId, PointRecord, ScoreboardService, ServiceConfig};

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    scoreboard_test_support::logging::init();
}

pub fn service() -> ScoreboardService {
    ScoreboardService::new(ServiceConfig::default())
}

/// Points from a compact string such as `"AABA"`.
pub fn seq(points: &str) -> Vec<TeamId> {
    points
        .chars()
        .map(|c| c.to_string().parse().expect("A or B"))
        .collect()
}

/// Apply every point in order and return the final snapshot.
pub fn play(svc: &ScoreboardService, id: MatchId, points: &[TeamId]) -> MatchSnapshot {
    let mut last = svc.snapshot(id).expect("match is tracked");
    for &team in points {
        last = svc.apply_point(id, team).expect("point accepted");
    }
    last
}

/// Feed points to `team` until it wins the game (or tiebreak) in play.
pub fn win_game(svc: &ScoreboardService, id: MatchId, team: TeamId) -> PointRecord {
    for _ in 0..64 {
        let record = svc.record_point(id, team).expect("point accepted");
        if record.outcome.game_won == Some(team) {
            return record;
        }
    }
    panic!("team {team} did not win a game within 64 points");
}

/// Win `n` consecutive games for `team`, returning the last record.
pub fn win_games(svc: &ScoreboardService, id: MatchId, team: TeamId, n: usize) -> PointRecord {
    assert!(n > 0);
    let mut last = None;
    for _ in 0..n {
        last = Some(win_game(svc, id, team));
    }
    last.expect("n > 0")
}
