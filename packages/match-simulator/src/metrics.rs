//! Metrics collection and output for simulated matches.

use scoreboard::domain::{MatchConfig, MatchSnapshot, TeamId};
use scoreboard::MatchFormat;
use serde::Serialize;

use crate::simulator::{MatchResult, TeamTally};
use crate::types::MetricsLevel;

/// Complete match metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetrics {
    pub match_no: u32,
    /// Hex-encoded 32-byte seed; absent for replayed sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    pub timestamp: String,
    pub format: Option<MatchFormat>,
    pub config: MatchConfig,
    pub result: ResultMetrics,
    pub sets: Vec<SetMetrics>,
    pub teams: Vec<TeamMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<MatchSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultMetrics {
    pub winner: Option<TeamId>,
    pub score: String,
    pub sets_won: [u8; 2],
    pub games_played: u16,
    pub points_played: usize,
    pub tiebreaks_played: u32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetMetrics {
    pub set_no: u8,
    pub games: [u8; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<[u8; 2]>,
    pub winner: Option<TeamId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMetrics {
    pub team: TeamId,
    pub points_won: u32,
    pub service_points_won: u32,
    pub service_points_played: u32,
    pub service_win_pct: f64,
    pub break_points_faced: u32,
    pub break_points_saved: u32,
    pub break_points_converted: u32,
    pub break_point_chances: u32,
    pub set_points_saved: u32,
    pub match_points_saved: u32,
    pub tiebreaks_won: u32,
}

/// What the caller knows about a run besides its result.
pub struct RunInfo<'a> {
    pub match_no: u32,
    pub seed: Option<&'a [u8; 32]>,
    pub format: Option<MatchFormat>,
    pub duration_ms: f64,
    pub level: MetricsLevel,
}

/// Build metrics from a match result.
pub fn build_match_metrics(info: RunInfo<'_>, result: &MatchResult) -> MatchMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let snap = &result.snapshot;
    let sets = snap
        .sets
        .iter()
        .enumerate()
        .map(|(i, set)| SetMetrics {
            set_no: (i + 1) as u8,
            games: set.games,
            tiebreak: set.tiebreak.map(|tb| tb.points),
            winner: set.completed,
        })
        .collect();

    let teams = TeamId::ALL
        .iter()
        .map(|&team| build_team_metrics(team, &result.tallies[team.index()]))
        .collect();

    MatchMetrics {
        match_no: info.match_no,
        seed: info.seed.map(hex::encode),
        timestamp,
        format: info.format,
        config: snap.config,
        result: ResultMetrics {
            winner: snap.winner(),
            score: snap.score_line(),
            sets_won: snap.sets_won,
            games_played: snap.games_played,
            points_played: result.points_played,
            tiebreaks_played: result.tiebreaks_played,
            duration_ms: info.duration_ms,
        },
        sets,
        teams,
        snapshot: (info.level == MetricsLevel::Detailed).then(|| snap.clone()),
    }
}

fn build_team_metrics(team: TeamId, tally: &TeamTally) -> TeamMetrics {
    let service_win_pct = if tally.service_points_played > 0 {
        (tally.service_points_won as f64 / tally.service_points_played as f64) * 100.0
    } else {
        0.0
    };
    TeamMetrics {
        team,
        points_won: tally.points_won,
        service_points_won: tally.service_points_won,
        service_points_played: tally.service_points_played,
        service_win_pct,
        break_points_faced: tally.break_points_faced,
        break_points_saved: tally.break_points_saved,
        break_points_converted: tally.break_points_converted,
        break_point_chances: tally.break_point_chances,
        set_points_saved: tally.set_points_saved,
        match_points_saved: tally.match_points_saved,
        tiebreaks_won: tally.tiebreaks_won,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub match_no: u32,
    pub seed: String,
    pub winner: String,
    pub score: String,
    pub sets_a: u8,
    pub sets_b: u8,
    pub games_played: u16,
    pub points_played: usize,
    pub tiebreaks_played: u32,
    pub breaks_a: u32,
    pub breaks_b: u32,
}

impl From<&MatchMetrics> for CsvSummaryRow {
    fn from(metrics: &MatchMetrics) -> Self {
        let breaks = |i: usize| {
            metrics
                .teams
                .get(i)
                .map(|t| t.break_points_converted)
                .unwrap_or(0)
        };
        CsvSummaryRow {
            match_no: metrics.match_no,
            seed: metrics.seed.clone().unwrap_or_default(),
            winner: metrics
                .result
                .winner
                .map(|t| t.to_string())
                .unwrap_or_default(),
            score: metrics.result.score.clone(),
            sets_a: metrics.result.sets_won[0],
            sets_b: metrics.result.sets_won[1],
            games_played: metrics.result.games_played,
            points_played: metrics.result.points_played,
            tiebreaks_played: metrics.result.tiebreaks_played,
            breaks_a: breaks(0),
            breaks_b: breaks(1),
        }
    }
}
