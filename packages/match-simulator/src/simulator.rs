//! In-memory match simulator.
//!
//! Drives the scoring engine point by point, either from a fixed sequence or
//! from a seeded random serve model, and tallies per-team statistics along
//! the way.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scoreboard::domain::{
    apply_point, classify, snapshot, MatchConfig, MatchOpening, MatchSnapshot, MatchState,
    Situation, TeamId,
};
use scoreboard::errors::DomainError;
use tracing::{debug, trace};

const TEAMS: usize = 2;

/// Guard against a serve model that never lets a game finish.
pub const MAX_POINTS: usize = 20_000;

/// Running counters for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamTally {
    pub points_won: u32,
    pub service_points_played: u32,
    pub service_points_won: u32,
    /// Break points this team faced while serving.
    pub break_points_faced: u32,
    pub break_points_saved: u32,
    /// Break points this team won while receiving.
    pub break_points_converted: u32,
    pub break_point_chances: u32,
    pub set_points_saved: u32,
    pub match_points_saved: u32,
    pub tiebreaks_won: u32,
}

/// Result of a simulated or replayed match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub snapshot: MatchSnapshot,
    pub tallies: [TeamTally; TEAMS],
    pub points_played: usize,
    pub tiebreaks_played: u32,
}

impl MatchResult {
    pub fn winner(&self) -> Option<TeamId> {
        self.snapshot.winner()
    }
}

/// Point-by-point driver with its own statistics.
struct Tracker {
    state: MatchState,
    tallies: [TeamTally; TEAMS],
    tiebreaks_played: u32,
}

impl Tracker {
    fn new(config: MatchConfig, opening: MatchOpening) -> Result<Self, SimulatorError> {
        Ok(Self {
            state: MatchState::new(config, opening)?,
            tallies: [TeamTally::default(); TEAMS],
            tiebreaks_played: 0,
        })
    }

    fn play(&mut self, winner: TeamId) -> Result<(), SimulatorError> {
        let server = self.state.server().team;
        let in_tiebreak = self.state.in_tiebreak();
        let report = classify(&self.state);

        let outcome = apply_point(&mut self.state, winner)?;

        let tally = &mut self.tallies[winner.index()];
        tally.points_won += 1;
        if !in_tiebreak {
            let srv = &mut self.tallies[server.index()];
            srv.service_points_played += 1;
            if winner == server {
                srv.service_points_won += 1;
            }
        }

        if let Some(bp) = report.break_point {
            self.tallies[server.index()].break_points_faced += 1;
            self.tallies[bp.team.index()].break_point_chances += 1;
            if winner == bp.team {
                self.tallies[bp.team.index()].break_points_converted += 1;
            } else {
                self.tallies[server.index()].break_points_saved += 1;
            }
        }

        match report.situation {
            Situation::SetPoint(t) if winner != t => {
                self.tallies[t.other().index()].set_points_saved += 1;
            }
            Situation::MatchPoint(t) if winner != t => {
                self.tallies[t.other().index()].match_points_saved += 1;
            }
            _ => {}
        }

        if outcome.tiebreak_started {
            self.tiebreaks_played += 1;
        }
        if in_tiebreak {
            if let Some(team) = outcome.game_won {
                self.tallies[team.index()].tiebreaks_won += 1;
            }
        }
        if let Some(team) = outcome.set_won {
            debug!(team = %team, sets = ?self.state.sets_won(), "Set completed");
        }
        trace!(winner = %winner, server = %server, "Point played");
        Ok(())
    }

    fn finish(self) -> MatchResult {
        MatchResult {
            points_played: self.state.history().len(),
            snapshot: snapshot(&self.state),
            tallies: self.tallies,
            tiebreaks_played: self.tiebreaks_played,
        }
    }
}

/// Seeded random simulator. The server wins each point with a fixed
/// probability; everything else follows the scoring rules.
pub struct Simulator {
    config: MatchConfig,
    opening: MatchOpening,
    rng: ChaCha8Rng,
    serve_win_pct: f64,
}

impl Simulator {
    pub fn new(
        config: MatchConfig,
        opening: MatchOpening,
        seed: [u8; 32],
        serve_win_pct: f64,
    ) -> Result<Self, SimulatorError> {
        if !(0.0..=1.0).contains(&serve_win_pct) {
            return Err(SimulatorError::InvalidProbability(serve_win_pct));
        }
        Ok(Self {
            config,
            opening,
            rng: ChaCha8Rng::from_seed(seed),
            serve_win_pct,
        })
    }

    /// Play points until the match completes.
    pub fn simulate_match(mut self) -> Result<MatchResult, SimulatorError> {
        let mut tracker = Tracker::new(self.config, self.opening)?;

        while tracker.state.completed().is_none() {
            if tracker.state.history().len() >= MAX_POINTS {
                return Err(SimulatorError::Runaway(MAX_POINTS));
            }
            let server = tracker.state.server().team;
            let winner = if self.rng.random_bool(self.serve_win_pct) {
                server
            } else {
                server.other()
            };
            tracker.play(winner)?;
        }

        Ok(tracker.finish())
    }
}

/// Replay a fixed point sequence. The match may still be in progress at the end.
pub fn replay_points(
    config: MatchConfig,
    opening: MatchOpening,
    points: &[TeamId],
) -> Result<MatchResult, SimulatorError> {
    let mut tracker = Tracker::new(config, opening)?;
    for (i, &team) in points.iter().enumerate() {
        tracker
            .play(team)
            .map_err(|e| SimulatorError::AtPoint(i + 1, Box::new(e)))?;
    }
    Ok(tracker.finish())
}

/// Parse a compact point sequence such as `AABB A,B`. Whitespace and commas
/// are ignored.
pub fn parse_points(raw: &str) -> Result<Vec<TeamId>, SimulatorError> {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            c.to_string()
                .parse::<TeamId>()
                .map_err(|_| SimulatorError::InvalidPoint(c))
        })
        .collect()
}

/// Per-match seed. With a base seed, the first 8 bytes carry it and the next
/// 4 the match number, so every match differs but reruns are reproducible.
pub fn match_seed(base: Option<u64>, match_no: u32) -> [u8; 32] {
    match base {
        Some(s) => {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&s.to_le_bytes());
            seed[8..12].copy_from_slice(&match_no.to_le_bytes());
            seed
        }
        None => rand::random(),
    }
}

/// Simulator error types.
#[derive(Debug)]
pub enum SimulatorError {
    /// Scoring engine rejected an input
    Domain(DomainError),
    /// Replayed point `n` (1-based) failed
    AtPoint(usize, Box<SimulatorError>),
    /// Character in a point sequence that is not a team
    InvalidPoint(char),
    /// Serve-win probability outside 0..=1
    InvalidProbability(f64),
    /// Match did not finish within the point cap
    Runaway(usize),
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulatorError::Domain(err) => write!(f, "Scoring error: {err}"),
            SimulatorError::AtPoint(n, err) => write!(f, "Point #{n}: {err}"),
            SimulatorError::InvalidPoint(c) => {
                write!(f, "Invalid point '{c}' (expected A or B)")
            }
            SimulatorError::InvalidProbability(p) => {
                write!(f, "Serve-win probability {p} is outside 0..=1")
            }
            SimulatorError::Runaway(cap) => write!(f, "Match unfinished after {cap} points"),
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<DomainError> for SimulatorError {
    fn from(err: DomainError) -> Self {
        SimulatorError::Domain(err)
    }
}
