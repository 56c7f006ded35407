//! In-process registry of live matches.
//!
//! Each match sits behind its own lock, so writes to one match are serialized
//! while different matches proceed independently. Readers receive cloned
//! snapshots and never hold a lock across calls.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::config::ServiceConfig;
use crate::domain::match_transition::{
    derive_match_transitions, MatchLifecycleView, MatchTransition,
};
use crate::domain::rules::MatchConfig;
use crate::domain::scoring::{self, PointOutcome};
use crate::domain::situation::{classify, SituationReport};
use crate::domain::snapshot::{restore, snapshot, MatchSnapshot};
use crate::domain::state::{CourtSides, MatchOpening, MatchState, TeamId};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Ulid);

impl MatchId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MatchId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim()).map(MatchId).map_err(|e| {
            AppError::invalid(ErrorCode::ValidationError, format!("bad match id '{s}': {e}"))
        })
    }
}

/// Everything the broadcast layer needs after a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRecord {
    pub outcome: PointOutcome,
    pub transitions: Vec<MatchTransition>,
    pub situation: SituationReport,
    pub snapshot: MatchSnapshot,
}

pub struct ScoreboardService {
    config: ServiceConfig,
    matches: DashMap<MatchId, Arc<RwLock<MatchState>>>,
    /// Slots claimed against `max_matches`. Reserved before a match is
    /// inserted and released after it is removed.
    reserved: AtomicUsize,
}

impl ScoreboardService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            matches: DashMap::new(),
            reserved: AtomicUsize::new(0),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(ServiceConfig::from_env()?))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn match_ids(&self) -> Vec<MatchId> {
        let mut ids: Vec<MatchId> = self.matches.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    /// Start tracking a new match. The configuration is fixed from here on.
    pub fn create_match(
        &self,
        config: MatchConfig,
        opening: MatchOpening,
    ) -> Result<MatchId, AppError> {
        let state = MatchState::new(config, opening)?;
        let id = self.insert(state)?;
        info!(
            match_id = %id,
            best_of = config.best_of(),
            doubles = config.doubles(),
            first_server = %opening.first_server.team,
            "Match created"
        );
        Ok(id)
    }

    /// Create a match in the service's default format.
    pub fn create_default_match(&self, opening: MatchOpening) -> Result<MatchId, AppError> {
        self.create_match(self.config.default_format.config(), opening)
    }

    /// Re-register a match from a stored snapshot under a fresh id.
    pub fn restore_match(&self, snap: &MatchSnapshot) -> Result<MatchId, AppError> {
        let state = restore(snap).inspect_err(|e| warn!(error = %e, "Snapshot rejected"))?;
        let id = self.insert(state)?;
        info!(match_id = %id, events = snap.history.len(), "Match restored");
        Ok(id)
    }

    /// Record a point and report what it changed.
    pub fn record_point(&self, id: MatchId, team: TeamId) -> Result<PointRecord, AppError> {
        let handle = self.handle(id)?;
        let mut state = handle.write();

        let before = MatchLifecycleView::of(&state);
        let outcome = scoring::apply_point(&mut state, team).inspect_err(|e| {
            warn!(match_id = %id, team = %team, error = %e, "Point rejected");
        })?;
        let transitions = derive_match_transitions(&before, &MatchLifecycleView::of(&state));

        debug!(match_id = %id, team = %team, transitions = transitions.len(), "Point applied");
        if let Some(winner) = outcome.match_won {
            info!(match_id = %id, winner = %winner, "Match completed");
        }

        Ok(PointRecord {
            outcome,
            transitions,
            situation: classify(&state),
            snapshot: snapshot(&state),
        })
    }

    /// Apply "point won by `team`" and return the new snapshot.
    pub fn apply_point(&self, id: MatchId, team: TeamId) -> Result<MatchSnapshot, AppError> {
        self.record_point(id, team).map(|r| r.snapshot)
    }

    /// Same as [`Self::apply_point`] for a raw team key from operator input.
    pub fn apply_point_str(&self, id: MatchId, team: &str) -> Result<MatchSnapshot, AppError> {
        let team: TeamId = team.parse()?;
        self.apply_point(id, team)
    }

    /// Manual court-side override.
    pub fn set_court_side(&self, id: MatchId, sides: CourtSides) -> Result<(), AppError> {
        let handle = self.handle(id)?;
        let mut state = handle.write();
        scoring::set_court_sides(&mut state, sides)?;
        info!(match_id = %id, team_a = ?sides.team_a, "Court sides set");
        Ok(())
    }

    /// Revert the most recent event.
    pub fn undo(&self, id: MatchId) -> Result<MatchSnapshot, AppError> {
        let handle = self.handle(id)?;
        let mut state = handle.write();
        let reverted = scoring::undo(&mut state)?;
        info!(match_id = %id, reverted = ?reverted, "Event undone");
        Ok(snapshot(&state))
    }

    pub fn snapshot(&self, id: MatchId) -> Result<MatchSnapshot, AppError> {
        let handle = self.handle(id)?;
        let state = handle.read();
        Ok(snapshot(&state))
    }

    pub fn situation(&self, id: MatchId) -> Result<SituationReport, AppError> {
        let handle = self.handle(id)?;
        let state = handle.read();
        Ok(classify(&state))
    }

    /// Stop tracking a match, returning its final snapshot.
    pub fn remove_match(&self, id: MatchId) -> Result<MatchSnapshot, AppError> {
        let (_, handle) = self.matches.remove(&id).ok_or_else(|| missing(id))?;
        self.release_slot();
        let state = handle.read();
        info!(match_id = %id, "Match removed");
        Ok(snapshot(&state))
    }

    fn insert(&self, state: MatchState) -> Result<MatchId, AppError> {
        let max = self.config.max_matches;
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .map_err(|_| {
                DomainError::conflict(
                    ConflictKind::CapacityReached,
                    format!("already tracking {max} matches"),
                )
            })?;
        let id = MatchId::new();
        if self
            .matches
            .insert(id, Arc::new(RwLock::new(state)))
            .is_some()
        {
            // Id collision replaced an existing entry; the map did not grow.
            warn!(match_id = %id, "Match id collision replaced a tracked match");
            self.release_slot();
        }
        Ok(id)
    }

    fn release_slot(&self) {
        let _ = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Clone the handle out so the map shard lock is released before the
    /// match lock is taken.
    fn handle(&self, id: MatchId) -> Result<Arc<RwLock<MatchState>>, AppError> {
        self.matches
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| missing(id))
    }
}

impl Default for ScoreboardService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

fn missing(id: MatchId) -> AppError {
    DomainError::not_found(NotFoundKind::Match, format!("match {id} is not tracked")).into()
}
