use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::game_clock::GameScore;
use crate::domain::rules::{MatchConfig, TEAMS};
use crate::domain::sets::{start_set, SetScore};
use crate::errors::domain::{DomainError, ValidationKind};

/// One of the two sides of the net. Closed set: there is no third team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    pub const ALL: [TeamId; TEAMS] = [TeamId::A, TeamId::B];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TeamId::A => 0,
            TeamId::B => 1,
        }
    }

    #[inline]
    pub const fn other(self) -> TeamId {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::A => write!(f, "A"),
            TeamId::B => write!(f, "B"),
        }
    }
}

impl FromStr for TeamId {
    type Err = DomainError;

    /// Accepts `A`/`B` and the `teamA`/`teamB` keys used by operator tooling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "teama" | "team_a" => Ok(TeamId::A),
            "b" | "teamb" | "team_b" => Ok(TeamId::B),
            _ => Err(DomainError::validation(
                ValidationKind::InvalidTeamIdentifier,
                format!("unknown team identifier '{s}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourtSide {
    Left,
    Right,
}

impl CourtSide {
    pub const fn other(self) -> CourtSide {
        match self {
            CourtSide::Left => CourtSide::Right,
            CourtSide::Right => CourtSide::Left,
        }
    }
}

/// Which end each team occupies. Always complementary when built through
/// [`CourtSides::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourtSides {
    pub team_a: CourtSide,
    pub team_b: CourtSide,
}

impl CourtSides {
    pub const fn new(team_a: CourtSide) -> Self {
        Self {
            team_a,
            team_b: team_a.other(),
        }
    }

    pub const fn swapped(self) -> Self {
        Self {
            team_a: self.team_b,
            team_b: self.team_a,
        }
    }

    pub const fn side_of(&self, team: TeamId) -> CourtSide {
        match team {
            TeamId::A => self.team_a,
            TeamId::B => self.team_b,
        }
    }

    pub fn is_complementary(&self) -> bool {
        self.team_a != self.team_b
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_complementary() {
            Ok(())
        } else {
            Err(DomainError::inconsistent(format!(
                "court sides must be complementary (both teams on {:?})",
                self.team_a
            )))
        }
    }
}

impl Default for CourtSides {
    fn default() -> Self {
        Self::new(CourtSide::Left)
    }
}

/// Who is serving. `player_index` is only meaningful in doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerState {
    pub team: TeamId,
    pub player_index: u8,
}

impl ServerState {
    pub const fn new(team: TeamId, player_index: u8) -> Self {
        Self { team, player_index }
    }
}

/// Starting conditions chosen at the coin toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOpening {
    pub first_server: ServerState,
    /// Partner of the receiving team who serves that team's first game.
    pub receiver_first_player: u8,
    pub sides: CourtSides,
}

impl MatchOpening {
    pub const fn new(first_server: TeamId) -> Self {
        Self {
            first_server: ServerState::new(first_server, 0),
            receiver_first_player: 0,
            sides: CourtSides::new(CourtSide::Left),
        }
    }

    fn validate(&self, config: &MatchConfig) -> Result<(), DomainError> {
        self.sides.validate()?;
        let max_player = if config.doubles() { 1 } else { 0 };
        if self.first_server.player_index > max_player || self.receiver_first_player > max_player
        {
            return Err(DomainError::invalid_config(format!(
                "player index out of range for {} (max {max_player})",
                if config.doubles() { "doubles" } else { "singles" }
            )));
        }
        Ok(())
    }
}

impl Default for MatchOpening {
    fn default() -> Self {
        Self::new(TeamId::A)
    }
}

/// Entries of the append-only match log. Replaying them from the opening
/// reproduces the state exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum MatchEvent {
    Point(TeamId),
    CourtSides(CourtSides),
}

/// Running count of consecutive break-point opportunities in the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BreakPointTally {
    /// Consecutive break-point opportunities. Drops to 0 as soon as the
    /// break-point condition goes away.
    pub opportunities: u8,
    /// Whether the current point is a break point.
    pub live: bool,
}

/// Coarse lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Completed(TeamId),
}

/// Aggregate scoring state. Mutated only by the operations in
/// [`crate::domain::scoring`]; frozen once `completed` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) opening: MatchOpening,
    /// Every set started so far; the one in play is `sets[current_set]`.
    pub(crate) sets: Vec<SetScore>,
    pub(crate) current_set: usize,
    pub(crate) current_game: GameScore,
    pub(crate) server: ServerState,
    pub(crate) sides: CourtSides,
    /// Change of ends owed at the next point boundary.
    pub(crate) change_sides_due: bool,
    pub(crate) sets_won: [u8; TEAMS],
    /// Completed games across the match, a tiebreak counting as one.
    pub(crate) games_played: u16,
    /// Player each team serves with on its next service turn.
    pub(crate) partner_rotation: [u8; TEAMS],
    pub(crate) break_points: BreakPointTally,
    pub(crate) completed: Option<TeamId>,
    pub(crate) history: Vec<MatchEvent>,
}

impl MatchState {
    pub fn new(config: MatchConfig, opening: MatchOpening) -> Result<Self, DomainError> {
        config.validate()?;
        opening.validate(&config)?;

        let server = opening.first_server;
        let mut partner_rotation = [0u8; TEAMS];
        partner_rotation[server.team.index()] = server.player_index;
        partner_rotation[server.team.other().index()] = opening.receiver_first_player;

        let deciding = config.is_deciding_set([0, 0]);
        let first_set = start_set(&config, deciding, server, opening.receiver_first_player);

        Ok(Self {
            config,
            opening,
            sets: vec![first_set],
            current_set: 0,
            current_game: GameScore::new(),
            server,
            sides: opening.sides,
            change_sides_due: false,
            sets_won: [0; TEAMS],
            games_played: 0,
            partner_rotation,
            break_points: BreakPointTally::default(),
            completed: None,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn opening(&self) -> &MatchOpening {
        &self.opening
    }

    pub fn sets(&self) -> &[SetScore] {
        &self.sets
    }

    pub fn current_set_index(&self) -> usize {
        self.current_set
    }

    pub fn current_set(&self) -> &SetScore {
        &self.sets[self.current_set]
    }

    pub fn current_game(&self) -> GameScore {
        self.current_game
    }

    pub fn server(&self) -> ServerState {
        self.server
    }

    pub fn sides(&self) -> CourtSides {
        self.sides
    }

    pub fn change_sides_due(&self) -> bool {
        self.change_sides_due
    }

    pub fn sets_won(&self) -> [u8; TEAMS] {
        self.sets_won
    }

    pub fn games_played(&self) -> u16 {
        self.games_played
    }

    pub fn break_points(&self) -> BreakPointTally {
        self.break_points
    }

    pub fn completed(&self) -> Option<TeamId> {
        self.completed
    }

    pub fn history(&self) -> &[MatchEvent] {
        &self.history
    }

    pub fn status(&self) -> MatchStatus {
        match self.completed {
            Some(winner) => MatchStatus::Completed(winner),
            None => MatchStatus::InProgress,
        }
    }

    /// Whether the set in play is currently in a tiebreak (including a
    /// super-tiebreak deciding set).
    pub fn in_tiebreak(&self) -> bool {
        self.current_set().live_tiebreak().is_some()
    }

    /// Clone without the history log, for hypothetical what-if evaluation.
    pub(crate) fn probe(&self) -> Self {
        Self {
            config: self.config,
            opening: self.opening,
            sets: self.sets.clone(),
            current_set: self.current_set,
            current_game: self.current_game,
            server: self.server,
            sides: self.sides,
            change_sides_due: self.change_sides_due,
            sets_won: self.sets_won,
            games_played: self.games_played,
            partner_rotation: self.partner_rotation,
            break_points: self.break_points,
            completed: self.completed,
            history: Vec::new(),
        }
    }
}
