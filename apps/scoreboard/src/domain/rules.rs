//! Match configuration: scoring system, tiebreak policy and format flags.

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

pub const TEAMS: usize = 2;

pub const DEFAULT_TIEBREAK_TRIGGER: u8 = 6;
pub const FAST4_TIEBREAK_TRIGGER: u8 = 3;
pub const MAX_TIEBREAK_TRIGGER: u8 = 12;

pub const REGULAR_TIEBREAK_POINTS: u8 = 7;
pub const CHAMPIONSHIP_TIEBREAK_POINTS: u8 = 10;
pub const DEFAULT_SUPER_TIEBREAK_POINTS: u8 = 10;
pub const MAX_SUPER_TIEBREAK_POINTS: u8 = 21;

/// Game-level scoring family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoringSystem {
    /// Advantage scoring at deuce.
    Classic,
    /// Deuce decided by a single point. Requires `golden_point`.
    NoAd,
    /// Short sets: games to four, tiebreak at 3-3.
    Fast4,
}

/// How a set tied at the trigger score is decided, and what happens in the
/// deciding set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiebreakType {
    /// Tiebreak to 7 in every set.
    Regular,
    /// Tiebreak to 10 in every set.
    Championship,
    /// Tiebreak to 7 in regular sets; the deciding set is replaced by a
    /// single super-tiebreak.
    SuperTiebreakInsteadOfFinalSet,
}

impl TiebreakType {
    /// Target points of a tiebreak played at the trigger tie of a set.
    pub const fn set_tiebreak_points(self) -> u8 {
        match self {
            TiebreakType::Regular | TiebreakType::SuperTiebreakInsteadOfFinalSet => {
                REGULAR_TIEBREAK_POINTS
            }
            TiebreakType::Championship => CHAMPIONSHIP_TIEBREAK_POINTS,
        }
    }
}

/// Immutable match configuration, fixed at match creation.
///
/// Construct through [`MatchConfig::builder`] or one of the presets; both
/// paths go through [`MatchConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    scoring_system: ScoringSystem,
    tiebreak_type: TiebreakType,
    tiebreak_trigger_games: u8,
    best_of: u8,
    golden_point: bool,
    golden_game: bool,
    windbreak: bool,
    super_tiebreak_points: u8,
    doubles: bool,
}

impl MatchConfig {
    pub fn builder() -> MatchConfigBuilder {
        MatchConfigBuilder::default()
    }

    /// Classic tennis singles, best of three sets, tiebreak to 7 at 6-6.
    pub const fn tennis_best_of_3() -> Self {
        Self {
            scoring_system: ScoringSystem::Classic,
            tiebreak_type: TiebreakType::Regular,
            tiebreak_trigger_games: DEFAULT_TIEBREAK_TRIGGER,
            best_of: 3,
            golden_point: false,
            golden_game: false,
            windbreak: false,
            super_tiebreak_points: DEFAULT_SUPER_TIEBREAK_POINTS,
            doubles: false,
        }
    }

    /// Classic tennis singles, best of five sets.
    pub const fn tennis_best_of_5() -> Self {
        Self {
            best_of: 5,
            ..Self::tennis_best_of_3()
        }
    }

    /// Padel doubles: golden point at deuce, best of three.
    pub const fn padel() -> Self {
        Self {
            golden_point: true,
            doubles: true,
            ..Self::tennis_best_of_3()
        }
    }

    /// Fast4: games to four, tiebreak at 3-3, deciding point at deuce.
    pub const fn fast4() -> Self {
        Self {
            scoring_system: ScoringSystem::Fast4,
            tiebreak_trigger_games: FAST4_TIEBREAK_TRIGGER,
            golden_point: true,
            ..Self::tennis_best_of_3()
        }
    }

    pub const fn scoring_system(&self) -> ScoringSystem {
        self.scoring_system
    }

    pub const fn tiebreak_type(&self) -> TiebreakType {
        self.tiebreak_type
    }

    pub const fn tiebreak_trigger_games(&self) -> u8 {
        self.tiebreak_trigger_games
    }

    pub const fn best_of(&self) -> u8 {
        self.best_of
    }

    /// Canonical deuce rule: when true, 40-40 is settled by one deciding point.
    pub const fn golden_point(&self) -> bool {
        self.golden_point
    }

    pub const fn golden_game(&self) -> bool {
        self.golden_game
    }

    pub const fn windbreak(&self) -> bool {
        self.windbreak
    }

    pub const fn super_tiebreak_points(&self) -> u8 {
        self.super_tiebreak_points
    }

    pub const fn doubles(&self) -> bool {
        self.doubles
    }

    /// Sets needed to win the match: ceil(best_of / 2).
    pub const fn sets_to_win(&self) -> u8 {
        self.best_of / 2 + 1
    }

    /// Games needed to take a set with a two-game lead: the trigger itself
    /// (6 in tennis), or one more in Fast4 where the set runs to 4 and ties at 3-3.
    pub const fn games_to_win_set(&self) -> u8 {
        match self.scoring_system {
            ScoringSystem::Fast4 => self.tiebreak_trigger_games + 1,
            ScoringSystem::Classic | ScoringSystem::NoAd => self.tiebreak_trigger_games,
        }
    }

    /// Whether the set about to start with `sets_won` is the deciding one.
    pub fn is_deciding_set(&self, sets_won: [u8; TEAMS]) -> bool {
        let needed = self.sets_to_win().saturating_sub(1);
        sets_won[0] == needed && sets_won[1] == needed
    }

    /// Whether the deciding set is played as a single super-tiebreak.
    pub fn replaces_final_set(&self) -> bool {
        self.tiebreak_type == TiebreakType::SuperTiebreakInsteadOfFinalSet
    }

    /// Reject contradictory or out-of-range combinations.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.best_of == 0 || self.best_of % 2 == 0 || self.best_of > 5 {
            return Err(DomainError::invalid_config(format!(
                "best_of must be 1, 3 or 5 (got {})",
                self.best_of
            )));
        }
        if self.tiebreak_trigger_games == 0 || self.tiebreak_trigger_games > MAX_TIEBREAK_TRIGGER {
            return Err(DomainError::invalid_config(format!(
                "tiebreak_trigger_games must be within 1..={MAX_TIEBREAK_TRIGGER} (got {})",
                self.tiebreak_trigger_games
            )));
        }
        if self.scoring_system == ScoringSystem::Fast4
            && self.tiebreak_trigger_games != FAST4_TIEBREAK_TRIGGER
        {
            return Err(DomainError::invalid_config(format!(
                "Fast4 sets tiebreak at {FAST4_TIEBREAK_TRIGGER}-{FAST4_TIEBREAK_TRIGGER} (got trigger {})",
                self.tiebreak_trigger_games
            )));
        }
        if self.scoring_system == ScoringSystem::NoAd && !self.golden_point {
            return Err(DomainError::invalid_config(
                "NoAd scoring contradicts golden_point = false",
            ));
        }
        if self.super_tiebreak_points == 0 || self.super_tiebreak_points > MAX_SUPER_TIEBREAK_POINTS
        {
            return Err(DomainError::invalid_config(format!(
                "super_tiebreak_points must be within 1..={MAX_SUPER_TIEBREAK_POINTS} (got {})",
                self.super_tiebreak_points
            )));
        }
        if self.golden_game && self.tiebreak_type == TiebreakType::Championship {
            return Err(DomainError::invalid_config(
                "golden_game replaces set tiebreaks; a Championship tiebreak would never be played",
            ));
        }
        if self.replaces_final_set() && self.best_of == 1 {
            return Err(DomainError::invalid_config(
                "a single-set match cannot replace its only set with a super-tiebreak",
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::tennis_best_of_3()
    }
}

/// Builder for [`MatchConfig`]; starts from classic best-of-three singles.
#[derive(Debug, Clone)]
pub struct MatchConfigBuilder {
    config: MatchConfig,
}

impl Default for MatchConfigBuilder {
    fn default() -> Self {
        Self {
            config: MatchConfig::tennis_best_of_3(),
        }
    }
}

impl MatchConfigBuilder {
    /// Selecting `NoAd` turns on the deciding point; selecting `Fast4` moves
    /// the tiebreak trigger to 3-3. Later explicit calls still win.
    pub fn scoring_system(mut self, system: ScoringSystem) -> Self {
        self.config.scoring_system = system;
        match system {
            ScoringSystem::NoAd => self.config.golden_point = true,
            ScoringSystem::Fast4 => self.config.tiebreak_trigger_games = FAST4_TIEBREAK_TRIGGER,
            ScoringSystem::Classic => {}
        }
        self
    }

    pub fn tiebreak_type(mut self, tiebreak_type: TiebreakType) -> Self {
        self.config.tiebreak_type = tiebreak_type;
        self
    }

    pub fn tiebreak_trigger_games(mut self, games: u8) -> Self {
        self.config.tiebreak_trigger_games = games;
        self
    }

    pub fn best_of(mut self, sets: u8) -> Self {
        self.config.best_of = sets;
        self
    }

    pub fn golden_point(mut self, on: bool) -> Self {
        self.config.golden_point = on;
        self
    }

    pub fn golden_game(mut self, on: bool) -> Self {
        self.config.golden_game = on;
        self
    }

    pub fn windbreak(mut self, on: bool) -> Self {
        self.config.windbreak = on;
        self
    }

    pub fn super_tiebreak_points(mut self, points: u8) -> Self {
        self.config.super_tiebreak_points = points;
        self
    }

    pub fn doubles(mut self, on: bool) -> Self {
        self.config.doubles = on;
        self
    }

    pub fn build(self) -> Result<MatchConfig, DomainError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
