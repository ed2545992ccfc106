//! Engine configuration
//!
//! All tunable numbers live in one [`EngineConfig`], loaded from JSON once at
//! startup and shared read-only as `Arc<EngineConfig>`. The ability catalog is
//! part of it, so there is no process-wide table anywhere else.
//!
//! # File Format
//!
//! Every section and field is optional; anything missing takes its default:
//!
//! ```json
//! {
//!   "rules": { "attrition_start_turn": 20 },
//!   "search": { "depth": 3 }
//! }
//! ```
//!
//! # Error Handling
//!
//! [`EngineConfig::load`] reports I/O, parse and validation failures.
//! [`EngineConfig::load_or_default`] logs them and falls back to defaults.

use super::error::{ConfigError, ConfigResult};
use crate::game::progression::abilities::{default_catalog, AbilityDefinition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Turn structure and action point economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// First turn on which attacks resolve as combat
    pub attrition_start_turn: u32,
    /// Half-moves without a pawn move or capture before a forced draw
    pub fifty_move_limit: u32,
    pub starting_ap: u32,
    pub ap_per_turn: u32,
    pub max_ap: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            attrition_start_turn: 25,
            fifty_move_limit: 100,
            starting_ap: 3,
            ap_per_turn: 1,
            max_ap: 10,
        }
    }
}

/// Damage formula parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub damage_per_value: f64,
    pub crit_base_chance: f64,
    /// Extra crit chance for devoted attackers (loyalty >= 90)
    pub devoted_crit_bonus: f64,
    pub crit_multiplier: f64,
    pub fatigue_per_turn: f64,
    pub execute_hp_fraction: f64,
    pub execute_overkill: i32,
    pub rng_min: f64,
    pub rng_max: f64,
    pub armor_roll_min: f64,
    pub armor_roll_max: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            damage_per_value: 4.0,
            crit_base_chance: 0.15,
            devoted_crit_bonus: 0.05,
            crit_multiplier: 1.5,
            fatigue_per_turn: 0.01,
            execute_hp_fraction: 0.2,
            execute_overkill: 100,
            rng_min: 0.8,
            rng_max: 1.0,
            armor_roll_min: 0.5,
            armor_roll_max: 1.0,
        }
    }
}

/// XP, leveling, loyalty and upgrade parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// XP per point of the victim's piece value
    pub xp_per_capture_value: u32,
    pub xp_check: u32,
    pub xp_ability_use: u32,
    pub xp_survival: u32,
    /// Survival XP is paid every this many turns
    pub survival_interval: u32,
    /// Total XP needed per level: `level * level_threshold`
    pub level_threshold: u32,
    pub hp_per_level: i32,
    /// XP bonus fraction for devoted pieces
    pub devoted_xp_bonus: f64,
    pub adjacency_loyalty_gain: i32,
    pub lord_lost_penalty: i32,
    pub armor_upgrade_cost: u32,
    pub armor_upgrade_amount: i32,
    pub vitality_upgrade_cost: u32,
    pub vitality_upgrade_hp: i32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_capture_value: 20,
            xp_check: 15,
            xp_ability_use: 10,
            xp_survival: 5,
            survival_interval: 10,
            level_threshold: 100,
            hp_per_level: 5,
            devoted_xp_bonus: 0.10,
            adjacency_loyalty_gain: 5,
            lord_lost_penalty: 30,
            armor_upgrade_cost: 50,
            armor_upgrade_amount: 1,
            vitality_upgrade_cost: 40,
            vitality_upgrade_hp: 10,
        }
    }
}

/// Search settings for the minimax opponent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub depth: u8,
    /// Advisory budget in milliseconds; only logged when exceeded
    pub time_budget_ms: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            depth: 2,
            time_budget_ms: Some(2_000),
        }
    }
}

impl SearchSettings {
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: RulesConfig,
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub search: SearchSettings,
    pub abilities: Vec<AbilityDefinition>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            combat: CombatConfig::default(),
            progression: ProgressionConfig::default(),
            search: SearchSettings::default(),
            abilities: default_catalog(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Json`] if it does not parse and [`ConfigError::Invalid`]
    /// if the values are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::info!("[CONFIG] Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("[CONFIG] No config file found at {:?}. Using defaults.", path);
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "[CONFIG] Failed to load config at {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Reject value combinations the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |message: &str| {
            Err(ConfigError::Invalid {
                message: message.to_string(),
            })
        };

        let c = &self.combat;
        if !(c.rng_min > 0.0 && c.rng_min <= c.rng_max) {
            return invalid("combat.rng_min must be positive and not above rng_max");
        }
        if !(c.armor_roll_min >= 0.0 && c.armor_roll_min <= c.armor_roll_max) {
            return invalid("combat.armor_roll_min must be within [0, armor_roll_max]");
        }
        if !(0.0..=1.0).contains(&(c.crit_base_chance + c.devoted_crit_bonus)) {
            return invalid("combat crit chance must stay within [0, 1]");
        }
        if self.rules.max_ap == 0 {
            return invalid("rules.max_ap must be at least 1");
        }
        if self.progression.level_threshold == 0 {
            return invalid("progression.level_threshold must be at least 1");
        }
        if !(1..=attrition_search::constants::MAX_SEARCH_DEPTH).contains(&self.search.depth) {
            return invalid("search.depth must be between 1 and 4");
        }
        let mut ids: Vec<&str> = self.abilities.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return invalid("ability ids must be unique");
        }
        Ok(())
    }

    /// Look up an ability definition by id
    pub fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|a| a.id == id)
    }
}
