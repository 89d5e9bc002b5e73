//! Tunable engine parameters.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Static game content (upgrades, prestige nodes, milestones...)
//! is not configuration and lives in `engine::catalog`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks per real-time second.
    pub tick_rate_hz: u32,
    /// Minimum gap between physical removals of expired boosts.
    pub sweep_interval_ms: u64,
    /// Autosave cadence in ticks (600 = 30s at 20 Hz).
    pub autosave_interval_ticks: u32,
    /// Key under which the save record is stored.
    pub storage_key: String,
    pub xp_per_click: u64,
    /// Divisor in `floor(sqrt(cycles / divisor))`.
    pub prestige_divisor: f64,
    /// Fixed RNG seed. `None` seeds from the clock.
    pub rng_seed: Option<u64>,
    pub events: EventConfig,
    pub pickups: PickupConfig,
    pub daily: DailyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 20,
            sweep_interval_ms: 1_000,
            autosave_interval_ticks: 600,
            storage_key: "essence_engine_save".into(),
            xp_per_click: 1,
            prestige_divisor: 1_000_000.0,
            rng_seed: None,
            events: EventConfig::default(),
            pickups: PickupConfig::default(),
            daily: DailyConfig::default(),
        }
    }
}

/// Random event scheduler parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub check_interval_ms: u64,
    /// Probability that a check fires an event.
    pub fire_chance: f64,
    pub frenzy_weight: f64,
    pub surge_weight: f64,
    pub shooting_weight: f64,
    pub frenzy_multiplier: f64,
    pub frenzy_duration_ms: u64,
    /// Discount fraction granted by an upgrade surge.
    pub surge_discount: f64,
    pub surge_duration_ms: u64,
    /// Lump granted by a shooting star, in seconds of production.
    pub shooting_lump_seconds: f64,
    pub shooting_visible_ms: u64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 15_000,
            fire_chance: 0.3,
            frenzy_weight: 0.5,
            surge_weight: 0.3,
            shooting_weight: 0.2,
            frenzy_multiplier: 2.0,
            frenzy_duration_ms: 30_000,
            surge_discount: 0.25,
            surge_duration_ms: 60_000,
            shooting_lump_seconds: 60.0,
            shooting_visible_ms: 8_000,
        }
    }
}

/// Golden pickup parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    /// Lower bound on the spawn delay after frequency bonuses.
    pub min_spawn_delay_ms: u64,
    pub visible_ms: u64,
    pub click_frenzy_multiplier: f64,
    pub click_frenzy_ms: u64,
    pub production_frenzy_multiplier: f64,
    pub production_frenzy_ms: u64,
    pub lump_seconds: f64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 60_000,
            max_interval_ms: 120_000,
            min_spawn_delay_ms: 10_000,
            visible_ms: 12_000,
            click_frenzy_multiplier: 7.0,
            click_frenzy_ms: 10_000,
            production_frenzy_multiplier: 3.0,
            production_frenzy_ms: 20_000,
            lump_seconds: 30.0,
        }
    }
}

/// Daily login reward parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    /// Extra multiplier per streak day.
    pub step: f64,
    /// Streak days that count toward the multiplier.
    pub streak_cap: u32,
    pub duration_ms: u64,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            step: 0.25,
            streak_cap: 7,
            duration_ms: 300_000,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and check its ranges.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be positive".into()));
        }
        if self.prestige_divisor <= 0.0 {
            return Err(ConfigError::Invalid(
                "prestige_divisor must be positive".into(),
            ));
        }
        if self.events.check_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "events.check_interval_ms must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.events.fire_chance) {
            return Err(ConfigError::Invalid(
                "events.fire_chance must be within 0..=1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.events.surge_discount) {
            return Err(ConfigError::Invalid(
                "events.surge_discount must be within 0..1".into(),
            ));
        }
        let weights = [
            self.events.frenzy_weight,
            self.events.surge_weight,
            self.events.shooting_weight,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(ConfigError::Invalid("event weights must be >= 0".into()));
        }
        if self.pickups.min_interval_ms > self.pickups.max_interval_ms {
            return Err(ConfigError::Invalid(
                "pickups.min_interval_ms exceeds max_interval_ms".into(),
            ));
        }
        if self.events.frenzy_multiplier <= 1.0
            || self.pickups.click_frenzy_multiplier <= 1.0
            || self.pickups.production_frenzy_multiplier <= 1.0
            || self.daily.step <= 0.0
        {
            return Err(ConfigError::Invalid(
                "boost multipliers must be greater than 1".into(),
            ));
        }
        Ok(())
    }

    /// Milliseconds covered by one tick.
    pub fn ms_per_tick(&self) -> f64 {
        1000.0 / self.tick_rate_hz as f64
    }
}
