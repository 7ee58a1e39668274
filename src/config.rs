//! Run configuration.
//!
//! Every field has a default so a config file only needs to name what it
//! overrides:
//!
//! ```
//! # use architects::config::SimConfig;
//! let config = SimConfig::from_json(r#"{ "seed": 7, "planner": { "nearest_enemies": 4 } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.planner.nearest_enemies, 4);
//! assert_eq!(config.production.turns, 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub planner: PlannerConfig,
    pub production: ProductionConfig,
    pub clock: ClockConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            planner: PlannerConfig::default(),
            production: ProductionConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.production.variance) {
            return Err(ConfigError::Invalid(format!(
                "production.variance must be within [0, 1], got {}",
                self.production.variance
            )));
        }
        if self.production.turns == 0 {
            return Err(ConfigError::Invalid(
                "production.turns must be at least 1".to_string(),
            ));
        }
        if self.clock.min_speed <= 0.0 || self.clock.min_speed > self.clock.max_speed {
            return Err(ConfigError::Invalid(format!(
                "clock speed range [{}, {}] is empty or non-positive",
                self.clock.min_speed, self.clock.max_speed
            )));
        }
        if self.clock.delta_speed <= 0.0 {
            return Err(ConfigError::Invalid(
                "clock.delta_speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How many nearest enemy units per own unit become candidate targets.
    pub nearest_enemies: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { nearest_enemies: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Turns between scheduling a unit and its appearance.
    pub turns: u32,
    /// Troops of a freshly produced unit.
    pub troops: u32,
    /// Chance that a random suit replaces the requested one.
    pub variance: f64,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            turns: 3,
            troops: 10,
            variance: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Turns per second, lower bound.
    pub min_speed: f64,
    /// Turns per second, upper bound.
    pub max_speed: f64,
    /// Step used by speed up / slow down.
    pub delta_speed: f64,
    pub start_paused: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            min_speed: 1.0,
            max_speed: 5.0,
            delta_speed: 1.0,
            start_paused: false,
        }
    }
}
