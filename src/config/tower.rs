//! Tower and simulation configuration structures.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Category, TowerError};
use crate::util::jitter::{checked_variation_bounds_ms, jittered, variation_bounds_ms};

/// Environment variable prefix read by [`SimulationConfig::from_env`].
pub const ENV_PREFIX: &str = "CONTROL_TOWER_";

/// Static tower configuration. Read-only once the tower starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Number of runway slots.
    pub runways: usize,
    /// Number of gate slots.
    pub gates: usize,
    /// Capacity of the active waiting set.
    pub max_active: usize,
    /// Timing variation, ± percent of each base duration.
    pub variation_percent: u32,
    /// Base runway duration in milliseconds.
    pub runway_base_ms: u64,
    /// Base gate duration in milliseconds.
    pub gate_base_ms: u64,
    /// Extra gate time for category A aircraft, in milliseconds.
    pub heavy_gate_extra_ms: u64,
    /// Extra gate time for category B aircraft, in milliseconds.
    pub medium_gate_extra_ms: u64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            runways: 3,
            gates: 2,
            max_active: 10,
            variation_percent: 15,
            runway_base_ms: 2500,
            gate_base_ms: 3000,
            heavy_gate_extra_ms: 2000,
            medium_gate_extra_ms: 1000,
        }
    }
}

impl TowerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of runway slots.
    #[must_use]
    pub const fn with_runways(mut self, runways: usize) -> Self {
        self.runways = runways;
        self
    }

    /// Set the number of gate slots.
    #[must_use]
    pub const fn with_gates(mut self, gates: usize) -> Self {
        self.gates = gates;
        self
    }

    /// Set the active waiting set capacity.
    #[must_use]
    pub const fn with_max_active(mut self, max_active: usize) -> Self {
        self.max_active = max_active;
        self
    }

    /// Set the timing variation percentage.
    #[must_use]
    pub const fn with_variation_percent(mut self, variation_percent: u32) -> Self {
        self.variation_percent = variation_percent;
        self
    }

    /// Set the base runway duration.
    #[must_use]
    pub const fn with_runway_base_ms(mut self, runway_base_ms: u64) -> Self {
        self.runway_base_ms = runway_base_ms;
        self
    }

    /// Set the base gate duration.
    #[must_use]
    pub const fn with_gate_base_ms(mut self, gate_base_ms: u64) -> Self {
        self.gate_base_ms = gate_base_ms;
        self
    }

    /// Set the extra gate time for categories A and B.
    #[must_use]
    pub const fn with_gate_extras_ms(mut self, heavy: u64, medium: u64) -> Self {
        self.heavy_gate_extra_ms = heavy;
        self.medium_gate_extra_ms = medium;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` for zero capacities, a variation
    /// above 100 percent, or durations whose varied upper bound overflows.
    pub fn validate(&self) -> Result<(), TowerError> {
        if self.runways == 0 {
            return Err(TowerError::InvalidConfig("runways must be greater than 0".into()));
        }
        if self.gates == 0 {
            return Err(TowerError::InvalidConfig("gates must be greater than 0".into()));
        }
        if self.max_active == 0 {
            return Err(TowerError::InvalidConfig("max_active must be greater than 0".into()));
        }
        if self.variation_percent > 100 {
            return Err(TowerError::InvalidConfig(format!(
                "variation_percent must be at most 100, got {}",
                self.variation_percent
            )));
        }
        self.check_duration("runway_base_ms", Some(self.runway_base_ms))?;
        self.check_duration(
            "gate_base_ms + heavy_gate_extra_ms",
            self.gate_base_ms.checked_add(self.heavy_gate_extra_ms),
        )?;
        self.check_duration(
            "gate_base_ms + medium_gate_extra_ms",
            self.gate_base_ms.checked_add(self.medium_gate_extra_ms),
        )?;
        Ok(())
    }

    fn check_duration(&self, name: &str, base_ms: Option<u64>) -> Result<(), TowerError> {
        base_ms
            .and_then(|base| checked_variation_bounds_ms(base, self.variation_percent))
            .map(|_| ())
            .ok_or_else(|| {
                TowerError::InvalidConfig(format!(
                    "{name} overflows with {}% variation",
                    self.variation_percent
                ))
            })
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, TowerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| TowerError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Base gate duration for `category` before jitter, saturating at `u64::MAX`.
    #[must_use]
    pub const fn gate_base_for(&self, category: Category) -> u64 {
        match category {
            Category::A => self.gate_base_ms.saturating_add(self.heavy_gate_extra_ms),
            Category::B => self.gate_base_ms.saturating_add(self.medium_gate_extra_ms),
            Category::C => self.gate_base_ms,
        }
    }

    /// Randomized runway hold time.
    #[must_use]
    pub fn runway_hold(&self) -> Duration {
        jittered(self.runway_base_ms, self.variation_percent)
    }

    /// Randomized gate hold time for `category`.
    #[must_use]
    pub fn gate_hold(&self, category: Category) -> Duration {
        jittered(self.gate_base_for(category), self.variation_percent)
    }

    /// Inclusive bounds of [`Self::runway_hold`].
    #[must_use]
    pub const fn runway_hold_bounds(&self) -> (Duration, Duration) {
        let (min, max) = variation_bounds_ms(self.runway_base_ms, self.variation_percent);
        (Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Inclusive bounds of [`Self::gate_hold`] for `category`.
    #[must_use]
    pub const fn gate_hold_bounds(&self, category: Category) -> (Duration, Duration) {
        let (min, max) = variation_bounds_ms(self.gate_base_for(category), self.variation_percent);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

/// Configuration for a whole simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tower settings.
    #[serde(flatten)]
    pub tower: TowerConfig,
    /// Number of aircraft to generate.
    #[serde(default = "default_population")]
    pub population: usize,
    /// Seed for population generation; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_population() -> usize {
    10
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tower: TowerConfig::default(),
            population: default_population(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Validate the tower settings.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` when the tower settings are invalid.
    pub fn validate(&self) -> Result<(), TowerError> {
        self.tower.validate()
    }

    /// Parse from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, TowerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| TowerError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `CONTROL_TOWER_*` environment variables, reading a `.env`
    /// file first when one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` when a variable does not parse or
    /// the result fails validation.
    pub fn from_env() -> Result<Self, TowerError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup using the same keys as [`Self::from_env`].
    ///
    /// # Errors
    ///
    /// Returns `TowerError::InvalidConfig` when a value does not parse or the
    /// result fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TowerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let tower = &defaults.tower;
        let cfg = Self {
            tower: TowerConfig {
                runways: read(&lookup, "RUNWAYS", tower.runways)?,
                gates: read(&lookup, "GATES", tower.gates)?,
                max_active: read(&lookup, "MAX_ACTIVE", tower.max_active)?,
                variation_percent: read(&lookup, "VARIATION_PERCENT", tower.variation_percent)?,
                runway_base_ms: read(&lookup, "RUNWAY_BASE_MS", tower.runway_base_ms)?,
                gate_base_ms: read(&lookup, "GATE_BASE_MS", tower.gate_base_ms)?,
                heavy_gate_extra_ms: read(&lookup, "HEAVY_GATE_EXTRA_MS", tower.heavy_gate_extra_ms)?,
                medium_gate_extra_ms: read(&lookup, "MEDIUM_GATE_EXTRA_MS", tower.medium_gate_extra_ms)?,
            },
            population: read(&lookup, "POPULATION", defaults.population)?,
            seed: match lookup(&format!("{ENV_PREFIX}SEED")) {
                Some(raw) => Some(parse(&format!("{ENV_PREFIX}SEED"), &raw)?),
                None => None,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn read<F, T>(lookup: &F, suffix: &str, default: T) -> Result<T, TowerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let key = format!("{ENV_PREFIX}{suffix}");
    lookup(&key).map_or(Ok(default), |raw| parse(&key, &raw))
}

fn parse<T>(key: &str, raw: &str) -> Result<T, TowerError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| TowerError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
