//! Simulation tuning parameters.
//!
//! Defaults are compiled in; a JSON file named by `RIFT_SIM_CONFIG_PATH`
//! overrides them for balancing runs.

use serde::{Deserialize, Serialize};
use std::{env, fs};

use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "RIFT_SIM_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed used when a match setup does not carry its own
    #[serde(default = "default_seed")]
    pub default_seed: u64,
    #[serde(default)]
    pub resolution: ResolutionParams,
    #[serde(default)]
    pub duration: DurationParams,
    /// Pick a player of the game for every set
    #[serde(default = "default_true")]
    pub award_player_of_the_game: bool,
}

/// Win probability curve: `logistic(diff / logistic_scale)` clamped to
/// `[min_probability, 1 - min_probability]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionParams {
    /// Strength points per logit. Larger = flatter curve
    #[serde(default = "default_logistic_scale")]
    pub logistic_scale: f64,
    /// Lower clamp; the upper clamp mirrors it
    #[serde(default = "default_min_probability")]
    pub min_probability: f64,
}

/// Set length: `mean + std_dev * z`, clamped to `[min_minutes, max_minutes]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationParams {
    #[serde(default = "default_duration_mean")]
    pub mean_minutes: f64,
    #[serde(default = "default_duration_std_dev")]
    pub std_dev_minutes: f64,
    #[serde(default = "default_duration_min")]
    pub min_minutes: u32,
    #[serde(default = "default_duration_max")]
    pub max_minutes: u32,
}

fn default_seed() -> u64 {
    0x5249_4654
}

fn default_true() -> bool {
    true
}

fn default_logistic_scale() -> f64 {
    12.0
}

fn default_min_probability() -> f64 {
    0.02
}

fn default_duration_mean() -> f64 {
    32.0
}

fn default_duration_std_dev() -> f64 {
    5.0
}

fn default_duration_min() -> u32 {
    25
}

fn default_duration_max() -> u32 {
    45
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self {
            logistic_scale: default_logistic_scale(),
            min_probability: default_min_probability(),
        }
    }
}

impl ResolutionParams {
    pub fn max_probability(&self) -> f64 {
        1.0 - self.min_probability
    }
}

impl Default for DurationParams {
    fn default() -> Self {
        Self {
            mean_minutes: default_duration_mean(),
            std_dev_minutes: default_duration_std_dev(),
            min_minutes: default_duration_min(),
            max_minutes: default_duration_max(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_seed: default_seed(),
            resolution: ResolutionParams::default(),
            duration: DurationParams::default(),
            award_player_of_the_game: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.resolution;
        if !r.logistic_scale.is_finite() || r.logistic_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "resolution.logistic_scale must be positive, got {}",
                r.logistic_scale
            )));
        }
        if !(r.min_probability > 0.0 && r.min_probability < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "resolution.min_probability must be in (0, 0.5), got {}",
                r.min_probability
            )));
        }

        let d = &self.duration;
        if d.min_minutes == 0 || d.min_minutes > d.max_minutes {
            return Err(ConfigError::Invalid(format!(
                "duration bounds must satisfy 0 < min <= max, got {}..={}",
                d.min_minutes, d.max_minutes
            )));
        }
        if !d.mean_minutes.is_finite() || !d.std_dev_minutes.is_finite() || d.std_dev_minutes < 0.0
        {
            return Err(ConfigError::Invalid(
                "duration mean/std_dev must be finite and std_dev non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Read and validate a config file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `RIFT_SIM_CONFIG_PATH`, or `None` when the variable is unset or blank.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        let config = Self::load(path)?;
        tracing::info!("Loaded simulation config from {CONFIG_PATH_ENV}='{path}'");
        Ok(Some(config))
    }

    /// Environment override if present, defaults otherwise.
    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        Ok(Self::from_env()?.unwrap_or_default())
    }
}
