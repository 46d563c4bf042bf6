//! Configuration loading and typed config structures for the Runway simulation.
//!
//! Every field has a default, and the defaults are the reference game: a
//! three second tick, ten aircraft of airspace, arrivals every five ticks
//! speeding up with score. A missing file or an empty document therefore
//! runs the standard game. The optional file is `runway-config.yaml`.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but are not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Seed and timing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Run bounds.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Airspace limits.
    #[serde(default)]
    pub airspace: AirspaceConfig,

    /// Arrival generation.
    #[serde(default)]
    pub traffic: TrafficConfig,

    /// Scoring and fuel burn.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Landing queue behaviour.
    #[serde(default)]
    pub landing: LandingConfig,

    /// Terminal output.
    #[serde(default)]
    pub render: RenderConfig,

    /// Log filter.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed YAML or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.airspace.capacity == 0 {
            return invalid("airspace.capacity must be at least 1");
        }
        let t = &self.traffic;
        if t.fuel_min <= 0 || t.fuel_min > t.fuel_max {
            return invalid("traffic.fuel_min must be positive and not above fuel_max");
        }
        if t.landing_duration_min <= 0 || t.landing_duration_min > t.landing_duration_max {
            return invalid(
                "traffic.landing_duration_min must be positive and not above landing_duration_max",
            );
        }
        if t.min_generation_interval <= 0 || t.min_generation_interval > t.base_generation_interval {
            return invalid(
                "traffic.min_generation_interval must be positive and not above base_generation_interval",
            );
        }
        if t.score_per_interval_step == 0 {
            return invalid("traffic.score_per_interval_step must be at least 1");
        }
        if t.double_arrival_percent > 100 {
            return invalid("traffic.double_arrival_percent must be at most 100");
        }
        if self.scoring.score_per_extra_burn == 0 {
            return invalid("scoring.score_per_extra_burn must be at least 1");
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for the arrival generator. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Simulation run bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = run until game over).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Airspace limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AirspaceConfig {
    /// Most aircraft allowed to hold at once; one more is terminal.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for AirspaceConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Arrival generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrafficConfig {
    /// Ticks between arrivals at score zero.
    #[serde(default = "default_base_generation_interval")]
    pub base_generation_interval: i64,

    /// Floor for the arrival interval at high scores.
    #[serde(default = "default_min_generation_interval")]
    pub min_generation_interval: i64,

    /// Score needed to shave one tick off the arrival interval.
    #[serde(default = "default_score_per_interval_step")]
    pub score_per_interval_step: u64,

    /// Chance in percent that an arrival is a pair.
    #[serde(default = "default_double_arrival_percent")]
    pub double_arrival_percent: u32,

    /// Lowest starting fuel.
    #[serde(default = "default_fuel_min")]
    pub fuel_min: i32,

    /// Highest starting fuel.
    #[serde(default = "default_fuel_max")]
    pub fuel_max: i32,

    /// Shortest landing duration in ticks.
    #[serde(default = "default_landing_duration_min")]
    pub landing_duration_min: i32,

    /// Longest landing duration in ticks.
    #[serde(default = "default_landing_duration_max")]
    pub landing_duration_max: i32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_generation_interval: default_base_generation_interval(),
            min_generation_interval: default_min_generation_interval(),
            score_per_interval_step: default_score_per_interval_step(),
            double_arrival_percent: default_double_arrival_percent(),
            fuel_min: default_fuel_min(),
            fuel_max: default_fuel_max(),
            landing_duration_min: default_landing_duration_min(),
            landing_duration_max: default_landing_duration_max(),
        }
    }
}

/// Scoring and fuel burn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Points for any landing, before the fuel bonus.
    #[serde(default = "default_landing_base_points")]
    pub landing_base_points: u64,

    /// Score needed for each extra unit of fuel burned per tick.
    #[serde(default = "default_score_per_extra_burn")]
    pub score_per_extra_burn: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            landing_base_points: default_landing_base_points(),
            score_per_extra_burn: default_score_per_extra_burn(),
        }
    }
}

/// Landing queue behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LandingConfig {
    /// Renumber the queue from zero after a delay, like grants and landings
    /// do. Off by default: a delay leaves the remaining priorities as they
    /// were, which can leave a gap.
    #[serde(default)]
    pub renumber_on_delay: bool,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            renumber_on_delay: false,
        }
    }
}

/// Output format of the terminal renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Human-readable screen.
    #[default]
    Text,
    /// One JSON document per tick.
    Json,
}

/// Terminal output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Output format.
    #[serde(default)]
    pub format: RenderFormat,

    /// Clear the screen before each text frame.
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: RenderFormat::Text,
            clear_screen: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    3000
}

const fn default_capacity() -> usize {
    10
}

const fn default_base_generation_interval() -> i64 {
    5
}

const fn default_min_generation_interval() -> i64 {
    3
}

const fn default_score_per_interval_step() -> u64 {
    50
}

const fn default_double_arrival_percent() -> u32 {
    20
}

const fn default_fuel_min() -> i32 {
    10
}

const fn default_fuel_max() -> i32 {
    60
}

const fn default_landing_duration_min() -> i32 {
    3
}

const fn default_landing_duration_max() -> i32 {
    10
}

const fn default_landing_base_points() -> u64 {
    10
}

const fn default_score_per_extra_burn() -> u64 {
    100
}

fn default_log_level() -> String {
    "warn".to_owned()
}

const fn default_true() -> bool {
    true
}
