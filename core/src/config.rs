//! Engine configuration.
//!
//! [`BubbleConfig`] is the programmatic value handed to the manager and is
//! validated up front; [`Settings`] is the file/environment layer that
//! produces one, following the `Shabon.toml` + `SHABON_*` convention.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::errors::ConfigError;

pub static DEFAULT_CONFIG: &str = include_str!("../Shabon.toml");

/// Relative weights for sampling each entity category when generating a new
/// bubble. Categories with no candidates are skipped regardless of weight.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpawnWeights {
    pub songs: u32,
    pub persons: u32,
    pub tags: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            songs: 3,
            persons: 2,
            tags: 1,
        }
    }
}

impl SpawnWeights {
    #[must_use]
    pub const fn total(self) -> u32 {
        self.songs + self.persons + self.tags
    }
}

/// Everything the bubble manager needs to know about its canvas and pacing.
#[derive(Clone, Debug, PartialEq)]
pub struct BubbleConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub max_bubbles: usize,
    pub min_lifespan: Duration,
    pub max_lifespan: Duration,
    /// Speed bounds in px/s.
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub spawn_weights: SpawnWeights,
    /// How many random positions to try before falling back to the
    /// least-crowded candidate seen.
    pub placement_retry_budget: usize,
    /// Extra clearance required between bubble edges, in px.
    pub separation_margin: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            max_bubbles: 15,
            min_lifespan: Duration::from_millis(6_000),
            max_lifespan: Duration::from_millis(14_000),
            min_speed: 10.0,
            max_speed: 40.0,
            min_radius: 24.0,
            max_radius: 56.0,
            spawn_weights: SpawnWeights::default(),
            placement_retry_budget: 24,
            separation_margin: 4.0,
        }
    }
}

impl BubbleConfig {
    /// Fail-fast validation.
    ///
    /// # Errors
    ///
    /// Returns a descriptive [`ConfigError`] for non-positive canvas
    /// dimensions or bubble counts, inverted ranges, all-zero spawn weights,
    /// or a zero retry budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0)
            || !self.canvas_width.is_finite()
            || !self.canvas_height.is_finite()
        {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.max_bubbles == 0 {
            return Err(ConfigError::InvalidMaxBubbles);
        }
        if self.min_lifespan > self.max_lifespan {
            return Err(ConfigError::InvalidRange {
                what: "lifespan",
                min: self.min_lifespan.as_millis() as f64,
                max: self.max_lifespan.as_millis() as f64,
            });
        }
        if self.min_speed < 0.0 {
            return Err(ConfigError::NegativeValue {
                what: "speed",
                value: f64::from(self.min_speed),
            });
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::InvalidRange {
                what: "speed",
                min: f64::from(self.min_speed),
                max: f64::from(self.max_speed),
            });
        }
        if self.min_radius <= 0.0 {
            return Err(ConfigError::NegativeValue {
                what: "radius",
                value: f64::from(self.min_radius),
            });
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidRange {
                what: "radius",
                min: f64::from(self.min_radius),
                max: f64::from(self.max_radius),
            });
        }
        if self.spawn_weights.total() == 0 {
            return Err(ConfigError::ZeroSpawnWeights);
        }
        if self.placement_retry_budget == 0 {
            return Err(ConfigError::ZeroRetryBudget);
        }
        if self.separation_margin < 0.0 {
            return Err(ConfigError::NegativeValue {
                what: "separation margin",
                value: f64::from(self.separation_margin),
            });
        }
        Ok(())
    }
}

/// File-level engine settings, durations in milliseconds.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub max_bubbles: usize,
    pub min_lifespan_ms: u64,
    pub max_lifespan_ms: u64,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub spawn_weights: SpawnWeights,
    pub placement_retry_budget: usize,
    pub separation_margin: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = BubbleConfig::default();
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            max_bubbles: config.max_bubbles,
            min_lifespan_ms: config.min_lifespan.as_millis() as u64,
            max_lifespan_ms: config.max_lifespan.as_millis() as u64,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            spawn_weights: config.spawn_weights,
            placement_retry_budget: config.placement_retry_budget,
            separation_margin: config.separation_margin,
        }
    }
}

impl EngineSettings {
    /// The validated programmatic config this settings block describes.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`BubbleConfig::validate`].
    pub fn to_bubble_config(&self) -> Result<BubbleConfig, ConfigError> {
        let config = BubbleConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            max_bubbles: self.max_bubbles,
            min_lifespan: Duration::from_millis(self.min_lifespan_ms),
            max_lifespan: Duration::from_millis(self.max_lifespan_ms),
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            spawn_weights: self.spawn_weights,
            placement_retry_budget: self.placement_retry_budget,
            separation_margin: self.separation_margin,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// What level of logging to use.
    /// Default is "info".
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: log::LevelFilter::Info,
        }
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let level = String::deserialize(deserializer)?;
    log::LevelFilter::from_str(&level).map_err(serde::de::Error::custom)
}

/// Settings for the engine's host process.
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Bubble engine parameters.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Logging for the host process.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from the config file and environment variables.
    ///
    /// The environment variables are prefixed with `SHABON_`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or
    /// if the config file is invalid.
    pub fn init(
        config: PathBuf,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(Environment::with_prefix("SHABON"))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(log_level) = log_level {
            settings.logging.log_level = log_level;
        }

        Ok(settings)
    }

    /// Parse the embedded default `Shabon.toml`.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded default file is itself invalid.
    pub fn default_file() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(BubbleConfig::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::zero_canvas(
        BubbleConfig { canvas_width: 0.0, ..BubbleConfig::default() },
        ConfigError::InvalidCanvas { width: 0.0, height: 600.0 }
    )]
    #[case::negative_canvas(
        BubbleConfig { canvas_height: -10.0, ..BubbleConfig::default() },
        ConfigError::InvalidCanvas { width: 800.0, height: -10.0 }
    )]
    #[case::zero_max_bubbles(
        BubbleConfig { max_bubbles: 0, ..BubbleConfig::default() },
        ConfigError::InvalidMaxBubbles
    )]
    #[case::inverted_lifespan(
        BubbleConfig {
            min_lifespan: Duration::from_millis(8_000),
            max_lifespan: Duration::from_millis(4_000),
            ..BubbleConfig::default()
        },
        ConfigError::InvalidRange { what: "lifespan", min: 8000.0, max: 4000.0 }
    )]
    #[case::inverted_speed(
        BubbleConfig { min_speed: 50.0, ..BubbleConfig::default() },
        ConfigError::InvalidRange { what: "speed", min: 50.0, max: 40.0 }
    )]
    #[case::zero_weights(
        BubbleConfig {
            spawn_weights: SpawnWeights { songs: 0, persons: 0, tags: 0 },
            ..BubbleConfig::default()
        },
        ConfigError::ZeroSpawnWeights
    )]
    #[case::zero_retry_budget(
        BubbleConfig { placement_retry_budget: 0, ..BubbleConfig::default() },
        ConfigError::ZeroRetryBudget
    )]
    fn test_invalid_config_is_rejected(
        #[case] config: BubbleConfig,
        #[case] expected: ConfigError,
    ) {
        assert_eq!(config.validate(), Err(expected));
    }

    #[test]
    fn test_embedded_default_file_matches_defaults() {
        let settings = Settings::default_file().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_engine_settings_round_trip_to_bubble_config() {
        let config = EngineSettings::default().to_bubble_config().unwrap();
        assert_eq!(config, BubbleConfig::default());
    }

    #[test]
    fn test_init_reads_file_and_applies_level_override() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join("shabon-settings-test.toml");
        std::fs::write(&path, "[engine]\nmax_bubbles = 9\n")?;

        let settings = Settings::init(path.clone(), Some(log::LevelFilter::Debug))?;
        std::fs::remove_file(&path)?;

        assert_eq!(settings.engine.max_bubbles, 9);
        assert_eq!(settings.engine.canvas_width, 800.0);
        assert_eq!(settings.logging.log_level, log::LevelFilter::Debug);
        Ok(())
    }

    #[test]
    fn test_init_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("shabon-no-such-settings.toml");
        assert!(Settings::init(missing, None).is_err());
    }
}
