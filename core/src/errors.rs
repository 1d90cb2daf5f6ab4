use thiserror::Error;

/// Errors that reject an engine configuration at construction time.
///
/// Wrong configuration is surfaced, never silently clamped, so integration
/// bugs in the consuming layer stay visible.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Canvas dimensions must be positive, got {width}x{height}.")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("Maximum bubble count must be at least 1.")]
    InvalidMaxBubbles,
    #[error("Invalid {what} range: min {min} exceeds max {max}.")]
    InvalidRange {
        what: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Negative {what}: {value}.")]
    NegativeValue { what: &'static str, value: f64 },
    #[error("Spawn weights must not all be zero.")]
    ZeroSpawnWeights,
    #[error("Placement retry budget must be at least 1.")]
    ZeroRetryBudget,
    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        Self::Settings(e.to_string())
    }
}

/// Errors that can occur in the color utilities.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color {0:?}, expected \"#RRGGBB\".")]
    InvalidHex(String),
}
