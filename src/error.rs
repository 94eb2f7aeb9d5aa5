//! Configuration errors

use thiserror::Error;

/// A charge configuration that breaks one of the accumulator invariants.
///
/// There is no runtime error class: redundant or premature commands are
/// absorbed as no-ops by the accumulator.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start charge {start} must be in [0, {maximum})")]
    StartCharge { start: f32, maximum: f32 },

    #[error("maximum charge {0} must be > 0")]
    MaximumCharge(f32),

    #[error("ready-at fraction {0} must be in (0, 1]")]
    ReadyAt(f32),

    #[error("charge rate {rate}/s must be in (0, {maximum})")]
    ChargeRate { rate: f32, maximum: f32 },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Invalid entry in an input script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid script entry `{0}`, expected <tick>:<engage|disengage|trigger>")]
pub struct ScriptError(pub String);
