//! Accumulator configuration

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a charge accumulator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ChargeConfig {
    /// Charge level a cycle begins from (0 <= start < maximum).
    pub start_charge: f32,

    /// Upper bound of the charge.
    pub maximum_charge: f32,

    /// Accumulation rate in charge units per second.
    pub charge_rate_per_second: f32,

    /// Fraction of the maximum at which a charge can be released.
    pub ready_at: f32,

    /// Release automatically once the maximum is reached.
    pub auto_release_at_maximum: bool,

    /// Reserved. Stopping never resets the charge.
    pub reset_on_stop: bool,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            start_charge: 0.0,
            maximum_charge: 5.0,
            charge_rate_per_second: 0.1,
            ready_at: 0.5,
            auto_release_at_maximum: false,
            reset_on_stop: false,
        }
    }
}

impl ChargeConfig {
    /// Create a configuration with manual release.
    pub fn new(
        start_charge: f32,
        maximum_charge: f32,
        charge_rate_per_second: f32,
        ready_at: f32,
    ) -> Self {
        Self {
            start_charge,
            maximum_charge,
            charge_rate_per_second,
            ready_at,
            ..Self::default()
        }
    }

    pub fn with_auto_release(mut self, auto_release: bool) -> Self {
        self.auto_release_at_maximum = auto_release;
        self
    }

    /// Seconds from cycle start until the maximum is reached.
    pub fn time_to_reach_maximum_from_start(&self) -> f32 {
        (self.maximum_charge - self.start_charge) / self.charge_rate_per_second
    }

    /// Seconds from cycle start until the charge is ready to release.
    pub fn time_to_reach_ready_from_start(&self) -> f32 {
        (self.maximum_charge - self.start_charge) * self.ready_at / self.charge_rate_per_second
    }

    /// Seconds an empty accumulator would need to reach the maximum.
    pub fn time_to_reach_maximum_from_zero(&self) -> f32 {
        self.maximum_charge / self.charge_rate_per_second
    }

    /// Absolute charge level at which a release is accepted.
    pub fn ready_threshold(&self) -> f32 {
        self.ready_at * self.maximum_charge
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.maximum_charge.is_finite() || self.maximum_charge <= 0.0 {
            return Err(ConfigError::MaximumCharge(self.maximum_charge));
        }
        if !(0.0..self.maximum_charge).contains(&self.start_charge) {
            return Err(ConfigError::StartCharge {
                start: self.start_charge,
                maximum: self.maximum_charge,
            });
        }
        let threshold = self.ready_threshold();
        if !(threshold > 0.0 && threshold <= self.maximum_charge) {
            return Err(ConfigError::ReadyAt(self.ready_at));
        }
        if !(self.charge_rate_per_second > 0.0 && self.charge_rate_per_second < self.maximum_charge) {
            return Err(ConfigError::ChargeRate {
                rate: self.charge_rate_per_second,
                maximum: self.maximum_charge,
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let config = ChargeConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.auto_release_at_maximum);
        assert!(!config.reset_on_stop);
    }

    #[test]
    fn test_derived_times() {
        let config = ChargeConfig::new(0.0, 5.0, 0.1, 0.5);
        assert_relative_eq!(config.time_to_reach_maximum_from_start(), 50.0, max_relative = 1e-5);
        assert_relative_eq!(config.time_to_reach_ready_from_start(), 25.0, max_relative = 1e-5);
        assert_relative_eq!(config.time_to_reach_maximum_from_zero(), 50.0, max_relative = 1e-5);
        assert_relative_eq!(config.ready_threshold(), 2.5);
    }

    #[test]
    fn test_start_charge_shortens_cycle() {
        let config = ChargeConfig::new(1.0, 5.0, 0.5, 0.5);
        assert_relative_eq!(config.time_to_reach_maximum_from_start(), 8.0);
        assert_relative_eq!(config.time_to_reach_ready_from_start(), 4.0);
        assert_relative_eq!(config.time_to_reach_maximum_from_zero(), 10.0);
    }

    #[test]
    fn test_rejects_bad_maximum() {
        let config = ChargeConfig::new(0.0, 0.0, 0.1, 0.5);
        assert!(matches!(config.validate(), Err(ConfigError::MaximumCharge(_))));

        let config = ChargeConfig::new(0.0, f32::NAN, 0.1, 0.5);
        assert!(matches!(config.validate(), Err(ConfigError::MaximumCharge(_))));
    }

    #[test]
    fn test_rejects_bad_start() {
        let config = ChargeConfig::new(5.0, 5.0, 0.1, 0.5);
        assert!(matches!(config.validate(), Err(ConfigError::StartCharge { .. })));

        let config = ChargeConfig::new(-0.1, 5.0, 0.1, 0.5);
        assert!(matches!(config.validate(), Err(ConfigError::StartCharge { .. })));
    }

    #[test]
    fn test_rejects_bad_ready_at() {
        for ready_at in [0.0, -0.5, 1.5] {
            let config = ChargeConfig::new(0.0, 5.0, 0.1, ready_at);
            assert!(matches!(config.validate(), Err(ConfigError::ReadyAt(_))));
        }
        assert!(ChargeConfig::new(0.0, 5.0, 0.1, 1.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_rate() {
        for rate in [0.0, -1.0, 5.0, 7.0] {
            let config = ChargeConfig::new(0.0, 5.0, rate, 0.5);
            assert!(matches!(config.validate(), Err(ConfigError::ChargeRate { .. })));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml() {
        let config = ChargeConfig::from_toml_str(
            r#"
            maximum-charge = 10.0
            charge-rate-per-second = 2.0
            auto-release-at-maximum = true
            "#,
        )
        .unwrap();
        assert_relative_eq!(config.maximum_charge, 10.0);
        assert_relative_eq!(config.charge_rate_per_second, 2.0);
        assert_relative_eq!(config.ready_at, 0.5);
        assert!(config.auto_release_at_maximum);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_validates() {
        let result = ChargeConfig::from_toml_str("charge-rate-per-second = 9.0");
        assert!(matches!(result, Err(ConfigError::ChargeRate { .. })));

        let result = ChargeConfig::from_toml_str("maximum-charge = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
