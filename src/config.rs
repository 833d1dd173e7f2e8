//! Configuration for a fixed-window rate limiter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{LimiterError, Result};
use crate::ratelimit::TimeUnit;

/// Caller-supplied limiter configuration.
///
/// Construction does not validate; [`RateLimiterConfig::validate`] runs when
/// the limiter is started, before any background activity exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Window length, counted in `unit`. Must be greater than zero.
    pub duration: u64,
    /// One of "second", "minute", "hour"
    pub unit: String,
    /// Maximum accepted requests per window. Must be greater than zero.
    pub limit: u64,
}

impl RateLimiterConfig {
    /// Create a configuration without validating it.
    pub fn new(duration: u64, unit: impl Into<String>, limit: u64) -> Self {
        Self {
            duration,
            unit: unit.into(),
            limit,
        }
    }

    /// Load configuration from a YAML string.
    ///
    /// Only the shape is checked here; call [`validate`](Self::validate) for
    /// the value constraints.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LimiterError::Config(format!("Failed to parse limiter config: {}", e)))
    }

    /// Check the configuration for validity.
    ///
    /// Duration is checked first, then limit, then unit; the first failure is
    /// returned. Has no side effects.
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(LimiterError::InvalidDuration);
        }

        if self.limit == 0 {
            return Err(LimiterError::InvalidLimit);
        }

        let unit: TimeUnit = self.unit.parse()?;
        if self.duration.checked_mul(unit.seconds()).is_none() {
            return Err(LimiterError::InvalidDuration);
        }

        Ok(())
    }

    /// Length of one window.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not recognized or the window overflows. Both are
    /// rejected by `validate`, which must run first.
    pub fn window(&self) -> Duration {
        let unit: TimeUnit = match self.unit.parse() {
            Ok(unit) => unit,
            Err(_) => panic!("Unsupported time unit '{}'", self.unit),
        };

        match self.duration.checked_mul(unit.seconds()) {
            Some(secs) => Duration::from_secs(secs),
            None => panic!("Window of {} {} overflows", self.duration, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_valid_config() {
        let config = RateLimiterConfig::new(5, "second", 2);
        assert_eq!(config.validate(), Ok(()));
        // Idempotent
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = RateLimiterConfig::new(0, "second", 2);
        assert_eq!(config.validate(), Err(LimiterError::InvalidDuration));
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = RateLimiterConfig::new(5, "second", 0);
        assert_eq!(config.validate(), Err(LimiterError::InvalidLimit));
    }

    #[test]
    fn test_validate_rejects_unknown_unit() {
        let config = RateLimiterConfig::new(5, "day", 2);
        let err = config.validate().unwrap_err();
        assert_eq!(err, LimiterError::InvalidUnit("day".to_string()));
        assert!(err.to_string().contains("'day'"));
    }

    #[test]
    fn test_validate_reports_duration_before_limit() {
        let config = RateLimiterConfig::new(0, "day", 0);
        assert_eq!(config.validate(), Err(LimiterError::InvalidDuration));
    }

    #[test]
    fn test_validate_rejects_overflowing_window() {
        let config = RateLimiterConfig::new(u64::MAX, "hour", 1);
        assert_eq!(config.validate(), Err(LimiterError::InvalidDuration));

        // The same magnitude in seconds is still representable
        let config = RateLimiterConfig::new(u64::MAX, "second", 1);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_window_duration() {
        assert_eq!(
            RateLimiterConfig::new(5, "second", 1).window(),
            Duration::from_secs(5)
        );
        assert_eq!(
            RateLimiterConfig::new(2, "minute", 1).window(),
            Duration::from_secs(120)
        );
        assert_eq!(
            RateLimiterConfig::new(3, "hour", 1).window(),
            Duration::from_secs(10800)
        );
    }

    #[test]
    #[should_panic(expected = "Unsupported time unit 'day'")]
    fn test_window_panics_on_unknown_unit() {
        RateLimiterConfig::new(1, "day", 1).window();
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
duration: 10
unit: minute
limit: 100
"#;
        let config = RateLimiterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config, RateLimiterConfig::new(10, "minute", 100));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_from_yaml_does_not_validate_values() {
        let yaml = r#"
duration: 1
unit: fortnight
limit: 1
"#;
        let config = RateLimiterConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.validate(),
            Err(LimiterError::InvalidUnit("fortnight".to_string()))
        );
    }

    #[test]
    fn test_from_yaml_rejects_malformed_input() {
        let yaml = r#"
duration: -3
unit: second
"#;
        let err = RateLimiterConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, LimiterError::Config(_)));
    }
}
