//! Inactivity timing parameters.

use std::time::Duration;
use thiserror::Error;

/// Invalid timing parameters
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InactivityConfigError {
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("Warning lead ({warning:?}) must be shorter than the timeout ({timeout:?})")]
    WarningNotBeforeTimeout { warning: Duration, timeout: Duration },
}

/// Inactivity timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityConfig {
    /// Idle time before the session is ended
    pub timeout: Duration,
    /// How long before the timeout the warning countdown starts
    pub warning_lead: Duration,
    /// Minimum spacing between activity-driven resets
    pub debounce: Duration,
}

impl Default for InactivityConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            warning_lead: Duration::from_secs(5 * 60),
            debounce: Duration::from_secs(1),
        }
    }
}

impl InactivityConfig {
    /// Build and validate a config with the default debounce
    ///
    /// # Errors
    ///
    /// See [`InactivityConfig::validate`]
    pub fn new(timeout: Duration, warning_lead: Duration) -> Result<Self, InactivityConfigError> {
        let config = Self {
            timeout,
            warning_lead,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every duration is non-zero and the warning precedes the timeout
    ///
    /// # Errors
    ///
    /// * `InactivityConfigError::ZeroDuration` - A duration is zero
    /// * `InactivityConfigError::WarningNotBeforeTimeout` - `warning_lead >= timeout`
    pub fn validate(&self) -> Result<(), InactivityConfigError> {
        for (name, value) in [
            ("timeout", self.timeout),
            ("warning lead", self.warning_lead),
            ("debounce", self.debounce),
        ] {
            if value.is_zero() {
                return Err(InactivityConfigError::ZeroDuration(name));
            }
        }

        if self.warning_lead >= self.timeout {
            return Err(InactivityConfigError::WarningNotBeforeTimeout {
                warning: self.warning_lead,
                timeout: self.timeout,
            });
        }

        Ok(())
    }

    /// Idle time after which the warning starts
    pub fn warning_after(&self) -> Duration {
        self.timeout.saturating_sub(self.warning_lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InactivityConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(1800));
        assert_eq!(config.warning_after(), Duration::from_secs(1500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_warning_not_before_timeout() {
        assert!(matches!(
            InactivityConfig::new(Duration::from_secs(60), Duration::from_secs(60)),
            Err(InactivityConfigError::WarningNotBeforeTimeout { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_durations() {
        assert_eq!(
            InactivityConfig::new(Duration::ZERO, Duration::ZERO),
            Err(InactivityConfigError::ZeroDuration("timeout"))
        );

        let config = InactivityConfig {
            debounce: Duration::ZERO,
            ..InactivityConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(InactivityConfigError::ZeroDuration("debounce"))
        );
    }
}
