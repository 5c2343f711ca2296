//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use laec::{AppSettings, InactivityConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway base URL
    pub api_url: String,
    /// File backing the durable storage area
    pub storage_path: PathBuf,
    /// Inactivity timeout in seconds
    pub inactivity_timeout_secs: u64,
    /// Warning lead before the timeout in seconds
    pub inactivity_warning_secs: u64,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `api_url_override` - Optional API URL override (from CLI args)
    /// * `storage_override` - Optional storage file override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable is set but cannot be parsed
    pub fn from_env(
        api_url_override: Option<String>,
        storage_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url_override
            .or_else(|| std::env::var("LAEC_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        let storage_path = storage_override
            .or_else(|| std::env::var("LAEC_STORAGE_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(default_storage_path);

        Ok(ClientConfig {
            api_url,
            storage_path,
            inactivity_timeout_secs: parse_env_or("LAEC_INACTIVITY_TIMEOUT_SECS", 1800)?,
            inactivity_warning_secs: parse_env_or("LAEC_INACTIVITY_WARNING_SECS", 300)?,
            request_timeout_secs: parse_env_or("LAEC_REQUEST_TIMEOUT_SECS", 10)?,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "LAEC_API_URL".to_string(),
                reason: format!("Must be an http(s) URL, got '{}'", self.api_url),
            });
        }

        if self.inactivity_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "LAEC_INACTIVITY_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.inactivity_warning_secs == 0
            || self.inactivity_warning_secs >= self.inactivity_timeout_secs
        {
            return Err(ConfigError::Invalid {
                var: "LAEC_INACTIVITY_WARNING_SECS".to_string(),
                reason: format!(
                    "Must be between 1 and the inactivity timeout ({}) exclusive",
                    self.inactivity_timeout_secs
                ),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "LAEC_REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Library settings for this configuration
    pub fn app_settings(&self) -> Result<AppSettings, ConfigError> {
        self.validate()?;

        let inactivity = InactivityConfig::new(
            Duration::from_secs(self.inactivity_timeout_secs),
            Duration::from_secs(self.inactivity_warning_secs),
        )
        .map_err(|e| ConfigError::Invalid {
            var: "LAEC_INACTIVITY_WARNING_SECS".to_string(),
            reason: e.to_string(),
        })?;

        Ok(AppSettings {
            api_url: self.api_url.clone(),
            storage_path: self.storage_path.clone(),
            inactivity,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// `$HOME/.laec/storage.json`, or `./.laec/storage.json` without a home
fn default_storage_path() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".laec")
        .join("storage.json")
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{value}'"),
        }),
        Err(_) => Ok(default),
    }
}
