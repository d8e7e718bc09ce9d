//! Configuration management for relift
//!
//! This module loads settings from environment variables with sensible
//! defaults. Configuration covers the remote service endpoint, the source and
//! target languages for conversion, timeouts, and the simulated-mode delay.
//!
//! # Environment Variables
//!
//! - `RELIFT_SERVICE_URL`: Base URL of the modernization service - default:
//!   "http://localhost:8010/cobo"
//! - `RELIFT_SOURCE_LANGUAGE`: Legacy source language - default: "COBOL"
//! - `RELIFT_TARGET_LANGUAGE`: Conversion target language - default: "C#"
//! - `RELIFT_REQUEST_TIMEOUT`: HTTP timeout in seconds - default: "120"
//! - `RELIFT_STATUS_POLL_SECS`: Analysis status poll interval - default: "3"
//! - `RELIFT_SIMULATED_DELAY_MS`: Artificial delay for simulated analysis -
//!   default: "1500"
//! - `RELIFT_LOG_LEVEL`: Logging level - default: "info"

use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_SERVICE_URL: &str = "http://localhost:8010/cobo";
const DEFAULT_SOURCE_LANGUAGE: &str = "COBOL";
const DEFAULT_TARGET_LANGUAGE: &str = "C#";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_STATUS_POLL_SECS: u64 = 3;
const DEFAULT_SIMULATED_DELAY_MS: u64 = 1500;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse a configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Main configuration structure for relift
///
/// Construct with `Default::default()` to load from environment variables
/// with fallback defaults.
#[derive(Debug, Clone)]
pub struct ReliftConfig {
    /// Base URL of the remote modernization service
    pub service_url: String,

    /// Legacy source language sent with analysis/conversion requests
    pub source_language: String,

    /// Target language for conversion
    pub target_language: String,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Interval between analysis status probes, in seconds
    pub status_poll_secs: u64,

    /// Artificial delay for simulated analysis, in milliseconds
    pub simulated_delay_ms: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ReliftConfig {
    /// Creates a new configuration by loading from environment variables
    /// with defaults for any missing values.
    fn default() -> Self {
        let service_url = env::var("RELIFT_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let source_language = env::var("RELIFT_SOURCE_LANGUAGE")
            .unwrap_or_else(|_| DEFAULT_SOURCE_LANGUAGE.to_string());

        let target_language = env::var("RELIFT_TARGET_LANGUAGE")
            .unwrap_or_else(|_| DEFAULT_TARGET_LANGUAGE.to_string());

        let request_timeout_secs = env::var("RELIFT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let status_poll_secs = env::var("RELIFT_STATUS_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_STATUS_POLL_SECS);

        let simulated_delay_ms = env::var("RELIFT_SIMULATED_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SIMULATED_DELAY_MS);

        let log_level = env::var("RELIFT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            service_url,
            source_language,
            target_language,
            request_timeout_secs,
            status_poll_secs,
            simulated_delay_ms,
            log_level,
        }
    }
}

impl ReliftConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value is outside its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Service URL must not be empty".to_string(),
            ));
        }
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ConfigError::ValidationFailed(format!(
                "Service URL must start with http:// or https://: {}",
                self.service_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.status_poll_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Status poll interval must be at least 1 second".to_string(),
            ));
        }

        if self.source_language.trim().is_empty() || self.target_language.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Source and target languages must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// HTTP request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Analysis status poll interval as a `Duration`
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.status_poll_secs)
    }

    /// Simulated analysis delay as a `Duration`
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

impl fmt::Display for ReliftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Relift Configuration:")?;
        writeln!(f, "  Service URL: {}", self.service_url)?;
        writeln!(f, "  Source Language: {}", self.source_language)?;
        writeln!(f, "  Target Language: {}", self.target_language)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Status Poll Interval: {}s", self.status_poll_secs)?;
        writeln!(f, "  Simulated Delay: {}ms", self.simulated_delay_ms)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
