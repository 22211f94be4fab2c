//! Mock store configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reporting::ReportingMode;

/// Reporting mode override.
pub const REPORTING_ENV: &str = "STATS_MOCK_REPORTING";

/// Whether every creation call flushes the store.
pub const FLUSH_ON_WRITE_ENV: &str = "STATS_MOCK_FLUSH_ON_WRITE";

/// Configuration for [`MockStore`](crate::MockStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockStoreConfig {
    /// How validation failures are reported
    pub reporting: ReportingMode,

    /// Flush the store after every creation call, so emitted values are
    /// visible without a timer
    pub flush_on_write: bool,
}

impl Default for MockStoreConfig {
    fn default() -> Self {
        Self {
            reporting: ReportingMode::FailTest,
            flush_on_write: true,
        }
    }
}

impl MockStoreConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STATS_MOCK_REPORTING`: silent, log, abort or fail (default: fail)
    /// - `STATS_MOCK_FLUSH_ON_WRITE`: true/false (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let reporting = match lookup(REPORTING_ENV) {
            Some(value) => value.parse()?,
            None => defaults.reporting,
        };

        let flush_on_write = match lookup(FLUSH_ON_WRITE_ENV) {
            Some(value) => parse_bool(FLUSH_ON_WRITE_ENV, &value)?,
            None => defaults.flush_on_write,
        };

        Ok(Self {
            reporting,
            flush_on_write,
        })
    }

    /// Builder-style method to set the reporting mode
    pub fn with_reporting(mut self, mode: ReportingMode) -> Self {
        self.reporting = mode;
        self
    }

    /// Builder-style method to toggle flush-on-write
    pub fn with_flush_on_write(mut self, enabled: bool) -> Self {
        self.flush_on_write = enabled;
        self
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
