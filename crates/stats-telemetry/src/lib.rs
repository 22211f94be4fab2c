//! # Stats Telemetry
//!
//! Logging setup shared by the stats crates and their tests. Everything in the
//! workspace logs through `tracing`; this crate decides where it goes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stats_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config).expect("Failed to init logging");
//! ```
//!
//! In tests, call [`init_test_logging`] instead; it is safe to call from
//! every test and captures output per test.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STATS_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `STATS_JSON_LOGS` | `false` | JSON formatted output |
//! | `STATS_TEST_WRITER` | `true` | Capture output through the test harness |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}
