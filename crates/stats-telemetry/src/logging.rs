//! Subscriber setup.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! pretty or a JSON fmt layer. Only one global subscriber can exist per
//! process, so a second call returns [`TelemetryError::AlreadyInitialized`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        if config.test_writer {
            registry.with(json_layer.with_test_writer()).try_init()
        } else {
            registry.with(json_layer).try_init()
        }
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false);

        if config.test_writer {
            registry
                .with(fmt_layer.with_ansi(false).with_test_writer())
                .try_init()
        } else {
            registry.with(fmt_layer.with_ansi(true)).try_init()
        }
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Install a test-friendly subscriber, once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_logging() {
    let config = TelemetryConfig {
        test_writer: true,
        ..TelemetryConfig::from_env()
    };
    // Another test (or the user) may already have installed a subscriber
    let _ = init_logging(&config);
}
