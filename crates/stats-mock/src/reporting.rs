//! # Reporting Policy
//!
//! Decides what a validation failure does once it has been formatted.
//!
//! | Mode | Effect |
//! |------|--------|
//! | `Silent` | nothing |
//! | `LogAndContinue` | logged to the test context, or as a `tracing` warning without one |
//! | `AbortProcess` | printed, then the process is aborted |
//! | `FailTest` | recorded as a non-fatal failure on the test context |
//!
//! The mode is fixed when the policy is built. `FailTest` needs a test
//! context; without one the policy falls back to `AbortProcess`, since there
//! is nothing to attribute the failure to.

use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::context::TestContext;
use crate::error::ConfigError;

/// How validation failures become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportingMode {
    #[serde(rename = "silent")]
    Silent,
    #[serde(rename = "log", alias = "log_and_continue")]
    LogAndContinue,
    #[serde(rename = "abort", alias = "abort_process")]
    AbortProcess,
    #[default]
    #[serde(rename = "fail", alias = "fail_test")]
    FailTest,
}

impl ReportingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingMode::Silent => "silent",
            ReportingMode::LogAndContinue => "log",
            ReportingMode::AbortProcess => "abort",
            ReportingMode::FailTest => "fail",
        }
    }
}

impl fmt::Display for ReportingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "ignore" => Ok(ReportingMode::Silent),
            "log" | "log_and_continue" => Ok(ReportingMode::LogAndContinue),
            "abort" | "abort_process" => Ok(ReportingMode::AbortProcess),
            "fail" | "fail_test" => Ok(ReportingMode::FailTest),
            _ => Err(ConfigError::UnknownReportingMode(s.to_string())),
        }
    }
}

/// Turns formatted violation messages into effects.
#[derive(Clone)]
pub struct ReportingPolicy {
    mode: ReportingMode,
    context: Option<Arc<dyn TestContext>>,
}

impl ReportingPolicy {
    /// Build a policy. `FailTest` without a context becomes `AbortProcess`.
    pub fn new(mode: ReportingMode, context: Option<Arc<dyn TestContext>>) -> Self {
        let mode = match (mode, &context) {
            (ReportingMode::FailTest, None) => ReportingMode::AbortProcess,
            (mode, _) => mode,
        };
        Self { mode, context }
    }

    /// `FailTest` with a context, `AbortProcess` without one.
    pub fn from_context(context: Option<Arc<dyn TestContext>>) -> Self {
        Self::new(ReportingMode::FailTest, context)
    }

    pub fn silent() -> Self {
        Self::new(ReportingMode::Silent, None)
    }

    pub fn log_and_continue() -> Self {
        Self::new(ReportingMode::LogAndContinue, None)
    }

    pub fn mode(&self) -> ReportingMode {
        self.mode
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Report a message, attributed to the caller.
    #[track_caller]
    pub fn report(&self, message: &str) {
        self.report_at(Location::caller(), message);
    }

    /// Report a message attributed to an explicit location.
    pub fn report_at(&self, location: &'static Location<'static>, message: &str) {
        if let Some(context) = &self.context {
            context.helper();
        }

        match self.mode {
            ReportingMode::Silent => {}
            ReportingMode::LogAndContinue => match &self.context {
                Some(context) => context.log(location, message),
                None => warn!(%location, "{}", message),
            },
            ReportingMode::AbortProcess => abort(location, message),
            ReportingMode::FailTest => match &self.context {
                Some(context) => context.fail(location, message),
                None => abort(location, message),
            },
        }
    }
}

impl fmt::Debug for ReportingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportingPolicy")
            .field("mode", &self.mode)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

fn abort(location: &'static Location<'static>, message: &str) -> ! {
    error!(%location, "{}", message);
    eprintln!("{}: {}", location, message);
    std::process::abort()
}
