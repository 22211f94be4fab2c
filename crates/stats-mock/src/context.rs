//! # Test Context
//!
//! The mock reports validation failures into a [`TestContext`]. The Rust test
//! harness has no per-test handle, so [`TestRecorder`] plays that role: it
//! collects failures without stopping the test, then fails the test when it is
//! dropped if any failures were left unclaimed.
//!
//! ```ignore
//! #[test]
//! fn test_emits_request_counter() {
//!     let recorder = Arc::new(TestRecorder::new("test_emits_request_counter"));
//!     let store = MockStore::new(Some(recorder.clone()));
//!
//!     code_under_test(&store);
//!     // recorder drops here and panics if any stat name was invalid
//! }
//! ```

use std::fmt;
use std::panic::Location;
use std::thread;

use parking_lot::Mutex;
use tracing::{error, info};

/// The test-side collaborator failures are reported to.
pub trait TestContext: Send + Sync {
    /// Mark the reporting frame as a helper.
    ///
    /// Purely diagnostic; the default does nothing.
    fn helper(&self) {}

    /// Record an informational message.
    fn log(&self, location: &'static Location<'static>, message: &str);

    /// Record a failure without stopping the test.
    fn fail(&self, location: &'static Location<'static>, message: &str);
}

/// A message recorded by [`TestRecorder`], with the caller that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub message: String,
    pub location: &'static Location<'static>,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Collecting [`TestContext`] with deferred failure.
pub struct TestRecorder {
    name: String,
    logs: Mutex<Vec<Record>>,
    failures: Mutex<Vec<Record>>,
}

impl TestRecorder {
    /// Create a recorder for the named test.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logs: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if any failure is still pending.
    pub fn failed(&self) -> bool {
        !self.failures.lock().is_empty()
    }

    /// Copy of the pending failures.
    pub fn failures(&self) -> Vec<Record> {
        self.failures.lock().clone()
    }

    /// Remove and return the pending failures.
    ///
    /// Claimed failures no longer fail the test on drop.
    pub fn take_failures(&self) -> Vec<Record> {
        std::mem::take(&mut *self.failures.lock())
    }

    /// Copy of everything logged so far.
    pub fn logs(&self) -> Vec<Record> {
        self.logs.lock().clone()
    }
}

impl TestContext for TestRecorder {
    fn log(&self, location: &'static Location<'static>, message: &str) {
        info!(test = %self.name, %location, "{}", message);
        self.logs.lock().push(Record {
            message: message.to_string(),
            location,
        });
    }

    fn fail(&self, location: &'static Location<'static>, message: &str) {
        error!(test = %self.name, %location, "{}", message);
        self.failures.lock().push(Record {
            message: message.to_string(),
            location,
        });
    }
}

impl fmt::Debug for TestRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRecorder")
            .field("name", &self.name)
            .field("failures", &self.failures.lock().len())
            .field("logs", &self.logs.lock().len())
            .finish()
    }
}

impl Drop for TestRecorder {
    fn drop(&mut self) {
        // Don't turn an existing panic into an abort
        if thread::panicking() {
            return;
        }
        let failures = self.failures.get_mut();
        if failures.is_empty() {
            return;
        }
        let report: Vec<String> = failures.iter().map(ToString::to_string).collect();
        panic!(
            "{} stats failure(s) in {}:\n{}",
            failures.len(),
            self.name,
            report.join("\n")
        );
    }
}
