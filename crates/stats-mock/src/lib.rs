//! # Stats Mock
//!
//! Validating test double for the stats store.
//!
//! ## Architecture
//!
//! - **Validation** (`validation`): pure checks on stat names, tag keys and
//!   tag values
//! - **Reporting** (`reporting`): turns violations into effects according to a
//!   fixed [`ReportingMode`]
//! - **Context** (`context`): where failures go; [`TestRecorder`] collects them
//!   and fails the test on drop
//! - **Store** (`store`): [`MockStore`], validate-then-delegate for every
//!   creation call
//! - **Sink** (`sink`): [`MockSink`], records flushed values for assertions
//!
//! ## Naming Rules
//!
//! Stat names, tag keys and tag values must be non-empty, valid UTF-8, ASCII,
//! printable and free of whitespace. Tag values must also be left unchanged
//! by the tag sanitizer.
//!
//! ## Usage Example
//!
//! ```ignore
//! use stats_mock::{MockStore, TestRecorder};
//! use stats_core::{Scope, Store};
//! use std::sync::Arc;
//!
//! let recorder = Arc::new(TestRecorder::new("test_requests"));
//! let store = MockStore::new(Some(recorder.clone()));
//!
//! store.new_counter("requests").inc();
//! store.flush();
//! store.sink().assert_counter_equals("requests", 1);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STATS_MOCK_REPORTING` | `fail` | silent, log, abort or fail |
//! | `STATS_MOCK_FLUSH_ON_WRITE` | `true` | flush after every creation call |

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod context;
pub mod error;
pub mod reporting;
pub mod sink;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use config::MockStoreConfig;
pub use context::{Record, TestContext, TestRecorder};
pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use reporting::{ReportingMode, ReportingPolicy};
pub use sink::{MockSink, SinkSnapshot};
pub use store::MockStore;
pub use validation::{
    validate_call, validate_name, validate_name_bytes, validate_tag_value_sanitized, Subject,
    Violation,
};
