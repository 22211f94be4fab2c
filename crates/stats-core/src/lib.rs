//! # Stats Core
//!
//! In-memory stats store: counters, gauges and timers created by name,
//! optionally tagged, grouped into scopes and flushed into a [`Sink`].
//!
//! ## Architecture
//!
//! - **Ports** (`scope`): [`Store`], [`Scope`] and [`StatGenerator`] traits.
//!   Production code depends on these, never on a concrete store.
//! - **Handles** (`stat`): [`Counter`], [`Gauge`], [`Timer`], [`Timespan`]
//! - **Store** (`store`): [`StatStore`], the in-memory implementation
//! - **Sinks** (`sink`): where flushed values go
//! - **Tags** (`tags`): tag serialization and the tag value sanitizer
//!
//! ## Usage Example
//!
//! ```ignore
//! use stats_core::{NullSink, Scope, StatStore, Store};
//! use std::sync::Arc;
//!
//! let store = StatStore::new(Arc::new(NullSink::new()));
//! let requests = store.scope("http").new_counter("requests");
//! requests.inc();
//! store.flush();
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod scope;
pub mod sink;
pub mod stat;
pub mod store;
pub mod tags;

use std::collections::BTreeMap;

// Re-export main types
pub use scope::{Scope, StatGenerator, Store};
pub use sink::{NullSink, Sink};
pub use stat::{Counter, Gauge, Timer, TimerUnit, Timespan};
pub use store::{StatStore, StoreScope};

/// Tags attached to a stat. Keys are unique and iterate in sorted order.
pub type TagSet = BTreeMap<String, String>;
