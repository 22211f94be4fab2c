//! # Recording Sink
//!
//! [`MockSink`] keeps everything flushed into it so tests can assert on it:
//!
//! - counters: sum of every flushed delta
//! - gauges: last flushed value
//! - timers: every observation, in order
//!
//! Names are the serialized names the store flushes, so tagged stats are
//! looked up with [`serialize_tags`](stats_core::tags::serialize_tags).

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stats_core::Sink;

#[derive(Default)]
struct Recorded {
    counters: HashMap<String, u64>,
    gauges: HashMap<String, u64>,
    timers: HashMap<String, Vec<f64>>,
}

/// Sink that records every flushed value.
#[derive(Default)]
pub struct MockSink {
    recorded: Mutex<Recorded>,
    flushes: AtomicU64,
}

/// Point-in-time copy of a [`MockSink`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, u64>,
    pub timers: BTreeMap<String, Vec<f64>>,
}

impl SinkSnapshot {
    /// Pretty JSON, handy when dumping state from a failing test.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        *self.recorded.lock() = Recorded::default();
        self.flushes.store(0, Ordering::Relaxed);
    }

    /// Number of completed flush batches.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Sum of all flushed deltas for a counter, 0 if never flushed.
    pub fn counter(&self, name: &str) -> u64 {
        self.recorded
            .lock()
            .counters
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn has_counter(&self, name: &str) -> bool {
        self.recorded.lock().counters.contains_key(name)
    }

    /// Last flushed gauge value, 0 if never flushed.
    pub fn gauge(&self, name: &str) -> u64 {
        self.recorded.lock().gauges.get(name).copied().unwrap_or(0)
    }

    pub fn has_gauge(&self, name: &str) -> bool {
        self.recorded.lock().gauges.contains_key(name)
    }

    /// Every observation recorded for a timer.
    pub fn timer_values(&self, name: &str) -> Vec<f64> {
        self.recorded
            .lock()
            .timers
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn timer_count(&self, name: &str) -> usize {
        self.recorded.lock().timers.get(name).map_or(0, Vec::len)
    }

    /// All counters and their totals.
    pub fn counters(&self) -> BTreeMap<String, u64> {
        self.recorded
            .lock()
            .counters
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// All gauges and their last values.
    pub fn gauges(&self) -> BTreeMap<String, u64> {
        self.recorded
            .lock()
            .gauges
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    pub fn snapshot(&self) -> SinkSnapshot {
        let recorded = self.recorded.lock();
        SinkSnapshot {
            counters: recorded.counters.clone().into_iter().collect(),
            gauges: recorded.gauges.clone().into_iter().collect(),
            timers: recorded.timers.clone().into_iter().collect(),
        }
    }

    #[track_caller]
    pub fn assert_counter_equals(&self, name: &str, expected: u64) {
        assert!(self.has_counter(name), "counter {name:?} was never flushed");
        let actual = self.counter(name);
        assert_eq!(actual, expected, "counter {name:?}");
    }

    #[track_caller]
    pub fn assert_counter_exists(&self, name: &str) {
        assert!(self.has_counter(name), "counter {name:?} was never flushed");
    }

    #[track_caller]
    pub fn assert_counter_not_exists(&self, name: &str) {
        assert!(
            !self.has_counter(name),
            "counter {name:?} exists with value {}",
            self.counter(name)
        );
    }

    #[track_caller]
    pub fn assert_gauge_equals(&self, name: &str, expected: u64) {
        assert!(self.has_gauge(name), "gauge {name:?} was never flushed");
        let actual = self.gauge(name);
        assert_eq!(actual, expected, "gauge {name:?}");
    }

    #[track_caller]
    pub fn assert_gauge_exists(&self, name: &str) {
        assert!(self.has_gauge(name), "gauge {name:?} was never flushed");
    }

    #[track_caller]
    pub fn assert_timer_called(&self, name: &str) {
        assert!(
            self.timer_count(name) > 0,
            "timer {name:?} was never called"
        );
    }

    #[track_caller]
    pub fn assert_timer_call_count(&self, name: &str, expected: usize) {
        let actual = self.timer_count(name);
        assert_eq!(actual, expected, "timer {name:?} call count");
    }
}

impl Sink for MockSink {
    fn flush_counter(&self, name: &str, value: u64) {
        *self
            .recorded
            .lock()
            .counters
            .entry(name.to_string())
            .or_insert(0) += value;
    }

    fn flush_gauge(&self, name: &str, value: u64) {
        self.recorded
            .lock()
            .gauges
            .insert(name.to_string(), value);
    }

    fn flush_timer(&self, name: &str, value: f64) {
        self.recorded
            .lock()
            .timers
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for MockSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let recorded = self.recorded.lock();
        f.debug_struct("MockSink")
            .field("counters", &recorded.counters.len())
            .field("gauges", &recorded.gauges.len())
            .field("timers", &recorded.timers.len())
            .field("flushes", &self.flush_count())
            .finish()
    }
}
