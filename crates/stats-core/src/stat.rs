//! # Stat Handles
//!
//! - **Counter**: monotonically increasing; flush emits the delta since the
//!   previous flush.
//! - **Gauge**: value that can go up or down; flush emits the current value.
//! - **Timer**: every observation goes straight to the sink.
//!
//! Handles are cheap to clone and safe to share between threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::sink::Sink;

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter {
    /// Running total
    current: AtomicU64,
    /// Total at the previous latch
    last_sent: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the counter.
    pub fn add(&self, delta: u64) {
        self.current.fetch_add(delta, Ordering::Relaxed);
    }

    /// Add one to the counter.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Overwrite the running total.
    pub fn set(&self, value: u64) {
        self.current.store(value, Ordering::Relaxed);
    }

    /// Current running total.
    pub fn value(&self) -> u64 {
        self.current.load(Ordering::Relaxed)
    }

    /// Take the delta accumulated since the previous latch.
    pub fn latch(&self) -> u64 {
        let value = self.current.load(Ordering::Relaxed);
        let last = self.last_sent.swap(value, Ordering::Relaxed);
        value.wrapping_sub(last)
    }
}

/// A gauge.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Subtract `delta`, stopping at zero.
    pub fn sub(&self, delta: u64) {
        let _ = self
            .value
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(delta))
            });
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn dec(&self) {
        self.sub(1);
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Base unit a timer reports durations in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUnit {
    Microseconds,
    Milliseconds,
}

impl TimerUnit {
    fn convert(self, duration: Duration) -> f64 {
        match self {
            TimerUnit::Microseconds => duration.as_secs_f64() * 1_000_000.0,
            TimerUnit::Milliseconds => duration.as_secs_f64() * 1_000.0,
        }
    }
}

/// A timer. Observations are sent to the sink as they are recorded.
pub struct Timer {
    name: String,
    unit: TimerUnit,
    sink: Arc<dyn Sink>,
}

impl Timer {
    pub fn new(name: impl Into<String>, unit: TimerUnit, sink: Arc<dyn Sink>) -> Self {
        Self {
            name: name.into(),
            unit,
            sink,
        }
    }

    /// Serialized name observations are reported under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> TimerUnit {
        self.unit
    }

    /// Record a raw value, already in the timer's unit.
    pub fn add_value(&self, value: f64) {
        self.sink.flush_timer(&self.name, value);
    }

    /// Record a duration, converted to the timer's unit.
    pub fn add_duration(&self, duration: Duration) {
        self.add_value(self.unit.convert(duration));
    }

    /// Start timing a span. Nothing is recorded until it completes.
    pub fn allocate_span(self: &Arc<Self>) -> Timespan {
        Timespan {
            timer: Arc::clone(self),
            start: Instant::now(),
        }
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .finish()
    }
}

/// An in-flight timing started by [`Timer::allocate_span`].
#[must_use = "a span records nothing until completed"]
pub struct Timespan {
    timer: Arc<Timer>,
    start: Instant,
}

impl Timespan {
    /// Record the time elapsed since the span was allocated.
    pub fn complete(self) -> Duration {
        let elapsed = self.start.elapsed();
        self.timer.add_duration(elapsed);
        elapsed
    }

    /// Record an explicit duration instead of the elapsed time.
    pub fn complete_with_duration(self, duration: Duration) {
        self.timer.add_duration(duration);
    }
}
