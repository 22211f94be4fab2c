//! # Sinks
//!
//! A sink is where flushed stat values end up. The store calls it with the
//! serialized stat name (tags already folded in).

/// Destination for flushed stat values.
pub trait Sink: Send + Sync {
    /// Receive a counter delta accumulated since the previous flush.
    fn flush_counter(&self, name: &str, value: u64);

    /// Receive the current value of a gauge.
    fn flush_gauge(&self, name: &str, value: u64);

    /// Receive a single timer observation.
    fn flush_timer(&self, name: &str, value: f64);

    /// Mark the end of a flush batch.
    ///
    /// Buffering sinks write out here. The default does nothing.
    fn flush(&self) {}
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for NullSink {
    fn flush_counter(&self, _: &str, _: u64) {}
    fn flush_gauge(&self, _: &str, _: u64) {}
    fn flush_timer(&self, _: &str, _: f64) {}
}
