//! # Stat Store
//!
//! In-memory [`Store`] implementation. Stats are keyed by their serialized
//! name, so asking twice for the same name and tags returns the same handle.
//!
//! ## Flush Order
//!
//! 1. Run every registered [`StatGenerator`]
//! 2. Emit each counter's delta (zero deltas are skipped)
//! 3. Emit each gauge's current value
//! 4. Call [`Sink::flush`] to close the batch
//!
//! Timers bypass the flush entirely: every observation is sent as it happens.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::scope::{Scope, StatGenerator, Store};
use crate::sink::Sink;
use crate::stat::{Counter, Gauge, Timer, TimerUnit};
use crate::tags::{merge_tags, per_instance_tags, serialize_tags};
use crate::TagSet;

/// Separator between scope prefixes and stat names.
pub const SCOPE_DELIMITER: char = '.';

struct StoreInner {
    sink: Arc<dyn Sink>,
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    gauges: RwLock<HashMap<String, Arc<Gauge>>>,
    timers: RwLock<HashMap<String, Arc<Timer>>>,
    generators: RwLock<Vec<Arc<dyn StatGenerator>>>,
}

/// In-memory stat store backed by a [`Sink`].
///
/// Cloning is cheap; clones share all stats.
#[derive(Clone)]
pub struct StatStore {
    inner: Arc<StoreInner>,
}

impl StatStore {
    /// Create a store that flushes into `sink`.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                sink,
                counters: RwLock::new(HashMap::new()),
                gauges: RwLock::new(HashMap::new()),
                timers: RwLock::new(HashMap::new()),
                generators: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The sink this store flushes into.
    pub fn sink(&self) -> Arc<dyn Sink> {
        Arc::clone(&self.inner.sink)
    }

    /// Number of distinct counters, gauges and timers.
    pub fn stat_count(&self) -> usize {
        self.inner.counters.read().len()
            + self.inner.gauges.read().len()
            + self.inner.timers.read().len()
    }

    /// Timer reporting in milliseconds instead of microseconds.
    pub fn new_milli_timer(&self, name: &str) -> Arc<Timer> {
        self.timer(name.to_string(), TimerUnit::Milliseconds)
    }

    pub fn new_milli_timer_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.timer(serialize_tags(name, tags), TimerUnit::Milliseconds)
    }

    fn root(&self) -> StoreScope {
        StoreScope {
            store: self.clone(),
            prefix: String::new(),
            tags: TagSet::new(),
        }
    }

    fn counter(&self, name: String) -> Arc<Counter> {
        if let Some(counter) = self.inner.counters.read().get(&name) {
            return Arc::clone(counter);
        }
        let mut counters = self.inner.counters.write();
        Arc::clone(counters.entry(name).or_insert_with_key(|name| {
            debug!(stat = %name, kind = "counter", "Registered new stat");
            Arc::new(Counter::new())
        }))
    }

    fn gauge(&self, name: String) -> Arc<Gauge> {
        if let Some(gauge) = self.inner.gauges.read().get(&name) {
            return Arc::clone(gauge);
        }
        let mut gauges = self.inner.gauges.write();
        Arc::clone(gauges.entry(name).or_insert_with_key(|name| {
            debug!(stat = %name, kind = "gauge", "Registered new stat");
            Arc::new(Gauge::new())
        }))
    }

    fn timer(&self, name: String, unit: TimerUnit) -> Arc<Timer> {
        if let Some(timer) = self.inner.timers.read().get(&name) {
            return Arc::clone(timer);
        }
        let sink = Arc::clone(&self.inner.sink);
        let mut timers = self.inner.timers.write();
        Arc::clone(timers.entry(name).or_insert_with_key(|name| {
            debug!(stat = %name, kind = "timer", ?unit, "Registered new stat");
            Arc::new(Timer::new(name.clone(), unit, sink))
        }))
    }
}

impl Scope for StatStore {
    fn scope(&self, name: &str) -> Arc<dyn Scope> {
        self.root().scope(name)
    }

    fn scope_with_tags(&self, name: &str, tags: &TagSet) -> Arc<dyn Scope> {
        self.root().scope_with_tags(name, tags)
    }

    fn store(&self) -> Arc<dyn Store> {
        Arc::new(self.clone())
    }

    fn new_counter(&self, name: &str) -> Arc<Counter> {
        self.counter(name.to_string())
    }

    fn new_counter_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.counter(serialize_tags(name, tags))
    }

    fn new_per_instance_counter(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.new_counter_with_tags(name, &per_instance_tags(tags))
    }

    fn new_gauge(&self, name: &str) -> Arc<Gauge> {
        self.gauge(name.to_string())
    }

    fn new_gauge_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.gauge(serialize_tags(name, tags))
    }

    fn new_per_instance_gauge(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.new_gauge_with_tags(name, &per_instance_tags(tags))
    }

    fn new_timer(&self, name: &str) -> Arc<Timer> {
        self.timer(name.to_string(), TimerUnit::Microseconds)
    }

    fn new_timer_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.timer(serialize_tags(name, tags), TimerUnit::Microseconds)
    }

    fn new_per_instance_timer(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.new_timer_with_tags(name, &per_instance_tags(tags))
    }
}

impl Store for StatStore {
    fn flush(&self) {
        // Generators may register new stats, so run them before taking map locks
        let generators: Vec<Arc<dyn StatGenerator>> = self.inner.generators.read().clone();
        for generator in &generators {
            generator.generate_stats();
        }

        let sink = &self.inner.sink;
        let mut counters_sent = 0usize;
        for (name, counter) in self.inner.counters.read().iter() {
            let delta = counter.latch();
            if delta != 0 {
                sink.flush_counter(name, delta);
                counters_sent += 1;
            }
        }

        let gauges = self.inner.gauges.read();
        for (name, gauge) in gauges.iter() {
            sink.flush_gauge(name, gauge.value());
        }

        sink.flush();

        debug!(
            generators = generators.len(),
            counters = counters_sent,
            gauges = gauges.len(),
            "Flushed stat store"
        );
    }

    fn add_stat_generator(&self, generator: Arc<dyn StatGenerator>) {
        self.inner.generators.write().push(generator);
    }
}

/// A named, optionally tagged view onto a [`StatStore`].
#[derive(Clone)]
pub struct StoreScope {
    store: StatStore,
    prefix: String,
    tags: TagSet,
}

impl StoreScope {
    /// Full dotted prefix of this scope.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tags applied to every stat created in this scope.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn full_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.prefix, SCOPE_DELIMITER, name)
        }
    }

    fn serialized(&self, name: &str, tags: &TagSet) -> String {
        if self.tags.is_empty() {
            return serialize_tags(&self.full_name(name), tags);
        }
        serialize_tags(&self.full_name(name), &merge_tags(&self.tags, tags))
    }
}

impl Scope for StoreScope {
    fn scope(&self, name: &str) -> Arc<dyn Scope> {
        self.scope_with_tags(name, &TagSet::new())
    }

    fn scope_with_tags(&self, name: &str, tags: &TagSet) -> Arc<dyn Scope> {
        Arc::new(StoreScope {
            store: self.store.clone(),
            prefix: self.full_name(name),
            tags: merge_tags(&self.tags, tags),
        })
    }

    fn store(&self) -> Arc<dyn Store> {
        Arc::new(self.store.clone())
    }

    fn new_counter(&self, name: &str) -> Arc<Counter> {
        self.new_counter_with_tags(name, &TagSet::new())
    }

    fn new_counter_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.store.counter(self.serialized(name, tags))
    }

    fn new_per_instance_counter(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.new_counter_with_tags(name, &per_instance_tags(tags))
    }

    fn new_gauge(&self, name: &str) -> Arc<Gauge> {
        self.new_gauge_with_tags(name, &TagSet::new())
    }

    fn new_gauge_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.store.gauge(self.serialized(name, tags))
    }

    fn new_per_instance_gauge(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.new_gauge_with_tags(name, &per_instance_tags(tags))
    }

    fn new_timer(&self, name: &str) -> Arc<Timer> {
        self.new_timer_with_tags(name, &TagSet::new())
    }

    fn new_timer_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.store
            .timer(self.serialized(name, tags), TimerUnit::Microseconds)
    }

    fn new_per_instance_timer(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.new_timer_with_tags(name, &per_instance_tags(tags))
    }
}
