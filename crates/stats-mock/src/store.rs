//! # Mock Store
//!
//! [`MockStore`] is a drop-in [`Store`] for tests. Every creation call:
//!
//! 1. validates the name and tags
//! 2. reports each violation through the [`ReportingPolicy`]
//! 3. forwards the call unchanged to the real store
//! 4. flushes, so values land in the [`MockSink`] right away
//!
//! Validation never changes what the call returns; an invalid name still
//! gets a working handle.
//!
//! Scopes returned by [`Scope::scope`] belong to the delegate: stats created
//! through them are not validated.

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use stats_core::{Counter, Gauge, Scope, StatGenerator, StatStore, Store, TagSet, Timer};
use tracing::debug;

use crate::config::MockStoreConfig;
use crate::context::TestContext;
use crate::reporting::{ReportingMode, ReportingPolicy};
use crate::sink::MockSink;
use crate::validation::validate_call;

/// Validating test double for a [`Store`].
pub struct MockStore {
    delegate: Arc<dyn Store>,
    sink: Arc<MockSink>,
    policy: ReportingPolicy,
    flush_on_write: bool,
}

impl MockStore {
    /// Mock reporting to `context`, or aborting the process without one.
    pub fn new(context: Option<Arc<dyn TestContext>>) -> Self {
        Self::with_policy(ReportingPolicy::from_context(context))
    }

    /// Mock that validates but never reports.
    pub fn silent() -> Self {
        Self::with_policy(ReportingPolicy::silent())
    }

    /// Mock that logs violations and carries on.
    pub fn logging() -> Self {
        Self::with_policy(ReportingPolicy::log_and_continue())
    }

    pub fn with_config(config: &MockStoreConfig, context: Option<Arc<dyn TestContext>>) -> Self {
        let mut store = Self::with_policy(ReportingPolicy::new(config.reporting, context));
        store.flush_on_write = config.flush_on_write;
        store
    }

    /// Mock over a fresh [`StatStore`] flushing into a fresh [`MockSink`].
    pub fn with_policy(policy: ReportingPolicy) -> Self {
        let sink = Arc::new(MockSink::new());
        let delegate = Arc::new(StatStore::new(sink.clone()));
        Self::with_delegate(delegate, sink, policy)
    }

    /// Mock over an existing store. `sink` should be the one `delegate`
    /// flushes into.
    pub fn with_delegate(
        delegate: Arc<dyn Store>,
        sink: Arc<MockSink>,
        policy: ReportingPolicy,
    ) -> Self {
        debug!(mode = %policy.mode(), "Created mock stat store");
        Self {
            delegate,
            sink,
            policy,
            flush_on_write: true,
        }
    }

    pub fn reporting_mode(&self) -> ReportingMode {
        self.policy.mode()
    }

    /// The recording sink behind this store.
    pub fn sink(&self) -> Arc<MockSink> {
        Arc::clone(&self.sink)
    }

    /// Reset the recording sink to a fresh state.
    pub fn reset(&self) {
        self.sink.reset();
    }

    /// No-op: the mock flushes on every write instead of on a timer.
    pub fn start(&self, _interval: Duration) {}

    #[track_caller]
    fn validate(&self, operation: &str, name: &str, tags: &TagSet) {
        let violations = validate_call(name, tags);
        if violations.is_empty() {
            return;
        }

        let location = Location::caller();
        debug!(
            operation,
            stat = name,
            violations = violations.len(),
            %location,
            "Stat validation failed"
        );
        for violation in &violations {
            self.policy
                .report_at(location, &violation.describe(operation, name, tags));
        }
    }

    fn after_write(&self) {
        if self.flush_on_write {
            self.delegate.flush();
        }
    }
}

impl Scope for MockStore {
    #[track_caller]
    fn scope(&self, name: &str) -> Arc<dyn Scope> {
        self.validate("scope", name, &TagSet::new());
        let scope = self.delegate.scope(name);
        self.after_write();
        scope
    }

    #[track_caller]
    fn scope_with_tags(&self, name: &str, tags: &TagSet) -> Arc<dyn Scope> {
        self.validate("scope_with_tags", name, tags);
        let scope = self.delegate.scope_with_tags(name, tags);
        self.after_write();
        scope
    }

    fn store(&self) -> Arc<dyn Store> {
        self.delegate.store()
    }

    #[track_caller]
    fn new_counter(&self, name: &str) -> Arc<Counter> {
        self.validate("new_counter", name, &TagSet::new());
        let counter = self.delegate.new_counter(name);
        self.after_write();
        counter
    }

    #[track_caller]
    fn new_counter_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.validate("new_counter_with_tags", name, tags);
        let counter = self.delegate.new_counter_with_tags(name, tags);
        self.after_write();
        counter
    }

    #[track_caller]
    fn new_per_instance_counter(&self, name: &str, tags: &TagSet) -> Arc<Counter> {
        self.validate("new_per_instance_counter", name, tags);
        let counter = self.delegate.new_per_instance_counter(name, tags);
        self.after_write();
        counter
    }

    #[track_caller]
    fn new_gauge(&self, name: &str) -> Arc<Gauge> {
        self.validate("new_gauge", name, &TagSet::new());
        let gauge = self.delegate.new_gauge(name);
        self.after_write();
        gauge
    }

    #[track_caller]
    fn new_gauge_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.validate("new_gauge_with_tags", name, tags);
        let gauge = self.delegate.new_gauge_with_tags(name, tags);
        self.after_write();
        gauge
    }

    #[track_caller]
    fn new_per_instance_gauge(&self, name: &str, tags: &TagSet) -> Arc<Gauge> {
        self.validate("new_per_instance_gauge", name, tags);
        let gauge = self.delegate.new_per_instance_gauge(name, tags);
        self.after_write();
        gauge
    }

    #[track_caller]
    fn new_timer(&self, name: &str) -> Arc<Timer> {
        self.validate("new_timer", name, &TagSet::new());
        let timer = self.delegate.new_timer(name);
        self.after_write();
        timer
    }

    #[track_caller]
    fn new_timer_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.validate("new_timer_with_tags", name, tags);
        let timer = self.delegate.new_timer_with_tags(name, tags);
        self.after_write();
        timer
    }

    #[track_caller]
    fn new_per_instance_timer(&self, name: &str, tags: &TagSet) -> Arc<Timer> {
        self.validate("new_per_instance_timer", name, tags);
        let timer = self.delegate.new_per_instance_timer(name, tags);
        self.after_write();
        timer
    }
}

impl Store for MockStore {
    fn flush(&self) {
        self.delegate.flush();
    }

    fn add_stat_generator(&self, generator: Arc<dyn StatGenerator>) {
        self.delegate.add_stat_generator(generator);
    }
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("policy", &self.policy)
            .field("sink", &self.sink)
            .field("flush_on_write", &self.flush_on_write)
            .finish()
    }
}
