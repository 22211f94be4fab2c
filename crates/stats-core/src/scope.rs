//! # Store and Scope Ports
//!
//! These traits are the stat-creation surface production code is written
//! against. [`StatStore`](crate::StatStore) is the in-memory implementation;
//! test doubles implement the same traits so they can be swapped in.

use std::sync::Arc;

use crate::stat::{Counter, Gauge, Timer};
use crate::TagSet;

/// Produces stats on demand, right before every flush.
///
/// Register with [`Store::add_stat_generator`].
pub trait StatGenerator: Send + Sync {
    /// Update the stats owned by this generator.
    fn generate_stats(&self);
}

/// A namespace under which stats are created.
///
/// Creation methods are `#[track_caller]`, so implementations see the
/// caller's location even through `dyn Scope`.
pub trait Scope: Send + Sync {
    /// Child scope named `<self>.<name>`.
    #[track_caller]
    fn scope(&self, name: &str) -> Arc<dyn Scope>;

    /// Child scope that also carries `tags`.
    #[track_caller]
    fn scope_with_tags(&self, name: &str, tags: &TagSet) -> Arc<dyn Scope>;

    /// The root store this scope belongs to.
    fn store(&self) -> Arc<dyn Store>;

    #[track_caller]
    fn new_counter(&self, name: &str) -> Arc<Counter>;
    #[track_caller]
    fn new_counter_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Counter>;
    #[track_caller]
    fn new_per_instance_counter(&self, name: &str, tags: &TagSet) -> Arc<Counter>;

    #[track_caller]
    fn new_gauge(&self, name: &str) -> Arc<Gauge>;
    #[track_caller]
    fn new_gauge_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Gauge>;
    #[track_caller]
    fn new_per_instance_gauge(&self, name: &str, tags: &TagSet) -> Arc<Gauge>;

    #[track_caller]
    fn new_timer(&self, name: &str) -> Arc<Timer>;
    #[track_caller]
    fn new_timer_with_tags(&self, name: &str, tags: &TagSet) -> Arc<Timer>;
    #[track_caller]
    fn new_per_instance_timer(&self, name: &str, tags: &TagSet) -> Arc<Timer>;
}

/// The root scope. Owns every stat and decides when values reach the sink.
pub trait Store: Scope {
    /// Send pending values to the sink.
    fn flush(&self);

    /// Register a generator to run before every flush.
    fn add_stat_generator(&self, generator: Arc<dyn StatGenerator>);
}
