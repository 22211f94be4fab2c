//! # Stats Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Counting delegate, sample instrumented service
//! └── integration/
//!     ├── scenarios.rs  # MockStore end to end, every reporting mode
//!     └── abort.rs      # AbortProcess, observed from a child process
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p stats-tests
//!
//! # By category
//! cargo test -p stats-tests integration::scenarios::
//! cargo test -p stats-tests integration::abort::
//!
//! # Benchmarks
//! cargo bench -p stats-tests
//! ```

pub mod integration;
