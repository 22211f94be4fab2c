//! # Integration Tests
//!
//! MockStore driven the way a test suite uses it: wrapping a delegate,
//! reporting into a test context, and asserting on the recording sink.

pub mod abort;
pub mod scenarios;
