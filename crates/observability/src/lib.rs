//! Process-wide tracing setup shared by binaries, tests and benches.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_for_tests, init_with};
