//! Smoke tests for a deployed connector
//!
//! Basic validation that the stack is up and the suite passes against it.

pub mod health_tests;
pub mod suite_tests;
