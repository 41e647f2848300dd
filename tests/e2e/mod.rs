//! End-to-end test infrastructure for remotecheck
//!
//! Test harness and utilities for validating a connector deployed with the
//! docker-compose stack.

pub mod harness;
pub mod smoke;

pub use harness::*;
