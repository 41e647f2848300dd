//! Connector correctness suite
//!
//! The suite writes series through remote write, reads them back through
//! remote read and asserts what the connector returns. Checks run one at a
//! time against a shared connector and rely on wall-clock read windows, so
//! each one tags its data with a random test id.

pub mod checks;
pub mod fixture;
pub mod runner;

pub use checks::{Check, CheckContext};
pub use fixture::Fixture;
pub use runner::{run_suite, CheckOutcome, RunOptions, SuiteReport};

use crate::config::{parse_bool, parse_var};
use crate::Result;

use rand::Rng;
use std::time::Duration;

const TEST_ID_ALPHABET: &[u8] = b"abcde12345";
const TEST_ID_LEN: usize = 4;

/// Timing and state assumptions the checks make about the connector.
#[derive(Debug, Clone)]
pub struct SuiteSettings {
    /// Connector storage is known to be empty before the run
    pub fresh_tsdb: bool,
    /// Wait between a write and the read that verifies it
    pub ingest_delay: Duration,
    /// Wait before the empty-on-init read of a non-fresh store
    pub quiet_period: Duration,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            fresh_tsdb: false,
            ingest_delay: Duration::from_secs(1),
            quiet_period: Duration::from_secs(3),
        }
    }
}

impl SuiteSettings {
    /// Environment variables:
    /// - REMOTECHECK_FRESH_TSDB: storage starts empty (default: false)
    /// - REMOTECHECK_INGEST_DELAY_MS: delay after writes (default: 1000)
    /// - REMOTECHECK_QUIET_PERIOD_MS: quiet period for non-fresh stores (default: 3000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let fresh_tsdb = match lookup("REMOTECHECK_FRESH_TSDB") {
            Some(raw) if !raw.trim().is_empty() => parse_bool("REMOTECHECK_FRESH_TSDB", &raw)?,
            _ => defaults.fresh_tsdb,
        };
        Ok(Self {
            fresh_tsdb,
            ingest_delay: parse_var::<u64, _>(&lookup, "REMOTECHECK_INGEST_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.ingest_delay),
            quiet_period: parse_var::<u64, _>(&lookup, "REMOTECHECK_QUIET_PERIOD_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.quiet_period),
        })
    }
}

/// Random 4-character id used to isolate one check's series.
pub fn generate_test_run_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TEST_ID_LEN)
        .map(|_| TEST_ID_ALPHABET[rng.gen_range(0..TEST_ID_ALPHABET.len())] as char)
        .collect()
}
