//! # remotecheck
//!
//! A correctness harness for Prometheus remote storage connectors.
//!
//! A connector accepts Prometheus remote-write requests and answers
//! remote-read requests. remotecheck speaks that protocol the way Prometheus
//! does (snappy-compressed protobuf over HTTP, optional basic auth), pushes
//! known series, reads them back with label matchers and asserts what comes
//! back.
//!
//! ## Components
//!
//! - **Protocol stub**: prost types generated from the upstream schema
//!   ([`proto`], regenerated by [`stubgen`])
//! - **Client**: remote write and remote read over HTTP ([`client`])
//! - **Selectors**: `metric{label="value"}[3s] @ {read_hints="..."}` into a
//!   `ReadRequest` ([`query`])
//! - **Suite**: the correctness checks, runner and fixtures ([`harness`])
//! - **Reference connector**: an in-memory connector used as a fixture
//!   ([`store`], [`api`])

pub mod api;
pub mod client;
pub mod clock;
pub mod codec;
pub mod config;
pub mod harness;
pub mod proto;
pub mod query;
pub mod store;
pub mod stubgen;
pub mod telemetry;

mod error;

pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::client::{RemoteClient, SeriesRecord};
    pub use crate::config::{ConnectorSettings, Credentials, ServerConfig};
    pub use crate::harness::{
        run_suite, Check, CheckContext, CheckOutcome, Fixture, RunOptions, SuiteReport,
        SuiteSettings,
    };
    pub use crate::store::{SeriesStore, StoreConfig};
    pub use crate::{Error, Result};
}
