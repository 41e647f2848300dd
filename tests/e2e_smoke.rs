//! E2E Smoke Tests for remotecheck
//!
//! End-to-end validation against the docker-compose stack in `deploy/`.
//!
//! ## Running the tests
//!
//! ```bash
//! # Start the stack
//! cd deploy && docker compose up -d connector
//!
//! # Wait for the connector to be ready
//! curl http://localhost:9201/health
//!
//! # Run smoke tests
//! cargo test --test e2e_smoke -- --nocapture --ignored
//!
//! # Tear down
//! cd deploy && docker compose down
//! ```
//!
//! ## Environment Variables
//!
//! - `CONNECTOR_URL`: connector base URL (default: http://localhost:9201)
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`: basic-auth credentials

mod e2e;

pub use e2e::*;
