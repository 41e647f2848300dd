//! Sequential suite runner and report

use super::checks::{Check, CheckContext};
use crate::Result;

use chrono::Utc;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Which checks to run and how long each may take.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Substring filters on check names; empty runs every check
    pub filters: Vec<String>,
    pub check_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            check_timeout: Duration::from_secs(60),
        }
    }
}

impl RunOptions {
    pub fn selected(&self) -> Vec<Check> {
        Check::ALL
            .into_iter()
            .filter(|check| {
                self.filters.is_empty()
                    || self.filters.iter().any(|f| check.name().contains(f.as_str()))
            })
            .collect()
    }
}

/// Result of one check
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub connector_url: String,
    /// RFC 3339 start time
    pub started_at: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// 0 iff at least one check ran and all of them passed.
    pub fn exit_code(&self) -> i32 {
        if !self.outcomes.is_empty() && self.failed() == 0 {
            0
        } else {
            1
        }
    }

    /// Human-readable summary, one line per check.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let status = if outcome.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "{status} {} ({} ms)",
                outcome.name,
                outcome.duration.as_millis()
            ));
            if let Some(message) = &outcome.message {
                out.push_str(&format!(": {message}"));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "{} passed, {} failed against {}",
            self.passed(),
            self.failed(),
            self.connector_url
        ));
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Run the selected checks one after another.
pub async fn run_suite(ctx: &CheckContext, options: &RunOptions) -> SuiteReport {
    let started_at = Utc::now().to_rfc3339();
    let selected = options.selected();
    if selected.is_empty() {
        warn!(filters = ?options.filters, "No checks match the filters");
    }

    let mut outcomes = Vec::with_capacity(selected.len());
    for check in selected {
        info!(check = check.name(), "Running check");
        let start = Instant::now();
        let result = tokio::time::timeout(options.check_timeout, check.run(ctx)).await;
        let duration = start.elapsed();

        let message = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!(
                "timed out after {} s",
                options.check_timeout.as_secs_f64()
            )),
        };

        match &message {
            None => info!(
                check = check.name(),
                duration_ms = duration.as_millis() as u64,
                "Check passed"
            ),
            Some(reason) => warn!(
                check = check.name(),
                duration_ms = duration.as_millis() as u64,
                reason = %reason,
                "Check failed"
            ),
        }

        outcomes.push(CheckOutcome {
            name: check.name().to_string(),
            passed: message.is_none(),
            duration,
            message,
        });
    }

    SuiteReport {
        connector_url: ctx.client.base_url().to_string(),
        started_at,
        outcomes,
    }
}
