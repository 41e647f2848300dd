//! Remote-read request construction
//!
//! Turns a series selector such as
//! `http_requests_total{job!="api"}[5m] @ {read_hints="start=..,end=.."}`
//! into a Prometheus `ReadRequest`.
//!
//! - The read window ends at the clock's current time and spans the
//!   selector range (one hour when absent).
//! - `start` / `end` read hints, when present, replace the window bounds.
//! - The first matcher is always `__name__ = <metric>`; label matchers
//!   follow, ordered by value.

mod duration;
mod hints;
mod selector;

pub use duration::{parse_duration_ms, DEFAULT_RANGE_MS};
pub use hints::{parse_read_hints, ParsedHints};
pub use selector::{parse_selector, Selector, SelectorMatcher};

use crate::clock::Clock;
use crate::proto::{LabelMatcher, Query, ReadRequest, ResponseType, METRIC_NAME_LABEL};
use crate::Result;

impl Selector {
    /// Build the remote-read query for this selector at `now_ms`.
    pub fn to_query(&self, now_ms: i64) -> Query {
        let range_ms = self.range_ms.unwrap_or(DEFAULT_RANGE_MS);
        let start_ms = self.start_ms.unwrap_or(now_ms.saturating_sub(range_ms));
        let end_ms = self.end_ms.unwrap_or(now_ms);

        let mut label_matchers = self.matchers.clone();
        label_matchers.sort_by(|a, b| a.value.cmp(&b.value));

        let mut matchers = Vec::with_capacity(label_matchers.len() + 1);
        matchers.push(LabelMatcher::eq(METRIC_NAME_LABEL, self.metric_name.clone()));
        matchers.extend(
            label_matchers
                .into_iter()
                .map(|m| LabelMatcher::new(m.op, m.name, m.value)),
        );

        Query {
            start_timestamp_ms: start_ms,
            end_timestamp_ms: end_ms,
            matchers,
            hints: self.hints.clone(),
        }
    }

    /// Wrap [`Selector::to_query`] in a single-query `ReadRequest`.
    pub fn to_read_request(&self, now_ms: i64) -> ReadRequest {
        ReadRequest {
            queries: vec![self.to_query(now_ms)],
            accepted_response_types: vec![ResponseType::Samples as i32],
        }
    }
}

/// Parse `selector` and build a `ReadRequest` using `clock` for the window.
pub fn build_read_request(selector: &str, clock: &dyn Clock) -> Result<ReadRequest> {
    let parsed = parse_selector(selector)?;
    Ok(parsed.to_read_request(clock.now_ms()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::proto::MatchType;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_default_window_is_one_hour() {
        let request = build_read_request("up", &ManualClock::new(NOW)).unwrap();
        let query = &request.queries[0];
        assert_eq!(query.end_timestamp_ms, NOW);
        assert_eq!(query.start_timestamp_ms, NOW - 3_600_000);
        assert!(query.hints.is_none());
        assert_eq!(
            request.accepted_response_types,
            vec![ResponseType::Samples as i32]
        );
    }

    #[test]
    fn test_range_window() {
        let request = build_read_request("up[3s]", &ManualClock::new(NOW)).unwrap();
        assert_eq!(request.queries[0].start_timestamp_ms, NOW - 3_000);
    }

    #[test]
    fn test_metric_matcher_first_then_sorted_by_value() {
        let request = build_read_request(
            r#"prometheus_http_requests_total{test_id="x1", instance="mockmetheus", job="prometheus"}"#,
            &ManualClock::new(NOW),
        )
        .unwrap();
        let matchers = &request.queries[0].matchers;
        assert_eq!(matchers.len(), 4);
        assert_eq!(matchers[0].name, "__name__");
        assert_eq!(matchers[0].value, "prometheus_http_requests_total");
        assert_eq!(matchers[0].r#type(), MatchType::Eq);
        let values: Vec<_> = matchers[1..].iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["mockmetheus", "prometheus", "x1"]);
    }

    #[test]
    fn test_hints_override_window() {
        let request = build_read_request(
            r#"up{instance="a"} @ {read_hints="start=1000,end=4000,step=10"}"#,
            &ManualClock::new(NOW),
        )
        .unwrap();
        let query = &request.queries[0];
        assert_eq!(query.start_timestamp_ms, 1000);
        assert_eq!(query.end_timestamp_ms, 4000);
        let hints = query.hints.as_ref().unwrap();
        assert_eq!(hints.step_ms, 10);
    }

    #[test]
    fn test_partial_hints_keep_default_bound() {
        let request = build_read_request(
            r#"up[10s] @ {read_hints="start=5"}"#,
            &ManualClock::new(NOW),
        )
        .unwrap();
        let query = &request.queries[0];
        assert_eq!(query.start_timestamp_ms, 5);
        assert_eq!(query.end_timestamp_ms, NOW);
    }

    #[test]
    fn test_zero_start_hint_is_honored() {
        let request = build_read_request(
            r#"up @ {read_hints="start=0,end=100"}"#,
            &ManualClock::new(NOW),
        )
        .unwrap();
        let query = &request.queries[0];
        assert_eq!(query.start_timestamp_ms, 0);
        assert_eq!(query.end_timestamp_ms, 100);
    }

    #[test]
    fn test_invalid_selector_propagates() {
        assert!(build_read_request("{}", &ManualClock::new(NOW)).is_err());
    }
}
