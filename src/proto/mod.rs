//! Prometheus remote-storage wire types
//!
//! `prometheus.rs` is generated from `proto/remote.proto` and `proto/types.proto`
//! by the `regenerate-stub` binary. Do not edit it by hand; regenerate instead.
//! This module adds a few constructors on top of the generated types.

#[allow(clippy::all)]
mod prometheus;

pub use prometheus::*;

pub use label_matcher::Type as MatchType;
pub use read_request::ResponseType;

/// Label name carrying the metric name.
pub const METRIC_NAME_LABEL: &str = "__name__";

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Sample {
    pub fn new(value: f64, timestamp: i64) -> Self {
        Self { value, timestamp }
    }
}

impl LabelMatcher {
    pub fn new(match_type: MatchType, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            r#type: match_type as i32,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(MatchType::Eq, name, value)
    }
}

impl TimeSeries {
    /// Value of the label `name`, if present.
    pub fn label_value(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }

    /// Sort labels by name, the order remote-read consumers compare against.
    pub fn sort_labels(&mut self) {
        self.labels.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

impl ReadResponse {
    /// True when the response carries no series for its first query.
    pub fn is_empty(&self) -> bool {
        self.results
            .first()
            .map_or(true, |result| result.timeseries.is_empty())
    }

    /// Series returned for the first query.
    pub fn first_series(&self) -> &[TimeSeries] {
        self.results
            .first()
            .map(|result| result.timeseries.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_sample_wire_layout() {
        // double (tag 1, wire type 1) followed by varint int64 (tag 2)
        let bytes = Sample::new(1.0, 5).encode_to_vec();
        assert_eq!(bytes[0], 0x09);
        assert_eq!(&bytes[1..9], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[9..], &[0x10, 0x05]);
    }

    #[test]
    fn test_matcher_type_roundtrip() {
        let matcher = LabelMatcher::new(MatchType::Nre, "code", "2..");
        assert_eq!(matcher.r#type(), MatchType::Nre);
        assert_eq!(MatchType::from_str_name("NRE"), Some(MatchType::Nre));
    }

    #[test]
    fn test_empty_response() {
        assert!(ReadResponse::default().is_empty());

        let response = ReadResponse {
            results: vec![QueryResult::default()],
        };
        assert!(response.is_empty());
        assert!(response.first_series().is_empty());
    }

    #[test]
    fn test_sort_labels() {
        let mut series = TimeSeries {
            labels: vec![Label::new("job", "a"), Label::new(METRIC_NAME_LABEL, "up")],
            ..Default::default()
        };
        series.sort_labels();
        assert_eq!(series.labels[0].name, METRIC_NAME_LABEL);
        assert_eq!(series.label_value("job"), Some("a"));
        assert_eq!(series.label_value("missing"), None);
    }
}
