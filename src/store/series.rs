//! Series identity and write validation

use crate::proto::{Label, TimeSeries, METRIC_NAME_LABEL};
use crate::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Label set sorted by name; identifies a series
pub type SeriesKey = Vec<(String, String)>;

fn label_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid label name regex"))
}

fn metric_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("valid metric name regex"))
}

/// Samples of one series, keyed by timestamp
#[derive(Debug, Default, Clone)]
pub struct Series {
    samples: BTreeMap<i64, f64>,
}

impl Series {
    /// Insert samples; a repeated timestamp replaces the earlier value.
    pub fn insert(&mut self, timestamp_ms: i64, value: f64) {
        self.samples.insert(timestamp_ms, value);
    }

    /// Samples with `start <= ts <= end`, ascending.
    pub fn range(&self, start_ms: i64, end_ms: i64) -> impl Iterator<Item = (i64, f64)> + '_ {
        (start_ms <= end_ms)
            .then(|| self.samples.range(start_ms..=end_ms))
            .into_iter()
            .flatten()
            .map(|(ts, v)| (*ts, *v))
    }

    /// Drop samples older than `cutoff_ms`.
    pub fn prune_before(&mut self, cutoff_ms: i64) {
        self.samples = self.samples.split_off(&cutoff_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Validate a series' labels and return its key.
///
/// Empty-valued labels are dropped, as Prometheus treats them as absent.
pub fn series_key(series: &TimeSeries) -> Result<SeriesKey> {
    if series.labels.is_empty() {
        return Err(Error::InvalidWrite("time series has no labels".to_string()));
    }

    let mut key: SeriesKey = Vec::with_capacity(series.labels.len());
    for Label { name, value } in &series.labels {
        if !label_name_re().is_match(name) {
            return Err(Error::InvalidWrite(format!("invalid label name: {:?}", name)));
        }
        if value.is_empty() {
            continue;
        }
        key.push((name.clone(), value.clone()));
    }
    key.sort();

    if let Some(window) = key.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::InvalidWrite(format!(
            "duplicate label name: {}",
            window[0].0
        )));
    }

    let metric_name = key
        .iter()
        .find(|(name, _)| name == METRIC_NAME_LABEL)
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| Error::InvalidWrite("time series has no metric name".to_string()))?;
    if !metric_name_re().is_match(metric_name) {
        return Err(Error::InvalidWrite(format!(
            "invalid metric name: {:?}",
            metric_name
        )));
    }

    Ok(key)
}
