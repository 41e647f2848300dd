//! In-memory series store backing the reference connector
//!
//! Writes are validated in full before anything is applied, so a rejected
//! request leaves the store untouched. Reads evaluate label matchers
//! against every series and return samples inside the inclusive query
//! window in timestamp order.

mod matcher;
mod series;

pub use matcher::{compile_all, CompiledMatcher};
pub use series::{series_key, Series, SeriesKey};

use crate::clock::{Clock, SystemClock};
use crate::proto::{
    Label, Query, QueryResult, ReadRequest, ReadResponse, ResponseType, Sample, TimeSeries,
    WriteRequest,
};
use crate::{Error, Result};

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Store configuration
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Samples older than `now - retention` are dropped on write and
    /// hidden from reads
    pub retention: Option<Duration>,
}

/// Outcome of an accepted write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Series that carried at least one sample
    pub series: usize,
    /// Samples applied
    pub samples: usize,
}

/// Lock-protected map from series key to samples
pub struct SeriesStore {
    series: RwLock<BTreeMap<SeriesKey, Series>>,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

impl SeriesStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            series: RwLock::new(BTreeMap::new()),
            clock,
            config,
        }
    }

    /// Apply a remote-write request.
    pub fn write(&self, request: &WriteRequest) -> Result<WriteSummary> {
        let mut staged: Vec<(SeriesKey, &[Sample])> = Vec::with_capacity(request.timeseries.len());
        for ts in &request.timeseries {
            let key = series_key(ts)?;
            if !ts.samples.is_empty() {
                staged.push((key, ts.samples.as_slice()));
            }
        }

        let cutoff = self.retention_cutoff();
        let mut summary = WriteSummary::default();
        let mut series = self.series.write();

        for (key, samples) in staged {
            let entry = series.entry(key).or_default();
            let mut applied = 0;
            for sample in samples {
                if cutoff.is_some_and(|c| sample.timestamp < c) {
                    continue;
                }
                entry.insert(sample.timestamp, sample.value);
                applied += 1;
            }
            if applied > 0 {
                summary.series += 1;
                summary.samples += applied;
            }
        }
        if let Some(cutoff) = cutoff {
            for s in series.values_mut() {
                s.prune_before(cutoff);
            }
        }
        series.retain(|_, s| !s.is_empty());

        debug!(
            series = summary.series,
            samples = summary.samples,
            "Applied write request"
        );
        Ok(summary)
    }

    /// Evaluate one remote-read query.
    pub fn read(&self, query: &Query) -> Result<QueryResult> {
        let matchers = compile_all(&query.matchers)?;
        let end = query.end_timestamp_ms;
        let start = match self.retention_cutoff() {
            Some(cutoff) => query.start_timestamp_ms.max(cutoff),
            None => query.start_timestamp_ms,
        };

        let series = self.series.read();
        let timeseries = series
            .iter()
            .filter(|(key, _)| matchers.iter().all(|m| m.matches(key)))
            .filter_map(|(key, s)| {
                let samples: Vec<Sample> = s
                    .range(start, end)
                    .map(|(ts, value)| Sample::new(value, ts))
                    .collect();
                if samples.is_empty() {
                    return None;
                }
                Some(TimeSeries {
                    labels: key.iter().map(|(n, v)| Label::new(n, v)).collect(),
                    samples,
                    exemplars: Vec::new(),
                })
            })
            .collect();

        Ok(QueryResult { timeseries })
    }

    /// Answer a full `ReadRequest` with the SAMPLES response type.
    pub fn read_request(&self, request: &ReadRequest) -> Result<ReadResponse> {
        let accepts_samples = request.accepted_response_types.is_empty()
            || request
                .accepted_response_types
                .contains(&(ResponseType::Samples as i32));
        if !accepts_samples {
            return Err(Error::Unsupported(
                "only the SAMPLES response type is implemented".to_string(),
            ));
        }

        let results = request
            .queries
            .iter()
            .map(|query| self.read(query))
            .collect::<Result<Vec<_>>>()?;
        Ok(ReadResponse { results })
    }

    pub fn series_count(&self) -> usize {
        self.series.read().len()
    }

    pub fn sample_count(&self) -> usize {
        self.series.read().values().map(Series::len).sum()
    }

    /// Drop every series.
    pub fn clear(&self) {
        self.series.write().clear();
    }

    fn retention_cutoff(&self) -> Option<i64> {
        self.config
            .retention
            .map(|retention| {
                let retention_ms = i64::try_from(retention.as_millis()).unwrap_or(i64::MAX);
                self.clock.now_ms().saturating_sub(retention_ms)
            })
    }
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::proto::{LabelMatcher, MatchType};

    fn ts(labels: &[(&str, &str)], samples: &[(f64, i64)]) -> TimeSeries {
        TimeSeries {
            labels: labels.iter().map(|(n, v)| Label::new(*n, *v)).collect(),
            samples: samples.iter().map(|(v, t)| Sample::new(*v, *t)).collect(),
            exemplars: vec![],
        }
    }

    fn query(matchers: Vec<LabelMatcher>, start: i64, end: i64) -> Query {
        Query {
            start_timestamp_ms: start,
            end_timestamp_ms: end,
            matchers,
            hints: None,
        }
    }

    #[test]
    fn test_write_then_read() {
        let store = SeriesStore::default();
        let summary = store
            .write(&WriteRequest {
                timeseries: vec![ts(
                    &[("__name__", "up"), ("job", "a")],
                    &[(1.0, 200), (2.0, 100)],
                )],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(summary, WriteSummary { series: 1, samples: 2 });

        let result = store
            .read(&query(vec![LabelMatcher::eq("__name__", "up")], 0, 1000))
            .unwrap();
        assert_eq!(result.timeseries.len(), 1);
        let samples = &result.timeseries[0].samples;
        assert_eq!(samples[0], Sample::new(2.0, 100));
        assert_eq!(samples[1], Sample::new(1.0, 200));
        assert_eq!(result.timeseries[0].labels[0].name, "__name__");
    }

    #[test]
    fn test_rejected_write_is_atomic() {
        let store = SeriesStore::default();
        let result = store.write(&WriteRequest {
            timeseries: vec![
                ts(&[("__name__", "up")], &[(1.0, 1)]),
                ts(&[], &[(1.0, 1)]),
            ],
            metadata: vec![],
        });
        assert!(matches!(result, Err(Error::InvalidWrite(_))));
        assert_eq!(store.series_count(), 0);
    }

    #[test]
    fn test_empty_write_and_no_samples() {
        let store = SeriesStore::default();
        assert_eq!(
            store.write(&WriteRequest::default()).unwrap(),
            WriteSummary::default()
        );
        let summary = store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "up")], &[])],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(summary.series, 0);
        assert_eq!(store.series_count(), 0);
    }

    #[test]
    fn test_window_is_inclusive() {
        let store = SeriesStore::default();
        store
            .write(&WriteRequest {
                timeseries: vec![ts(
                    &[("__name__", "up")],
                    &[(1.0, 100), (2.0, 200), (3.0, 300)],
                )],
                metadata: vec![],
            })
            .unwrap();

        let m = || vec![LabelMatcher::eq("__name__", "up")];
        assert_eq!(store.read(&query(m(), 100, 300)).unwrap().timeseries[0].samples.len(), 3);
        assert_eq!(store.read(&query(m(), 101, 299)).unwrap().timeseries[0].samples.len(), 1);
        assert!(store.read(&query(m(), 301, 400)).unwrap().timeseries.is_empty());
        assert!(store.read(&query(m(), 300, 100)).unwrap().timeseries.is_empty());
    }

    #[test]
    fn test_read_requires_matchers() {
        let store = SeriesStore::default();
        assert!(matches!(
            store.read(&query(vec![], 0, 1)),
            Err(Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_negative_matchers() {
        let store = SeriesStore::default();
        store
            .write(&WriteRequest {
                timeseries: vec![
                    ts(&[("__name__", "req"), ("job", "a"), ("code", "200")], &[(1.0, 10)]),
                    ts(&[("__name__", "req"), ("job", "b"), ("code", "400")], &[(1.0, 10)]),
                    ts(&[("__name__", "req"), ("job", "a"), ("code", "404")], &[(1.0, 10)]),
                ],
                metadata: vec![],
            })
            .unwrap();

        let result = store
            .read(&query(
                vec![
                    LabelMatcher::eq("__name__", "req"),
                    LabelMatcher::new(MatchType::Nre, "code", "2.."),
                ],
                0,
                100,
            ))
            .unwrap();
        assert_eq!(result.timeseries.len(), 2);

        let result = store
            .read(&query(
                vec![
                    LabelMatcher::eq("__name__", "req"),
                    LabelMatcher::new(MatchType::Neq, "job", "a"),
                ],
                0,
                100,
            ))
            .unwrap();
        assert_eq!(result.timeseries.len(), 1);
        assert_eq!(result.timeseries[0].label_value("job"), Some("b"));
    }

    #[test]
    fn test_rejects_streamed_chunks_only() {
        let store = SeriesStore::default();
        let request = ReadRequest {
            queries: vec![],
            accepted_response_types: vec![ResponseType::StreamedXorChunks as i32],
        };
        assert!(matches!(
            store.read_request(&request),
            Err(Error::Unsupported(_))
        ));

        let request = ReadRequest {
            queries: vec![query(vec![LabelMatcher::eq("__name__", "up")], 0, 1)],
            accepted_response_types: vec![
                ResponseType::StreamedXorChunks as i32,
                ResponseType::Samples as i32,
            ],
        };
        assert_eq!(store.read_request(&request).unwrap().results.len(), 1);
    }

    #[test]
    fn test_retention_drops_old_samples() {
        let clock = Arc::new(ManualClock::new(10_000));
        let store = SeriesStore::with_clock(
            StoreConfig {
                retention: Some(Duration::from_secs(5)),
            },
            clock.clone(),
        );
        let summary = store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "up")], &[(1.0, 1_000), (2.0, 9_000)])],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(summary.samples, 1);

        clock.advance(10_000);
        store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "up")], &[(3.0, 19_000)])],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(store.sample_count(), 1);
    }

    #[test]
    fn test_huge_retention_keeps_everything() {
        let now = 1_700_000_000_000;
        let store = SeriesStore::with_clock(
            StoreConfig {
                retention: Some(Duration::from_secs(u64::MAX / 1000)),
            },
            Arc::new(ManualClock::new(now)),
        );
        let summary = store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "up")], &[(1.0, now), (2.0, 0)])],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(summary.samples, 2);

        let result = store
            .read(&query(vec![LabelMatcher::eq("__name__", "up")], i64::MIN, now))
            .unwrap();
        assert_eq!(result.timeseries.len(), 1);
        assert_eq!(result.timeseries[0].samples.len(), 2);
    }

    #[test]
    fn test_retention_applies_to_idle_series() {
        let clock = Arc::new(ManualClock::new(10_000));
        let store = SeriesStore::with_clock(
            StoreConfig {
                retention: Some(Duration::from_secs(5)),
            },
            clock.clone(),
        );
        store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "idle")], &[(1.0, 9_000)])],
                metadata: vec![],
            })
            .unwrap();

        clock.advance(10_000);
        let idle = query(vec![LabelMatcher::eq("__name__", "idle")], 0, 20_000);
        assert!(store.read(&idle).unwrap().timeseries.is_empty());
        assert_eq!(store.series_count(), 1);

        store
            .write(&WriteRequest {
                timeseries: vec![ts(&[("__name__", "busy")], &[(2.0, 19_000)])],
                metadata: vec![],
            })
            .unwrap();
        assert_eq!(store.series_count(), 1);
        assert_eq!(store.sample_count(), 1);
    }
}
