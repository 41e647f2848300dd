//! Millisecond clock sources
//!
//! Read windows and sample timestamps are wall-clock milliseconds. The
//! clock is a trait so selector parsing and retention can be tested at a
//! fixed instant.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or_default()
    }
}

/// Wall clock that never goes backward.
///
/// If the wall clock steps back (e.g. NTP adjustment) the previous
/// high-water mark is returned instead, so two reads never invert.
#[derive(Debug, Default)]
pub struct SystemClock {
    high_water_ms: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        let wall = Utc::now().timestamp_millis();
        let prev = self.high_water_ms.fetch_max(wall, Ordering::AcqRel);
        wall.max(prev)
    }
}

/// Clock pinned to an explicit instant, advanced by hand.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::Acquire)
    }
}
