//! Time source for cache expiry and paper age.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Datelike, Utc};

/// Source of "now".
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar year.
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Start at the given instant.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { millis: AtomicI64::new(start.timestamp_millis()) }
    }

    /// Start at midnight UTC on 1 July of `year`.
    #[must_use]
    pub fn at_year(year: i32) -> Self {
        let start = chrono::NaiveDate::from_ymd_opt(year, 7, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_default();
        Self::new(start)
    }

    /// Move forward.
    pub fn advance(&self, by: std::time::Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
