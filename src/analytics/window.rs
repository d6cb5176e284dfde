//! Rolling comparison windows and growth percentages

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::analytics::models::{MetricResult, MetricValue};
use crate::analytics::series::SECONDS_PER_DAY;
use crate::storage::{StorageResult, TimeRange};

/// Growth of `current` over `previous`, in percent.
///
/// Returns `0` when either side is zero, so a cold start never reports
/// infinite or -100% growth.
pub fn compare(current: i64, previous: i64) -> f64 {
    if current == 0 || previous == 0 {
        return 0.0;
    }

    (current - previous) as f64 / previous as f64 * 100.0
}

/// The two adjacent windows of one report, anchored to a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindows {
    pub report_time: DateTime<Utc>,
    /// `[report_time - window, report_time)`
    pub current: TimeRange,
    /// `[report_time - 2 * window, report_time - window)`
    pub previous: TimeRange,
}

impl ReportWindows {
    pub fn new(report_time: DateTime<Utc>, window_days: u32) -> Self {
        let now = report_time.timestamp();
        let span = i64::from(window_days) * SECONDS_PER_DAY;

        Self {
            report_time,
            current: TimeRange::new(now - span, now),
            previous: TimeRange::new(now - 2 * span, now - span),
        }
    }
}

/// A count taken over both windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounts {
    pub current: i64,
    pub previous: i64,
}

impl WindowCounts {
    /// Run `count` over both windows concurrently
    pub async fn collect<F, Fut>(windows: &ReportWindows, count: F) -> StorageResult<Self>
    where
        F: Fn(TimeRange) -> Fut,
        Fut: Future<Output = StorageResult<i64>>,
    {
        let (current, previous) =
            tokio::try_join!(count(windows.current), count(windows.previous))?;
        Ok(Self { current, previous })
    }

    pub fn growth(&self) -> f64 {
        compare(self.current, self.previous)
    }

    pub fn into_metric(self, title: &str) -> MetricResult {
        MetricResult {
            title: title.to_string(),
            value: MetricValue::Count(self.current),
            difference_percent: self.growth(),
        }
    }
}
