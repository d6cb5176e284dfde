//! Day buckets and the gap-filled daily series

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::analytics::models::NamedCount;
use crate::config::MAX_REPORT_DAYS;
use crate::storage::{StorageError, StorageResult};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Date format used for series entry names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Midnight (UTC) of a day bucket as returned by the store
pub fn day_start(timestamp: i64) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| StorageError::Malformed(format!("day bucket out of range: {timestamp}")))
}

/// Dense series of `days` dates ending at `today`, oldest first.
///
/// Dates missing from `counts` are zero; counts for dates outside the
/// series are ignored, so the result always has exactly `days` entries.
/// Fails when `days` exceeds [`MAX_REPORT_DAYS`] or the first date is not
/// representable.
pub fn fill_daily_series<I>(
    today: NaiveDate,
    days: u32,
    counts: I,
) -> StorageResult<Vec<NamedCount>>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    if days == 0 {
        return Ok(Vec::new());
    }

    let first = series_start(today, days)?;
    let mut filled: BTreeMap<NaiveDate, i64> = first
        .iter_days()
        .take(days as usize)
        .map(|date| (date, 0))
        .collect();

    for (date, visits) in counts {
        if let Some(slot) = filled.get_mut(&date) {
            *slot = visits;
        }
    }

    Ok(filled
        .into_iter()
        .map(|(date, value)| NamedCount {
            name: date.format(DATE_FORMAT).to_string(),
            value,
        })
        .collect())
}

fn series_start(today: NaiveDate, days: u32) -> StorageResult<NaiveDate> {
    if days > MAX_REPORT_DAYS {
        return Err(StorageError::InvalidRange(format!(
            "series of {days} days is longer than {MAX_REPORT_DAYS}"
        )));
    }

    today
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or_else(|| StorageError::InvalidRange(format!("{days} days before {today}")))
}
