//! Aggregate rows returned by the visit store

use serde::Serialize;
use sqlx::FromRow;

/// Visit count for one value of a dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DimensionCount {
    pub name: String,
    pub visits: i64,
}

/// Visit count for one UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DailyCount {
    /// Unix timestamp of the day's midnight (UTC)
    pub day_start: i64,
    pub visits: i64,
}

/// Visits of one link from one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CountryResourceVisits {
    pub country: String,
    pub short_code: String,
    pub visits: i64,
    pub unique_visitors: i64,
}
