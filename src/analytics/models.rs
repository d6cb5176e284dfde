//! Report shapes returned to callers

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{CountryResourceVisits, DimensionCount};

/// Value shown when a "top" metric has no data to pick from
pub const NOT_DETERMINED: &str = "N/D";

/// Value of a comparative metric: a count, or a label such as a country
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Label(String),
}

impl MetricValue {
    pub fn not_determined() -> Self {
        MetricValue::Label(NOT_DETERMINED.to_string())
    }
}

/// A metric for the current window with its growth over the previous one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub title: String,
    pub value: MetricValue,
    /// Growth in percent, `0` when either window is empty
    pub difference_percent: f64,
}

/// One entry of a ranked breakdown or of the daily series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: i64,
}

impl From<DimensionCount> for NamedCount {
    fn from(row: DimensionCount) -> Self {
        Self {
            name: row.name,
            value: row.visits,
        }
    }
}

/// Visits on one day of a link's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVisits {
    pub timestamp: DateTime<Utc>,
    pub count: i64,
}

/// A country in an owner's dashboard with the link it sent most visits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryHighlight {
    pub country: String,
    pub visits: i64,
    pub unique_visitors: i64,
    pub most_visited_resource_key: String,
}

impl From<CountryResourceVisits> for CountryHighlight {
    fn from(row: CountryResourceVisits) -> Self {
        Self {
            country: row.country,
            visits: row.visits,
            unique_visitors: row.unique_visitors,
            most_visited_resource_key: row.short_code,
        }
    }
}

/// Headline metrics of an owner dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainStats {
    pub visits: MetricResult,
    pub unique_visitors: MetricResult,
    pub top_country: MetricResult,
    pub top_referrer: MetricResult,
}

/// Dashboard across every link of one owner, over the rolling window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReport {
    pub owner: String,
    pub generated_at: DateTime<Utc>,
    pub main_stats: MainStats,
    pub top_devices: Vec<NamedCount>,
    pub top_platforms: Vec<NamedCount>,
    pub top_referrers: Vec<NamedCount>,
    pub top_countries: Vec<CountryHighlight>,
}

/// Lifetime report of a single link
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReport {
    pub short_code: String,
    pub generated_at: DateTime<Utc>,
    pub visits: i64,
    pub unique_visitors: i64,
    pub return_visitors: i64,
    pub devices: Vec<NamedCount>,
    pub platforms: Vec<NamedCount>,
    pub referrers: Vec<NamedCount>,
    pub browsers: Vec<NamedCount>,
    pub visits_by_country: Vec<NamedCount>,
    pub more_active_days: Vec<DailyVisits>,
    pub daily_performance: Vec<NamedCount>,
}
