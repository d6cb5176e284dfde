use crate::models::{CountryResourceVisits, DailyCount, DimensionCount, ShortenedUrl};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("malformed analytics data: {0}")]
    Malformed(String),
    #[error("report range out of bounds: {0}")]
    InvalidRange(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Which visits a query looks at.
///
/// The caller has already checked that the requester may see this scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every link created by this owner
    Owner(String),
    /// A single link, addressed by short code
    Resource(String),
}

impl Scope {
    /// Column of `urls` the scope filters on
    pub fn column(&self) -> &'static str {
        match self {
            Scope::Owner(_) => "u.created_by",
            Scope::Resource(_) => "u.short_code",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Scope::Owner(owner) => owner,
            Scope::Resource(short_code) => short_code,
        }
    }
}

/// Categorical attribute of a visit used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Device,
    Platform,
    Referrer,
    Browser,
    Country,
}

impl Dimension {
    /// Column of `visits` holding this dimension
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Device => "v.device",
            Dimension::Platform => "v.platform",
            Dimension::Referrer => "v.referrer",
            Dimension::Browser => "v.browser",
            Dimension::Country => "v.country",
        }
    }
}

/// Half-open range `[start, end)` over visit timestamps (Unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Every visit ever recorded
    pub fn all_time() -> Self {
        Self::new(i64::MIN, i64::MAX)
    }

    /// Everything at or after `start`
    pub fn since(start: i64) -> Self {
        Self::new(start, i64::MAX)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Read-only queries over the visit log.
///
/// Every method filters by `scope` and by `range` on the visit's
/// `created_at`. Implementations never write.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Look up a link by short code
    async fn find_resource(&self, short_code: &str) -> StorageResult<Option<ShortenedUrl>>;

    /// Number of visits
    async fn count_in_range(&self, scope: &Scope, range: TimeRange) -> StorageResult<i64>;

    /// Number of distinct source IPs
    async fn count_distinct_ips(&self, scope: &Scope, range: TimeRange) -> StorageResult<i64>;

    /// Number of distinct source IPs that visited more than once
    async fn count_return_visitors(&self, scope: &Scope, range: TimeRange)
        -> StorageResult<i64>;

    /// Number of visits whose `dimension` equals `value` exactly
    async fn count_matching(
        &self,
        scope: &Scope,
        range: TimeRange,
        dimension: Dimension,
        value: &str,
    ) -> StorageResult<i64>;

    /// The `limit` most frequent values of `dimension`, by visits descending
    /// and then by value ascending
    async fn top_by_dimension(
        &self,
        scope: &Scope,
        range: TimeRange,
        dimension: Dimension,
        limit: i64,
    ) -> StorageResult<Vec<DimensionCount>>;

    /// Visits per UTC day, ascending. Days without visits are absent.
    async fn daily_counts(&self, scope: &Scope, range: TimeRange)
        -> StorageResult<Vec<DailyCount>>;

    /// Visits and distinct IPs per (country, link) pair of an owner, ordered
    /// by country, then visits descending, then short code
    async fn country_resource_visits(
        &self,
        owner: &str,
        range: TimeRange,
    ) -> StorageResult<Vec<CountryResourceVisits>>;
}
