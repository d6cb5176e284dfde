//! Lifetime report of a single link

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::analytics::dimension::DimensionAggregator;
use crate::analytics::models::{DailyVisits, NamedCount, ResourceReport};
use crate::analytics::series::{day_start, fill_daily_series};
use crate::config::ReportConfig;
use crate::storage::{Dimension, Scope, StorageError, StorageResult, TimeRange, VisitStore};

/// Visit totals over a link's entire history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainCounters {
    pub visits: i64,
    pub unique_visitors: i64,
    /// Distinct IPs seen more than once
    pub return_visitors: i64,
}

pub struct ResourceReportBuilder {
    store: Arc<dyn VisitStore>,
    config: ReportConfig,
}

impl ResourceReportBuilder {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self::with_config(store, ReportConfig::default())
    }

    pub fn with_config(store: Arc<dyn VisitStore>, config: ReportConfig) -> Self {
        Self { store, config }
    }

    pub async fn build(&self, short_code: &str) -> StorageResult<Option<ResourceReport>> {
        self.build_at(short_code, Utc::now()).await
    }

    /// Build the report for `short_code` as of `report_time`.
    ///
    /// Returns `None` when no such link exists. A link without visits gets a
    /// zeroed report with a series of zero days.
    pub async fn build_at(
        &self,
        short_code: &str,
        report_time: DateTime<Utc>,
    ) -> StorageResult<Option<ResourceReport>> {
        let Some(resource) = self.store.find_resource(short_code).await? else {
            debug!(short_code, "No link found for report");
            return Ok(None);
        };
        debug!(short_code, %report_time, "Building link report");

        let scope = Scope::Resource(resource.short_code);
        let all_time = TimeRange::all_time();
        let limit = self.config.resource_top_n;
        let aggregator = DimensionAggregator::new(self.store.as_ref());

        let (
            counters,
            devices,
            platforms,
            referrers,
            browsers,
            visits_by_country,
            more_active_days,
            daily_performance,
        ) = tokio::try_join!(
            self.main_counters(&scope),
            aggregator.top_list(&scope, all_time, Dimension::Device, limit),
            aggregator.top_list(&scope, all_time, Dimension::Platform, limit),
            aggregator.top_list(&scope, all_time, Dimension::Referrer, limit),
            aggregator.top_list(&scope, all_time, Dimension::Browser, limit),
            aggregator.top_list(&scope, all_time, Dimension::Country, limit),
            self.more_active_days(&scope),
            self.daily_performance(&scope, report_time),
        )?;

        Ok(Some(ResourceReport {
            short_code: scope.key().to_string(),
            generated_at: report_time,
            visits: counters.visits,
            unique_visitors: counters.unique_visitors,
            return_visitors: counters.return_visitors,
            devices,
            platforms,
            referrers,
            browsers,
            visits_by_country,
            more_active_days,
            daily_performance,
        }))
    }

    pub async fn main_counters(&self, scope: &Scope) -> StorageResult<MainCounters> {
        let all_time = TimeRange::all_time();
        let (visits, unique_visitors, return_visitors) = tokio::try_join!(
            self.store.count_in_range(scope, all_time),
            self.store.count_distinct_ips(scope, all_time),
            self.store.count_return_visitors(scope, all_time),
        )?;

        Ok(MainCounters {
            visits,
            unique_visitors,
            return_visitors,
        })
    }

    /// Visits per day over the whole history, in day order
    pub async fn more_active_days(&self, scope: &Scope) -> StorageResult<Vec<DailyVisits>> {
        self.store
            .daily_counts(scope, TimeRange::all_time())
            .await?
            .into_iter()
            .map(|row| {
                day_start(row.day_start).map(|timestamp| DailyVisits {
                    timestamp,
                    count: row.visits,
                })
            })
            .collect()
    }

    /// Gap-filled visits for the last `series_days` calendar days up to the
    /// report date
    pub async fn daily_performance(
        &self,
        scope: &Scope,
        report_time: DateTime<Utc>,
    ) -> StorageResult<Vec<NamedCount>> {
        let days = self.config.series_days;
        let since = report_time
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                StorageError::InvalidRange(format!("{days} days before {report_time}"))
            })?;

        let counts = self
            .store
            .daily_counts(scope, TimeRange::since(since.timestamp()))
            .await?
            .into_iter()
            .map(|row| day_start(row.day_start).map(|day| (day.date_naive(), row.visits)))
            .collect::<StorageResult<Vec<_>>>()?;

        fill_daily_series(report_time.date_naive(), days, counts)
    }
}
