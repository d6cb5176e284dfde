//! Owner dashboard: every link of one owner over the rolling window

use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::analytics::dimension::DimensionAggregator;
use crate::analytics::models::{CountryHighlight, MainStats, NamedCount, OwnerReport};
use crate::analytics::window::{ReportWindows, WindowCounts};
use crate::config::ReportConfig;
use crate::models::CountryResourceVisits;
use crate::storage::{Dimension, Scope, StorageResult, VisitStore};

pub struct OwnerReportBuilder {
    store: Arc<dyn VisitStore>,
    config: ReportConfig,
}

impl OwnerReportBuilder {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self::with_config(store, ReportConfig::default())
    }

    pub fn with_config(store: Arc<dyn VisitStore>, config: ReportConfig) -> Self {
        Self { store, config }
    }

    /// Windows for a report generated at `report_time`
    pub fn windows(&self, report_time: DateTime<Utc>) -> ReportWindows {
        ReportWindows::new(report_time, self.config.window_days)
    }

    pub async fn build(&self, owner: &str) -> StorageResult<OwnerReport> {
        self.build_at(owner, Utc::now()).await
    }

    /// Build the dashboard with every window anchored to `report_time`.
    ///
    /// An owner without links or visits gets a zeroed report.
    pub async fn build_at(
        &self,
        owner: &str,
        report_time: DateTime<Utc>,
    ) -> StorageResult<OwnerReport> {
        let windows = self.windows(report_time);
        debug!(owner, %report_time, "Building owner report");

        let (main_stats, top_devices, top_platforms, top_referrers, top_countries) =
            tokio::try_join!(
                self.main_stats(owner, &windows),
                self.top_devices(owner, &windows),
                self.top_platforms(owner, &windows),
                self.top_referrers(owner, &windows),
                self.top_countries(owner, &windows),
            )?;

        Ok(OwnerReport {
            owner: owner.to_string(),
            generated_at: report_time,
            main_stats,
            top_devices,
            top_platforms,
            top_referrers,
            top_countries,
        })
    }

    /// Visits, unique visitors, top country and top referrer with growth
    pub async fn main_stats(
        &self,
        owner: &str,
        windows: &ReportWindows,
    ) -> StorageResult<MainStats> {
        let scope = Scope::Owner(owner.to_string());
        let store = self.store.as_ref();
        let aggregator = DimensionAggregator::new(store);

        let (visits, unique_visitors, top_country, top_referrer) = tokio::try_join!(
            WindowCounts::collect(windows, |range| store.count_in_range(&scope, range)),
            WindowCounts::collect(windows, |range| store.count_distinct_ips(&scope, range)),
            aggregator.top_with_growth(&scope, windows, Dimension::Country, "Top country"),
            aggregator.top_with_growth(&scope, windows, Dimension::Referrer, "Top referrer"),
        )?;

        Ok(MainStats {
            visits: visits.into_metric("Visits"),
            unique_visitors: unique_visitors.into_metric("Unique visits"),
            top_country,
            top_referrer,
        })
    }

    pub async fn top_devices(
        &self,
        owner: &str,
        windows: &ReportWindows,
    ) -> StorageResult<Vec<NamedCount>> {
        self.top_list(owner, windows, Dimension::Device).await
    }

    pub async fn top_platforms(
        &self,
        owner: &str,
        windows: &ReportWindows,
    ) -> StorageResult<Vec<NamedCount>> {
        self.top_list(owner, windows, Dimension::Platform).await
    }

    pub async fn top_referrers(
        &self,
        owner: &str,
        windows: &ReportWindows,
    ) -> StorageResult<Vec<NamedCount>> {
        self.top_list(owner, windows, Dimension::Referrer).await
    }

    /// Countries of the current window, each with the owner's link it sent
    /// the most visits to
    pub async fn top_countries(
        &self,
        owner: &str,
        windows: &ReportWindows,
    ) -> StorageResult<Vec<CountryHighlight>> {
        let rows = self
            .store
            .country_resource_visits(owner, windows.current)
            .await?;

        Ok(pick_top_countries(rows, self.config.top_countries as usize))
    }

    async fn top_list(
        &self,
        owner: &str,
        windows: &ReportWindows,
        dimension: Dimension,
    ) -> StorageResult<Vec<NamedCount>> {
        let scope = Scope::Owner(owner.to_string());
        DimensionAggregator::new(self.store.as_ref())
            .top_list(&scope, windows.current, dimension, self.config.owner_top_n)
            .await
    }
}

/// Keep the most visited link per country, order by country name
/// descending and keep at most `limit` countries.
///
/// Equal visit counts within a country go to the smaller short code.
pub fn pick_top_countries(rows: Vec<CountryResourceVisits>, limit: usize) -> Vec<CountryHighlight> {
    let mut best: BTreeMap<String, CountryResourceVisits> = BTreeMap::new();

    for row in rows {
        match best.entry(row.country.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get();
                if row.visits > current.visits
                    || (row.visits == current.visits && row.short_code < current.short_code)
                {
                    slot.insert(row);
                }
            }
        }
    }

    best.into_values()
        .rev()
        .take(limit)
        .map(CountryHighlight::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        country: &str,
        short_code: &str,
        visits: i64,
        unique_visitors: i64,
    ) -> CountryResourceVisits {
        CountryResourceVisits {
            country: country.to_string(),
            short_code: short_code.to_string(),
            visits,
            unique_visitors,
        }
    }

    #[test]
    fn test_pick_most_visited_link_per_country() {
        let rows = vec![
            row("Brazil", "b", 3, 2),
            row("Brazil", "a", 9, 4),
            row("Chile", "a", 1, 1),
            row("Chile", "c", 5, 5),
        ];

        let picked = pick_top_countries(rows, 6);

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].country, "Chile");
        assert_eq!(picked[0].most_visited_resource_key, "c");
        assert_eq!(picked[0].visits, 5);
        assert_eq!(picked[1].country, "Brazil");
        assert_eq!(picked[1].most_visited_resource_key, "a");
        assert_eq!(picked[1].unique_visitors, 4);
    }

    #[test]
    fn test_pick_breaks_ties_by_short_code() {
        let picked = pick_top_countries(vec![row("Peru", "zz", 4, 1), row("Peru", "aa", 4, 3)], 6);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].most_visited_resource_key, "aa");
    }

    #[test]
    fn test_pick_respects_limit() {
        let rows = ["Angola", "Benin", "Chad", "Egypt", "Gabon", "Ghana", "Kenya", "Mali"]
            .iter()
            .map(|country| row(country, "x", 1, 1))
            .collect();

        let picked = pick_top_countries(rows, 6);

        assert_eq!(picked.len(), 6);
        let names: Vec<&str> = picked.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["Mali", "Kenya", "Ghana", "Gabon", "Egypt", "Chad"]);
    }

    #[test]
    fn test_pick_empty() {
        assert!(pick_top_countries(Vec::new(), 6).is_empty());
    }
}
