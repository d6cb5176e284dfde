//! Ranking of dimension values

use crate::analytics::models::{MetricResult, MetricValue, NamedCount};
use crate::analytics::window::{ReportWindows, WindowCounts};
use crate::storage::{Dimension, Scope, StorageResult, TimeRange, VisitStore};

/// Groups visits of a scope by one dimension
pub struct DimensionAggregator<'a> {
    store: &'a dyn VisitStore,
}

impl<'a> DimensionAggregator<'a> {
    pub fn new(store: &'a dyn VisitStore) -> Self {
        Self { store }
    }

    /// The most frequent value in the current window, with its own growth
    /// over the previous window.
    ///
    /// Growth compares visits that match the winning value exactly. With no
    /// visits in the current window the value is [`NOT_DETERMINED`].
    ///
    /// [`NOT_DETERMINED`]: crate::analytics::models::NOT_DETERMINED
    pub async fn top_with_growth(
        &self,
        scope: &Scope,
        windows: &ReportWindows,
        dimension: Dimension,
        title: &str,
    ) -> StorageResult<MetricResult> {
        let top = self
            .store
            .top_by_dimension(scope, windows.current, dimension, 1)
            .await?
            .into_iter()
            .next();

        let Some(top) = top else {
            return Ok(MetricResult {
                title: title.to_string(),
                value: MetricValue::not_determined(),
                difference_percent: 0.0,
            });
        };

        let counts = WindowCounts::collect(windows, |range| {
            self.store.count_matching(scope, range, dimension, &top.name)
        })
        .await?;

        Ok(MetricResult {
            title: title.to_string(),
            difference_percent: counts.growth(),
            value: MetricValue::Label(top.name),
        })
    }

    /// Up to `limit` values by visits descending
    pub async fn top_list(
        &self,
        scope: &Scope,
        range: TimeRange,
        dimension: Dimension,
        limit: u32,
    ) -> StorageResult<Vec<NamedCount>> {
        let rows = self
            .store
            .top_by_dimension(scope, range, dimension, i64::from(limit))
            .await?;

        Ok(rows.into_iter().map(NamedCount::from).collect())
    }
}
