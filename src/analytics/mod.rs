//! Dashboard analytics over the visit log
//!
//! Two reports are built on top of a [`VisitStore`](crate::storage::VisitStore):
//!
//! - [`OwnerReportBuilder`]: every link of one owner, comparing the last
//!   30 days against the 30 days before them.
//! - [`ResourceReportBuilder`]: the whole history of one link plus a
//!   gap-filled series of its last 7 days.
//!
//! Each build captures its report time once and passes it down, so every
//! window of a report shares the same anchor.

pub mod dimension;
pub mod models;
pub mod owner_report;
pub mod resource_report;
pub mod series;
pub mod window;

pub use dimension::DimensionAggregator;
pub use models::{
    CountryHighlight, DailyVisits, MainStats, MetricResult, MetricValue, NamedCount, OwnerReport,
    ResourceReport, NOT_DETERMINED,
};
pub use owner_report::{pick_top_countries, OwnerReportBuilder};
pub use resource_report::{MainCounters, ResourceReportBuilder};
pub use series::fill_daily_series;
pub use window::{compare, ReportWindows, WindowCounts};
