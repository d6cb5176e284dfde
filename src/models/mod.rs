pub mod stats;
pub mod url;

pub use stats::{CountryResourceVisits, DailyCount, DimensionCount};
pub use url::ShortenedUrl;
