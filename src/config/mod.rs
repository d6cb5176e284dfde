use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub reports: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

/// Longest window or series, in days, a report may span
pub const MAX_REPORT_DAYS: u32 = 3650;

/// Shape of the generated reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Length of the current and of the previous comparison window
    pub window_days: u32,
    /// Length of the gap-filled daily series on link reports
    pub series_days: u32,
    /// Entries per breakdown list on owner dashboards
    pub owner_top_n: u32,
    /// Entries per breakdown list on link reports
    pub resource_top_n: u32,
    /// Countries listed in an owner's top countries
    pub top_countries: u32,
}

impl DatabaseConfig {
    const fn default_max_connections() -> u32 {
        5
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            series_days: 7,
            owner_top_n: 4,
            resource_top_n: 5,
            top_countries: 6,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            window_days: days_from_env("REPORT_WINDOW_DAYS", defaults.window_days)?,
            series_days: days_from_env("REPORT_SERIES_DAYS", defaults.series_days)?,
            owner_top_n: positive_from_env("REPORT_OWNER_TOP_N", defaults.owner_top_n)?,
            resource_top_n: positive_from_env("REPORT_RESOURCE_TOP_N", defaults.resource_top_n)?,
            top_countries: positive_from_env("REPORT_TOP_COUNTRIES", defaults.top_countries)?,
        })
    }
}

fn positive_from_env(name: &str, default: u32) -> anyhow::Result<u32> {
    parse_positive(name, std::env::var(name).ok().as_deref(), default)
}

fn days_from_env(name: &str, default: u32) -> anyhow::Result<u32> {
    parse_days(name, std::env::var(name).ok().as_deref(), default)
}

/// Parse an optional day count in `1..=MAX_REPORT_DAYS`
fn parse_days(name: &str, raw: Option<&str>, default: u32) -> anyhow::Result<u32> {
    let days = parse_positive(name, raw, default)?;
    if days > MAX_REPORT_DAYS {
        bail!("{name} must be at most {MAX_REPORT_DAYS} days, got {days}");
    }

    Ok(days)
}

/// Parse an optional setting that must be a positive integer
fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> anyhow::Result<u32> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<u32>()
        .with_context(|| format!("{name} must be a positive integer, got '{raw}'"))?;

    if value == 0 {
        bail!("{name} must be greater than zero");
    }

    Ok(value)
}

fn parse_backend(raw: &str) -> DatabaseBackend {
    match raw.to_lowercase().as_str() {
        "postgres" | "postgresql" => DatabaseBackend::Postgres,
        "sqlite" => DatabaseBackend::Sqlite,
        other => {
            tracing::warn!(
                "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. \
                 Supported values: sqlite, postgres"
            );
            DatabaseBackend::Sqlite
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());
        let backend = parse_backend(&backend_str);

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./lynx.db".to_string());

        let max_connections = positive_from_env(
            "DATABASE_MAX_CONNECTIONS",
            DatabaseConfig::default_max_connections(),
        )?;

        let reports = ReportConfig::from_env().context("invalid report settings")?;

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            reports,
        })
    }
}
