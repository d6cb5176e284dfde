//! Shared fixtures: the read schema the visit recorder maintains, and
//! helpers to seed links and visits relative to a pinned report time.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use lynx_insights::storage::{PostgresStorage, SqliteStorage, VisitStore};
use sqlx::{PgPool, SqlitePool};
use std::sync::Arc;

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS urls (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        short_code TEXT NOT NULL UNIQUE,
        original_url TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        created_by TEXT,
        clicks INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS visits (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url_id INTEGER NOT NULL REFERENCES urls(id) ON DELETE CASCADE,
        ip TEXT NOT NULL,
        device TEXT NOT NULL,
        platform TEXT NOT NULL,
        browser TEXT NOT NULL,
        referrer TEXT NOT NULL,
        country TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_visits_url_created ON visits(url_id, created_at)",
];

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS urls (
        id BIGSERIAL PRIMARY KEY,
        short_code TEXT NOT NULL UNIQUE,
        original_url TEXT NOT NULL,
        created_at BIGINT NOT NULL,
        created_by TEXT,
        clicks BIGINT NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS visits (
        id BIGSERIAL PRIMARY KEY,
        url_id BIGINT NOT NULL REFERENCES urls(id) ON DELETE CASCADE,
        ip TEXT NOT NULL,
        device TEXT NOT NULL,
        platform TEXT NOT NULL,
        browser TEXT NOT NULL,
        referrer TEXT NOT NULL,
        country TEXT NOT NULL,
        created_at BIGINT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_visits_url_created ON visits(url_id, created_at)",
];

/// Instant every test report is generated at
pub fn report_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Unix timestamp `days` and `hours` before the report time
pub fn ago(days: i64, hours: i64) -> i64 {
    (report_time() - Duration::days(days) - Duration::hours(hours)).timestamp()
}

/// Referrer the visit recorder stores when a visit has no referring site
pub const DIRECT_REFERRER: &str = "direct search";

/// One row of `visits` as the visit recorder writes it
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub url_id: i64,
    pub ip: String,
    pub device: String,
    pub platform: String,
    pub browser: String,
    pub referrer: String,
    pub country: String,
    /// Unix seconds, UTC
    pub created_at: i64,
}

/// A desktop visit from Brazil with no referrer
pub fn visit(url_id: i64, ip: &str, created_at: i64) -> VisitEvent {
    VisitEvent {
        url_id,
        ip: ip.to_string(),
        device: "desktop".to_string(),
        platform: "Linux".to_string(),
        browser: "Firefox".to_string(),
        referrer: DIRECT_REFERRER.to_string(),
        country: "Brazil".to_string(),
        created_at,
    }
}

/// Seeds the visit log through the backend's own pool
pub enum Fixture {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Fixture {
    pub async fn create_schema(&self) {
        match self {
            Fixture::Sqlite(pool) => {
                for statement in SQLITE_SCHEMA {
                    sqlx::query(statement).execute(pool).await.unwrap();
                }
            }
            Fixture::Postgres(pool) => {
                for statement in POSTGRES_SCHEMA {
                    sqlx::query(statement).execute(pool).await.unwrap();
                }
            }
        }
    }

    /// Insert a link and return its id
    pub async fn insert_url(&self, short_code: &str, owner: &str) -> i64 {
        let created_at = ago(365, 0);
        let original_url = format!("https://example.com/{short_code}");

        match self {
            Fixture::Sqlite(pool) => sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO urls (short_code, original_url, created_at, created_by)
                VALUES (?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(short_code)
            .bind(&original_url)
            .bind(created_at)
            .bind(owner)
            .fetch_one(pool)
            .await
            .unwrap(),
            Fixture::Postgres(pool) => sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO urls (short_code, original_url, created_at, created_by)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(short_code)
            .bind(&original_url)
            .bind(created_at)
            .bind(owner)
            .fetch_one(pool)
            .await
            .unwrap(),
        }
    }

    pub async fn insert_visit(&self, event: &VisitEvent) {
        match self {
            Fixture::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO visits
                        (url_id, ip, device, platform, browser, referrer, country, created_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(event.url_id)
                .bind(&event.ip)
                .bind(&event.device)
                .bind(&event.platform)
                .bind(&event.browser)
                .bind(&event.referrer)
                .bind(&event.country)
                .bind(event.created_at)
                .execute(pool)
                .await
                .unwrap();
            }
            Fixture::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO visits
                        (url_id, ip, device, platform, browser, referrer, country, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(event.url_id)
                .bind(&event.ip)
                .bind(&event.device)
                .bind(&event.platform)
                .bind(&event.browser)
                .bind(&event.referrer)
                .bind(&event.country)
                .bind(event.created_at)
                .execute(pool)
                .await
                .unwrap();
            }
        }
    }

    pub async fn insert_visits(&self, events: &[VisitEvent]) {
        for event in events {
            self.insert_visit(event).await;
        }
    }

    /// The same visit `times` times
    pub async fn insert_repeated(&self, event: &VisitEvent, times: usize) {
        for _ in 0..times {
            self.insert_visit(event).await;
        }
    }
}

/// Single-connection in-memory SQLite store with the schema in place
pub async fn sqlite_store() -> (Arc<dyn VisitStore>, Fixture) {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    let fixture = Fixture::Sqlite(storage.pool().clone());
    fixture.create_schema().await;
    (Arc::new(storage), fixture)
}

/// PostgreSQL store from `DATABASE_URL`, if one is configured
pub async fn postgres_store() -> Option<(Arc<dyn VisitStore>, Fixture)> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    if !db_url.starts_with("postgres") {
        return None;
    }
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    let fixture = Fixture::Postgres(storage.pool().clone());
    fixture.create_schema().await;
    Some((Arc::new(storage), fixture))
}

/// Suffix that keeps codes and owners unique across runs on a shared database
pub fn unique_suffix() -> String {
    format!(
        "{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}
