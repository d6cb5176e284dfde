use crate::models::{CountryResourceVisits, DailyCount, DimensionCount, ShortenedUrl};
use crate::storage::{Dimension, Scope, StorageResult, TimeRange, VisitStore};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }
}

/// `FROM .. WHERE ..` shared by every scoped query.
/// Binds: ?1 scope key, ?2 range start, ?3 range end.
fn scoped(scope: &Scope) -> String {
    format!(
        r#"
        FROM visits v
        INNER JOIN urls u ON v.url_id = u.id
        WHERE {} = ?1 AND v.created_at >= ?2 AND v.created_at < ?3
        "#,
        scope.column()
    )
}

#[async_trait]
impl VisitStore for SqliteStorage {
    async fn find_resource(&self, short_code: &str) -> StorageResult<Option<ShortenedUrl>> {
        let url = sqlx::query_as::<_, ShortenedUrl>(
            r#"
            SELECT id, short_code, original_url, created_at, created_by, clicks, is_active
            FROM urls
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn count_in_range(&self, scope: &Scope, range: TimeRange) -> StorageResult<i64> {
        let sql = format!("SELECT COUNT(*) {}", scoped(scope));
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_distinct_ips(&self, scope: &Scope, range: TimeRange) -> StorageResult<i64> {
        let sql = format!("SELECT COUNT(DISTINCT v.ip) {}", scoped(scope));
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_return_visitors(
        &self,
        scope: &Scope,
        range: TimeRange,
    ) -> StorageResult<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*) FROM (
                SELECT v.ip {}
                GROUP BY v.ip
                HAVING COUNT(*) > 1
            ) AS repeat_ips
            "#,
            scoped(scope)
        );
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_matching(
        &self,
        scope: &Scope,
        range: TimeRange,
        dimension: Dimension,
        value: &str,
    ) -> StorageResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) {} AND {} = ?4",
            scoped(scope),
            dimension.column()
        );
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .bind(value)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn top_by_dimension(
        &self,
        scope: &Scope,
        range: TimeRange,
        dimension: Dimension,
        limit: i64,
    ) -> StorageResult<Vec<DimensionCount>> {
        let column = dimension.column();
        let sql = format!(
            r#"
            SELECT {column} AS name, COUNT(*) AS visits
            {}
            GROUP BY {column}
            ORDER BY visits DESC, name ASC
            LIMIT ?4
            "#,
            scoped(scope)
        );
        let rows = sqlx::query_as::<_, DimensionCount>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn daily_counts(
        &self,
        scope: &Scope,
        range: TimeRange,
    ) -> StorageResult<Vec<DailyCount>> {
        let sql = format!(
            r#"
            SELECT (v.created_at / 86400) * 86400 AS day_start, COUNT(*) AS visits
            {}
            GROUP BY day_start
            ORDER BY day_start ASC
            "#,
            scoped(scope)
        );
        let rows = sqlx::query_as::<_, DailyCount>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn country_resource_visits(
        &self,
        owner: &str,
        range: TimeRange,
    ) -> StorageResult<Vec<CountryResourceVisits>> {
        let scope = Scope::Owner(owner.to_string());
        let sql = format!(
            r#"
            SELECT v.country AS country,
                   u.short_code AS short_code,
                   COUNT(*) AS visits,
                   COUNT(DISTINCT v.ip) AS unique_visitors
            {}
            GROUP BY v.country, u.short_code
            ORDER BY v.country ASC, visits DESC, u.short_code ASC
            "#,
            scoped(&scope)
        );
        let rows = sqlx::query_as::<_, CountryResourceVisits>(&sql)
            .bind(scope.key())
            .bind(range.start)
            .bind(range.end)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }
}
