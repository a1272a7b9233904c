//! Reader repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::{ReaderEntity, ReaderTagEntity};

const READER_COLUMNS: &str = "id, name, location_id, active, discovery_mode, config, \
                              config_fetched_at, created_at, updated_at";

/// Repository for reader-related database operations.
#[derive(Clone)]
pub struct ReaderRepository {
    pool: PgPool,
}

impl ReaderRepository {
    /// Creates a new ReaderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a reader by its unique name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ReaderEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReaderEntity>(&format!(
            "SELECT {READER_COLUMNS} FROM readers WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a reader by its id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ReaderEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReaderEntity>(&format!(
            "SELECT {READER_COLUMNS} FROM readers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All readers ordered by name.
    pub async fn find_all(&self) -> Result<Vec<ReaderEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReaderEntity>(&format!(
            "SELECT {READER_COLUMNS} FROM readers ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Insert a reader.
    pub async fn insert(
        &self,
        name: &str,
        location_id: i64,
        active: bool,
        discovery_mode: &str,
        config: Option<&serde_json::Value>,
    ) -> Result<ReaderEntity, sqlx::Error> {
        sqlx::query_as::<_, ReaderEntity>(&format!(
            r#"
            INSERT INTO readers (name, location_id, active, discovery_mode, config)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {READER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(location_id)
        .bind(active)
        .bind(discovery_mode)
        .bind(config)
        .fetch_one(&self.pool)
        .await
    }

    /// Update a reader. Bumps `updated_at`, which also bumps the config
    /// version served to the device. Returns None if the reader is gone.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        location_id: i64,
        active: bool,
        discovery_mode: &str,
        config: Option<&serde_json::Value>,
    ) -> Result<Option<ReaderEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReaderEntity>(&format!(
            r#"
            UPDATE readers
            SET name = $2, location_id = $3, active = $4, discovery_mode = $5,
                config = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {READER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(location_id)
        .bind(active)
        .bind(discovery_mode)
        .bind(config)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a reader. Tag associations cascade.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM readers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Replace the reader's explicit scan targets with the given tag set.
    pub async fn sync_tags(&self, reader_id: i64, tag_ids: &[i64]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM reader_tags WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tag_ids {
            sqlx::query(
                r#"
                INSERT INTO reader_tags (reader_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(reader_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// The reader's associated tags with their asset names, for listings.
    pub async fn tag_infos(&self, reader_id: i64) -> Result<Vec<ReaderTagEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReaderTagEntity>(
            r#"
            SELECT t.id, t.name, a.name AS asset_name
            FROM reader_tags rt
            JOIN tags t ON t.id = rt.tag_id
            LEFT JOIN assets a ON a.tag_id = t.id
            WHERE rt.reader_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Names of the reader's associated tags (the scan target list).
    pub async fn tag_names(&self, reader_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT t.name
            FROM reader_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.reader_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Stamp the time the reader last fetched its full config (last-seen
    /// proxy). Deliberately does not touch `updated_at`: fetching config
    /// must not bump the config version.
    pub async fn touch_config_fetched(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE readers SET config_fetched_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Total reader count.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readers")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Readers that have reported at least one log since the cutoff.
    pub async fn count_reporting_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM readers r
            WHERE EXISTS (
                SELECT 1 FROM asset_location_logs l
                WHERE l.reader_name = r.name AND l.updated_at >= $1
            )
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
