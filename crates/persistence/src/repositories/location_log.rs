//! Asset location log repository.
//!
//! The ingestion path runs inside one transaction per batch; the methods
//! taking a `PgConnection` are meant to be called with that transaction so
//! the whole batch commits or rolls back together.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::entities::{LogHistoryEntity, LogWithNamesEntity, LocationLogEntity};

const LOG_COLUMNS: &str = "id, asset_id, location_id, rssi, kalman_rssi, estimated_distance, \
                           log_type, status, reader_name, created_at, updated_at";

/// Input for inserting a new log row.
#[derive(Debug, Clone)]
pub struct NewLocationLog<'a> {
    pub asset_id: i64,
    pub location_id: i64,
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub log_type: &'a str,
    pub status: &'a str,
    pub reader_name: &'a str,
}

/// Repository for asset location log operations.
#[derive(Clone)]
pub struct LocationLogRepository {
    pool: PgPool,
}

impl LocationLogRepository {
    /// Creates a new LocationLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The most recent log row for the (asset, location, status, type)
    /// tuple whose `updated_at` is at or after the cutoff, locked
    /// `FOR UPDATE` so concurrent ingestion of the same tuple serializes on
    /// the amend-vs-create decision.
    pub async fn find_recent_for_update(
        conn: &mut PgConnection,
        asset_id: i64,
        location_id: i64,
        status: &str,
        log_type: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<LocationLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationLogEntity>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM asset_location_logs
            WHERE asset_id = $1 AND location_id = $2 AND status = $3
              AND log_type = $4 AND updated_at >= $5
            ORDER BY updated_at DESC
            LIMIT 1
            FOR UPDATE
            "#
        ))
        .bind(asset_id)
        .bind(location_id)
        .bind(status)
        .bind(log_type)
        .bind(cutoff)
        .fetch_optional(conn)
        .await
    }

    /// Insert a new log row on the ingestion transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        log: NewLocationLog<'_>,
    ) -> Result<LocationLogEntity, sqlx::Error> {
        sqlx::query_as::<_, LocationLogEntity>(&format!(
            r#"
            INSERT INTO asset_location_logs
                (asset_id, location_id, rssi, kalman_rssi, estimated_distance,
                 log_type, status, reader_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(log.asset_id)
        .bind(log.location_id)
        .bind(log.rssi)
        .bind(log.kalman_rssi)
        .bind(log.estimated_distance)
        .bind(log.log_type)
        .bind(log.status)
        .bind(log.reader_name)
        .fetch_one(conn)
        .await
    }

    /// Amend the live row in place: refresh its metrics and bump
    /// `updated_at`, preserving the row id and original `reader_name`.
    pub async fn amend(
        conn: &mut PgConnection,
        id: i64,
        rssi: Option<f64>,
        kalman_rssi: Option<f64>,
        estimated_distance: Option<f64>,
    ) -> Result<LocationLogEntity, sqlx::Error> {
        sqlx::query_as::<_, LocationLogEntity>(&format!(
            r#"
            UPDATE asset_location_logs
            SET rssi = $2, kalman_rssi = $3, estimated_distance = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(rssi)
        .bind(kalman_rssi)
        .bind(estimated_distance)
        .fetch_one(conn)
        .await
    }

    /// One page of an asset's log history, newest first, using a composite
    /// (updated_at, id) keyset cursor. Returns the page and whether more
    /// rows remain.
    pub async fn history_page(
        &self,
        asset_id: i64,
        cursor: Option<(DateTime<Utc>, i64)>,
        limit: i64,
    ) -> Result<(Vec<LogHistoryEntity>, bool), sqlx::Error> {
        // Fetch one extra row to learn whether another page exists.
        let rows = match cursor {
            Some((cursor_ts, cursor_id)) => {
                sqlx::query_as::<_, LogHistoryEntity>(
                    r#"
                    SELECT l.id, loc.name AS location_name, l.log_type, l.status,
                           l.rssi, l.kalman_rssi, l.estimated_distance,
                           l.reader_name, l.created_at, l.updated_at
                    FROM asset_location_logs l
                    LEFT JOIN locations loc ON loc.id = l.location_id
                    WHERE l.asset_id = $1 AND (l.updated_at, l.id) < ($2, $3)
                    ORDER BY l.updated_at DESC, l.id DESC
                    LIMIT $4
                    "#,
                )
                .bind(asset_id)
                .bind(cursor_ts)
                .bind(cursor_id)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LogHistoryEntity>(
                    r#"
                    SELECT l.id, loc.name AS location_name, l.log_type, l.status,
                           l.rssi, l.kalman_rssi, l.estimated_distance,
                           l.reader_name, l.created_at, l.updated_at
                    FROM asset_location_logs l
                    LEFT JOIN locations loc ON loc.id = l.location_id
                    WHERE l.asset_id = $1
                    ORDER BY l.updated_at DESC, l.id DESC
                    LIMIT $2
                    "#,
                )
                .bind(asset_id)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let has_more = rows.len() as i64 > limit;
        let mut rows = rows;
        rows.truncate(limit as usize);
        Ok((rows, has_more))
    }

    /// The most recently updated log row for an asset, if any.
    pub async fn latest_for_asset(
        &self,
        asset_id: i64,
    ) -> Result<Option<LocationLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationLogEntity>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM asset_location_logs
            WHERE asset_id = $1
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Total log count.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM asset_location_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Logs created since the cutoff.
    pub async fn count_created_since(&self, cutoff: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM asset_location_logs WHERE created_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    /// The most recently updated logs with asset and location names joined
    /// in, for the dashboard table.
    pub async fn recent_with_names(
        &self,
        limit: i64,
    ) -> Result<Vec<LogWithNamesEntity>, sqlx::Error> {
        sqlx::query_as::<_, LogWithNamesEntity>(
            r#"
            SELECT l.id, l.asset_id, a.name AS asset_name, loc.name AS location_name,
                   l.log_type, l.status, l.rssi, l.kalman_rssi,
                   l.estimated_distance, l.reader_name, l.updated_at
            FROM asset_location_logs l
            LEFT JOIN assets a ON a.id = l.asset_id
            LEFT JOIN locations loc ON loc.id = l.location_id
            ORDER BY l.updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
