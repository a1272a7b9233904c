//! Asset repository for database operations.

use sqlx::{PgConnection, PgPool};

use crate::entities::{AssetEntity, AssetSummaryEntity};

const ASSET_COLUMNS: &str = "id, name, asset_type, location_id, tag_id, created_at, updated_at";

/// Repository for asset-related database operations.
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Creates a new AssetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an asset by its id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AssetEntity>, sqlx::Error> {
        sqlx::query_as::<_, AssetEntity>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Resolve the asset whose associated tag broadcasts the given name.
    ///
    /// None is not an error: it means the device is not registered.
    pub async fn find_by_tag_name(
        &self,
        tag_name: &str,
    ) -> Result<Option<AssetEntity>, sqlx::Error> {
        sqlx::query_as::<_, AssetEntity>(
            r#"
            SELECT a.id, a.name, a.asset_type, a.location_id, a.tag_id,
                   a.created_at, a.updated_at
            FROM assets a
            JOIN tags t ON t.id = a.tag_id
            WHERE t.name = $1
            "#,
        )
        .bind(tag_name)
        .fetch_optional(&self.pool)
        .await
    }

    /// All assets with tag and location names joined in, ordered by name.
    pub async fn find_all_summaries(&self) -> Result<Vec<AssetSummaryEntity>, sqlx::Error> {
        sqlx::query_as::<_, AssetSummaryEntity>(
            r#"
            SELECT a.id, a.name, a.asset_type,
                   t.name AS tag_name, l.name AS location_name
            FROM assets a
            LEFT JOIN tags t ON t.id = a.tag_id
            LEFT JOIN locations l ON l.id = a.location_id
            ORDER BY a.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Insert an asset.
    pub async fn insert(
        &self,
        name: &str,
        asset_type: &str,
        location_id: Option<i64>,
        tag_id: Option<i64>,
    ) -> Result<AssetEntity, sqlx::Error> {
        sqlx::query_as::<_, AssetEntity>(&format!(
            r#"
            INSERT INTO assets (name, asset_type, location_id, tag_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(asset_type)
        .bind(location_id)
        .bind(tag_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Update an asset. Returns the updated row, or None if it is gone.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        asset_type: &str,
        location_id: Option<i64>,
        tag_id: Option<i64>,
    ) -> Result<Option<AssetEntity>, sqlx::Error> {
        sqlx::query_as::<_, AssetEntity>(&format!(
            r#"
            UPDATE assets
            SET name = $2, asset_type = $3, location_id = $4, tag_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(asset_type)
        .bind(location_id)
        .bind(tag_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an asset. Its location logs cascade.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Set the asset's current resolved location. Runs on the ingestion
    /// transaction so a rolled-back batch never moves an asset.
    pub async fn set_current_location(
        conn: &mut PgConnection,
        asset_id: i64,
        location_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE assets
            SET location_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(asset_id)
        .bind(location_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Total asset count.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Assets that have a tag bound.
    pub async fn count_tagged(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets WHERE tag_id IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
