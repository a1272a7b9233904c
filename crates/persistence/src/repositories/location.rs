//! Location repository for database operations.

use sqlx::PgPool;

use crate::entities::LocationEntity;

/// Repository for location-related database operations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Creates a new LocationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All locations ordered by name.
    pub async fn find_all(&self) -> Result<Vec<LocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, name, floor, created_at, updated_at
            FROM locations
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Find a location by its id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<LocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, name, floor, created_at, updated_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a location.
    pub async fn insert(
        &self,
        name: &str,
        floor: Option<&str>,
    ) -> Result<LocationEntity, sqlx::Error> {
        sqlx::query_as::<_, LocationEntity>(
            r#"
            INSERT INTO locations (name, floor)
            VALUES ($1, $2)
            RETURNING id, name, floor, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(floor)
        .fetch_one(&self.pool)
        .await
    }

    /// Update a location. Returns the updated row, or None if it is gone.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        floor: Option<&str>,
    ) -> Result<Option<LocationEntity>, sqlx::Error> {
        sqlx::query_as::<_, LocationEntity>(
            r#"
            UPDATE locations
            SET name = $2, floor = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, floor, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(floor)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a location. Readers and logs attached to it cascade.
    /// Returns the number of rows deleted.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
