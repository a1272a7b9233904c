//! Tag repository for database operations.

use sqlx::PgPool;

use crate::entities::{TagEntity, TagWithAssetEntity};

/// Repository for tag-related database operations.
#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Creates a new TagRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tags with the owning asset's name joined in, ordered by name.
    pub async fn find_all_with_asset(&self) -> Result<Vec<TagWithAssetEntity>, sqlx::Error> {
        sqlx::query_as::<_, TagWithAssetEntity>(
            r#"
            SELECT t.id, t.name, a.name AS asset_name
            FROM tags t
            LEFT JOIN assets a ON a.tag_id = t.id
            ORDER BY t.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Find a tag by its id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TagEntity>, sqlx::Error> {
        sqlx::query_as::<_, TagEntity>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a tag.
    pub async fn insert(&self, name: &str) -> Result<TagEntity, sqlx::Error> {
        sqlx::query_as::<_, TagEntity>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Rename a tag. Returns the updated row, or None if it is gone.
    pub async fn update(&self, id: i64, name: &str) -> Result<Option<TagEntity>, sqlx::Error> {
        sqlx::query_as::<_, TagEntity>(
            r#"
            UPDATE tags
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a tag. Reader associations cascade; an owning asset keeps its
    /// row with tag_id nulled.
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
