//! Repository for the `categories` table.

use sqlx::{PgExecutor, PgPool};
use tasca_core::types::DbId;

use crate::models::category::{Category, CategoryValues};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name_tr, name_en, description_tr, description_en, color, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category. The same name/description value lands in both
    /// language columns.
    pub async fn create(pool: &PgPool, input: &CategoryValues) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name_tr, name_en, description_tr, description_en, color)
             VALUES ($1, $1, $2, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List all categories ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY id");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Replace a category's fields, refreshing `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CategoryValues,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name_tr = $2, name_en = $2,
                description_tr = $3, description_en = $3,
                color = $4,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Count todos referencing this category. The delete guard must call
    /// this on the same transaction that performs the delete.
    pub async fn count_referencing_todos<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE category_id = $1")
            .bind(id)
            .fetch_one(exec)
            .await
    }

    /// Delete a category by ID. Returns `true` if a row was removed.
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
