//! Repository for the `todos` table.
//!
//! Write methods take a generic `PgExecutor` because the service layer owns
//! the transaction: insert, joined read-back and the Trello card-id update
//! all happen on the same `&mut *tx`.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tasca_core::todo::{Importance, Status};
use tasca_core::types::DbId;

use crate::models::todo::{NewTodo, Todo, TodoFilters, TodoValues, TodoWithCategory};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, title, description, category_id, importance, status, \
    image_path, trello_card_id, created_at, updated_at";

/// Column list for reads joined with the category's display names.
const JOINED_COLUMNS: &str = "todos.id, todos.title, todos.description, todos.category_id, \
    todos.importance, todos.status, todos.image_path, todos.trello_card_id, \
    todos.created_at, todos.updated_at, \
    categories.name_tr AS category_name_tr, categories.name_en AS category_name_en";

/// Provides CRUD and filtered listing for todos.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new todo. Status always starts as `Active`; the column
    /// default supplies it.
    pub async fn insert<'e>(
        exec: impl PgExecutor<'e>,
        input: &NewTodo,
        image_path: Option<&str>,
    ) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description, category_id, importance, image_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.importance)
            .bind(image_path)
            .fetch_one(exec)
            .await
    }

    /// Find a todo row (no join) by its internal ID.
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find a todo joined with its category display names.
    pub async fn find_with_category<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TodoWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM todos
             JOIN categories ON todos.category_id = categories.id
             WHERE todos.id = $1"
        );
        sqlx::query_as::<_, TodoWithCategory>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Replace every mutable field of a todo, refreshing `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
        input: &TodoValues,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET
                title = $2, description = $3, category_id = $4,
                importance = $5, status = $6, image_path = $7,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.importance)
            .bind(input.status)
            .bind(input.image_path.as_deref())
            .fetch_optional(exec)
            .await
    }

    /// Persist the Trello card id returned after a successful card create.
    pub async fn set_trello_card<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
        card_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE todos SET trello_card_id = $2 WHERE id = $1")
            .bind(id)
            .bind(card_id)
            .execute(exec)
            .await?;
        Ok(())
    }

    /// Single-field status update, refreshing `updated_at`.
    pub async fn set_status<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
        status: Status,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE todos SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(exec)
            .await?;
        Ok(())
    }

    /// Single-field importance update, refreshing `updated_at`.
    pub async fn set_importance<'e>(
        exec: impl PgExecutor<'e>,
        id: DbId,
        importance: Importance,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE todos SET importance = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(importance)
            .execute(exec)
            .await?;
        Ok(())
    }

    /// Delete a todo by ID. Returns `true` if a row was removed.
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List todos matching `filters`, newest first, with LIMIT/OFFSET
    /// pagination.
    pub async fn list(
        pool: &PgPool,
        filters: &TodoFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TodoWithCategory>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {JOINED_COLUMNS} FROM todos
             JOIN categories ON todos.category_id = categories.id"
        ));
        Self::push_filters(&mut qb, filters);
        qb.push(" ORDER BY todos.created_at DESC, todos.id DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        qb.build_query_as::<TodoWithCategory>().fetch_all(pool).await
    }

    /// Count todos matching `filters` (drives the pagination envelope).
    pub async fn count(pool: &PgPool, filters: &TodoFilters) -> Result<i64, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM todos".to_string());
        Self::push_filters(&mut qb, filters);

        let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
        Ok(count)
    }

    /// Append the shared WHERE clause for `list` and `count`. Filters are
    /// ANDed; an empty filter set appends nothing.
    fn push_filters(qb: &mut QueryBuilder<Postgres>, filters: &TodoFilters) {
        let mut prefix = " WHERE ";
        let mut sep = |qb: &mut QueryBuilder<Postgres>| {
            qb.push(prefix);
            prefix = " AND ";
        };

        if let Some(start) = filters.start_date {
            sep(qb);
            qb.push("todos.created_at >= ");
            qb.push_bind(start);
        }
        if let Some(end) = filters.end_date {
            sep(qb);
            qb.push("todos.created_at <= ");
            qb.push_bind(end);
        }
        if let Some(status) = filters.status {
            sep(qb);
            qb.push("todos.status = ");
            qb.push_bind(status);
        }
        if let Some(category_id) = filters.category_id {
            sep(qb);
            qb.push("todos.category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(importance) = filters.importance {
            sep(qb);
            qb.push("todos.importance = ");
            qb.push_bind(importance);
        }
    }
}
