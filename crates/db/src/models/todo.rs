//! Todo entity models, write DTOs and list filters.

use serde::Serialize;
use sqlx::FromRow;
use tasca_core::todo::{Importance, Status};
use tasca_core::types::{DbId, Timestamp};

/// A row from the `todos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: DbId,
    pub importance: Importance,
    pub status: Status,
    pub image_path: Option<String>,
    pub trello_card_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A todo joined with its category's display names. This is the shape every
/// read endpoint returns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TodoWithCategory {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: DbId,
    pub importance: Importance,
    pub status: Status,
    pub image_path: Option<String>,
    pub trello_card_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub category_name_tr: String,
    pub category_name_en: String,
}

/// Validated values for inserting a todo. Status is not a field: creation
/// always starts a todo as `Active`.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub category_id: DbId,
    pub importance: Importance,
}

/// Validated values for a full todo replacement (PUT semantics: every field
/// is applied, including `image_path`).
#[derive(Debug, Clone)]
pub struct TodoValues {
    pub title: String,
    pub description: Option<String>,
    pub category_id: DbId,
    pub importance: Importance,
    pub status: Status,
    pub image_path: Option<String>,
}

/// Optional list filters, combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct TodoFilters {
    /// Inclusive lower bound on `created_at`.
    pub start_date: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub end_date: Option<Timestamp>,
    pub status: Option<Status>,
    pub category_id: Option<DbId>,
    pub importance: Option<Importance>,
}
