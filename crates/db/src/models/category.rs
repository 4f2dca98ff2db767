//! Category entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tasca_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
///
/// Display names are bilingual; the API writes the same value into both
/// language columns, but seeded rows carry genuinely distinct names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name_tr: String,
    pub name_en: String,
    pub description_tr: Option<String>,
    pub description_en: Option<String>,
    pub color: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated values for creating or replacing a category.
///
/// Produced by the service layer after validation; `name` and `description`
/// land in both `_tr` and `_en` columns.
#[derive(Debug, Clone)]
pub struct CategoryValues {
    pub name: String,
    pub description: String,
    pub color: String,
}
