//! Category orchestration: validation plus the delete guard that keeps a
//! category alive while todos still reference it.

use tasca_core::category;
use tasca_core::error::CoreError;
use tasca_core::types::DbId;
use tasca_db::models::category::{Category, CategoryValues};
use tasca_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Raw category fields as parsed from the request body.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

fn validate(input: &CategoryInput) -> Result<CategoryValues, CoreError> {
    Ok(CategoryValues {
        name: category::validate_name(&input.name)?,
        description: category::validate_description(input.description.as_deref())?,
        color: category::validate_color(input.color.as_deref())?,
    })
}

/// Create a category from validated input.
pub async fn create(state: &AppState, input: CategoryInput) -> AppResult<Category> {
    let values = validate(&input)?;
    CategoryRepo::create(&state.pool, &values)
        .await
        .map_err(AppError::Database)
}

/// Fetch a single category.
pub async fn get(state: &AppState, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// List all categories ordered by ID.
pub async fn list(state: &AppState) -> AppResult<Vec<Category>> {
    CategoryRepo::list(&state.pool)
        .await
        .map_err(AppError::Database)
}

/// Replace a category's fields.
pub async fn update(state: &AppState, id: DbId, input: CategoryInput) -> AppResult<Category> {
    let values = validate(&input)?;
    CategoryRepo::update(&state.pool, id, &values)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// Delete a category, refusing while any todo still references it.
///
/// The count and delete run in one transaction so a todo created between
/// them cannot slip past the guard; the FK's ON DELETE RESTRICT backstops
/// it either way.
pub async fn delete(state: &AppState, id: DbId) -> AppResult<()> {
    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;

    let in_use = CategoryRepo::count_referencing_todos(&mut *tx, id)
        .await
        .map_err(AppError::Database)?;
    if in_use > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Category cannot be deleted because it is being used by existing todos".to_string(),
        )));
    }

    let deleted = CategoryRepo::delete(&mut *tx, id)
        .await
        .map_err(AppError::Database)?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }

    tx.commit().await.map_err(AppError::Database)?;
    Ok(())
}
