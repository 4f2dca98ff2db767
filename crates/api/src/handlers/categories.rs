//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tasca_core::types::DbId;
use tasca_db::models::category::Category;

use crate::error::AppResult;
use crate::service::categories::{self, CategoryInput};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = categories::list(&state).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = categories::get(&state, id).await?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = categories::create(&state, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    let category = categories::update(&state, id, input).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
///
/// Returns 400 while any todo still references the category.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    categories::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
