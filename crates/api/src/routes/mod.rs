pub mod categories;
pub mod health;
pub mod todos;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /todos                      list (GET), create (POST, multipart)
/// /todos/{id}                 get, update (PUT, multipart), delete
/// /todos/{id}/status          update status (PATCH)
/// /todos/{id}/importance      update importance (PATCH)
///
/// /categories                 list, create
/// /categories/{id}            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/todos", todos::router())
        .nest("/categories", categories::router())
}

/// GET / -- welcome payload so hitting the bare server is not a 404.
async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Todo API",
        "health": "/health",
        "api": "/api",
    }))
}

/// Root-level routes mounted outside `/api`.
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}
