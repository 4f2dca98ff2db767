//! Route definitions for the `/todos` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::todos;
use crate::state::AppState;

/// Routes mounted at `/todos`.
///
/// ```text
/// GET    /                   -> list    (?page, ?limit, ?startDate, ?endDate,
///                                        ?status, ?category_id, ?importance)
/// POST   /                   -> create  (multipart)
/// GET    /{id}               -> get
/// PUT    /{id}               -> update  (multipart)
/// DELETE /{id}               -> delete
/// PATCH  /{id}/status        -> update_status
/// PATCH  /{id}/importance    -> update_importance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list).post(todos::create))
        .route(
            "/{id}",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        .route("/{id}/status", patch(todos::update_status))
        .route("/{id}/importance", patch(todos::update_importance))
}
