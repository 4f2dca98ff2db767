use std::sync::Arc;

use tasca_trello::TrelloClient;

use crate::config::ServerConfig;
use crate::images::ImageStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tasca_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk store for processed todo images.
    pub images: Arc<ImageStore>,
    /// Best-effort Trello mirror (no-op when unconfigured).
    pub trello: Arc<TrelloClient>,
}
