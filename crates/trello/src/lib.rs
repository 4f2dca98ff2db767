//! Best-effort Trello mirror for todos.
//!
//! Wraps the Trello REST API (card create/update/delete, board list lookup,
//! attachment upload) using [`reqwest`]. The client is polymorphic over
//! configuration: when the Trello credentials are absent every operation is
//! a success no-op, so the rest of the system never branches on whether the
//! integration is enabled.

mod client;

pub use client::{BoardList, TrelloClient, TrelloError};

/// Credentials and board/list identifiers for the Trello integration.
#[derive(Debug, Clone)]
pub struct TrelloConfig {
    /// API key (`TRELLO_KEY`).
    pub key: String,
    /// API token (`TRELLO_TOKEN`).
    pub token: String,
    /// Board whose lists are searched for the completed-list move
    /// (`TRELLO_BOARD_ID`).
    pub board_id: String,
    /// List new cards are created on (`TRELLO_LIST_ID`).
    pub list_id: String,
}

impl TrelloConfig {
    /// Load the Trello configuration from environment variables.
    ///
    /// Returns `None` unless all four of `TRELLO_KEY`, `TRELLO_TOKEN`,
    /// `TRELLO_BOARD_ID` and `TRELLO_LIST_ID` are set and non-empty;
    /// a `None` disables the integration without failing startup.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            key: var("TRELLO_KEY")?,
            token: var("TRELLO_TOKEN")?,
            board_id: var("TRELLO_BOARD_ID")?,
            list_id: var("TRELLO_LIST_ID")?,
        })
    }
}
