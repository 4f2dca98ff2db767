//! HTTP client for the Trello REST API.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tasca_core::todo::Importance;

use crate::TrelloConfig;

const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// Request timeout for every Trello call. The mirror is best-effort; a slow
/// board must not hold a todo write open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the Trello REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum TrelloError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Trello returned a non-2xx status code.
    #[error("Trello API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Reading the local attachment file failed.
    #[error("Failed to read attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// A list on a Trello board, as returned by `GET /boards/{id}/lists`.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CardResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AttachmentResponse {
    id: String,
}

/// Client for mirroring todos as cards on a Trello board.
///
/// Constructed with `None` configuration, every method succeeds without
/// performing any I/O.
pub struct TrelloClient {
    client: reqwest::Client,
    base_url: String,
    config: Option<TrelloConfig>,
}

impl TrelloClient {
    pub fn new(config: Option<TrelloConfig>) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a non-default endpoint (used by tests).
    pub fn with_base_url(config: Option<TrelloConfig>, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build Trello HTTP client");
        Self {
            client,
            base_url,
            config,
        }
    }

    /// Whether the integration is enabled.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Create a card for a freshly created todo, returning its id.
    ///
    /// Errors propagate so the caller can decide; the todo create path
    /// treats them as non-fatal. Returns `Ok(None)` when unconfigured.
    pub async fn create_card(
        &self,
        title: &str,
        description: Option<&str>,
        importance: Importance,
    ) -> Result<Option<String>, TrelloError> {
        let Some(config) = &self.config else {
            tracing::debug!("Trello not configured, skipping card creation");
            return Ok(None);
        };

        let body = serde_json::json!({
            "name": title,
            "desc": description.unwrap_or(""),
            "idList": config.list_id,
            "pos": "top",
            "labels": importance.label_color(),
        });

        let response = self
            .client
            .post(format!("{}/cards", self.base_url))
            .query(&[("key", &config.key), ("token", &config.token)])
            .json(&body)
            .send()
            .await?;

        let card: CardResponse = Self::parse_response(response).await?;
        Ok(Some(card.id))
    }

    /// Mirror field changes onto an existing card.
    ///
    /// Failures are logged and swallowed: card updates are never allowed to
    /// affect the todo operation that triggered them.
    pub async fn update_card(
        &self,
        card_id: &str,
        title: &str,
        description: Option<&str>,
        importance: Importance,
    ) {
        if let Err(err) = self
            .try_update_card(card_id, title, description, importance)
            .await
        {
            tracing::warn!(card_id, error = %err, "Trello card update failed, continuing");
        }
    }

    async fn try_update_card(
        &self,
        card_id: &str,
        title: &str,
        description: Option<&str>,
        importance: Importance,
    ) -> Result<(), TrelloError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let body = serde_json::json!({
            "name": title,
            "desc": description.unwrap_or(""),
            "labels": importance.label_color(),
        });

        let response = self
            .client
            .put(format!("{}/cards/{card_id}", self.base_url))
            .query(&[("key", &config.key), ("token", &config.token)])
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Delete the card mirroring a todo.
    ///
    /// Errors propagate; the todo delete path treats a failed card delete
    /// as fatal (reference behavior, see DESIGN.md).
    pub async fn delete_card(&self, card_id: &str) -> Result<(), TrelloError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let response = self
            .client
            .delete(format!("{}/cards/{card_id}", self.base_url))
            .query(&[("key", &config.key), ("token", &config.token)])
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Move a card to the board's completed list, resolved by
    /// case-insensitive substring match against the list names.
    ///
    /// No matching list is a silent no-op; failures are logged and swallowed.
    pub async fn move_to_completed_list(&self, card_id: &str) {
        if let Err(err) = self.try_move_to_completed_list(card_id).await {
            tracing::warn!(card_id, error = %err, "Trello completed-list move failed, continuing");
        }
    }

    async fn try_move_to_completed_list(&self, card_id: &str) -> Result<(), TrelloError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let lists = self.board_lists(config).await?;
        let Some(completed) = find_completed_list(&lists) else {
            tracing::debug!("No completed list on board, skipping card move");
            return Ok(());
        };

        let response = self
            .client
            .put(format!("{}/cards/{card_id}", self.base_url))
            .query(&[("key", &config.key), ("token", &config.token)])
            .json(&serde_json::json!({ "idList": completed.id }))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Upload a local file as a card attachment, returning the attachment id.
    ///
    /// Errors propagate; the create-card caller catches them and continues
    /// without the attachment.
    pub async fn upload_attachment(
        &self,
        card_id: &str,
        file_path: &Path,
    ) -> Result<Option<String>, TrelloError> {
        let Some(config) = &self.config else {
            return Ok(None);
        };

        let bytes = tokio::fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let form = reqwest::multipart::Form::new()
            .text("name", file_name.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );

        let response = self
            .client
            .post(format!("{}/cards/{card_id}/attachments", self.base_url))
            .query(&[("key", &config.key), ("token", &config.token)])
            .multipart(form)
            .send()
            .await?;

        let attachment: AttachmentResponse = Self::parse_response(response).await?;
        Ok(Some(attachment.id))
    }

    async fn board_lists(&self, config: &TrelloConfig) -> Result<Vec<BoardList>, TrelloError> {
        let response = self
            .client
            .get(format!("{}/boards/{}/lists", self.base_url, config.board_id))
            .query(&[("key", &config.key), ("token", &config.token)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Deserialize a 2xx response body, or surface the status and raw body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TrelloError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Check for a 2xx status, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), TrelloError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Find the board's completed list: first list whose name contains
/// "completed" or the Turkish "tamamland", case-insensitively.
fn find_completed_list(lists: &[BoardList]) -> Option<&BoardList> {
    lists.iter().find(|list| {
        let name = list.name.to_lowercase();
        name.contains("completed") || name.contains("tamamland")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(id: &str, name: &str) -> BoardList {
        BoardList {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn completed_list_matched_by_substring() {
        let lists = vec![list("1", "To Do"), list("2", "All Completed Tasks")];
        assert_eq!(find_completed_list(&lists).unwrap().id, "2");
    }

    #[test]
    fn completed_list_matches_turkish_name() {
        let lists = vec![list("1", "Aktif"), list("2", "Tamamlandı")];
        assert_eq!(find_completed_list(&lists).unwrap().id, "2");
    }

    #[test]
    fn no_completed_list_is_none() {
        let lists = vec![list("1", "To Do"), list("2", "Doing")];
        assert!(find_completed_list(&lists).is_none());
    }

    #[tokio::test]
    async fn unconfigured_client_is_a_no_op() {
        let client = TrelloClient::new(None);
        assert!(!client.is_configured());

        let card = client
            .create_card("title", None, Importance::High)
            .await
            .unwrap();
        assert!(card.is_none());

        client.delete_card("abc").await.unwrap();
        client.update_card("abc", "title", None, Importance::Low).await;
        client.move_to_completed_list("abc").await;

        let attachment = client
            .upload_attachment("abc", Path::new("/nonexistent"))
            .await
            .unwrap();
        assert!(attachment.is_none());
    }
}
