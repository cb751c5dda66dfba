//! Typed HTTP client for the songbook REST API
//!
//! Non-2xx responses are decoded from the server's `{ error, details? }` body
//! into [`ClientError::Api`].

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use songbook_common::{NewSong, Song, SongPatch, StatsSummary};
use thiserror::Error;
use tracing::debug;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable success body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error status
    #[error("{error} (HTTP {status}){}", format_details(.details))]
    Api {
        status: u16,
        error: String,
        details: Option<String>,
    },

    /// Base URL cannot be used for API requests
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn format_details(details: &Option<String>) -> String {
    details
        .as_ref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// Body of a successful delete
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Songbook API client
#[derive(Debug, Clone)]
pub struct SongbookClient {
    http: Client,
    base_url: Url,
}

impl SongbookClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:5000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET /api/songs
    pub async fn list_songs(&self) -> Result<Vec<Song>, ClientError> {
        let response = self.http.get(self.endpoint(&["api", "songs"])).send().await?;
        decode(response).await
    }

    /// POST /api/songs
    pub async fn create_song(&self, song: &NewSong) -> Result<Song, ClientError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "songs"]))
            .json(song)
            .send()
            .await?;
        decode(response).await
    }

    /// PUT /api/songs/:id
    pub async fn update_song(&self, id: &str, patch: &SongPatch) -> Result<Song, ClientError> {
        let response = self
            .http
            .put(self.endpoint(&["api", "songs", id]))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    /// DELETE /api/songs/:id
    pub async fn delete_song(&self, id: &str) -> Result<DeleteConfirmation, ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&["api", "songs", id]))
            .send()
            .await?;
        decode(response).await
    }

    /// GET /api/songs/stats/summary
    pub async fn stats_summary(&self) -> Result<StatsSummary, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "songs", "stats", "summary"]))
            .send()
            .await?;
        decode(response).await
    }

    /// GET /health
    pub async fn health(&self) -> Result<Health, ClientError> {
        let response = self.http.get(self.endpoint(&["health"])).send().await?;
        decode(response).await
    }

    /// Base URL with `segments` appended; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can carry path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    debug!("{} {}", status, response.url());

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
        error: if text.trim().is_empty() {
            status.canonical_reason().unwrap_or("Request failed").to_string()
        } else {
            text
        },
        details: None,
    });

    Err(ClientError::Api {
        status: status.as_u16(),
        error: body.error,
        details: body.details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = SongbookClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.endpoint(&["api", "songs", "stats", "summary"]).as_str(),
            "http://localhost:5000/api/songs/stats/summary"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_id() {
        let client = SongbookClient::new("http://example.com/songbook/").unwrap();
        assert_eq!(
            client.endpoint(&["api", "songs", "a b/c"]).as_str(),
            "http://example.com/songbook/api/songs/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(matches!(
            SongbookClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            SongbookClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 400,
            error: "Failed to create song".to_string(),
            details: Some("Song validation failed: title is required".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create song (HTTP 400): Song validation failed: title is required"
        );
        assert_eq!(err.status(), Some(400));
    }
}
