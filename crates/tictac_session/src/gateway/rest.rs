//! Gateway over the REST API.

use super::GameGateway;
use crate::{ApiResponse, GameId, GamePayload, GameRecord, GameSummary, GatewayError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// HTTP client for the games API.
///
/// `base_url` points at the API root, e.g. `http://127.0.0.1:8080/api/`.
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: String,
    client: reqwest::Client,
}

impl RestGateway {
    /// Creates a client for the API rooted at `base_url`.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        info!(base_url = %base_url, "Creating REST gateway");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative)
    }

    /// Sends a request and unwraps the response envelope.
    ///
    /// Error statuses still carry an envelope, so the body is decoded
    /// regardless of the HTTP status.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Got API response");

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            warn!(%status, error = %e, "Response is not an API envelope");
            GatewayError::Decode(format!("HTTP {}: {}", status, e))
        })?;
        envelope.into_result()
    }
}

#[async_trait]
impl GameGateway for RestGateway {
    #[instrument(skip(self))]
    async fn list_games(&self) -> Result<Vec<GameSummary>, GatewayError> {
        self.send(self.client.get(self.url("games"))).await
    }

    #[instrument(skip(self))]
    async fn get_game(&self, id: GameId) -> Result<GameRecord, GatewayError> {
        self.send(self.client.get(self.url(&format!("games/{}", id))))
            .await
    }

    #[instrument(skip(self, payload), fields(title = %payload.title()))]
    async fn create_game(&self, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        self.send(self.client.post(self.url("games")).json(payload))
            .await
    }

    #[instrument(skip(self, payload), fields(title = %payload.title()))]
    async fn update_game(&self, id: GameId, payload: &GamePayload) -> Result<GameRecord, GatewayError> {
        self.send(
            self.client
                .put(self.url(&format!("games/{}", id)))
                .json(payload),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, id: GameId) -> Result<GameId, GatewayError> {
        self.send(self.client.delete(self.url(&format!("games/{}", id))))
            .await
    }
}
