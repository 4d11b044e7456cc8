//! HTTP transport for the advice service.
//!
//! Each call is a single attempt bounded by the configured request timeout.
//! Non-success responses are normalized into [`TransportError`], preferring the
//! service's `detail` message and falling back to `HTTP {status}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::PlayerTag,
    error::ErrorBody,
    protocol::{AdviceRequest, HealthStatus, PlayerAdvice, PlayerHistoryItem, PlayerSnapshot},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientSettings,
    error::{ConfigError, TransportError},
    schema::validate_snapshot,
};

/// The two calls the controller sequences. Implemented over HTTP by
/// [`HttpAdviceClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait AdviceApi: Send + Sync {
    async fn retrieve_player(&self, tag: &PlayerTag) -> Result<PlayerSnapshot, TransportError>;
    async fn retrieve_advice(
        &self,
        tag: &PlayerTag,
        war_focus: bool,
    ) -> Result<PlayerAdvice, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpAdviceClient {
    http: Client,
    base_url: Url,
    request_timeout: Duration,
    advice_model: Option<String>,
}

impl HttpAdviceClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let base_url = settings.base_url()?;
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            request_timeout: settings.request_timeout,
            advice_model: settings.advice_model.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Metadata of the snapshots the service has stored for `tag`, newest first.
    pub async fn player_history(
        &self,
        tag: &PlayerTag,
    ) -> Result<Vec<PlayerHistoryItem>, TransportError> {
        let url = self.endpoint(&["api", "player", tag.as_str(), "history"]);
        debug!(%url, "requesting player history");
        let response = self.http.get(url).send().await.map_err(|e| self.classify(e))?;
        self.read_json(response).await
    }

    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let url = self.endpoint(&["health"]);
        debug!(%url, "probing advice service health");
        let response = self.http.get(url).send().await.map_err(|e| self.classify(e))?;
        self.read_json(response).await
    }

    /// Appends percent-encoded path segments to the base url, so reserved
    /// characters in a tag (`#`, `/`, `?`) never change the route.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.request_timeout)
        } else {
            TransportError::from(err)
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {code}"));
            warn!(status = code, %message, "advice service returned failure");
            return Err(TransportError::Status {
                status: code,
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("advice service returned malformed body: {e}");
            TransportError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl AdviceApi for HttpAdviceClient {
    async fn retrieve_player(&self, tag: &PlayerTag) -> Result<PlayerSnapshot, TransportError> {
        let url = self.endpoint(&["api", "player", tag.as_str()]);
        debug!(%url, "requesting player snapshot");
        let response = self.http.get(url).send().await.map_err(|e| self.classify(e))?;
        let snapshot: PlayerSnapshot = self.read_json(response).await?;
        validate_snapshot(&snapshot).inspect_err(|violation| {
            warn!(tag = %snapshot.tag, "rejecting player snapshot: {violation}");
        })?;
        Ok(snapshot)
    }

    async fn retrieve_advice(
        &self,
        tag: &PlayerTag,
        war_focus: bool,
    ) -> Result<PlayerAdvice, TransportError> {
        let url = self.endpoint(&["api", "advice"]);
        debug!(%url, %tag, war_focus, "requesting advice");
        let response = self
            .http
            .post(url)
            .json(&AdviceRequest {
                tag: tag.clone(),
                war_focus,
                model: self.advice_model.clone(),
            })
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
