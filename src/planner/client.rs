//! HTTP client for the Messages API.

use super::{ChatRequest, PlannerError};
use crate::config::PlannerConfig;
use crate::traits::ChatClient;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Map a non-success HTTP status to the error shown to the user.
#[must_use]
pub const fn error_for_status(status: u16) -> PlannerError {
    match status {
        401 => PlannerError::InvalidCredential,
        429 => PlannerError::RateLimited,
        400 => PlannerError::BadRequest,
        other => PlannerError::Api(other),
    }
}

/// The text of the first content block, or an empty string.
///
/// An unreadable body yields an empty string, which later parses as a reply
/// without tasks.
#[must_use]
pub fn first_text_block(body: &str) -> String {
    serde_json::from_str::<MessagesResponse>(body)
        .ok()
        .and_then(|r| r.content.into_iter().next())
        .and_then(|block| block.text)
        .unwrap_or_default()
}

/// Blocking client for the hosted model.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    api_url: String,
    api_version: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Create a client that authenticates with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::MissingCredential`] for a blank key, or
    /// [`PlannerError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, config: &PlannerConfig) -> Result<Self, PlannerError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlannerError::MissingCredential);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlannerError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_url: config.api_url.clone(),
            api_version: config.api_version.clone(),
        })
    }
}

impl ChatClient for AnthropicClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, PlannerError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .map_err(|e| {
                tracing::warn!(error = %e, "planner request failed");
                PlannerError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "planner request rejected");
            return Err(error_for_status(status.as_u16()));
        }

        let body = response.text().map_err(|e| PlannerError::Network(e.to_string()))?;
        Ok(first_text_block(&body))
    }
}
