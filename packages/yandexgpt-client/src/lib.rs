//! Pure YandexGPT REST API client
//!
//! A minimal client for the Yandex Cloud foundation-models completion
//! endpoint with no domain-specific logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use yandexgpt_client::{CompletionRequest, Message, YandexGptClient};
//!
//! let client = YandexGptClient::from_env()?;
//!
//! let response = client
//!     .completion(
//!         CompletionRequest::new(client.model_uri("yandexgpt-lite"))
//!             .message(Message::user("Hello!"))
//!             .temperature(0.3)
//!             .max_tokens(1024),
//!     )
//!     .await?;
//! println!("{}", response.text);
//! ```

pub mod error;
pub mod types;

pub use error::{Result, YandexGptError};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Pure YandexGPT API client.
#[derive(Clone)]
pub struct YandexGptClient {
    http_client: Client,
    api_key: String,
    folder_id: String,
    base_url: String,
}

impl YandexGptClient {
    /// Create a new client with the given API key and cloud folder id.
    pub fn new(api_key: impl Into<String>, folder_id: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key: api_key.into(),
            folder_id: folder_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variables `YANDEX_API_KEY` and `YANDEX_FOLDER_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("YANDEX_API_KEY")
            .map_err(|_| YandexGptError::Config("YANDEX_API_KEY not set".into()))?;
        let folder_id = std::env::var("YANDEX_FOLDER_ID")
            .map_err(|_| YandexGptError::Config("YANDEX_FOLDER_ID not set".into()))?;
        Ok(Self::new(api_key, folder_id))
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Get the folder id.
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model URI for a short model name in this client's folder.
    pub fn model_uri(&self, model: &str) -> String {
        types::model_uri(&self.folder_id, model)
    }

    /// Completion.
    ///
    /// Send messages to the completion API and return the first alternative.
    pub async fn completion(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/completion", self.base_url))
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .header("x-folder-id", &self.folder_id)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "YandexGPT request failed");
                YandexGptError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "YandexGPT API error");
            return Err(YandexGptError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let raw: types::CompletionResponseRaw = response
            .json()
            .await
            .map_err(|e| YandexGptError::Parse(e.to_string()))?;

        let usage = raw.result.usage;
        let model_version = raw.result.model_version;
        let alternative = raw
            .result
            .alternatives
            .into_iter()
            .next()
            .ok_or_else(|| YandexGptError::Parse("No alternatives in YandexGPT response".into()))?;

        debug!(
            model = %request.model_uri,
            duration_ms = start.elapsed().as_millis(),
            total_tokens = usage.as_ref().and_then(Usage::total),
            "YandexGPT completion"
        );

        Ok(CompletionResponse {
            text: alternative.message.text,
            status: alternative.status,
            usage,
            model_version,
        })
    }
}
