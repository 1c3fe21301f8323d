//! YandexGPT implementation of the Completer trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use qa_dataset::ai::YandexGpt;
//!
//! let completer = YandexGpt::from_env()?;
//! let report = generate_questions(prompts, Arc::new(completer), sink, generation, dispatch).await;
//! ```

use async_trait::async_trait;
use tracing::debug;
use yandexgpt_client::{Message, YandexGptClient, YandexGptError};

use crate::error::{DatasetError, Result};
use crate::traits::completer::{CompletionRequest, Completer};

/// Completer that calls the YandexGPT completion endpoint.
#[derive(Clone)]
pub struct YandexGpt {
    client: YandexGptClient,
}

impl YandexGpt {
    pub fn new(api_key: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            client: YandexGptClient::new(api_key, folder_id),
        }
    }

    /// Create from `YANDEX_API_KEY` and `YANDEX_FOLDER_ID`.
    pub fn from_env() -> Result<Self> {
        let client = YandexGptClient::from_env()
            .map_err(|e| DatasetError::invalid_config(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: YandexGptClient) -> Self {
        Self { client }
    }

    /// Set a custom base URL (for proxies or a local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn client(&self) -> &YandexGptClient {
        &self.client
    }
}

#[async_trait]
impl Completer for YandexGpt {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let messages = request
            .messages
            .iter()
            .map(|m| Message {
                role: m.role.clone(),
                text: m.text.clone(),
            })
            .collect();

        let api_request = yandexgpt_client::CompletionRequest::new(self.client.model_uri(&request.model))
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);

        let response = self
            .client
            .completion(api_request)
            .await
            .map_err(completion_error)?;

        debug!(
            model = %request.model,
            status = ?response.status,
            total_tokens = ?response.usage.as_ref().and_then(|u| u.total()),
            "YandexGPT completion"
        );

        Ok(response.text)
    }
}

/// Transient client errors are retried; the rest fail the unit at once.
fn completion_error(e: YandexGptError) -> DatasetError {
    if e.is_transient() {
        DatasetError::Completion(Box::new(e))
    } else {
        DatasetError::CompletionRejected(Box::new(e))
    }
}
