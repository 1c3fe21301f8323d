//! YandexGPT API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Completion
// =============================================================================

/// Completion request.
///
/// The model is addressed by URI (`gpt://<folder>/<model>/latest`), see
/// [`model_uri`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Fully qualified model URI
    pub model_uri: String,

    /// Sampling options
    pub completion_options: CompletionOptions,

    /// Conversation messages
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    /// Create a new completion request for the given model URI.
    pub fn new(model_uri: impl Into<String>) -> Self {
        Self {
            model_uri: model_uri.into(),
            completion_options: CompletionOptions::default(),
            messages: Vec::new(),
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Replace the conversation.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.completion_options.temperature = Some(temperature);
        self
    }

    /// Set max tokens in the completion.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.completion_options.max_tokens = Some(max_tokens);
        self
    }
}

/// Sampling options for a completion.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    /// Streaming is not supported by this client; always false
    pub stream: bool,

    /// Sampling temperature (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Chat message. YandexGPT names the content field `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message text
    pub text: String,
}

impl Message {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            text: text.into(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            text: text.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            text: text.into(),
        }
    }
}

/// Completion response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text of the first alternative
    pub text: String,

    /// Status of the first alternative (e.g. `ALTERNATIVE_STATUS_FINAL`)
    pub status: Option<String>,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Model version that served the request
    pub model_version: Option<String>,
}

/// Token usage statistics. The API encodes counts as decimal strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub input_text_tokens: String,
    #[serde(default)]
    pub completion_tokens: String,
    #[serde(default)]
    pub total_tokens: String,
}

impl Usage {
    /// Total tokens as a number, if the API sent a parseable value.
    pub fn total(&self) -> Option<u64> {
        self.total_tokens.parse().ok()
    }
}

/// Raw completion response from API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponseRaw {
    pub result: CompletionResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    pub usage: Option<Usage>,
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Alternative {
    pub message: Message,
    pub status: Option<String>,
}

/// Build a model URI from a folder id and a short model name.
///
/// A value that already looks like a URI is returned unchanged.
pub fn model_uri(folder_id: &str, model: &str) -> String {
    if model.contains("://") {
        return model.to_string();
    }
    format!("gpt://{}/{}/latest", folder_id, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = CompletionRequest::new("gpt://folder/yandexgpt-lite/latest")
            .message(Message::user("Hi"))
            .temperature(0.3)
            .max_tokens(1024);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["modelUri"], "gpt://folder/yandexgpt-lite/latest");
        assert_eq!(json["completionOptions"]["stream"], false);
        assert_eq!(json["completionOptions"]["maxTokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["text"], "Hi");
    }

    #[test]
    fn test_optional_options_are_skipped() {
        let request = CompletionRequest::new("gpt://f/m/latest");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["completionOptions"].get("temperature").is_none());
        assert!(json["completionOptions"].get("maxTokens").is_none());
    }

    #[test]
    fn test_raw_response_parses() {
        let body = r#"{
            "result": {
                "alternatives": [
                    {"message": {"role": "assistant", "text": "{\"questions\": []}"}, "status": "ALTERNATIVE_STATUS_FINAL"}
                ],
                "usage": {"inputTextTokens": "120", "completionTokens": "30", "totalTokens": "150"},
                "modelVersion": "23.10.2024"
            }
        }"#;

        let raw: CompletionResponseRaw = serde_json::from_str(body).unwrap();
        assert_eq!(raw.result.alternatives.len(), 1);
        assert_eq!(raw.result.alternatives[0].message.text, "{\"questions\": []}");
        assert_eq!(raw.result.usage.unwrap().total(), Some(150));
    }

    #[test]
    fn test_model_uri() {
        assert_eq!(model_uri("b1g", "yandexgpt-lite"), "gpt://b1g/yandexgpt-lite/latest");
        assert_eq!(model_uri("b1g", "gpt://other/yandexgpt/rc"), "gpt://other/yandexgpt/rc");
    }
}
