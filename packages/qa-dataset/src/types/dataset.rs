//! Final fine-tuning records and the chat messages they are made of.

use serde::{Deserialize, Serialize};

/// A `{role, text}` chat message, as both the dataset format and the remote
/// model expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            text: text.into(),
        }
    }
}

/// One line of the output JSONL dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub request: Vec<ChatMessage>,
    pub response: String,
}

impl DatasetRecord {
    /// Single-turn record: one user question, one answer.
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            request: vec![ChatMessage::user(question)],
            response: response.into(),
        }
    }

    /// Text of the first request message, if any.
    pub fn question(&self) -> Option<&str> {
        self.request.first().map(|m| m.text.as_str())
    }
}
