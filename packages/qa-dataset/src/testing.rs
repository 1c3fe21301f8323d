//! Testing utilities including a mock completer.
//!
//! Lets applications exercise the dispatch layer without network calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{DatasetError, Result};
use crate::traits::completer::{CompletionRequest, Completer};

/// A mock completer with scripted replies.
///
/// Reply resolution, first match wins:
/// 1. a permanent rejection (see [`MockCompleter::rejecting_for`])
/// 2. a pending scripted failure (see [`MockCompleter::failing_first`])
/// 3. a reply keyed by a substring of the last user message
/// 4. the next queued reply
/// 5. the default reply
#[derive(Default)]
pub struct MockCompleter {
    /// Replies returned in order, one per call
    queued: Arc<RwLock<VecDeque<String>>>,

    /// Replies chosen by a substring of the user message
    by_substring: Arc<RwLock<Vec<(String, String)>>>,

    /// Remaining failures per substring (empty key matches every call)
    failures: Arc<RwLock<HashMap<String, u32>>>,

    /// Substrings whose calls fail with a non-retryable rejection
    rejections: Arc<RwLock<Vec<String>>>,

    /// Reply when nothing else matches
    default_reply: String,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` whenever nothing more specific matches.
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default_reply = text.into();
        self
    }

    /// Queue a reply for the next unmatched call.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.queued.write().unwrap().push_back(text.into());
        self
    }

    /// Reply with `text` to any call whose user message contains `needle`.
    pub fn with_reply_for(self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.by_substring
            .write()
            .unwrap()
            .push((needle.into(), text.into()));
        self
    }

    /// Fail the first `times` calls, whatever they ask.
    pub fn failing_first(self, times: u32) -> Self {
        self.failing_for("", times)
    }

    /// Fail the first `times` calls whose user message contains `needle`.
    pub fn failing_for(self, needle: impl Into<String>, times: u32) -> Self {
        self.failures.write().unwrap().insert(needle.into(), times);
        self
    }

    /// Reject every call whose user message contains `needle`.
    pub fn rejecting_for(self, needle: impl Into<String>) -> Self {
        self.rejections.write().unwrap().push(needle.into());
        self
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn take_failure(&self, user_text: &str) -> bool {
        let mut failures = self.failures.write().unwrap();
        for (needle, remaining) in failures.iter_mut() {
            if *remaining > 0 && user_text.contains(needle.as_str()) {
                *remaining -= 1;
                return true;
            }
        }
        false
    }
}

#[async_trait]
impl Completer for MockCompleter {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.write().unwrap().push(request.clone());
        let user_text = request.user_text().unwrap_or_default();

        if self
            .rejections
            .read()
            .unwrap()
            .iter()
            .any(|needle| user_text.contains(needle.as_str()))
        {
            return Err(DatasetError::CompletionRejected("mock rejection".into()));
        }

        if self.take_failure(user_text) {
            return Err(DatasetError::Completion("mock transient failure".into()));
        }

        if let Some((_, reply)) = self
            .by_substring
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| user_text.contains(needle.as_str()))
        {
            return Ok(reply.clone());
        }

        if let Some(reply) = self.queued.write().unwrap().pop_front() {
            return Ok(reply);
        }

        Ok(self.default_reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest::new("test-model").message(ChatMessage::user(text))
    }

    #[tokio::test]
    async fn test_resolution_order() {
        let mock = MockCompleter::new()
            .with_default("default")
            .with_reply("queued")
            .with_reply_for("special", "keyed")
            .failing_for("flaky", 1);

        assert_eq!(mock.complete(&request("special case")).await.unwrap(), "keyed");
        assert!(mock.complete(&request("flaky")).await.is_err());
        assert_eq!(mock.complete(&request("flaky")).await.unwrap(), "queued");
        assert_eq!(mock.complete(&request("other")).await.unwrap(), "default");
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_rejection_is_not_retryable() {
        let mock = MockCompleter::new().with_default("ok").rejecting_for("forbidden");

        let err = mock.complete(&request("forbidden topic")).await.unwrap_err();
        assert!(!err.is_retryable());
        assert_eq!(mock.complete(&request("fine")).await.unwrap(), "ok");
    }
}
