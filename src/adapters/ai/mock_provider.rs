//! Mock completion provider for testing.
//!
//! Configurable to return queued responses, inject errors, and record every
//! request for verification, so resilience and routing tests run without
//! touching a real provider.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionProvider, CompletionRequest, CompletionResponse, ProviderError, ProviderInfo,
};

/// Mock completion provider.
///
/// Queued responses are consumed in order; when the queue is empty the
/// provider returns the configured repeating outcome (default: an empty
/// success).
#[derive(Clone)]
pub struct MockCompletionProvider {
    queue: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    /// Outcome repeated once the queue is drained.
    repeating: Arc<Mutex<Option<Result<String, ProviderError>>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionProvider {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            repeating: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.queue.lock().unwrap().push_back(Err(error));
        self
    }

    /// Repeats `error` for every call once the queue is drained.
    pub fn always_error(self, error: ProviderError) -> Self {
        *self.repeating.lock().unwrap() = Some(Err(error));
        self
    }

    /// Repeats `content` for every call once the queue is drained.
    pub fn always_respond(self, content: impl Into<String>) -> Self {
        *self.repeating.lock().unwrap() = Some(Ok(content.into()));
        self
    }

    /// Adds simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_outcome(&self) -> Result<String, ProviderError> {
        if let Some(queued) = self.queue.lock().unwrap().pop_front() {
            return queued;
        }
        self.repeating
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.calls.lock().unwrap().push(request);
        self.next_outcome().map(|content| CompletionResponse {
            content,
            model: "mock-model-1".to_string(),
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumes_queue_in_order() {
        let provider = MockCompletionProvider::new()
            .with_response("first")
            .with_error(ProviderError::Unavailable("oops".into()))
            .with_response("third");

        let req = CompletionRequest::new("hi");
        assert_eq!(provider.complete(req.clone()).await.unwrap().content, "first");
        assert!(provider.complete(req.clone()).await.is_err());
        assert_eq!(provider.complete(req.clone()).await.unwrap().content, "third");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn repeating_outcome_after_queue_drains() {
        let provider =
            MockCompletionProvider::new().always_error(ProviderError::Network("down".into()));
        for _ in 0..4 {
            assert!(provider.complete(CompletionRequest::new("x")).await.is_err());
        }
    }

    #[tokio::test]
    async fn records_requests_for_verification() {
        let provider = MockCompletionProvider::new().with_response("ok");
        let request = CompletionRequest::new("what fits my washer?")
            .with_system_prompt("be helpful");
        provider.complete(request).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_text, "what fits my washer?");
        assert_eq!(calls[0].system_prompt.as_deref(), Some("be helpful"));
    }
}
