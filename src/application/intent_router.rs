//! Intent router.
//!
//! Classifies the current utterance into one of the closed intents. The fast
//! path is a pure rule match over the flow context; the slow path asks a
//! provider for structured JSON through the resilient client. Classification
//! never fails: provider errors and unparseable output both fall back to a
//! low-confidence general-question intent.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::conversation::{analyze_flow, ConversationTurn};
use crate::domain::intent::{
    extract_entities, fast_path_intent, parse_classification, system_prompt, Intent,
    CLASSIFY_TEMPERATURE,
};
use crate::ports::{CompletionRequest, OutputFormat};

/// Token budget for classification output (a small JSON object).
const CLASSIFY_MAX_TOKENS: u32 = 200;

/// Classifies utterances against the closed intent set.
pub struct IntentRouter {
    client: Arc<ResilientCompletionClient>,
}

impl IntentRouter {
    pub fn new(client: Arc<ResilientCompletionClient>) -> Self {
        Self { client }
    }

    /// Classifies `utterance` given recent `history`.
    pub async fn classify(&self, utterance: &str, history: &[ConversationTurn]) -> Intent {
        let flow = analyze_flow(history);
        if let Some(intent) = fast_path_intent(utterance, &flow) {
            debug!(intent = %intent.kind, "intent resolved on fast path");
            return intent;
        }

        let request = CompletionRequest::new(utterance)
            .with_system_prompt(system_prompt())
            .with_history(history)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_max_tokens(CLASSIFY_MAX_TOKENS)
            .with_format(OutputFormat::StructuredJson);

        let raw = match self.client.complete(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "classification call failed, using fallback intent");
                return self.fallback_with_entities(utterance);
            }
        };

        match parse_classification(&raw, utterance) {
            Ok(intent) => {
                debug!(intent = %intent.kind, confidence = intent.confidence, "intent classified");
                intent
            }
            Err(e) => {
                warn!(error = %e, "classifier output unusable, using fallback intent");
                self.fallback_with_entities(utterance)
            }
        }
    }

    /// Fallback intent, still carrying locally extracted entities so the
    /// downstream handler can use any identifiers the user typed.
    fn fallback_with_entities(&self, utterance: &str) -> Intent {
        let mut intent = Intent::fallback();
        intent.entities.merge_missing_from(&extract_entities(utterance));
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionProvider;
    use crate::domain::intent::IntentKind;
    use crate::ports::ProviderError;

    fn router_with(mock: MockCompletionProvider) -> (IntentRouter, Arc<MockCompletionProvider>) {
        let primary = Arc::new(mock);
        let fallback = Arc::new(MockCompletionProvider::new().always_error(
            ProviderError::Unavailable("fallback unused".into()),
        ));
        let client = Arc::new(ResilientCompletionClient::new(primary.clone(), fallback));
        (IntentRouter::new(client), primary)
    }

    #[tokio::test]
    async fn slow_path_uses_structured_output() {
        let mock = MockCompletionProvider::new()
            .with_response(r#"{"intent": "product_search", "confidence": 0.85}"#);
        let (router, primary) = router_with(mock);

        let intent = router.classify("I need a new door bin", &[]).await;

        assert_eq!(intent.kind, IntentKind::ProductSearch);
        let calls = primary.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].format, OutputFormat::StructuredJson);
        assert_eq!(calls[0].temperature, Some(CLASSIFY_TEMPERATURE));
    }

    #[tokio::test]
    async fn unparseable_output_falls_back_without_error() {
        let mock = MockCompletionProvider::new().with_response("definitely a product search");
        let (router, _) = router_with(mock);

        let intent = router.classify("I need a new door bin", &[]).await;

        assert_eq!(intent.kind, IntentKind::GeneralQuestion);
        assert_eq!(intent.confidence, 0.5);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_with_extracted_entities() {
        let mock = MockCompletionProvider::new()
            .always_error(ProviderError::Unavailable("down".into()));
        let (router, _) = router_with(mock);

        let intent = router.classify("need PS11752778 for my washer", &[]).await;

        assert_eq!(intent.kind, IntentKind::GeneralQuestion);
        assert_eq!(intent.entities.part_number.as_deref(), Some("PS11752778"));
    }

    #[tokio::test]
    async fn follow_up_question_skips_provider_entirely() {
        let mock = MockCompletionProvider::new().always_respond("should never be called");
        let (router, primary) = router_with(mock);

        let history = vec![
            ConversationTurn::user("my dishwasher won't drain"),
            ConversationTurn::assistant("Step 1: remove the filter and check for debris."),
        ];
        let intent = router.classify("Should I call a technician?", &history).await;

        assert_eq!(intent.kind, IntentKind::GeneralQuestion);
        assert!(intent.entities.is_follow_up);
        assert_eq!(primary.call_count(), 0);
    }
}
