//! Request orchestrator.
//!
//! One entry point per user message: classify the utterance, load the
//! session context, apply continuation rules, dispatch to the intent's
//! handler, persist the updated context and post-process the response.
//! The registry is built over every intent kind at construction, so a
//! missing handler is a startup error rather than a runtime surprise.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::agent::{AgentResponse, Expecting, ResponseMetadata, UiAction};
use crate::domain::conversation::{analyze_flow, ConversationTopic, ConversationTurn};
use crate::domain::foundation::UserId;
use crate::domain::intent::{Intent, IntentKind};
use crate::ports::{ProductStore, QueryEmbedder};

use super::handlers::{
    AgentHandler, CompatibilityHandler, GeneralHandler, HandlerContext, InstallationHandler,
    OrderSupportHandler, OutOfScopeHandler, ProductSearchHandler, TroubleshootingHandler,
};
use super::intent_router::IntentRouter;
use super::session_store::SessionContextStore;

/// Phrases a handler uses to signal it considers the exchange wrapped up.
const CLOSING_PHRASES: &[&str] = &[
    "anything else",
    "good luck",
    "hope this helps",
    "glad i could help",
    "happy repairing",
];

/// Suggestions offered alongside a wrap-up.
const COMPLETION_SUGGESTIONS: &[&str] =
    &["Find another part", "Check compatibility", "I'm all set"];

const APOLOGY_MESSAGE: &str =
    "I'm sorry, something went wrong on my end. Could you try asking that again?";

/// Top-level request pipeline.
pub struct Orchestrator {
    router: IntentRouter,
    sessions: SessionContextStore,
    handlers: HashMap<IntentKind, Arc<dyn AgentHandler>>,
}

impl Orchestrator {
    /// Builds the orchestrator with one handler registered per intent kind.
    pub fn new(
        client: Arc<ResilientCompletionClient>,
        store: Arc<dyn ProductStore>,
        embedder: Arc<dyn QueryEmbedder>,
        sessions: SessionContextStore,
    ) -> Self {
        let mut handlers: HashMap<IntentKind, Arc<dyn AgentHandler>> = HashMap::new();
        for kind in IntentKind::ALL {
            let handler: Arc<dyn AgentHandler> = match kind {
                IntentKind::ProductSearch => {
                    Arc::new(ProductSearchHandler::new(store.clone(), embedder.clone()))
                }
                IntentKind::CompatibilityCheck => {
                    Arc::new(CompatibilityHandler::new(store.clone()))
                }
                IntentKind::Troubleshooting => {
                    Arc::new(TroubleshootingHandler::new(client.clone()))
                }
                IntentKind::InstallationHelp => {
                    Arc::new(InstallationHandler::new(store.clone(), client.clone()))
                }
                IntentKind::OrderSupport => Arc::new(OrderSupportHandler::new()),
                IntentKind::GeneralQuestion => Arc::new(GeneralHandler::new(client.clone())),
                IntentKind::OutOfScope => Arc::new(OutOfScopeHandler::new()),
            };
            handlers.insert(kind, handler);
        }

        Self {
            router: IntentRouter::new(client),
            sessions,
            handlers,
        }
    }

    /// Replaces the handler for `kind` (tests inject failing handlers here).
    pub fn with_handler(mut self, kind: IntentKind, handler: Arc<dyn AgentHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Processes one user message end to end.
    ///
    /// Never fails: every error path degrades to a response the user can act
    /// on.
    pub async fn process(
        &self,
        user_id: &UserId,
        utterance: &str,
        history: &[ConversationTurn],
    ) -> AgentResponse {
        let mut intent = self.router.classify(utterance, history).await;
        let mut session = self.sessions.get(user_id).await;
        let flow = analyze_flow(history);

        // Continuation rules, in priority order.
        let mut effective_utterance = utterance.to_string();
        if intent.entities.is_follow_up && flow.in_troubleshooting() {
            // Follow-ups stay in the conversational thread regardless of what
            // the classifier guessed.
            intent = Intent::follow_up();
        } else if let Some(expecting) = session.take_expecting() {
            match expecting {
                Expecting::ModelNumberForCompat => {
                    intent = Intent::new(IntentKind::CompatibilityCheck, 1.0);
                    if let Some(part) = &session.last_part_number {
                        effective_utterance = format!("{part} {utterance}");
                    }
                }
                Expecting::PartNumberForCompat => {
                    intent = Intent::new(IntentKind::CompatibilityCheck, 1.0);
                    if let Some(model) = &session.last_model_number {
                        effective_utterance = format!("{model} {utterance}");
                    }
                }
            }
        }

        info!(user = %user_id, intent = %intent.kind, confidence = intent.confidence, "dispatching");

        let handler = self
            .handlers
            .get(&intent.kind)
            .or_else(|| self.handlers.get(&IntentKind::OutOfScope));

        let mut response = match handler {
            Some(handler) => {
                let ctx = HandlerContext {
                    user_id,
                    utterance: &effective_utterance,
                    session: &mut session,
                    history,
                    intent: &intent,
                };
                match handler.handle(ctx).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!(user = %user_id, intent = %intent.kind, error = %e, "handler failed");
                        AgentResponse::text(APOLOGY_MESSAGE)
                    }
                }
            }
            None => AgentResponse::text(APOLOGY_MESSAGE),
        };

        session.last_intent = Some(intent.kind);
        session.last_topic = flow.topic.or_else(|| topic_for(intent.kind));
        self.sessions.set(user_id, &session).await;

        if wants_completion_offer(&response) {
            response = response.with_action(UiAction::CompletionOffer {
                suggestions: COMPLETION_SUGGESTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            });
        }

        response.with_metadata(ResponseMetadata {
            intent: intent.kind,
            confidence: intent.confidence,
        })
    }
}

/// Topic implied by an intent when the history gives none.
fn topic_for(kind: IntentKind) -> Option<ConversationTopic> {
    match kind {
        IntentKind::ProductSearch => Some(ConversationTopic::ProductRecommendation),
        IntentKind::CompatibilityCheck => Some(ConversationTopic::Compatibility),
        IntentKind::Troubleshooting => Some(ConversationTopic::Troubleshooting),
        IntentKind::InstallationHelp => Some(ConversationTopic::Installation),
        _ => None,
    }
}

/// A wrap-up offer is appended when the handler sounded final and nothing in
/// the response is still waiting on the user.
fn wants_completion_offer(response: &AgentResponse) -> bool {
    if response.awaits_input() {
        return false;
    }
    let message = response.message.to_lowercase();
    CLOSING_PHRASES.iter().any(|p| message.contains(p))
}
