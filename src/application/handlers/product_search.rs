//! Product search handler.
//!
//! Exact part-number lookup first; otherwise a similarity search over the
//! catalog using an embedded query. Embedding and similarity calls are
//! idempotent reads, so they go through the bounded retry helper.

use async_trait::async_trait;
use std::sync::Arc;

use tracing::warn;

use crate::adapters::ai::{with_retry, RETRY_ATTEMPTS, RETRY_DELAY};
use crate::domain::agent::{AgentResponse, UiAction};
use crate::domain::intent::extract_part_number;
use crate::ports::{ProductRecord, ProductStore, QueryEmbedder};

use super::{AgentHandler, HandlerContext, HandlerFailure};

/// How many similar products to surface.
const TOP_K: usize = 3;

/// Finds products by exact part number or semantic similarity.
pub struct ProductSearchHandler {
    store: Arc<dyn ProductStore>,
    embedder: Arc<dyn QueryEmbedder>,
}

impl ProductSearchHandler {
    pub fn new(store: Arc<dyn ProductStore>, embedder: Arc<dyn QueryEmbedder>) -> Self {
        Self { store, embedder }
    }

    fn found_response(records: Vec<ProductRecord>) -> AgentResponse {
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let part_numbers: Vec<String> =
            records.iter().map(|r| r.part_number.clone()).collect();
        let mut response = AgentResponse::text(format!(
            "Here's what I found: {}. Want me to check whether it fits your model?",
            names.join(", ")
        ))
        .with_action(UiAction::ProductDisplay { part_numbers });
        for record in &records {
            response = response.with_product(record.to_ref());
        }
        response
    }

    async fn similarity_search(&self, query: &str) -> Option<Vec<ProductRecord>> {
        let embedding = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || self.embedder.embed(query))
            .await
            .map_err(|e| warn!(error = %e, "query embedding failed"))
            .ok()?;

        let scored = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || {
            self.store.search_similar(&embedding, TOP_K)
        })
        .await
        .map_err(|e| warn!(error = %e, "similarity search failed"))
        .ok()?;

        if scored.is_empty() {
            None
        } else {
            Some(scored.into_iter().map(|s| s.product).collect())
        }
    }
}

#[async_trait]
impl AgentHandler for ProductSearchHandler {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        let part_number = ctx
            .intent
            .entities
            .part_number
            .clone()
            .or_else(|| extract_part_number(ctx.utterance));

        if let Some(ref part) = part_number {
            match with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || {
                self.store.find_by_part_number(part)
            })
            .await
            {
                Ok(records) if !records.is_empty() => {
                    ctx.session.last_part_number = Some(part.clone());
                    return Ok(Self::found_response(records));
                }
                Ok(_) => {
                    return Ok(AgentResponse::text(format!(
                        "I couldn't find part {part} in our catalog. Double-check the number, \
                         or describe the part and I'll search for it."
                    ))
                    .with_action(UiAction::InputRequest {
                        prompt: "What does the part do, or where does it sit in the appliance?"
                            .to_string(),
                        field: "part_description".to_string(),
                    }));
                }
                Err(e) => {
                    warn!(error = %e, part, "exact lookup failed");
                    return Ok(AgentResponse::text(super::DEGRADED_MESSAGE));
                }
            }
        }

        if let Some(records) = self.similarity_search(ctx.utterance).await {
            return Ok(Self::found_response(records));
        }

        Ok(AgentResponse::text(
            "I couldn't match that to a part. If you have the part number (it usually starts \
             with PS), I can look it up directly.",
        )
        .with_action(UiAction::InputRequest {
            prompt: "Do you have the part number?".to_string(),
            field: "part_number".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{HashEmbedder, InMemoryProductStore};
    use crate::domain::agent::SessionContext;
    use crate::domain::foundation::UserId;
    use crate::domain::intent::{Intent, IntentKind};

    fn record(part_number: &str, name: &str, description: &str) -> ProductRecord {
        ProductRecord {
            part_number: part_number.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: 34.95,
            product_url: Some(format!("https://example.com/{part_number}")),
            install_guide_url: None,
        }
    }

    async fn seeded_store() -> Arc<InMemoryProductStore> {
        let store = Arc::new(InMemoryProductStore::new());
        let embedder = HashEmbedder::new();
        let bin = record("PS11752778", "Refrigerator door shelf bin", "door shelf bin");
        let pump = record("PS354363", "Dishwasher drain pump", "drain pump motor");
        store
            .insert_with_embedding(bin.clone(), embedder.embed_sync(&bin.description))
            .await;
        store
            .insert_with_embedding(pump.clone(), embedder.embed_sync(&pump.description))
            .await;
        store
    }

    async fn run(utterance: &str, intent: Intent) -> (AgentResponse, SessionContext) {
        let handler = ProductSearchHandler::new(seeded_store().await, Arc::new(HashEmbedder::new()));
        let user_id = UserId::new("u1").unwrap();
        let mut session = SessionContext::empty();
        let response = handler
            .handle(HandlerContext {
                user_id: &user_id,
                utterance,
                session: &mut session,
                history: &[],
                intent: &intent,
            })
            .await
            .unwrap();
        (response, session)
    }

    #[tokio::test]
    async fn exact_lookup_returns_product_and_remembers_part() {
        let (response, session) = run(
            "do you have PS11752778?",
            Intent::new(IntentKind::ProductSearch, 0.9),
        )
        .await;

        assert_eq!(response.products.len(), 1);
        assert_eq!(response.products[0].part_number, "PS11752778");
        assert!(matches!(
            response.actions[0],
            UiAction::ProductDisplay { .. }
        ));
        assert_eq!(session.last_part_number.as_deref(), Some("PS11752778"));
    }

    #[tokio::test]
    async fn unknown_part_number_asks_for_description() {
        let (response, _) = run(
            "looking for PS99999999",
            Intent::new(IntentKind::ProductSearch, 0.9),
        )
        .await;

        assert!(response.message.contains("couldn't find part PS99999999"));
        assert!(response.awaits_input());
    }

    #[tokio::test]
    async fn description_falls_back_to_similarity_search() {
        let (response, _) = run(
            "my dishwasher drain pump died",
            Intent::new(IntentKind::ProductSearch, 0.8),
        )
        .await;

        assert!(!response.products.is_empty());
        assert_eq!(response.products[0].part_number, "PS354363");
    }
}
