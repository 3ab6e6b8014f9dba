//! Query embedder port.
//!
//! Catalog embeddings are produced by an offline batch collaborator; the live
//! path only needs to embed the user's query text for similarity search.
//! Embedding is an idempotent read-style call, so callers wrap it in the
//! bounded retry helper.

use async_trait::async_trait;

use super::ai_provider::ProviderError;

/// Port for embedding a query string into the catalog's vector space.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Embeds `text` into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
