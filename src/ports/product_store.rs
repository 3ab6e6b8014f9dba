//! Product store port - structured catalog lookups.
//!
//! The store itself (and the offline batch job that produces product
//! embeddings) lives outside this core; the live request path only performs
//! exact lookups, similarity queries and compatibility checks through this
//! boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::agent::ProductRef;

/// A structured product record from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub part_number: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_guide_url: Option<String>,
}

impl ProductRecord {
    /// Projects the record into the response-envelope reference shape.
    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            part_number: self.part_number.clone(),
            name: self.name.clone(),
            price: Some(self.price),
            url: self.product_url.clone(),
        }
    }
}

/// A product with its similarity score from a nearest-neighbor query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub product: ProductRecord,
    /// Cosine similarity in [-1, 1]; higher is closer.
    pub score: f32,
}

/// Result of a part/model compatibility lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub compatible: bool,
    /// Human-readable detail for the response message.
    pub detail: String,
}

/// Product store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("product store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Port for catalog lookups.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Exact lookup by part identifier, case-insensitive.
    ///
    /// Returns zero or more records (a part number can map to several
    /// packagings).
    async fn find_by_part_number(
        &self,
        part_number: &str,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// Top-`k` nearest records to `embedding` with similarity scores.
    async fn search_similar(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredProduct>, StoreError>;

    /// Whether `part_number` fits `model_number`, with human-readable detail.
    async fn check_compatibility(
        &self,
        part_number: &str,
        model_number: &str,
    ) -> Result<Compatibility, StoreError>;
}
