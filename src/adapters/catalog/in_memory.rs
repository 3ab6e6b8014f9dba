//! In-memory product store for testing and local runs.
//!
//! Holds records with optional precomputed embeddings (the offline batch
//! job's output, seeded directly here) and a part/model fitment table.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::ports::{Compatibility, ProductRecord, ProductStore, ScoredProduct, StoreError};

/// In-memory product store.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<(ProductRecord, Option<Vec<f32>>)>>,
    /// (part_number, model_number) -> fits, both keys uppercased.
    fitment: RwLock<HashMap<(String, String), bool>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record without an embedding.
    pub async fn insert(&self, record: ProductRecord) {
        self.products.write().await.push((record, None));
    }

    /// Inserts a record with its precomputed embedding.
    pub async fn insert_with_embedding(&self, record: ProductRecord, embedding: Vec<f32>) {
        self.products.write().await.push((record, Some(embedding)));
    }

    /// Records whether a part fits a model.
    pub async fn set_fitment(&self, part_number: &str, model_number: &str, fits: bool) {
        self.fitment.write().await.insert(
            (part_number.to_uppercase(), model_number.to_uppercase()),
            fits,
        );
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_part_number(
        &self,
        part_number: &str,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let needle = part_number.to_uppercase();
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|(record, _)| record.part_number.to_uppercase() == needle)
            .map(|(record, _)| record.clone())
            .collect())
    }

    async fn search_similar(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredProduct>, StoreError> {
        if embedding.is_empty() {
            return Err(StoreError::InvalidQuery("empty query embedding".into()));
        }
        let products = self.products.read().await;
        let mut scored: Vec<ScoredProduct> = products
            .iter()
            .filter_map(|(record, stored)| {
                stored.as_ref().map(|vector| ScoredProduct {
                    product: record.clone(),
                    score: cosine(embedding, vector),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    async fn check_compatibility(
        &self,
        part_number: &str,
        model_number: &str,
    ) -> Result<Compatibility, StoreError> {
        let key = (part_number.to_uppercase(), model_number.to_uppercase());
        let fitment = self.fitment.read().await;
        Ok(match fitment.get(&key) {
            Some(true) => Compatibility {
                compatible: true,
                detail: format!("Part {} fits model {}.", key.0, key.1),
            },
            Some(false) => Compatibility {
                compatible: false,
                detail: format!("Part {} does not fit model {}.", key.0, key.1),
            },
            None => Compatibility {
                compatible: false,
                detail: format!(
                    "No fitment data for part {} and model {}; please verify with the manufacturer.",
                    key.0, key.1
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(part_number: &str, name: &str) -> ProductRecord {
        ProductRecord {
            part_number: part_number.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: 24.99,
            product_url: None,
            install_guide_url: None,
        }
    }

    #[tokio::test]
    async fn exact_lookup_is_case_insensitive() {
        let store = InMemoryProductStore::new();
        store.insert(record("PS11752778", "Door shelf bin")).await;

        let found = store.find_by_part_number("ps11752778").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Door shelf bin");
        assert!(store.find_by_part_number("PS000").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn similarity_returns_top_k_in_score_order() {
        let store = InMemoryProductStore::new();
        store
            .insert_with_embedding(record("PS1", "close"), vec![1.0, 0.0])
            .await;
        store
            .insert_with_embedding(record("PS2", "closer"), vec![0.9, 0.1])
            .await;
        store
            .insert_with_embedding(record("PS3", "far"), vec![0.0, 1.0])
            .await;

        let results = store.search_similar(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product.part_number, "PS1");
        assert_eq!(results[1].product.part_number, "PS2");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn empty_query_embedding_is_invalid() {
        let store = InMemoryProductStore::new();
        assert!(matches!(
            store.search_similar(&[], 3).await,
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn compatibility_lookup_covers_known_and_unknown_pairs() {
        let store = InMemoryProductStore::new();
        store.set_fitment("PS11752778", "WDT780SAEM1", true).await;
        store.set_fitment("PS11752778", "OTHER1", false).await;

        let fits = store
            .check_compatibility("ps11752778", "wdt780saem1")
            .await
            .unwrap();
        assert!(fits.compatible);

        let no_fit = store.check_compatibility("PS11752778", "OTHER1").await.unwrap();
        assert!(!no_fit.compatible);

        let unknown = store.check_compatibility("PS404", "XYZ999A").await.unwrap();
        assert!(!unknown.compatible);
        assert!(unknown.detail.contains("No fitment data"));
    }
}
