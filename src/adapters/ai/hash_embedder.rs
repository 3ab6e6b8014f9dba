//! Deterministic feature-hashing embedder.
//!
//! Stand-in for a real embedding provider in tests and local runs: hashes
//! word trigrams into a fixed-width vector and L2-normalizes it, so cosine
//! similarity behaves sensibly for overlapping vocabulary. Catalog fixtures
//! embedded with the same hasher land in the same space.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::ports::{ProviderError, QueryEmbedder};

/// Vector width of the hashed space.
pub const HASH_EMBEDDING_DIM: usize = 256;

/// Feature-hashing embedder over lowercased word trigrams.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embeds synchronously; the async trait method delegates here.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; HASH_EMBEDDING_DIM];
        for word in text.to_lowercase().split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            if chars.len() < 3 {
                bump(&mut vector, word);
                continue;
            }
            for gram in chars.windows(3) {
                let gram: String = gram.iter().collect();
                bump(&mut vector, &gram);
            }
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn bump(vector: &mut [f32], feature: &str) {
    let mut hasher = DefaultHasher::new();
    feature.hash(&mut hasher);
    let idx = (hasher.finish() as usize) % vector.len();
    vector[idx] += 1.0;
}

#[async_trait]
impl QueryEmbedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn deterministic_and_normalized() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed_sync("dishwasher drain pump");
        let b = embedder.embed_sync("dishwasher drain pump");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn related_text_scores_higher_than_unrelated() {
        let embedder = HashEmbedder::new();
        let query = embedder.embed_sync("dishwasher drain pump leaking");
        let related = embedder.embed_sync("drain pump for dishwasher");
        let unrelated = embedder.embed_sync("refrigerator ice maker bin");
        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }
}
