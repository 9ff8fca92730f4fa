//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use toolloop::{Embedder, RetrievalError};

/// Embeds text as counts of a few marker words, so related chunks share a direction.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub embedded: AtomicUsize,
}

pub const KEYWORDS: [&str; 3] = ["cat", "train", "rice"];

impl KeywordEmbedder {
    pub fn embedded(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        self.embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                KEYWORDS
                    .iter()
                    .map(|k| lower.matches(k).count() as f32)
                    .collect()
            })
            .collect())
    }
}
