//! Embedder trait and the OpenAI-compatible embeddings client.

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;

use super::RetrievalError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-m3";

/// Inputs per embeddings request; hosted providers reject larger batches.
const EMBED_BATCH_SIZE: usize = 32;

/// Produces float vectors from text, one per input and in the same order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError>;
}

/// Embeddings over the OpenAI `/embeddings` endpoint (works with any compatible host).
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedder {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::default(), model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let request = CreateEmbeddingRequest {
            input: EmbeddingInput::StringArray(batch.iter().map(|s| s.to_string()).collect()),
            model: self.model.clone(),
            ..Default::default()
        };
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| RetrievalError::Embedding(format!("API error: {}", e)))?;

        let mut data = response.data;
        if data.len() != batch.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                data.len()
            )));
        }
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            tracing::debug!(model = %self.model, batch = batch.len(), "embedding batch");
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
