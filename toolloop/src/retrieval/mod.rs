//! Document retrieval for the `rag` tool: load a text document, split it into
//! overlapping chunks, embed them and answer similarity queries from a persisted index.

mod embedder;
mod loader;
mod splitter;
mod vector_index;

pub use embedder::{Embedder, OpenAIEmbedder, DEFAULT_EMBEDDING_MODEL};
pub use loader::load_document;
pub use splitter::RecursiveCharacterSplitter;
pub use vector_index::{ScoredChunk, VectorIndex, DEFAULT_COLLECTION, DEFAULT_PERSIST_DIR};

use thiserror::Error;

/// Errors from loading, embedding or persisting documents.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The document to index does not exist.
    #[error("document not found: {0}")]
    SourceNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for RetrievalError {
    fn from(e: rusqlite::Error) -> Self {
        RetrievalError::Storage(e.to_string())
    }
}
