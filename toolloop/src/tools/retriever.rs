//! `rag` tool: similarity search over a [`VectorIndex`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::retrieval::{ScoredChunk, VectorIndex};
use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

pub const TOOL_RAG: &str = "rag";

/// Chunks returned per query unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 5;

const NO_MATCH: &str = "No matching content found.";

/// Looks up the `query` argument in the index and returns the best chunks as
/// `doc1:\n...`, `doc2:\n...` blocks separated by a blank line.
pub struct RagTool {
    index: Arc<VectorIndex>,
    top_k: usize,
    description: String,
}

impl RagTool {
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOP_K,
            description: "Search the indexed document for words, grammar and conversation \
                          examples relevant to the query."
                .to_string(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Overrides the description advertised to the model.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn format_hits(hits: &[ScoredChunk]) -> String {
        if hits.is_empty() {
            return NO_MATCH.to_string();
        }
        hits.iter()
            .enumerate()
            .map(|(i, hit)| format!("doc{}:\n{}", i + 1, hit.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl Tool for RagTool {
    fn name(&self) -> &str {
        TOOL_RAG
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_RAG.to_string(),
            description: Some(self.description.clone()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "What to look up." }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))?;
        let hits = self
            .index
            .search(query, self.top_k)
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;
        tracing::debug!(query, hits = hits.len(), "rag search");
        Ok(ToolCallContent::new(Self::format_hits(&hits)))
    }
}
