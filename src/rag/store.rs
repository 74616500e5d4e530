//! VectorStore trait: abstract interface over the external similarity index.
//!
//! The index itself is owned and populated elsewhere; this pipeline only
//! reads from it. The primary implementation is `QdrantStore` in the
//! `qdrant` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// A chunk of document text returned by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextChunk {
    /// The text content of the chunk.
    pub content: String,
    /// Source identifier (filename, URL, document id).
    pub source: String,
    /// Similarity score as ranked by the store (higher = better).
    pub score: Option<f32>,
}

impl ContextChunk {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score: None,
        }
    }
}

/// Join chunk contents with a blank-line separator, in retrieval order.
///
/// This is the exact context layout both the sufficiency assessment and the
/// answer prompt are built from; no re-ranking, no deduplication.
pub fn join_chunk_contents(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Abstract trait for similarity-search backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search for the chunks most similar to the query embedding,
    /// best match first.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ContextChunk>, ApiError>;

    /// Total number of indexed chunks.
    async fn count(&self) -> Result<usize, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_preserves_retrieval_order() {
        let chunks = vec![
            ContextChunk::new("first passage", "a.txt"),
            ContextChunk::new("second passage", "b.txt"),
        ];
        assert_eq!(join_chunk_contents(&chunks), "first passage\n\nsecond passage");
    }

    #[test]
    fn join_of_empty_context_is_empty() {
        assert_eq!(join_chunk_contents(&[]), "");
    }
}
