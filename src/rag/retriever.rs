//! Query-to-context retrieval.
//!
//! Embeds the query and runs a top-k similarity search against the
//! vector store. Read-only; the store is never written to from here.

use std::sync::Arc;

use super::error::PipelineError;
use super::store::{ContextChunk, VectorStore};
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

pub struct Retriever {
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self { llm, store, top_k }
    }

    /// Retrieve the top-k chunks for `query`, best match first.
    ///
    /// An empty or whitespace-only query is a usage error and is rejected
    /// before any I/O. Store or embedder failures are fatal for the run;
    /// there is no partial or cached fallback.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ContextChunk>, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let embeddings = self
            .llm
            .embed(&[query.to_string()])
            .await
            .map_err(PipelineError::Retrieval)?;

        let query_embedding = embeddings.into_iter().next().ok_or_else(|| {
            PipelineError::Retrieval(ApiError::Internal(
                "embedding service returned no vector".to_string(),
            ))
        })?;

        self.store
            .search(&query_embedding, self.top_k)
            .await
            .map_err(PipelineError::Retrieval)
    }
}
