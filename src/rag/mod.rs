//! Retrieval-augmented question answering with bounded query refinement.
//!
//! This module provides:
//! - `Retriever`: embeds a query and searches the vector store
//! - `SufficiencyJudge`: decides whether retrieved context can answer the question
//! - `AnswerGenerator`: produces the final grounded answer (one-shot or streamed)
//! - `AnswerPipeline`: the bounded retrieve → judge → generate loop

mod error;
mod generator;
mod judge;
mod pipeline;
mod qdrant;
mod retriever;
mod store;

#[cfg(test)]
pub mod testing;

pub use error::PipelineError;
pub use generator::{AnswerGenerator, NO_ANSWER_FALLBACK};
pub use judge::{Decision, SufficiencyJudge, SUFFICIENT_CONTEXT_SENTINEL};
pub use pipeline::{AnswerPipeline, AnswerStream, PipelineRun, PipelineState};
pub use qdrant::QdrantStore;
pub use retriever::Retriever;
pub use store::{join_chunk_contents, ContextChunk, VectorStore};
