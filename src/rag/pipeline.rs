//! The question-answering orchestrator.
//!
//! Drives a bounded retrieve → judge → generate loop:
//!
//! ```text
//! Retrieving → Judging → Generating → Done
//!      ^          |
//!      +- Refining (at most max_retries times)
//! ```
//!
//! All run state lives in a `PipelineState` value local to the call, so
//! concurrent runs never see each other's query or retry count.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::error::PipelineError;
use super::generator::AnswerGenerator;
use super::judge::{Decision, SufficiencyJudge};
use super::retriever::Retriever;
use super::store::{ContextChunk, VectorStore};
use crate::core::config::AppConfig;
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

/// Per-run mutable state, created fresh for every incoming question and
/// dropped when the run ends.
///
/// `context` always holds the result of the most recent retrieval for
/// `current_question`; chunks from earlier iterations are replaced, never
/// merged.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub current_question: String,
    pub context: Vec<ContextChunk>,
    pub retry_count: u32,
    pub answer: Option<String>,
}

impl PipelineState {
    fn new(question: &str) -> Self {
        Self {
            current_question: question.to_string(),
            context: Vec::new(),
            retry_count: 0,
            answer: None,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub answer: String,
    /// Number of query refinements performed (0 when the first retrieval
    /// sufficed).
    pub retries: u32,
    /// The query the final context was retrieved for; differs from the
    /// submitted question when refinement occurred.
    pub final_query: String,
}

/// Outcome of a streamed run: the answer arrives as fragments on
/// `receiver`.
pub struct AnswerStream {
    pub retries: u32,
    pub final_query: String,
    pub receiver: mpsc::Receiver<Result<String, ApiError>>,
}

pub struct AnswerPipeline {
    retriever: Retriever,
    judge: SufficiencyJudge,
    generator: AnswerGenerator,
}

impl AnswerPipeline {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            retriever: Retriever::new(llm.clone(), store, config.vector_store.top_k),
            judge: SufficiencyJudge::new(
                llm.clone(),
                config.llm.clone(),
                config.pipeline.max_retries,
            ),
            generator: AnswerGenerator::new(llm, config.llm.clone()),
        }
    }

    /// Answer `question` in one shot.
    ///
    /// Any fatal collaborator error aborts the run; no partial answer is
    /// ever returned.
    pub async fn answer(&self, question: &str) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let mut state = self.resolve_context(run_id, question).await?;

        let answer = self
            .generator
            .generate(&state.current_question, &state.context)
            .await?;
        tracing::info!(%run_id, retries = state.retry_count, "Run complete");

        state.answer = Some(answer.clone());
        Ok(PipelineRun {
            answer,
            retries: state.retry_count,
            final_query: state.current_question,
        })
    }

    /// Same contract as [`answer`](Self::answer), but the generated text
    /// is streamed as fragments instead of returned as one block.
    pub async fn stream_answer(&self, question: &str) -> Result<AnswerStream, PipelineError> {
        let run_id = Uuid::new_v4();
        let state = self.resolve_context(run_id, question).await?;

        let receiver = self
            .generator
            .stream(&state.current_question, &state.context)
            .await?;
        tracing::info!(%run_id, retries = state.retry_count, "Streaming answer");

        Ok(AnswerStream {
            retries: state.retry_count,
            final_query: state.current_question,
            receiver,
        })
    }

    /// Drive the retrieve → judge loop until the judge proceeds.
    ///
    /// The judge forces `Proceed` once `retry_count` reaches the bound, so
    /// this loop runs at most `max_retries + 1` retrieval cycles.
    async fn resolve_context(
        &self,
        run_id: Uuid,
        question: &str,
    ) -> Result<PipelineState, PipelineError> {
        let mut state = PipelineState::new(question);

        loop {
            state.context = self.retriever.retrieve(&state.current_question).await?;
            tracing::debug!(
                %run_id,
                chunks = state.context.len(),
                retry = state.retry_count,
                "Retrieved context"
            );

            match self
                .judge
                .assess(&state.current_question, &state.context, state.retry_count)
                .await?
            {
                Decision::Proceed => return Ok(state),
                Decision::Refine { new_query } => {
                    state.retry_count += 1;
                    tracing::info!(%run_id, retry = state.retry_count, "Refining query");
                    state.current_question = new_query;
                }
            }
        }
    }
}
