//! Context sufficiency assessment.
//!
//! Asks the completion model whether the retrieved context can answer the
//! question. The model signals sufficiency with an exact sentinel string;
//! any other output is taken verbatim as a refined search query. A hard
//! retry bound forces generation once refinement has been attempted
//! `max_retries` times, so the pipeline always terminates.

use std::sync::Arc;

use super::error::PipelineError;
use super::store::{join_chunk_contents, ContextChunk};
use crate::core::config::LlmConfig;
use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Exact reply the model must produce to signal sufficient context.
/// Compared without trimming or case folding.
pub const SUFFICIENT_CONTEXT_SENTINEL: &str = "Enough context";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Context is adequate; generate the final answer.
    Proceed,
    /// Context is inadequate; retry retrieval with this query.
    Refine { new_query: String },
}

pub struct SufficiencyJudge {
    llm: Arc<dyn LlmProvider>,
    llm_config: LlmConfig,
    max_retries: u32,
}

impl SufficiencyJudge {
    pub fn new(llm: Arc<dyn LlmProvider>, llm_config: LlmConfig, max_retries: u32) -> Self {
        Self {
            llm,
            llm_config,
            max_retries,
        }
    }

    /// Decide whether `context` suffices to answer `question`.
    ///
    /// Once `retry_count` reaches the bound, `Proceed` is returned
    /// unconditionally without consulting the model, even for empty
    /// context.
    pub async fn assess(
        &self,
        question: &str,
        context: &[ContextChunk],
        retry_count: u32,
    ) -> Result<Decision, PipelineError> {
        if retry_count >= self.max_retries {
            tracing::debug!(retry_count, "Retry bound reached, forcing generation");
            return Ok(Decision::Proceed);
        }

        let prompt = build_assessment_prompt(question, context);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]).with_config(&self.llm_config);

        let response = self
            .llm
            .chat(request)
            .await
            .map_err(PipelineError::Generation)?;

        if response.is_empty() {
            return Err(PipelineError::Generation(ApiError::Internal(
                "sufficiency assessment returned an empty response".to_string(),
            )));
        }

        if response == SUFFICIENT_CONTEXT_SENTINEL {
            Ok(Decision::Proceed)
        } else {
            Ok(Decision::Refine {
                new_query: response,
            })
        }
    }
}

fn build_assessment_prompt(question: &str, context: &[ContextChunk]) -> String {
    format!(
        "You are an assistant for providing better queries for question-answering tasks if needed. \
Use the following pieces of retrieved context to assess whether there is enough context for the \
question to be answered. If you require more context, only generate a new search query to be used \
for retrieval. If you are confident that the context is enough, only say '{}' NOTHING MORE NOTHING LESS.\n\
Question: {}\n\
Context: {}\n",
        SUFFICIENT_CONTEXT_SENTINEL,
        question,
        join_chunk_contents(context)
    )
}
