//! Grounded answer generation.
//!
//! Builds a fixed instruction prompt from the question and the retrieved
//! context and invokes the completion model, either one-shot or streamed.
//! The model is told to answer from the given context only and to fall
//! back to a fixed sentence when the answer is not in it.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::error::PipelineError;
use super::store::{join_chunk_contents, ContextChunk};
use crate::core::config::LlmConfig;
use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Sentence the model is instructed to reply with when the context does
/// not support an answer. Receiving it is a successful run, not an error.
pub const NO_ANSWER_FALLBACK: &str = "I'm sorry, I don't have that information at the moment. \
Let me check and get back to you with the details.";

pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
    llm_config: LlmConfig,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, llm_config: LlmConfig) -> Self {
        Self { llm, llm_config }
    }

    /// Generate the final answer in one shot. The model output is
    /// returned verbatim; a model failure is fatal and not retried here.
    pub async fn generate(
        &self,
        question: &str,
        context: &[ContextChunk],
    ) -> Result<String, PipelineError> {
        let request = self.build_request(question, context);
        self.llm
            .chat(request)
            .await
            .map_err(PipelineError::Generation)
    }

    /// Streaming variant: yields answer fragments as the model produces
    /// them. Concatenated, the fragments equal the one-shot answer.
    pub async fn stream(
        &self,
        question: &str,
        context: &[ContextChunk],
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, PipelineError> {
        let request = self.build_request(question, context);
        self.llm
            .stream_chat(request)
            .await
            .map_err(PipelineError::Generation)
    }

    fn build_request(&self, question: &str, context: &[ContextChunk]) -> ChatRequest {
        let prompt = build_answer_prompt(question, context);
        ChatRequest::new(vec![ChatMessage::user(prompt)]).with_config(&self.llm_config)
    }
}

fn build_answer_prompt(question: &str, context: &[ContextChunk]) -> String {
    format!(
        "You are an assistant for question-answering tasks. Use the following pieces of retrieved \
context to answer the question. If you don't know the answer, just say that '{}'. Use three \
sentences maximum and keep the answer concise.\n\
Question: {}\n\
Context: {}\n\
Answer:",
        NO_ANSWER_FALLBACK,
        question,
        join_chunk_contents(context)
    )
}
