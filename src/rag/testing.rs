//! Scripted collaborator doubles shared by the pipeline test modules.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::judge::SUFFICIENT_CONTEXT_SENTINEL;
use super::store::{ContextChunk, VectorStore};
use crate::core::errors::ApiError;
use crate::llm::provider::LlmProvider;
use crate::llm::types::ChatRequest;

pub fn chunk(content: &str, source: &str) -> ContextChunk {
    ContextChunk::new(content, source)
}

/// Phrase unique to the sufficiency-assessment prompt, used to tell judge
/// calls apart from answer-generation calls.
const JUDGE_PROMPT_MARKER: &str = "assess whether there is enough context";

/// An `LlmProvider` with scripted replies and call counters.
///
/// Judge calls consume `judge_replies` front to back, falling back to
/// `judge_fallback` (the sentinel unless overridden) when the script runs
/// out. Generation calls always return `answer`.
pub struct ScriptedProvider {
    answer: String,
    judge_replies: Mutex<VecDeque<String>>,
    judge_fallback: String,
    stream_fragments: Vec<String>,
    fail_chat: bool,
    fail_embed: bool,
    pub chat_calls: AtomicUsize,
    pub judge_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub embed_calls: AtomicUsize,
    pub last_judge_prompt: Mutex<Option<String>>,
    pub last_generation_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            judge_replies: Mutex::new(VecDeque::new()),
            judge_fallback: SUFFICIENT_CONTEXT_SENTINEL.to_string(),
            stream_fragments: Vec::new(),
            fail_chat: false,
            fail_embed: false,
            chat_calls: AtomicUsize::new(0),
            judge_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            embed_calls: AtomicUsize::new(0),
            last_judge_prompt: Mutex::new(None),
            last_generation_prompt: Mutex::new(None),
        }
    }

    pub fn with_judge_replies(self, replies: Vec<&str>) -> Self {
        *self.judge_replies.lock().unwrap() = replies.into_iter().map(String::from).collect();
        self
    }

    pub fn with_judge_fallback(mut self, fallback: &str) -> Self {
        self.judge_fallback = fallback.to_string();
        self
    }

    pub fn with_stream_fragments(mut self, fragments: Vec<&str>) -> Self {
        self.stream_fragments = fragments.into_iter().map(String::from).collect();
        self
    }

    pub fn failing_chat(mut self) -> Self {
        self.fail_chat = true;
        self
    }

    pub fn failing_embed(mut self) -> Self {
        self.fail_embed = true;
        self
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        if self.fail_chat {
            return Err(ApiError::Internal("scripted chat failure".to_string()));
        }
        self.chat_calls.fetch_add(1, Ordering::SeqCst);

        let prompt = request
            .messages
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        if prompt.contains(JUDGE_PROMPT_MARKER) {
            self.judge_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_judge_prompt.lock().unwrap() = Some(prompt);
            let mut replies = self.judge_replies.lock().unwrap();
            Ok(replies
                .pop_front()
                .unwrap_or_else(|| self.judge_fallback.clone()))
        } else {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_generation_prompt.lock().unwrap() = Some(prompt);
            Ok(self.answer.clone())
        }
    }

    async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        if self.fail_chat {
            return Err(ApiError::Internal("scripted stream failure".to_string()));
        }
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_generation_prompt.lock().unwrap() = request
            .messages
            .first()
            .map(|m| m.content.clone());

        let fragments = if self.stream_fragments.is_empty() {
            vec![self.answer.clone()]
        } else {
            self.stream_fragments.clone()
        };

        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            for fragment in fragments {
                if tx.send(Ok(fragment)).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if self.fail_embed {
            return Err(ApiError::Internal("scripted embed failure".to_string()));
        }
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
    }
}

/// A `VectorStore` returning scripted search results.
///
/// With a sequence, each search pops the next result set; once the
/// sequence is exhausted (or when none was given) `default_result` is
/// returned.
pub struct ScriptedStore {
    default_result: Vec<ContextChunk>,
    sequence: Mutex<VecDeque<Vec<ContextChunk>>>,
    fail: bool,
    pub search_calls: AtomicUsize,
    pub last_limit: AtomicUsize,
}

impl ScriptedStore {
    pub fn with_chunks(chunks: Vec<ContextChunk>) -> Self {
        Self {
            default_result: chunks,
            sequence: Mutex::new(VecDeque::new()),
            fail: false,
            search_calls: AtomicUsize::new(0),
            last_limit: AtomicUsize::new(0),
        }
    }

    pub fn with_sequence(results: Vec<Vec<ContextChunk>>) -> Self {
        let store = Self::with_chunks(Vec::new());
        *store.sequence.lock().unwrap() = results.into();
        store
    }

    pub fn failing() -> Self {
        let mut store = Self::with_chunks(Vec::new());
        store.fail = true;
        store
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn search(
        &self,
        _query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ContextChunk>, ApiError> {
        if self.fail {
            return Err(ApiError::Internal("scripted store failure".to_string()));
        }
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);

        let mut sequence = self.sequence.lock().unwrap();
        Ok(sequence
            .pop_front()
            .unwrap_or_else(|| self.default_result.clone()))
    }

    async fn count(&self) -> Result<usize, ApiError> {
        Ok(self.default_result.len())
    }
}
