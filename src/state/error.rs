use thiserror::Error;

use crate::core::errors::ApiError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] ApiError),

    #[error("Failed to initialize completion provider: {0}")]
    Llm(#[source] ApiError),

    #[error("Failed to initialize vector store client: {0}")]
    VectorStore(#[source] ApiError),
}
