use thiserror::Error;

use crate::core::errors::ApiError;

/// Fatal failure modes of one question-answering run.
///
/// Retries inside the pipeline are for query refinement only; none of
/// these are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("retrieval failed: {0}")]
    Retrieval(#[source] ApiError),

    #[error("generation failed: {0}")]
    Generation(#[source] ApiError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            PipelineError::Retrieval(source) | PipelineError::Generation(source) => {
                // The caller gets an opaque message; the detail stays in the logs.
                tracing::error!("Pipeline failure: {}", source);
                ApiError::Internal("question answering pipeline failed".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let api: ApiError = PipelineError::InvalidInput("question must not be empty".into()).into();
        match api {
            ApiError::BadRequest(msg) => assert_eq!(msg, "question must not be empty"),
            _ => panic!("expected BadRequest"),
        }
    }

    #[test]
    fn fatal_errors_map_to_opaque_internal() {
        let api: ApiError =
            PipelineError::Retrieval(ApiError::Internal("qdrant: connection refused".into())).into();
        match api {
            ApiError::Internal(msg) => {
                assert_eq!(msg, "question answering pipeline failed");
                assert!(!msg.contains("qdrant"));
            }
            _ => panic!("expected Internal"),
        }
    }
}
