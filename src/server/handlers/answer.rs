use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

pub async fn get_answer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let run = state.pipeline.answer(&payload.question).await?;
    Ok(Json(json!({ "answer": run.answer })))
}

/// Streaming variant of `/get_answer`: the retrieval/judgment loop runs
/// to completion first, then the generated answer is relayed as SSE data
/// events.
pub async fn get_answer_stream(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let answer_stream = state.pipeline.stream_answer(&payload.question).await?;

    let stream = futures_util::stream::unfold(answer_stream.receiver, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
    .map(|item| match item {
        Ok(fragment) => Ok(Event::default().data(fragment)),
        Err(err) => {
            tracing::error!("Answer stream failed: {}", err);
            Ok(Event::default()
                .event("error")
                .data("Error: answer stream failed"))
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
