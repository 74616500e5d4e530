use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let indexed_chunks = state.store.count().await.unwrap_or(0);
    let provider_healthy = state.llm.health_check().await.unwrap_or(false);
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();

    Ok(Json(json!({
        "status": "ok",
        "uptime_secs": uptime_secs,
        "indexed_chunks": indexed_chunks,
        "provider_healthy": provider_healthy,
        "max_retries": state.config.pipeline.max_retries,
    })))
}
