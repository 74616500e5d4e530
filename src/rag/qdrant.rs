//! Qdrant REST client for the `VectorStore` trait.
//!
//! Talks to a running Qdrant instance over its HTTP API. Only the two
//! read-side operations the pipeline needs are implemented: point search
//! and collection count.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::store::{ContextChunk, VectorStore};
use crate::core::config::VectorStoreConfig;
use crate::core::errors::ApiError;

#[derive(Clone)]
pub struct QdrantStore {
    base_url: String,
    collection: String,
    client: Client,
}

impl QdrantStore {
    pub fn new(config: &VectorStoreConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::internal)?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            client,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ContextChunk>, ApiError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );

        let body = json!({
            "vector": query_embedding,
            "limit": limit,
            "with_payload": true,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!("Vector search error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        Ok(parse_search_response(&payload))
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let url = format!(
            "{}/collections/{}/points/count",
            self.base_url, self.collection
        );

        let res = self
            .client
            .post(&url)
            .json(&json!({ "exact": true }))
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!("Vector count error: {}", text)));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        Ok(payload["result"]["count"].as_u64().unwrap_or(0) as usize)
    }
}

fn parse_search_response(payload: &Value) -> Vec<ContextChunk> {
    let mut chunks = Vec::new();
    if let Some(results) = payload["result"].as_array() {
        for point in results {
            let content = point["payload"]["content"].as_str().unwrap_or_default();
            if content.is_empty() {
                continue;
            }
            let source = point["payload"]["source"].as_str().unwrap_or("unknown");
            chunks.push(ContextChunk {
                content: content.to_string(),
                source: source.to_string(),
                score: point["score"].as_f64().map(|s| s as f32),
            });
        }
    }
    chunks
}
