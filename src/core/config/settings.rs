use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::core::errors::ApiError;

/// Top-level application configuration, loaded from `config.yml`.
///
/// Every section and field has a default so a missing or partial file
/// still yields a runnable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind; 0 lets the OS pick (the chosen port is printed on
    /// startup). Overridden by the `PORT` environment variable.
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible completion/embedding server.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<i32>,
    #[serde(default = "default_llm_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: None,
            max_tokens: None,
            request_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Base URL of the Qdrant REST endpoint.
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Number of chunks returned per similarity search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_store_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            collection: default_collection(),
            top_k: default_top_k(),
            request_timeout_secs: default_store_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on query-refinement retries per question. Once reached,
    /// answer generation proceeds with whatever context is at hand.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

fn default_llm_base_url() -> String {
    "http://127.0.0.1:8088".to_string()
}

fn default_chat_model() -> String {
    "default".to_string()
}

fn default_embedding_model() -> String {
    "embedding".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_store_url() -> String {
    "http://127.0.0.1:6333".to_string()
}

fn default_collection() -> String {
    "quorum_documents".to_string()
}

fn default_top_k() -> usize {
    4
}

fn default_store_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

impl AppConfig {
    /// Load configuration from disk.
    ///
    /// Resolution order: `QUORUM_CONFIG_PATH` env var, then
    /// `<user_data_dir>/config.yml`, then `<project_root>/config.yml`.
    /// A missing file yields the defaults.
    pub fn load(paths: &AppPaths) -> Result<Self, ApiError> {
        let path = Self::config_path(paths);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| ApiError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ApiError::Internal(format!("Invalid config {}: {}", path.display(), e)))
    }

    pub fn config_path(paths: &AppPaths) -> PathBuf {
        if let Ok(path) = env::var("QUORUM_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        paths.project_root.join("config.yml")
    }
}
