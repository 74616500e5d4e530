use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppConfig, AppPaths};
use crate::llm::{LlmProvider, OpenAiCompatProvider};
use crate::rag::{AnswerPipeline, QdrantStore, VectorStore};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Contains references to:
/// - Configuration and paths
/// - The completion/embedding provider
/// - The vector store client
/// - The question-answering pipeline built over both
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub llm: Arc<dyn LlmProvider>,
    pub store: Arc<dyn VectorStore>,
    pub pipeline: AnswerPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Setting up paths and loading configuration
    /// 2. Building the HTTP clients for the completion provider and the
    ///    vector store
    /// 3. Wiring the question-answering pipeline
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());
        let config = AppConfig::load(&paths).map_err(InitializationError::Config)?;

        let llm: Arc<dyn LlmProvider> =
            Arc::new(OpenAiCompatProvider::new(&config.llm).map_err(InitializationError::Llm)?);
        let store: Arc<dyn VectorStore> = Arc::new(
            QdrantStore::new(&config.vector_store).map_err(InitializationError::VectorStore)?,
        );
        let pipeline = AnswerPipeline::new(llm.clone(), store.clone(), &config);

        Ok(Arc::new(AppState {
            paths,
            config,
            llm,
            store,
            pipeline,
            started_at: Utc::now(),
        }))
    }

    /// State backed by scripted collaborators, for handler tests.
    #[cfg(test)]
    pub fn for_tests(
        llm: Arc<crate::rag::testing::ScriptedProvider>,
        store: Arc<crate::rag::testing::ScriptedStore>,
    ) -> Arc<Self> {
        let config = AppConfig::default();
        let llm: Arc<dyn LlmProvider> = llm;
        let store: Arc<dyn VectorStore> = store;
        let pipeline = AnswerPipeline::new(llm.clone(), store.clone(), &config);

        Arc::new(AppState {
            paths: Arc::new(AppPaths {
                project_root: std::env::temp_dir(),
                user_data_dir: std::env::temp_dir(),
                log_dir: std::env::temp_dir(),
            }),
            config,
            llm,
            store,
            pipeline,
            started_at: Utc::now(),
        })
    }
}
