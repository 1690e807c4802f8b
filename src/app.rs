//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection for the
//! Actix-web handlers.

use std::sync::Arc;

use crate::model::Config;
use crate::service::{
    Catalog, CatalogRepository, LlmAnalysisExecutor, LlmClient, Orchestrator, ProposalExporter,
    RfpService,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Products and pricing, loaded once and shared read-only by every run
    pub catalog: Arc<Catalog>,
    pub rfp_service: RfpService,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. LLM client initialization (requires OPENAI_API_KEY)
    /// 2. Catalog loading from the data directory
    /// 3. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let llm_client = LlmClient::from_env().map_err(|e| AppError::LlmInit(e.to_string()))?;

        let repository = CatalogRepository::new(&config.data_dir);
        let catalog = Arc::new(
            repository
                .load_catalog()
                .await
                .map_err(|e| AppError::CatalogLoad(e.to_string()))?,
        );

        let evaluation = Arc::new(config.evaluation);
        let orchestrator = Orchestrator::new(
            Arc::clone(&catalog),
            Arc::clone(&evaluation),
            Arc::new(LlmAnalysisExecutor::new(llm_client)),
        );

        let mut rfp_service = RfpService::new(repository, evaluation, orchestrator, config.run_timeout);
        if let Some(output_dir) = config.output_dir {
            let exporter = ProposalExporter::new(output_dir);
            tracing::info!(output_dir = %exporter.output_dir().display(), "Proposal export enabled");
            rfp_service = rfp_service.with_exporter(exporter);
        }

        Ok(Self {
            catalog,
            rfp_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// LLM client could not be created (missing or invalid OPENAI_API_KEY)
    #[error("LLM client initialization failed: {0}")]
    LlmInit(String),

    /// Products or pricing could not be loaded
    #[error("Catalog loading failed: {0}")]
    CatalogLoad(String),
}
