//! Caller boundary: load an RFP by id, run it, and export the result

use std::sync::Arc;
use std::time::Duration;

use crate::model::{EvaluationConfig, RunResult};
use crate::service::catalog::{CatalogError, CatalogRepository};
use crate::service::exporter::ProposalExporter;
use crate::service::orchestrator::{CancelSignal, Orchestrator, RunError, cancel_pair};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Run(#[from] RunError),
}

pub struct RfpService {
    repository: CatalogRepository,
    config: Arc<EvaluationConfig>,
    orchestrator: Orchestrator,
    run_timeout: Duration,
    exporter: Option<ProposalExporter>,
}

impl RfpService {
    pub fn new(
        repository: CatalogRepository,
        config: Arc<EvaluationConfig>,
        orchestrator: Orchestrator,
        run_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            config,
            orchestrator,
            run_timeout,
            exporter: None,
        }
    }

    pub fn with_exporter(mut self, exporter: ProposalExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub async fn process(&self, rfp_id: &str) -> Result<RunResult, ProcessError> {
        self.process_with_cancel(rfp_id, CancelSignal::never()).await
    }

    /// Process an RFP, cancelling the run when `external` fires or the run timeout elapses
    pub async fn process_with_cancel(
        &self,
        rfp_id: &str,
        mut external: CancelSignal,
    ) -> Result<RunResult, ProcessError> {
        let rfp = self.repository.load_rfp(rfp_id, &self.config).await?;

        let (handle, signal) = cancel_pair();
        let run = self.orchestrator.run(&rfp, signal);
        tokio::pin!(run);
        let deadline = tokio::time::sleep(self.run_timeout);
        tokio::pin!(deadline);

        let mut cancelled = false;
        let result = loop {
            tokio::select! {
                result = &mut run => break result,
                _ = &mut deadline, if !cancelled => {
                    tracing::warn!(
                        rfp = %rfp.id,
                        timeout_secs = self.run_timeout.as_secs(),
                        "Run timed out, cancelling"
                    );
                    cancelled = true;
                    handle.cancel();
                }
                _ = external.cancelled(), if !cancelled => {
                    tracing::info!(rfp = %rfp.id, "Run cancelled by caller");
                    cancelled = true;
                    handle.cancel();
                }
            }
        }?;

        if let Some(exporter) = &self.exporter
            && let Err(e) = exporter.export(&result).await
        {
            tracing::warn!(rfp = %result.rfp_id, error = %e, "Failed to export proposal");
        }

        Ok(result)
    }
}
