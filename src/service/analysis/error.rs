//! Error types for analysis tasks

use thiserror::Error;

/// Failure of a single analysis task; recorded in the run result, never fatal to the run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("LLM output rejected: {0}")]
    InvalidOutput(String),
}
