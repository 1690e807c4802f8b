//! Writes finished runs to the output directory as pretty-printed JSON

use std::path::{Path, PathBuf};

use crate::model::RunResult;

/// Filename-safe timestamp, e.g. `2026-03-01T10-15-30`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize proposal: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ProposalExporter {
    output_dir: PathBuf,
}

impl ProposalExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `proposal_<rfp_id>_<timestamp>.json`, creating the directory if needed
    pub async fn export(&self, result: &RunResult) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(file_name(result));
        let json = serde_json::to_string_pretty(result)?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(rfp = %result.rfp_id, path = %path.display(), "Proposal exported");

        Ok(path)
    }
}

fn file_name(result: &RunResult) -> String {
    format!(
        "proposal_{}_{}.json",
        result.rfp_id,
        result.generated_at.format(TIMESTAMP_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchResult, Suitability, SuitabilityVerdict};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn skipped_result() -> RunResult {
        RunResult {
            rfp_id: "rfp1".to_string(),
            rfp_title: "Enterprise Security Solution".to_string(),
            verdict: SuitabilityVerdict {
                suitability: Suitability::NotSuitable,
                product_id: "prod-002".to_string(),
                product_name: "SecureVault".to_string(),
                score: 0.5,
                reason: "Missing critical requirements: encryption".to_string(),
                justification: String::new(),
                rejected_products: vec![],
            },
            best_match: MatchResult {
                product_id: "prod-002".to_string(),
                product_name: "SecureVault".to_string(),
                score: 0.5,
                matched_requirements: vec!["REQ-002".to_string()],
                unmatched_requirements: vec!["REQ-001".to_string()],
                unmatched_critical: vec!["REQ-001".to_string()],
                matched_specs: vec!["24x7 support".to_string()],
            },
            pricing: None,
            analyses: vec![],
            total_value: 0.0,
            generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 15, 30).unwrap(),
        }
    }

    #[test]
    fn test_file_name_is_filesystem_safe() {
        assert_eq!(
            file_name(&skipped_result()),
            "proposal_rfp1_2026-03-01T10-15-30.json"
        );
    }

    #[tokio::test]
    async fn test_export_writes_readable_json() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let exporter = ProposalExporter::new(dir.path().join("nested"));
        let result = skipped_result();

        let path = exporter.export(&result).await.unwrap();

        assert!(path.starts_with(exporter.output_dir()));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"rfp_id\": \"rfp1\""));
        let parsed: RunResult = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, result);
    }
}
