//! Analysis task models
//!
//! `AnalysisOutput` doubles as the LLM extraction schema, so it derives `JsonSchema`.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The fixed set of analysis tasks run for a suitable product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Technical,
    Pricing,
    Sales,
}

impl AnalysisKind {
    /// All kinds in the order they appear in a run result
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Technical,
        AnalysisKind::Pricing,
        AnalysisKind::Sales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Technical => "technical",
            AnalysisKind::Pricing => "pricing",
            AnalysisKind::Sales => "sales",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured output of one analysis task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct AnalysisOutput {
    /// Short prose summary
    pub summary: String,
    /// Facts supporting the summary, taken verbatim from the provided data
    pub key_points: Vec<String>,
    /// Gaps, caveats or risks, taken verbatim from the provided data
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed {
        output: AnalysisOutput,
    },
    /// Task failed; `fallback` is deterministic text built from the task inputs
    Failed {
        error: String,
        fallback: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub kind: AnalysisKind,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Failed { .. })
    }
}
