use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AnalysisKind, AnalysisResult, MatchResult, PricingBreakdown, SuitabilityVerdict};

/// Terminal artifact of a run, handed to the proposal assembler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RunResult {
    pub rfp_id: String,
    pub rfp_title: String,
    pub verdict: SuitabilityVerdict,
    /// The evaluated top candidate
    pub best_match: MatchResult,
    /// Present iff the verdict is not `not_suitable`
    pub pricing: Option<PricingBreakdown>,
    /// Technical, pricing and sales results in that order; empty when skipped
    pub analyses: Vec<AnalysisResult>,
    pub total_value: f64,
    pub generated_at: DateTime<Utc>,
}

impl RunResult {
    pub fn analysis(&self, kind: AnalysisKind) -> Option<&AnalysisResult> {
        self.analyses.iter().find(|a| a.kind == kind)
    }

    pub fn was_skipped(&self) -> bool {
        self.pricing.is_none() && self.analyses.is_empty()
    }
}
