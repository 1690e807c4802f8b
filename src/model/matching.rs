use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Score of one catalog product against one RFP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchResult {
    pub product_id: String,
    pub product_name: String,
    /// Fraction of requirements matched, always within [0, 1]
    pub score: f64,
    pub matched_requirements: Vec<String>,
    pub unmatched_requirements: Vec<String>,
    /// Subset of `unmatched_requirements` flagged critical
    pub unmatched_critical: Vec<String>,
    /// Product specs that satisfied at least one requirement, deduplicated
    pub matched_specs: Vec<String>,
}

impl MatchResult {
    pub fn has_critical_gap(&self) -> bool {
        !self.unmatched_critical.is_empty()
    }

    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}
