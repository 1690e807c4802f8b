use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Four-way fitness classification of the evaluated product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    SuitableStrong,
    SuitableModerate,
    PartialWeak,
    NotSuitable,
}

impl Suitability {
    /// Whether pricing and analysis should run for this verdict
    pub fn proceeds(&self) -> bool {
        !matches!(self, Suitability::NotSuitable)
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suitability::SuitableStrong => "suitable (strong)",
            Suitability::SuitableModerate => "suitable (moderate)",
            Suitability::PartialWeak => "partial (weak)",
            Suitability::NotSuitable => "not suitable",
        };
        write!(f, "{}", s)
    }
}

/// Why a non-selected product lost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RejectedProduct {
    pub product_id: String,
    pub product_name: String,
    pub score: f64,
    pub reason: String,
}

/// Outcome of the suitability evaluation, one per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuitabilityVerdict {
    pub suitability: Suitability,
    pub product_id: String,
    pub product_name: String,
    pub score: f64,
    /// One-line reason for the classification
    pub reason: String,
    /// Multi-line selection justification
    pub justification: String,
    pub rejected_products: Vec<RejectedProduct>,
}
