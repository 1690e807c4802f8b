pub mod analysis;
pub mod config;
pub mod matching;
pub mod pricing;
pub mod product;
pub mod rfp;
pub mod run;
pub mod suitability;

pub use analysis::{AnalysisKind, AnalysisOutcome, AnalysisOutput, AnalysisResult};
pub use config::{Config, EvaluationConfig};
pub use matching::MatchResult;
pub use pricing::{PricingBreakdown, PricingTable, TestCost, TestPricing};
pub use product::Product;
pub use rfp::{DuplicateRequirementId, Requirement, Rfp, RfpDocument};
pub use run::RunResult;
pub use suitability::{RejectedProduct, Suitability, SuitabilityVerdict};
