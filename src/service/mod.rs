pub mod analysis;
pub mod catalog;
pub mod exporter;
pub mod llm;
pub mod matcher;
pub mod orchestrator;
pub mod pricing;
pub mod proposal;
pub mod suitability;

pub use analysis::LlmAnalysisExecutor;
pub use catalog::{Catalog, CatalogRepository};
pub use exporter::ProposalExporter;
pub use llm::LlmClient;
pub use orchestrator::Orchestrator;
pub use proposal::RfpService;
