use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry, shared read-only across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Capability and feature keywords matched against RFP requirements
    pub specs: Vec<String>,
    pub base_price: f64,
    /// Test ids that must be priced with this product; empty means the configured defaults
    #[serde(default)]
    pub required_tests: Vec<String>,
}
