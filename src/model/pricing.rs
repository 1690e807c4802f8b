use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry of the pricing table (`pricing.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPricing {
    #[serde(alias = "test_name")]
    pub test_id: String,
    pub cost: f64,
    #[serde(default)]
    pub description: String,
}

/// Test costs keyed by test id
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    tests: HashMap<String, TestPricing>,
}

impl PricingTable {
    pub fn new(entries: Vec<TestPricing>) -> Self {
        let tests = entries
            .into_iter()
            .map(|entry| (entry.test_id.clone(), entry))
            .collect();
        Self { tests }
    }

    pub fn get(&self, test_id: &str) -> Option<&TestPricing> {
        self.tests.get(test_id)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// One priced test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestCost {
    pub test_id: String,
    pub cost: f64,
    pub description: String,
}

/// Cost breakdown for the selected product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricingBreakdown {
    pub product_id: String,
    pub product_name: String,
    pub base_price: f64,
    pub test_costs: Vec<TestCost>,
    pub total_test_cost: f64,
    /// Base price plus tests, before markup
    pub subtotal: f64,
    pub markup_percentage: f64,
    pub markup_amount: f64,
    pub total_price: f64,
}
