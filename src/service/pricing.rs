//! Cost breakdown for the selected product
//!
//! Formula: `(base_price + test costs) * (1 + markup_percentage / 100)`

use crate::model::{EvaluationConfig, PricingBreakdown, PricingTable, Product, TestCost};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Unknown test '{test_id}' required by product {product_id}")]
    UnknownTest { product_id: String, test_id: String },
}

/// Price a product
///
/// Uses the product's own required tests, or the configured default tests when it lists none.
pub fn price(
    product: &Product,
    config: &EvaluationConfig,
    table: &PricingTable,
) -> Result<PricingBreakdown, PricingError> {
    let test_ids = if product.required_tests.is_empty() {
        &config.default_tests
    } else {
        &product.required_tests
    };

    let test_costs = test_ids
        .iter()
        .map(|test_id| {
            table
                .get(test_id)
                .map(|entry| TestCost {
                    test_id: entry.test_id.clone(),
                    cost: entry.cost,
                    description: entry.description.clone(),
                })
                .ok_or_else(|| PricingError::UnknownTest {
                    product_id: product.id.clone(),
                    test_id: test_id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_test_cost: f64 = test_costs.iter().map(|t| t.cost).sum();
    let subtotal = product.base_price + total_test_cost;
    let markup_amount = subtotal * (config.markup_percentage / 100.0);
    let total_price = subtotal + markup_amount;

    tracing::debug!(
        product = %product.id,
        tests = test_costs.len(),
        subtotal = subtotal,
        total_price = total_price,
        "Pricing calculated"
    );

    Ok(PricingBreakdown {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        base_price: product.base_price,
        test_costs,
        total_test_cost,
        subtotal,
        markup_percentage: config.markup_percentage,
        markup_amount,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestPricing;

    fn table() -> PricingTable {
        PricingTable::new(vec![
            TestPricing {
                test_id: "security_audit".to_string(),
                cost: 100.0,
                description: "Security audit".to_string(),
            },
            TestPricing {
                test_id: "integration_test".to_string(),
                cost: 50.0,
                description: "Integration testing".to_string(),
            },
            TestPricing {
                test_id: "load_test".to_string(),
                cost: 400.0,
                description: String::new(),
            },
        ])
    }

    fn product(required_tests: &[&str]) -> Product {
        Product {
            id: "prod-001".to_string(),
            name: "CloudGuard Firewall Pro".to_string(),
            specs: vec![],
            base_price: 1000.0,
            required_tests: required_tests.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_breakdown_with_default_tests() {
        let breakdown = price(&product(&[]), &EvaluationConfig::default(), &table()).unwrap();

        assert_eq!(breakdown.total_test_cost, 150.0);
        assert_eq!(breakdown.subtotal, 1150.0);
        assert_eq!(breakdown.markup_amount, 287.5);
        assert_eq!(breakdown.total_price, 1437.5);
        assert_eq!(breakdown.test_costs.len(), 2);
    }

    #[test]
    fn test_product_tests_replace_defaults() {
        let breakdown = price(&product(&["load_test"]), &EvaluationConfig::default(), &table()).unwrap();

        assert_eq!(breakdown.test_costs.len(), 1);
        assert_eq!(breakdown.test_costs[0].test_id, "load_test");
        assert_eq!(breakdown.total_price, (1000.0 + 400.0) * 1.25);
    }

    #[test]
    fn test_unknown_test() {
        let result = price(&product(&["penetration_test"]), &EvaluationConfig::default(), &table());

        match result {
            Err(PricingError::UnknownTest { test_id, .. }) => assert_eq!(test_id, "penetration_test"),
            other => panic!("expected UnknownTest, got {:?}", other),
        }
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let config = EvaluationConfig::default();
        let table = table();
        let product = product(&["security_audit", "load_test"]);

        assert_eq!(
            price(&product, &config, &table).unwrap(),
            price(&product, &config, &table).unwrap()
        );
    }

    #[test]
    fn test_zero_markup() {
        let config = EvaluationConfig {
            markup_percentage: 0.0,
            ..EvaluationConfig::default()
        };
        let breakdown = price(&product(&[]), &config, &table()).unwrap();

        assert_eq!(breakdown.markup_amount, 0.0);
        assert_eq!(breakdown.total_price, breakdown.subtotal);
    }
}
