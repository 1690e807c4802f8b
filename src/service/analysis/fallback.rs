//! Deterministic text used when an analysis task fails

use super::AnalysisContext;
use crate::model::AnalysisKind;

/// Plain summary built only from the task inputs
pub fn fallback_text(kind: AnalysisKind, context: &AnalysisContext) -> String {
    let best = &context.best_match;
    let pricing = &context.pricing;
    let rfp = &context.rfp;

    match kind {
        AnalysisKind::Technical => {
            let matched = if best.matched_specs.is_empty() {
                "None".to_string()
            } else {
                best.matched_specs.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
            };
            let missing = if best.unmatched_requirements.is_empty() {
                "None".to_string()
            } else {
                rfp.requirement_texts(&best.unmatched_requirements)
                    .take(3)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "Technical Analysis for {}:\nMatch Score: {}%\nSuitability: {}\nMatched Specs: {}\nMissing Requirements: {}",
                best.product_name,
                best.score_percent(),
                context.verdict.suitability,
                matched,
                missing
            )
        }
        AnalysisKind::Pricing => format!(
            "Pricing for {}:\nBase Price: ${:.2}\nTesting Costs: ${:.2}\nMarkup ({}%): ${:.2}\nTotal: ${:.2}",
            pricing.product_name,
            pricing.base_price,
            pricing.total_test_cost,
            pricing.markup_percentage,
            pricing.markup_amount,
            pricing.total_price
        ),
        AnalysisKind::Sales => format!(
            "Proposal for {}\n\nProposed Solution: {}\nMatch Score: {}%\nSuitability: {}\nTotal Price: ${:.2}",
            rfp.title,
            best.product_name,
            best.score_percent(),
            context.verdict.suitability,
            pricing.total_price
        ),
    }
}
