//! Prompts for the technical, pricing and sales analyses

use super::AnalysisContext;
use crate::model::AnalysisKind;

/// System prompt for the technical fit analysis
pub const TECHNICAL_SYSTEM_PROMPT: &str = r#"You are a technical analyst evaluating whether a product meets RFP requirements.

Your job is to:
1. List which RFP requirements are matched by the product
2. List which requirements are missing
3. Assess overall suitability

CRITICAL RULES:
1. Use ONLY the exact requirements from the Matched Requirements and Missing Requirements lists.
2. Do NOT add, infer, assume, paraphrase, generalize or expand any requirement.
3. If a requirement is not in either list, do not mention it.

Put matched requirements in key_points and missing requirements in concerns.
Your output must be structured JSON only and conform to the requested schema."#;

/// System prompt for the pricing explanation
pub const PRICING_SYSTEM_PROMPT: &str = r#"You are a pricing analyst explaining a cost breakdown.

Your job is to:
1. Explain the pricing components (base price, testing, markup)
2. Present the breakdown clearly
3. State the total cost

CRITICAL RULES:
1. Use ONLY the provided pricing data.
2. Do NOT invent value propositions, ROI claims, cost comparisons or savings.
3. Do NOT mention features or capabilities.
4. Be factual and concise.

Put one priced component per entry in key_points. Put budget concerns, if any, in concerns.
Your output must be structured JSON only and conform to the requested schema."#;

/// System prompt for the sales proposal
pub const SALES_SYSTEM_PROMPT: &str = r#"You are a proposal writer creating an honest RFP response.

Your job is to:
1. Summarize the solution
2. Acknowledge strengths and limitations honestly
3. Make a recommendation consistent with the suitability assessment

CRITICAL RULES:
1. Reference only requirements listed in the data below, using their exact wording.
2. Do NOT invent company names, statistics, ROI claims or testimonials.
3. Do NOT create urgency or false claims.
4. If suitability is "suitable", recommend confidently. If "partial", recommend with clear caveats.

Put strengths in key_points and limitations in concerns.
Your output must be structured JSON only and conform to the requested schema."#;

pub fn system_prompt(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Technical => TECHNICAL_SYSTEM_PROMPT,
        AnalysisKind::Pricing => PRICING_SYSTEM_PROMPT,
        AnalysisKind::Sales => SALES_SYSTEM_PROMPT,
    }
}

pub fn build_prompt(kind: AnalysisKind, context: &AnalysisContext) -> String {
    match kind {
        AnalysisKind::Technical => build_technical_prompt(context),
        AnalysisKind::Pricing => build_pricing_prompt(context),
        AnalysisKind::Sales => build_sales_prompt(context),
    }
}

fn list_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined
    }
}

fn build_technical_prompt(context: &AnalysisContext) -> String {
    let rfp = &context.rfp;
    let best = &context.best_match;

    format!(
        r#"Analyze this product match for the RFP.

RFP Details:
Title: {}
Description: {}
Requirements: {}

Selected Product:
Name: {}
Match Score: {:.2}

MATCHED REQUIREMENTS (use these EXACT words):
{}

MISSING REQUIREMENTS (use these EXACT words):
{}

Suitability Assessment: {}
Reason: {}

Provide a factual technical analysis. Reference only requirements from the two lists above."#,
        rfp.title,
        rfp.description,
        list_or_none(rfp.requirements.iter().map(|r| r.text.as_str())),
        best.product_name,
        best.score,
        list_or_none(rfp.requirement_texts(&best.matched_requirements)),
        list_or_none(rfp.requirement_texts(&best.unmatched_requirements)),
        context.verdict.suitability,
        context.verdict.reason,
    )
}

fn build_pricing_prompt(context: &AnalysisContext) -> String {
    let pricing = &context.pricing;

    let tests = if pricing.test_costs.is_empty() {
        "None".to_string()
    } else {
        pricing
            .test_costs
            .iter()
            .map(|t| format!("- {}: ${:.2}", t.test_id, t.cost))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let budget = context
        .rfp
        .budget
        .map(|b| format!("${:.2}", b))
        .unwrap_or_else(|| "Not specified".to_string());

    format!(
        r#"Explain the pricing for this product.

Product: {}
Base Price: ${:.2}
Tests:
{}
Test Costs: ${:.2}
Subtotal: ${:.2}
Markup ({}%): ${:.2}
Total Price: ${:.2}
RFP Budget: {}

Provide a clear pricing explanation using ONLY the data above."#,
        pricing.product_name,
        pricing.base_price,
        tests,
        pricing.total_test_cost,
        pricing.subtotal,
        pricing.markup_percentage,
        pricing.markup_amount,
        pricing.total_price,
        budget,
    )
}

fn build_sales_prompt(context: &AnalysisContext) -> String {
    let rfp = &context.rfp;
    let best = &context.best_match;
    let pricing = &context.pricing;

    let budget = rfp
        .budget
        .map(|b| format!("${:.2}", b))
        .unwrap_or_else(|| "Not specified".to_string());

    format!(
        r#"Create an honest proposal for this RFP.

RFP:
Title: {}
Description: {}
Budget: {}

Proposed Solution:
Product: {}
Match Score: {}%
Total Price: ${:.2}
Pricing Breakdown: Base ${:.2}, Tests ${:.2}, Markup ${:.2}

Suitability: {}
Reason: {}

Matched Requirements: {}
Missing Requirements: {}

Create a concise, honest proposal. Reference only information from the data above."#,
        rfp.title,
        rfp.description,
        budget,
        best.product_name,
        best.score_percent(),
        pricing.total_price,
        pricing.base_price,
        pricing.total_test_cost,
        pricing.markup_amount,
        context.verdict.suitability,
        context.verdict.reason,
        list_or_none(rfp.requirement_texts(&best.matched_requirements)),
        list_or_none(rfp.requirement_texts(&best.unmatched_requirements)),
    )
}
