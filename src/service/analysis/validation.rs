//! Validation of LLM-extracted analysis output
//!
//! Errors cause a retry; warnings are only logged.

use super::AnalysisContext;
use crate::model::{AnalysisKind, AnalysisOutput};

#[derive(Debug)]
pub struct OutputValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl OutputValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Check an extracted output against the inputs it was generated from
///
/// Checks:
/// 1. The summary is not blank
/// 2. Technical output lists matches when the product matched anything
/// 3. Pricing output states the total price
pub fn validate_output(
    kind: AnalysisKind,
    output: &AnalysisOutput,
    context: &AnalysisContext,
) -> OutputValidationResult {
    let mut result = OutputValidationResult::valid();

    if output.summary.trim().is_empty() {
        result.add_error("summary is empty".to_string());
    }

    match kind {
        AnalysisKind::Technical => {
            if !context.best_match.matched_requirements.is_empty() && output.key_points.is_empty() {
                result.add_warning("technical analysis lists no matched requirements".to_string());
            }
            if context.best_match.unmatched_requirements.is_empty() && !output.concerns.is_empty() {
                result.add_warning(
                    "technical analysis lists concerns although no requirement is missing".to_string(),
                );
            }
        }
        AnalysisKind::Pricing => {
            if !mentions_amount(output, context.pricing.total_price) {
                result.add_warning("pricing explanation does not state the total price".to_string());
            }
        }
        AnalysisKind::Sales => {}
    }

    result
}

/// Whether the amount appears in the output with cents, with or without thousands separators
fn mentions_amount(output: &AnalysisOutput, amount: f64) -> bool {
    let plain = format!("{:.2}", amount);
    let grouped = group_thousands(&plain);

    std::iter::once(&output.summary)
        .chain(output.key_points.iter())
        .any(|text| contains_number(text, &plain) || contains_number(text, &grouped))
}

/// Substring match that is not part of a longer number
fn contains_number(text: &str, number: &str) -> bool {
    let is_numeric = |c: char| c.is_ascii_digit() || c == ',' || c == '.';

    text.match_indices(number).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_numeric) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}

fn group_thousands(formatted: &str) -> String {
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted, ""));
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}
