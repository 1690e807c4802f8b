//! Keyword-based product matching
//!
//! Scores every catalog product against the RFP requirements. A requirement counts as
//! matched when it overlaps one of the product specs (substring or significant-word
//! overlap), or when one of its longer words appears inside a spec.

use std::collections::HashSet;

use crate::model::{MatchResult, Product, Requirement, Rfp};

/// Words ignored when comparing requirement and spec wording
const STOP_WORDS: &[&str] = &["the", "and", "or", "for", "with", "support", "system", "a", "an"];

/// Words this short are too generic for the single-word fallback
const MIN_FALLBACK_WORD_LEN: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid RFP {rfp_id}: {reason}")]
    InvalidInput { rfp_id: String, reason: String },
}

/// Score every product, best first
///
/// Ties keep catalog order.
pub fn match_products(rfp: &Rfp, catalog: &[Product]) -> Result<Vec<MatchResult>, MatchError> {
    validate(rfp)?;

    let mut results: Vec<MatchResult> = catalog
        .iter()
        .map(|product| score_product(&rfp.requirements, product))
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        rfp = %rfp.id,
        products = results.len(),
        best_score = results.first().map(|r| r.score),
        "Scored catalog against RFP"
    );

    Ok(results)
}

/// Best result, if it meets the matching threshold
pub fn select_candidate(results: &[MatchResult], matching_threshold: f64) -> Option<&MatchResult> {
    results.first().filter(|best| best.score >= matching_threshold)
}

fn validate(rfp: &Rfp) -> Result<(), MatchError> {
    if rfp.requirements.is_empty() {
        return Err(MatchError::InvalidInput {
            rfp_id: rfp.id.clone(),
            reason: "RFP has no requirements".to_string(),
        });
    }

    if let Some(blank) = rfp.requirements.iter().find(|r| r.text.trim().is_empty()) {
        return Err(MatchError::InvalidInput {
            rfp_id: rfp.id.clone(),
            reason: format!("requirement {} has no text", blank.id),
        });
    }

    Ok(())
}

fn score_product(requirements: &[Requirement], product: &Product) -> MatchResult {
    // blank specs stay in place so indices line up with `product.specs`; they never match
    let specs: Vec<String> = product.specs.iter().map(|s| s.trim().to_lowercase()).collect();

    let mut matched_requirements = Vec::new();
    let mut unmatched_requirements = Vec::new();
    let mut unmatched_critical = Vec::new();
    let mut matched_spec_indices = Vec::new();

    for requirement in requirements {
        match find_matching_spec(&requirement.text.to_lowercase(), &specs) {
            Some(index) => {
                matched_requirements.push(requirement.id.clone());
                if !matched_spec_indices.contains(&index) {
                    matched_spec_indices.push(index);
                }
            }
            None => {
                unmatched_requirements.push(requirement.id.clone());
                if requirement.is_critical {
                    unmatched_critical.push(requirement.id.clone());
                }
            }
        }
    }

    let score = (matched_requirements.len() as f64 / requirements.len() as f64).clamp(0.0, 1.0);

    MatchResult {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        score,
        matched_requirements,
        unmatched_requirements,
        unmatched_critical,
        matched_specs: matched_spec_indices
            .into_iter()
            .map(|i| product.specs[i].trim().to_string())
            .collect(),
    }
}

/// Index of the first spec satisfying the requirement
///
/// Both arguments are already lowercased.
fn find_matching_spec(requirement: &str, specs: &[String]) -> Option<usize> {
    if let Some(index) = specs.iter().position(|spec| keyword_match(requirement, spec)) {
        return Some(index);
    }

    requirement
        .split_whitespace()
        .filter(|word| word.len() >= MIN_FALLBACK_WORD_LEN)
        .find_map(|word| specs.iter().position(|spec| spec.contains(word)))
}

fn keyword_match(requirement: &str, spec: &str) -> bool {
    if spec.is_empty() {
        return false;
    }

    if requirement.contains(spec) || spec.contains(requirement) {
        return true;
    }

    let req_words = significant_words(requirement);
    let spec_words = significant_words(spec);
    let overlap = req_words.intersection(&spec_words).count();

    let min_overlap = if req_words.len() <= 2 { 1 } else { 2 };
    overlap >= min_overlap
}

fn significant_words(text: &str) -> HashSet<&str> {
    text.split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfp(requirements: Vec<Requirement>) -> Rfp {
        Rfp {
            id: "rfp-test".to_string(),
            title: "Test RFP".to_string(),
            description: String::new(),
            requirements,
            deadline: None,
            budget: None,
            evaluation_criteria: vec![],
        }
    }

    fn product(id: &str, specs: &[&str]) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            specs: specs.iter().map(|s| s.to_string()).collect(),
            base_price: 1000.0,
            required_tests: vec![],
        }
    }

    #[test]
    fn test_empty_requirements_rejected() {
        let result = match_products(&rfp(vec![]), &[product("a", &["firewall"])]);
        assert!(matches!(result, Err(MatchError::InvalidInput { .. })));
    }

    #[test]
    fn test_blank_requirement_rejected() {
        let result = match_products(
            &rfp(vec![Requirement::new("REQ-001", "  ", false)]),
            &[product("a", &["firewall"])],
        );
        assert!(matches!(result, Err(MatchError::InvalidInput { .. })));
    }

    #[test]
    fn test_partial_coverage_flags_critical_gap() {
        let rfp = rfp(vec![
            Requirement::new("REQ-001", "encryption", true),
            Requirement::new("REQ-002", "24x7 support", false),
        ]);
        let catalog = vec![
            product("a", &["AES-256 encryption"]),
            product("b", &["dashboard"]),
        ];

        let results = match_products(&rfp, &catalog).unwrap();

        assert_eq!(results[0].product_id, "a");
        assert_eq!(results[0].score, 0.5);
        assert_eq!(results[0].matched_requirements, vec!["REQ-001"]);
        assert_eq!(results[0].unmatched_requirements, vec!["REQ-002"]);
        assert!(!results[0].has_critical_gap());

        assert_eq!(results[1].product_id, "b");
        assert_eq!(results[1].score, 0.0);
        assert_eq!(results[1].unmatched_critical, vec!["REQ-001"]);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let rfp = rfp(vec![
            Requirement::new("REQ-001", "firewall", false),
            Requirement::new("REQ-002", "vpn", false),
        ]);
        let catalog = vec![
            product("first-half", &["firewall"]),
            product("full", &["firewall", "vpn"]),
            product("second-half", &["vpn"]),
            product("none", &["printer"]),
        ];

        let results = match_products(&rfp, &catalog).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.product_id.as_str()).collect();

        assert_eq!(ids, vec!["full", "first-half", "second-half", "none"]);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    }

    #[test]
    fn test_word_overlap_rules() {
        // two significant words: one shared word is enough
        assert!(keyword_match("intrusion detection", "network intrusion prevention"));
        // three significant words need two shared
        assert!(!keyword_match("cloud backup encryption", "cloud storage"));
        assert!(keyword_match("cloud backup encryption", "cloud backup"));
        // stop words never count as overlap
        assert!(!keyword_match("support for the system", "system support"));
    }

    #[test]
    fn test_long_word_fallback() {
        let specs = vec!["multi-factor authentication".to_string()];
        assert_eq!(find_matching_spec("strong authentication policies here", &specs), Some(0));
        assert_eq!(find_matching_spec("sso via saml", &specs), None);
    }

    #[test]
    fn test_matched_specs_deduplicated() {
        let rfp = rfp(vec![
            Requirement::new("REQ-001", "firewall", false),
            Requirement::new("REQ-002", "next-generation firewall", false),
        ]);
        let results = match_products(&rfp, &[product("a", &["next-generation firewall"])]).unwrap();
        assert_eq!(results[0].matched_specs, vec!["next-generation firewall"]);
        assert_eq!(results[0].score, 1.0);
    }

    #[test]
    fn test_blank_and_padded_specs() {
        let rfp = rfp(vec![
            Requirement::new("REQ-001", "end-to-end encryption", false),
            Requirement::new("REQ-002", "single sign-on", false),
        ]);

        let blank = match_products(&rfp, &[product("a", &[" ", "\t"])]).unwrap();
        assert_eq!(blank[0].score, 0.0);
        assert!(blank[0].matched_specs.is_empty());

        let padded = match_products(&rfp, &[product("b", &["  single sign-on  "])]).unwrap();
        assert_eq!(padded[0].matched_requirements, vec!["REQ-002"]);
        assert_eq!(padded[0].matched_specs, vec!["single sign-on"]);
    }

    #[test]
    fn test_select_candidate_threshold() {
        let rfp = rfp(vec![
            Requirement::new("REQ-001", "firewall", false),
            Requirement::new("REQ-002", "vpn", false),
            Requirement::new("REQ-003", "antivirus", false),
            Requirement::new("REQ-004", "backup", false),
        ]);
        let results = match_products(&rfp, &[product("a", &["firewall"])]).unwrap();

        assert!(select_candidate(&results, 0.3).is_none());
        assert!(select_candidate(&results, 0.25).is_some());
        assert!(select_candidate(&[], 0.0).is_none());
    }
}
