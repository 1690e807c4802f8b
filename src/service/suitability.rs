//! Suitability classification of the top-scoring product
//!
//! Critical-requirement gaps are checked before any score threshold, so a product missing
//! a critical requirement is never classified as suitable.

use crate::model::{
    EvaluationConfig, MatchResult, RejectedProduct, Rfp, Suitability, SuitabilityVerdict,
};
use crate::service::matcher::select_candidate;

/// At most this many requirement names are listed in a reason
const MAX_LISTED_REQUIREMENTS: usize = 3;

/// At most this many gaps are listed per rejected product
const MAX_LISTED_REJECTION_GAPS: usize = 2;

/// At most this many matched requirements are listed in the justification
const MAX_LISTED_MATCHES: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("No candidate product: {0}")]
    NoCandidate(String),
}

/// Inclusive score thresholds for the suitable classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub strong: f64,
    pub moderate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong: 0.8,
            moderate: 0.6,
        }
    }
}

impl From<&EvaluationConfig> for Thresholds {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            strong: config.threshold_strong,
            moderate: config.threshold_moderate,
        }
    }
}

/// Classify a single match result
///
/// The returned verdict has no rejected products; [`assess`] fills them in.
pub fn evaluate(rfp: &Rfp, best: &MatchResult, thresholds: Thresholds) -> SuitabilityVerdict {
    let score = best.score;
    let percent = best.score_percent();

    let (suitability, reason) = if best.has_critical_gap() {
        let missing = join_limited(rfp.requirement_texts(&best.unmatched_critical), MAX_LISTED_REQUIREMENTS);
        (
            Suitability::NotSuitable,
            format!("Missing critical requirements: {}", missing),
        )
    } else if score >= thresholds.strong {
        (
            Suitability::SuitableStrong,
            format!("Strong match ({}%) with no critical missing requirements", percent),
        )
    } else if score >= thresholds.moderate {
        (
            Suitability::SuitableModerate,
            format!("Moderate match ({}%) with acceptable gaps", percent),
        )
    } else {
        (
            Suitability::PartialWeak,
            format!("Weak match ({}%), significant gaps exist", percent),
        )
    };

    SuitabilityVerdict {
        suitability,
        product_id: best.product_id.clone(),
        product_name: best.product_name.clone(),
        score,
        reason,
        justification: justification(rfp, best, suitability),
        rejected_products: Vec::new(),
    }
}

/// Select the best candidate, classify it, and explain why every other product lost
///
/// `matches` must be sorted best first, as returned by the matcher.
pub fn assess(
    rfp: &Rfp,
    matches: &[MatchResult],
    config: &EvaluationConfig,
) -> Result<SuitabilityVerdict, EvaluationError> {
    let best = matches
        .first()
        .ok_or_else(|| EvaluationError::NoCandidate("catalog produced no match results".to_string()))?;

    let best = select_candidate(matches, config.matching_threshold).ok_or_else(|| {
        EvaluationError::NoCandidate(format!(
            "best match {} scored {:.2}, below required threshold of {:.2}",
            best.product_name, best.score, config.matching_threshold
        ))
    })?;

    let mut verdict = evaluate(rfp, best, Thresholds::from(config));
    verdict.rejected_products = matches
        .iter()
        .skip(1)
        .map(|candidate| rejection(rfp, best, candidate, config.matching_threshold))
        .collect();

    tracing::info!(
        rfp = %rfp.id,
        product = %verdict.product_id,
        score = verdict.score,
        suitability = %verdict.suitability,
        rejected = verdict.rejected_products.len(),
        "Suitability evaluated"
    );

    Ok(verdict)
}

fn justification(rfp: &Rfp, best: &MatchResult, suitability: Suitability) -> String {
    let category = match suitability {
        Suitability::SuitableStrong => "Strong Match",
        Suitability::SuitableModerate => "Moderate Match",
        Suitability::PartialWeak => "Weak Match",
        Suitability::NotSuitable => "Not Suitable, missing critical requirements",
    };

    let matched = if best.matched_requirements.is_empty() {
        "None".to_string()
    } else {
        join_limited(rfp.requirement_texts(&best.matched_requirements), MAX_LISTED_MATCHES)
    };

    let missing = if best.unmatched_requirements.is_empty() {
        "None".to_string()
    } else {
        join_limited(rfp.requirement_texts(&best.unmatched_requirements), MAX_LISTED_REQUIREMENTS)
    };

    format!(
        "Selected: {}\nMatch Score: {:.2} ({}%) - {}\nKey Matched Requirements: {}\nMissing Requirements: {}",
        best.product_name,
        best.score,
        best.score_percent(),
        category,
        matched,
        missing
    )
}

/// Reason derived from the rejected product's own match result
fn rejection(
    rfp: &Rfp,
    winner: &MatchResult,
    candidate: &MatchResult,
    matching_threshold: f64,
) -> RejectedProduct {
    let mut reason = if candidate.score < matching_threshold {
        format!(
            "Match score ({:.2}) below threshold ({:.2})",
            candidate.score, matching_threshold
        )
    } else if candidate.score == winner.score {
        format!(
            "Tied match score ({:.2}), ranked after {} by catalog order",
            candidate.score, winner.product_name
        )
    } else {
        format!("Lower match score ({:.2})", candidate.score)
    };

    if candidate.has_critical_gap() {
        reason.push_str(", missing critical: ");
        reason.push_str(&join_limited(
            rfp.requirement_texts(&candidate.unmatched_critical),
            MAX_LISTED_REJECTION_GAPS,
        ));
    } else if !candidate.unmatched_requirements.is_empty() {
        reason.push_str(", missing: ");
        reason.push_str(&join_limited(
            rfp.requirement_texts(&candidate.unmatched_requirements),
            MAX_LISTED_REJECTION_GAPS,
        ));
    }

    RejectedProduct {
        product_id: candidate.product_id.clone(),
        product_name: candidate.product_name.clone(),
        score: candidate.score,
        reason,
    }
}

fn join_limited<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> String {
    items.take(limit).collect::<Vec<_>>().join(", ")
}
