//! Analysis tasks run for a suitable product
//!
//! Each task kind (technical, pricing, sales) receives the same immutable context and
//! produces an [`AnalysisOutput`] independently of the others.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::{
    AnalysisKind, AnalysisOutput, MatchResult, PricingBreakdown, Product, Rfp, SuitabilityVerdict,
};
use crate::service::llm::LlmClient;

pub mod error;
pub mod fallback;
pub mod prompts;
pub mod validation;

pub use error::AnalysisError;
pub use fallback::fallback_text;

use prompts::{build_prompt, system_prompt};
use validation::validate_output;

/// Environment variable for the analysis model
const ENV_ANALYSIS_MODEL: &str = "ANALYSIS_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;

/// Inputs shared read-only by all analysis tasks of a run
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub rfp: Rfp,
    pub product: Product,
    pub best_match: MatchResult,
    pub verdict: SuitabilityVerdict,
    pub pricing: PricingBreakdown,
}

/// Executes one analysis task
///
/// Implementations must return a typed error instead of panicking. Cancellation happens by
/// dropping the returned future, so implementations must not detach work that outlives it.
#[async_trait]
pub trait AnalysisExecutor: Send + Sync {
    async fn analyze(
        &self,
        kind: AnalysisKind,
        context: &AnalysisContext,
    ) -> Result<AnalysisOutput, AnalysisError>;
}

/// LLM-backed executor using structured extraction
pub struct LlmAnalysisExecutor {
    llm_client: LlmClient,
    model: String,
}

impl LlmAnalysisExecutor {
    /// Uses the shared LLM client; the model comes from ANALYSIS_MODEL (defaults to gpt-4o-mini)
    pub fn new(llm_client: LlmClient) -> Self {
        let model =
            std::env::var(ENV_ANALYSIS_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Analysis executor initialized");

        Self { llm_client, model }
    }

    async fn analyze_once(
        &self,
        kind: AnalysisKind,
        context: &AnalysisContext,
    ) -> Result<AnalysisOutput, AnalysisError> {
        let start_time = std::time::Instant::now();

        let prompt = build_prompt(kind, context);
        let prompt_length = prompt.len();

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<AnalysisOutput>(&self.model)
            .preamble(system_prompt(kind))
            .build();

        let output = match extractor.extract(&prompt).await {
            Ok(result) => {
                tracing::info!(
                    rfp = %context.rfp.id,
                    kind = %kind,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    "LLM analysis completed successfully"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    rfp = %context.rfp.id,
                    kind = %kind,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "LLM analysis failed"
                );
                return Err(AnalysisError::AnalysisFailed(e.to_string()));
            }
        };

        let validation = validate_output(kind, &output, context);
        for warning in &validation.warnings {
            tracing::warn!(rfp = %context.rfp.id, kind = %kind, warning = %warning, "Analysis output warning");
        }
        if !validation.is_valid {
            return Err(AnalysisError::InvalidOutput(validation.errors.join("; ")));
        }

        Ok(output)
    }
}

#[async_trait]
impl AnalysisExecutor for LlmAnalysisExecutor {
    async fn analyze(
        &self,
        kind: AnalysisKind,
        context: &AnalysisContext,
    ) -> Result<AnalysisOutput, AnalysisError> {
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            match self.analyze_once(kind, context).await {
                Ok(output) => {
                    if attempt > 0 {
                        tracing::info!(
                            rfp = %context.rfp.id,
                            kind = %kind,
                            attempt = attempt,
                            "LLM analysis succeeded after retry"
                        );
                    }
                    return Ok(output);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < MAX_RETRIES {
                        let delay_ms = INITIAL_RETRY_DELAY_MS * (1 << attempt);
                        tracing::warn!(
                            rfp = %context.rfp.id,
                            kind = %kind,
                            attempt = attempt + 1,
                            max_retries = MAX_RETRIES,
                            delay_ms = delay_ms,
                            "LLM analysis failed, retrying"
                        );
                        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AnalysisError::AnalysisFailed("Failed after all retries".to_string())))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{EvaluationConfig, PricingTable, Requirement, TestPricing};
    use crate::service::{matcher, pricing, suitability};

    /// Context for a product covering one of two requirements, priced at 1437.50
    pub(crate) fn context() -> AnalysisContext {
        let rfp = Rfp {
            id: "rfp1".to_string(),
            title: "Enterprise Security Solution".to_string(),
            description: "Comprehensive security solution needed".to_string(),
            requirements: vec![
                Requirement::new("REQ-001", "encryption", true),
                Requirement::new("REQ-002", "24x7 support", false),
            ],
            deadline: None,
            budget: Some(50000.0),
            evaluation_criteria: vec![],
        };
        let product = Product {
            id: "prod-001".to_string(),
            name: "CloudGuard Firewall Pro".to_string(),
            specs: vec!["AES-256 encryption".to_string()],
            base_price: 1000.0,
            required_tests: vec![],
        };
        let config = EvaluationConfig::default();
        let table = PricingTable::new(vec![
            TestPricing {
                test_id: "security_audit".to_string(),
                cost: 100.0,
                description: String::new(),
            },
            TestPricing {
                test_id: "integration_test".to_string(),
                cost: 50.0,
                description: String::new(),
            },
        ]);

        let matches = matcher::match_products(&rfp, std::slice::from_ref(&product)).unwrap();
        let verdict = suitability::assess(&rfp, &matches, &config).unwrap();
        let pricing = pricing::price(&product, &config, &table).unwrap();

        AnalysisContext {
            rfp,
            product,
            best_match: matches[0].clone(),
            verdict,
            pricing,
        }
    }

    #[test]
    fn test_prompts_carry_exact_requirement_wording() {
        let ctx = context();
        let technical = build_prompt(AnalysisKind::Technical, &ctx);

        assert!(technical.contains("MATCHED REQUIREMENTS (use these EXACT words):\nencryption"));
        assert!(technical.contains("MISSING REQUIREMENTS (use these EXACT words):\n24x7 support"));

        let pricing = build_prompt(AnalysisKind::Pricing, &ctx);
        assert!(pricing.contains("Total Price: $1437.50"));
        assert!(pricing.contains("RFP Budget: $50000.00"));

        let sales = build_prompt(AnalysisKind::Sales, &ctx);
        assert!(sales.contains("Match Score: 50%"));
        assert!(sales.contains("Suitability: partial (weak)"));
    }

    #[test]
    fn test_fallback_text_per_kind() {
        let ctx = context();

        assert!(fallback_text(AnalysisKind::Technical, &ctx).contains("Missing Requirements: 24x7 support"));
        assert!(fallback_text(AnalysisKind::Pricing, &ctx).contains("Total: $1437.50"));
        assert!(fallback_text(AnalysisKind::Sales, &ctx).starts_with("Proposal for Enterprise Security Solution"));
    }
}
