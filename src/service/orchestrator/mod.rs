//! Run orchestration
//!
//! A run moves through `Init → Matched → Evaluated → {Skipped | Priced} →
//! {Skipped | AnalysisRunning} → Done`. Every transition is made in [`Orchestrator::advance`];
//! the only branch point is the suitability verdict after `Evaluated`.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use futures::future::join_all;

use crate::model::{
    AnalysisKind, AnalysisOutcome, AnalysisResult, EvaluationConfig, MatchResult,
    PricingBreakdown, Rfp, RunResult, SuitabilityVerdict,
};
use crate::service::analysis::{AnalysisContext, AnalysisExecutor, fallback_text};
use crate::service::catalog::Catalog;
use crate::service::matcher::{self, MatchError};
use crate::service::pricing::{self, PricingError};
use crate::service::suitability::{self, EvaluationError};

pub mod cancel;

pub use cancel::{CancelSignal, cancel_pair};

/// Fatal run errors; analysis task failures are recorded in the result instead
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    InvalidInput(#[from] MatchError),

    #[error(transparent)]
    NoCandidate(#[from] EvaluationError),

    #[error(transparent)]
    UnknownTest(#[from] PricingError),

    #[error("Run cancelled during {0}")]
    Cancelled(RunPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Matched,
    Evaluated,
    Skipped,
    Priced,
    AnalysisRunning,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Init => "init",
            RunPhase::Matched => "matched",
            RunPhase::Evaluated => "evaluated",
            RunPhase::Skipped => "skipped",
            RunPhase::Priced => "priced",
            RunPhase::AnalysisRunning => "analysis_running",
            RunPhase::Done => "done",
        };
        f.write_str(s)
    }
}

/// Per-run state, owned by a single `run` call
enum RunState {
    Init,
    Matched {
        matches: Vec<MatchResult>,
    },
    Evaluated {
        matches: Vec<MatchResult>,
        verdict: SuitabilityVerdict,
    },
    Skipped {
        best_match: MatchResult,
        verdict: SuitabilityVerdict,
    },
    Priced {
        context: AnalysisContext,
    },
    AnalysisRunning {
        context: AnalysisContext,
    },
    Done(Box<RunResult>),
}

impl RunState {
    fn phase(&self) -> RunPhase {
        match self {
            RunState::Init => RunPhase::Init,
            RunState::Matched { .. } => RunPhase::Matched,
            RunState::Evaluated { .. } => RunPhase::Evaluated,
            RunState::Skipped { .. } => RunPhase::Skipped,
            RunState::Priced { .. } => RunPhase::Priced,
            RunState::AnalysisRunning { .. } => RunPhase::AnalysisRunning,
            RunState::Done(_) => RunPhase::Done,
        }
    }
}

/// Drives runs against a shared, read-only catalog and configuration
#[derive(Clone)]
pub struct Orchestrator {
    catalog: Arc<Catalog>,
    config: Arc<EvaluationConfig>,
    executor: Arc<dyn AnalysisExecutor>,
}

impl Orchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        config: Arc<EvaluationConfig>,
        executor: Arc<dyn AnalysisExecutor>,
    ) -> Self {
        Self {
            catalog,
            config,
            executor,
        }
    }

    /// Run the full workflow for one RFP
    ///
    /// Returns either a complete result (possibly with failed analyses) or the first fatal
    /// error. A cancelled run never returns a partial result.
    pub async fn run(&self, rfp: &Rfp, mut cancel: CancelSignal) -> Result<RunResult, RunError> {
        let start_time = std::time::Instant::now();
        let mut state = RunState::Init;

        loop {
            state = match state {
                RunState::Done(result) => {
                    tracing::info!(
                        rfp = %rfp.id,
                        suitability = %result.verdict.suitability,
                        skipped = result.was_skipped(),
                        analyses = result.analyses.len(),
                        elapsed_ms = start_time.elapsed().as_millis(),
                        "Run completed"
                    );
                    return Ok(*result);
                }
                other => self.advance(other, rfp, &mut cancel).await.inspect_err(|e| {
                    tracing::warn!(rfp = %rfp.id, error = %e, "Run aborted");
                })?,
            };
        }
    }

    /// Perform the work of one state and return the next
    async fn advance(
        &self,
        state: RunState,
        rfp: &Rfp,
        cancel: &mut CancelSignal,
    ) -> Result<RunState, RunError> {
        let from = state.phase();
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled(from));
        }

        let next = match state {
            RunState::Init => RunState::Matched {
                matches: matcher::match_products(rfp, &self.catalog.products)?,
            },
            RunState::Matched { matches } => {
                let verdict = suitability::assess(rfp, &matches, &self.config)?;
                RunState::Evaluated { matches, verdict }
            }
            RunState::Evaluated { matches, verdict } => {
                let best_match = matches.into_iter().next().ok_or_else(|| {
                    EvaluationError::NoCandidate("no match results to select from".to_string())
                })?;

                if verdict.suitability.proceeds() {
                    let pricing = self.price(&best_match)?;
                    let product = self
                        .catalog
                        .product(&best_match.product_id)
                        .cloned()
                        .ok_or_else(|| missing_product(&best_match))?;
                    RunState::Priced {
                        context: AnalysisContext {
                            rfp: rfp.clone(),
                            product,
                            best_match,
                            verdict,
                            pricing,
                        },
                    }
                } else {
                    RunState::Skipped {
                        best_match,
                        verdict,
                    }
                }
            }
            RunState::Skipped {
                best_match,
                verdict,
            } => RunState::Done(Box::new(finish(rfp, verdict, best_match, None, Vec::new()))),
            RunState::Priced { context } => RunState::AnalysisRunning { context },
            RunState::AnalysisRunning { context } => {
                let analyses = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return Err(RunError::Cancelled(RunPhase::AnalysisRunning));
                    }
                    analyses = self.fan_out(&context) => analyses,
                };
                let AnalysisContext {
                    best_match,
                    verdict,
                    pricing,
                    ..
                } = context;
                RunState::Done(Box::new(finish(rfp, verdict, best_match, Some(pricing), analyses)))
            }
            done @ RunState::Done(_) => done,
        };

        tracing::info!(rfp = %rfp.id, from = %from, to = %next.phase(), "Run transition");
        Ok(next)
    }

    fn price(&self, best_match: &MatchResult) -> Result<PricingBreakdown, RunError> {
        let product = self
            .catalog
            .product(&best_match.product_id)
            .ok_or_else(|| missing_product(best_match))?;
        Ok(pricing::price(product, &self.config, &self.catalog.pricing)?)
    }

    /// Start all analysis kinds concurrently and wait for every one of them
    ///
    /// `join_all` keeps input order, so results come back in `AnalysisKind::ALL` order
    /// whatever order the tasks finish in.
    async fn fan_out(&self, context: &AnalysisContext) -> Vec<AnalysisResult> {
        let tasks = AnalysisKind::ALL.map(|kind| self.run_task(kind, context));
        join_all(tasks).await
    }

    async fn run_task(&self, kind: AnalysisKind, context: &AnalysisContext) -> AnalysisResult {
        let result = AssertUnwindSafe(self.executor.analyze(kind, context))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(output)) => AnalysisOutcome::Completed { output },
            Ok(Err(e)) => {
                tracing::warn!(rfp = %context.rfp.id, kind = %kind, error = %e, "Analysis task failed");
                AnalysisOutcome::Failed {
                    error: e.to_string(),
                    fallback: fallback_text(kind, context),
                }
            }
            Err(_) => {
                tracing::error!(rfp = %context.rfp.id, kind = %kind, "Analysis task panicked");
                AnalysisOutcome::Failed {
                    error: "analysis task panicked".to_string(),
                    fallback: fallback_text(kind, context),
                }
            }
        };

        AnalysisResult { kind, outcome }
    }
}

fn missing_product(best_match: &MatchResult) -> EvaluationError {
    EvaluationError::NoCandidate(format!(
        "product {} is not in the catalog",
        best_match.product_id
    ))
}

fn finish(
    rfp: &Rfp,
    verdict: SuitabilityVerdict,
    best_match: MatchResult,
    pricing: Option<PricingBreakdown>,
    analyses: Vec<AnalysisResult>,
) -> RunResult {
    RunResult {
        rfp_id: rfp.id.clone(),
        rfp_title: rfp.title.clone(),
        verdict,
        best_match,
        total_value: pricing.as_ref().map(|p| p.total_price).unwrap_or(0.0),
        pricing,
        analyses,
        generated_at: Utc::now(),
    }
}
