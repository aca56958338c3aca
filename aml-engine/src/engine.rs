//! Evaluation orchestrator
//!
//! Runs the core or extended rule set over a snapshot and keeps only the
//! results that fired. Results always come back in catalog order, whether
//! evaluated sequentially or across worker threads.

use crate::catalog::TriggerCode;
use crate::config::{EngineConfig, Thresholds, DEFAULT_WORKER_THREADS};
use crate::policy::{FilingPolicy, PolicyDecision};
use crate::rules::{self, base::CORE_RULES};
use crate::scoring::{AssessmentSummary, RiskAssessment};
use crate::types::{ExtendedTransactionContext, TransactionContext, TriggerResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Output of one evaluation: fired rules, their aggregate and the decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub results: Vec<TriggerResult>,
    pub assessment: AssessmentSummary,
    pub decision: PolicyDecision,
}

/// AML rule engine
#[derive(Debug, Clone)]
pub struct RuleEngine {
    thresholds: Thresholds,
    worker_threads: usize,
}

impl RuleEngine {
    /// Create engine with the given thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }

    /// Create engine from configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            worker_threads: config.worker_threads.max(1),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate one rule, triggered or not
    pub fn evaluate_rule(&self, code: TriggerCode, ctx: &ExtendedTransactionContext) -> TriggerResult {
        rules::evaluate(code, ctx, &self.thresholds)
    }

    /// Run the 12 core rules over the base context
    pub fn evaluate_core(&self, ctx: &TransactionContext) -> Vec<TriggerResult> {
        let triggered: Vec<TriggerResult> = CORE_RULES
            .iter()
            .map(|(_, evaluate)| evaluate(ctx, &self.thresholds))
            .filter(|result| result.triggered)
            .collect();

        log_triggered(ctx, CORE_RULES.len(), &triggered);
        triggered
    }

    /// Run all 70 rules over the extended context
    pub fn evaluate_extended(&self, ctx: &ExtendedTransactionContext) -> Vec<TriggerResult> {
        let triggered: Vec<TriggerResult> = TriggerCode::ALL
            .iter()
            .map(|code| rules::evaluate(*code, ctx, &self.thresholds))
            .filter(|result| result.triggered)
            .collect();

        log_triggered(&ctx.base, TriggerCode::ALL.len(), &triggered);
        triggered
    }

    /// Run all 70 rules split across scoped worker threads
    ///
    /// Returns exactly what [`RuleEngine::evaluate_extended`] returns.
    pub fn evaluate_extended_concurrent(
        &self,
        ctx: &ExtendedTransactionContext,
    ) -> Vec<TriggerResult> {
        let codes: &'static [TriggerCode] = &TriggerCode::ALL;
        let chunk_size = codes.len().div_ceil(self.worker_threads.max(1));
        let thresholds = &self.thresholds;

        let triggered: Vec<TriggerResult> = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = codes
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|code| rules::evaluate(*code, ctx, thresholds))
                            .filter(|result| result.triggered)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        log_triggered(&ctx.base, TriggerCode::ALL.len(), &triggered);
        triggered
    }

    /// Evaluate the extended set and aggregate
    pub fn assess(&self, ctx: &ExtendedTransactionContext) -> RiskAssessment {
        RiskAssessment::from_results(self.evaluate_extended(ctx))
    }

    /// Evaluate the core set and aggregate
    pub fn assess_core(&self, ctx: &TransactionContext) -> RiskAssessment {
        RiskAssessment::from_results(self.evaluate_core(ctx))
    }

    /// Policy decision for an assessment
    pub fn decide(&self, assessment: &RiskAssessment) -> PolicyDecision {
        FilingPolicy::new(&assessment.triggered).decision()
    }

    /// Evaluate, aggregate and decide in one pass
    ///
    /// `core_only` restricts evaluation to the core rules over `ctx.base`.
    pub fn report(&self, ctx: &ExtendedTransactionContext, core_only: bool) -> EvaluationReport {
        let assessment = if core_only {
            self.assess_core(&ctx.base)
        } else {
            self.assess(ctx)
        };
        let decision = self.decide(&assessment);

        EvaluationReport {
            assessment: AssessmentSummary::from(&assessment),
            results: assessment.triggered,
            decision,
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

fn log_triggered(ctx: &TransactionContext, evaluated: usize, triggered: &[TriggerResult]) {
    for result in triggered {
        debug!(
            "AML trigger {} fired for transaction {} (level: {:?}, filing: {:?}, blocked: {})",
            result.trigger_code,
            ctx.transaction_id,
            result.risk_level,
            result.filing_type,
            result.transaction_blocked
        );
    }
    info!(
        "Evaluated {} AML rules for transaction {}: {} triggered",
        evaluated,
        ctx.transaction_id,
        triggered.len()
    );
}
