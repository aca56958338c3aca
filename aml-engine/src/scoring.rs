//! Risk aggregation
//!
//! Reduces a list of trigger results to a score, an overall level, filing
//! flags and a block decision. Entries that did not trigger are ignored.

use crate::catalog::{FilingType, RiskLevel};
use crate::types::TriggerResult;
use serde::{Deserialize, Serialize};

fn fired(results: &[TriggerResult]) -> impl Iterator<Item = &TriggerResult> {
    results.iter().filter(|r| r.triggered)
}

/// Mean level weight over triggered entries (0-100). Empty input scores 0.
pub fn calculate_risk_score(results: &[TriggerResult]) -> f64 {
    let weights: Vec<f64> = fired(results)
        .filter_map(|r| r.risk_level)
        .map(|level| level.weight())
        .collect();

    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64
}

/// Highest level among triggered entries, `Low` when none fired.
pub fn overall_risk_level(results: &[TriggerResult]) -> RiskLevel {
    fired(results)
        .filter_map(|r| r.risk_level)
        .max()
        .unwrap_or(RiskLevel::Low)
}

/// Any triggered entry owes a filing of this type
pub fn filing_required(results: &[TriggerResult], filing_type: FilingType) -> bool {
    fired(results).any(|r| r.requires_filing(filing_type))
}

/// Any triggered entry owes an STR
pub fn str_filing_required(results: &[TriggerResult]) -> bool {
    filing_required(results, FilingType::Str)
}

/// Any triggered entry owes a CTR
pub fn ctr_filing_required(results: &[TriggerResult]) -> bool {
    filing_required(results, FilingType::Ctr)
}

/// One blocking trigger vetoes the transaction
pub fn should_block_transaction(results: &[TriggerResult]) -> bool {
    fired(results).any(|r| r.transaction_blocked)
}

/// Aggregate conclusions over one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Triggered results, in evaluation order
    pub triggered: Vec<TriggerResult>,

    /// Mean risk score (0-100)
    pub risk_score: f64,

    /// Highest risk level
    pub overall_risk_level: RiskLevel,

    pub str_filing_required: bool,
    pub ctr_filing_required: bool,
    pub should_block_transaction: bool,
}

impl RiskAssessment {
    /// Aggregate a result list; non-triggered entries are dropped
    pub fn from_results(results: Vec<TriggerResult>) -> Self {
        let triggered: Vec<TriggerResult> = results.into_iter().filter(|r| r.triggered).collect();

        Self {
            risk_score: calculate_risk_score(&triggered),
            overall_risk_level: overall_risk_level(&triggered),
            str_filing_required: str_filing_required(&triggered),
            ctr_filing_required: ctr_filing_required(&triggered),
            should_block_transaction: should_block_transaction(&triggered),
            triggered,
        }
    }

    /// Nothing fired
    pub fn is_clear(&self) -> bool {
        self.triggered.is_empty()
    }
}

/// Assessment conclusions without the result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub triggered_count: usize,
    pub risk_score: f64,
    pub overall_risk_level: RiskLevel,
    pub str_filing_required: bool,
    pub ctr_filing_required: bool,
    pub should_block_transaction: bool,
}

impl From<&RiskAssessment> for AssessmentSummary {
    fn from(assessment: &RiskAssessment) -> Self {
        Self {
            triggered_count: assessment.triggered.len(),
            risk_score: assessment.risk_score,
            overall_risk_level: assessment.overall_risk_level,
            str_filing_required: assessment.str_filing_required,
            ctr_filing_required: assessment.ctr_filing_required,
            should_block_transaction: assessment.should_block_transaction,
        }
    }
}
