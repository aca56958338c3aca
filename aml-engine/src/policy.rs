//! Filing and blocking policy
//!
//! The action contract handed to alerting and transaction-gateway callers.
//! Reads conclusions from [`scoring`](crate::scoring) and never rescores.

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::scoring;
use crate::types::TriggerResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// What the caller should do with the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementAction {
    /// Nothing fired
    Allow,
    /// Something fired, nothing blocks; route to compliance review
    Review,
    /// At least one blocking trigger fired
    Block,
}

/// Serializable policy outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub action: EnforcementAction,
    pub overall_risk_level: RiskLevel,
    pub required_filings: Vec<FilingType>,
    pub blocking_triggers: Vec<TriggerCode>,
}

/// Policy view over a triggered-result list
#[derive(Debug, Clone, Copy)]
pub struct FilingPolicy<'a> {
    results: &'a [TriggerResult],
}

impl<'a> FilingPolicy<'a> {
    pub fn new(results: &'a [TriggerResult]) -> Self {
        Self { results }
    }

    pub fn str_filing_required(&self) -> bool {
        scoring::str_filing_required(self.results)
    }

    pub fn ctr_filing_required(&self) -> bool {
        scoring::ctr_filing_required(self.results)
    }

    /// Filing of any type owed
    pub fn filing_required(&self, filing_type: FilingType) -> bool {
        scoring::filing_required(self.results, filing_type)
    }

    pub fn should_block_transaction(&self) -> bool {
        scoring::should_block_transaction(self.results)
    }

    /// Every filing type owed, in STR, CTR, CCR, NTR order
    pub fn required_filings(&self) -> BTreeSet<FilingType> {
        self.results
            .iter()
            .filter(|r| r.triggered && r.filing_required)
            .filter_map(|r| r.filing_type)
            .collect()
    }

    /// Codes of triggered rules that block
    pub fn blocking_triggers(&self) -> Vec<TriggerCode> {
        self.results
            .iter()
            .filter(|r| r.triggered && r.transaction_blocked)
            .map(|r| r.trigger_code)
            .collect()
    }

    /// Enforcement action
    pub fn action(&self) -> EnforcementAction {
        if self.should_block_transaction() {
            EnforcementAction::Block
        } else if self.results.iter().any(|r| r.triggered) {
            EnforcementAction::Review
        } else {
            EnforcementAction::Allow
        }
    }

    /// Full decision for downstream collaborators
    pub fn decision(&self) -> PolicyDecision {
        let decision = PolicyDecision {
            action: self.action(),
            overall_risk_level: scoring::overall_risk_level(self.results),
            required_filings: self.required_filings().into_iter().collect(),
            blocking_triggers: self.blocking_triggers(),
        };

        match decision.action {
            EnforcementAction::Block => warn!(
                "Transaction BLOCKED by {:?} (level: {}, filings: {:?})",
                decision.blocking_triggers, decision.overall_risk_level, decision.required_filings
            ),
            EnforcementAction::Review => info!(
                "Transaction routed to REVIEW (level: {}, filings: {:?})",
                decision.overall_risk_level, decision.required_filings
            ),
            EnforcementAction::Allow => {}
        }

        decision
    }
}
