//! AML/CFT transaction-risk engine for insurance claims and premiums
//!
//! Evaluates a catalog of 70 independent detection rules against a
//! transaction snapshot and reduces the fired rules to a risk score, filing
//! obligations and a block decision.
//!
//! # Architecture
//!
//! - **Catalog**: closed set of `AML_NNN` trigger codes, risk levels, filing types
//! - **Rules**: one pure evaluator per trigger code
//! - **Engine**: runs the core (12) or extended (70) set, keeps what fired
//! - **Scoring**: mean score, highest level, STR/CTR flags, block veto
//! - **Policy**: action contract for alerting and payment gateways
//!
//! # Invariants
//!
//! - Evaluation is deterministic and has no failure path
//! - Missing optional signals never trigger a rule
//! - A result that did not fire carries no risk, filing or block semantics

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod policy;
pub mod rules;
pub mod scoring;
pub mod types;

pub use catalog::{FilingType, RiskLevel, RuleTier, TriggerCode};
pub use config::{EngineConfig, Thresholds};
pub use engine::{EvaluationReport, RuleEngine};
pub use error::{Error, Result};
pub use metadata::{Metadata, MetadataValue};
pub use policy::{EnforcementAction, FilingPolicy, PolicyDecision};
pub use scoring::{AssessmentSummary, RiskAssessment};
pub use types::{
    AgentProfile, BeneficialOwner, ChannelInfo, ClaimRecord, ClaimType, CustomerProfile,
    DeviceFingerprint, ExtendedTransactionContext, HistoricalTransaction, SessionInfo,
    TransactionContext, TriggerResult,
};
