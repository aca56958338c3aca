//! Transaction snapshots and trigger results

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::metadata::Metadata;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment mode value that marks a cash transaction
pub const PAYMENT_MODE_CASH: &str = "CASH";

/// Customer types that require beneficial-ownership verification
pub const LEGAL_ENTITY_CUSTOMER_TYPES: [&str; 3] = ["COMPANY", "TRUST", "NGO"];

/// Beneficial owner of a legal-entity customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeneficialOwner {
    pub name: String,
    pub ownership_percentage: Decimal,
    pub pan: Option<String>,
}

/// Per-call snapshot of a claims or premium transaction
///
/// Every field is resolved by the caller before evaluation; the engine
/// never looks anything up. Missing dates are `None` and never trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionContext {
    /// Transaction identifier
    pub transaction_id: Uuid,

    /// Policy the transaction belongs to
    pub policy_number: String,

    /// Customer identifier
    pub customer_id: String,

    /// Transaction amount
    pub amount: Decimal,

    /// Payment mode, e.g. `CASH`, `CHEQUE`, `NEFT`
    pub payment_mode: String,

    /// When the transaction happened
    pub transaction_date: Option<DateTime<Utc>>,

    /// Customer PAN verified
    pub pan_verified: bool,

    /// Date the nominee was last changed
    pub nominee_change_date: Option<DateTime<Utc>>,

    /// Date of death of the life assured
    pub death_date: Option<DateTime<Utc>>,

    /// Policies surrendered by the customer
    pub surrender_count: u32,

    /// Date a premium refund was issued
    pub refund_date: Option<DateTime<Utc>>,

    /// Date the policy bond was dispatched
    pub bond_dispatch_date: Option<DateTime<Utc>>,

    /// Cash received from the customer today, this transaction included
    pub daily_cash_aggregate: Decimal,

    /// Recent cash transaction amounts
    pub recent_cash_transactions: Vec<Decimal>,

    /// Transaction is the first premium of a new policy
    pub is_first_premium: bool,

    /// Annual income declared at proposal
    pub declared_annual_income: Option<Decimal>,

    /// Transactions by the customer in the last 24 hours
    pub transactions_last_24h: u32,

    /// Premium paid by someone other than the policyholder
    pub third_party_payment: bool,

    /// Third-party payer PAN verified
    pub third_party_pan_verified: bool,

    /// Customer type, e.g. `INDIVIDUAL`, `COMPANY`, `TRUST`, `NGO`
    pub customer_type: String,

    /// Beneficial owners declared for legal-entity customers
    pub beneficial_owners: Vec<BeneficialOwner>,
}

impl TransactionContext {
    /// Cash payment
    pub fn is_cash(&self) -> bool {
        self.payment_mode == PAYMENT_MODE_CASH
    }

    /// Company, trust or NGO customer
    pub fn is_legal_entity(&self) -> bool {
        LEGAL_ENTITY_CUSTOMER_TYPES.contains(&self.customer_type.as_str())
    }
}

/// Past transaction of the same customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalTransaction {
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub payment_mode: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub counterparty: Option<String>,
    pub country: Option<String>,
}

/// Customer profile as known to KYC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub occupation: Option<String>,
    pub residence_country: Option<String>,
    pub is_non_resident: bool,
    pub is_minor: bool,
    pub is_pep: bool,
    pub sanctions_hit: bool,
    pub address_verified: bool,
    pub aadhaar_pan_linked: bool,
    pub kyc_expiry_date: Option<DateTime<Utc>>,
    pub contact_changes_last_90d: u32,
    pub customers_sharing_contact: u32,
    pub policies_held: u32,
    pub policies_opened_last_90d: u32,
    pub beneficiary_changes_last_year: u32,
}

/// Claim category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimType {
    #[default]
    Death,
    Maturity,
    SurvivalBenefit,
    FreeLook,
    Ombudsman,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Death => "DEATH",
            ClaimType::Maturity => "MATURITY",
            ClaimType::SurvivalBenefit => "SURVIVAL_BENEFIT",
            ClaimType::FreeLook => "FREE_LOOK",
            ClaimType::Ombudsman => "OMBUDSMAN",
        }
    }
}

/// Claim previously lodged against the customer's policies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimRecord {
    pub claim_id: String,
    pub policy_number: String,
    pub claim_type: ClaimType,
    pub amount: Decimal,
    pub filed_at: Option<DateTime<Utc>>,
    pub policy_inception_date: Option<DateTime<Utc>>,
    pub claimant_is_nominee: bool,
}

/// Servicing agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    pub agent_code: String,
    pub cancellation_rate: f64,
    pub commission_last_30d: Decimal,
    pub active_customers: u32,
    pub paid_on_behalf_of_customer: bool,
}

/// Sales or servicing channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    /// e.g. `ONLINE`, `BRANCH`, `POS`, `AGENT`
    pub channel: String,
    pub branch_code: Option<String>,
    pub previous_channel: Option<String>,
}

/// Device fingerprint of the originating session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceFingerprint {
    pub device_id: Option<String>,
    pub ip_address: Option<String>,
    pub ip_country: Option<String>,
    pub user_agent: Option<String>,
    pub is_vpn: bool,
    pub is_emulator: bool,
    pub sim_swapped_at: Option<DateTime<Utc>>,
    pub accounts_on_device: u32,
}

/// Login session signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    /// Session length in seconds
    pub duration_secs: Option<u64>,
    pub login_attempts: u32,
    pub started_at: Option<DateTime<Utc>>,
}

/// Base snapshot enriched with behavioral and technical signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedTransactionContext {
    /// Base transaction snapshot
    pub base: TransactionContext,

    pub transaction_history: Vec<HistoricalTransaction>,
    pub customer_profile: CustomerProfile,
    pub claim_history: Vec<ClaimRecord>,
    pub agent: Option<AgentProfile>,
    pub channel: ChannelInfo,
    pub device: DeviceFingerprint,
    pub session: SessionInfo,

    /// Account activity anomaly score (0-100)
    pub account_activity_score: Option<f64>,
}

impl From<TransactionContext> for ExtendedTransactionContext {
    fn from(base: TransactionContext) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

/// Outcome of evaluating one rule
///
/// A result that did not trigger carries no risk level, filing type, filing
/// flag, block flag or reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResult {
    pub trigger_code: TriggerCode,
    pub triggered: bool,
    pub risk_level: Option<RiskLevel>,
    pub description: String,
    pub filing_required: bool,
    pub filing_type: Option<FilingType>,
    pub transaction_blocked: bool,
    pub reason: Option<String>,
    pub metadata: Metadata,
}

impl TriggerResult {
    /// Filing of the given type owed by this result
    pub fn requires_filing(&self, filing_type: FilingType) -> bool {
        self.triggered && self.filing_required && self.filing_type == Some(filing_type)
    }
}
