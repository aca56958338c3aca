//! Trigger catalog
//!
//! Closed vocabulary of AML/CFT detection rules, risk levels and regulatory
//! filing types. Every rule is identified by a stable `AML_NNN` code that is
//! never reused.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk level assigned to a fired trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
    /// Critical risk
    Critical,
}

impl RiskLevel {
    /// Score weight used by the risk aggregator (0-100)
    pub fn weight(&self) -> f64 {
        match self {
            RiskLevel::Low => 25.0,
            RiskLevel::Medium => 50.0,
            RiskLevel::High => 75.0,
            RiskLevel::Critical => 100.0,
        }
    }

    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regulatory report owed to the financial intelligence unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilingType {
    /// Suspicious Transaction Report
    Str,
    /// Cash Transaction Report
    Ctr,
    /// Counterfeit Currency Report
    Ccr,
    /// Non-Profit Organisation Transaction Report
    Ntr,
}

impl FilingType {
    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Str => "STR",
            FilingType::Ctr => "CTR",
            FilingType::Ccr => "CCR",
            FilingType::Ntr => "NTR",
        }
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation tier a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleTier {
    /// Evaluated over the base transaction context
    Core,
    /// Requires behavioral and technical signals
    Extended,
}

/// Detection rule identifier
///
/// Variants are declared in catalog order; the discriminant indexes
/// [`RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum TriggerCode {
    // Core tier
    CashThreshold,
    PanMismatch,
    NomineeChangePostDeath,
    FrequentSurrenders,
    RefundWithoutBond,
    CtrAggregateMonitoring,
    ThirdPartyPanVerification,
    BeneficialOwnershipVerification,
    StructuredDeposits,
    HighValueFirstPremium,
    RapidTransactionFlow,
    ThirdPartyCashPayment,

    // Extended tier: session and scoring
    SessionAnomaly,
    AnomalyScoreThreshold,

    // Extended tier: payment patterns
    RoundAmountPattern,
    DormantPolicyReactivation,
    MultiplePoliciesShortSpan,
    PremiumOverpaymentRefund,
    CrossBorderRemittance,
    HighRiskJurisdiction,
    MultiplePaymentInstruments,
    PolicyLoanEarlyRepayment,
    SinglePremiumTopUp,
    FreeLookCancellationRefund,

    // Extended tier: claims
    EarlyDeathClaim,
    ClaimAfterReinstatement,
    MultipleClaimsSameLife,
    MaturityPayoutToThirdParty,
    SurvivalBenefitAccountChange,
    DuplicateClaimDocuments,
    ClaimantNomineeMismatch,
    AssignmentBeforeClaim,
    RepeatedOmbudsmanComplaints,
    HighSumAssuredLowIncome,

    // Extended tier: identity and KYC
    SanctionsListMatch,
    PoliticallyExposedPerson,
    AddressMismatch,
    AadhaarPanLinkMissing,
    ExpiredKycDocuments,
    SharedContactDetails,
    MinorAsPayer,
    FrequentContactChange,
    NriAccountMismatch,
    ShellEntityIndicators,

    // Extended tier: agent and channel
    AgentHighCancellationRate,
    AgentCommissionAnomaly,
    AgentCustomerConcentration,
    AgentPaysPremium,
    ChannelSwitching,
    BranchVelocitySpike,
    PosCashCollectionAnomaly,
    OnlineToCashSwitch,

    // Extended tier: behavioral
    UnusualTransactionTime,
    ProfileIncomeMismatch,
    SuddenActivitySpike,
    PolicyChurning,
    FundFlowLayering,
    CircularPremiumFunding,
    FrequentBeneficiaryChange,
    SmurfingAcrossPolicies,

    // Extended tier: device and network
    DeviceFingerprintReuse,
    IpGeolocationMismatch,
    VpnOrProxyUsage,
    ImpossibleTravel,
    EmulatorOrRootedDevice,
    RecentSimSwap,
    BotLikeInteraction,
    MultipleAccountsSameDevice,
    CredentialStuffing,
    BrowserFingerprintAnomaly,
}

/// Static catalog entry
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    /// Rule identifier
    pub trigger: TriggerCode,
    /// Stable code string (`AML_NNN`)
    pub code: &'static str,
    /// Short rule name
    pub title: &'static str,
    /// What the rule detects
    pub description: &'static str,
    /// Regulatory basis for the rule
    pub regulatory_basis: &'static str,
    /// Evaluation tier
    pub tier: RuleTier,
    /// Rule is declared but has no detector wired in yet
    pub placeholder: bool,
}

const PMLA_STR: &str = "PML Rules 2005, Rule 3(1)(D); IRDAI AML/CFT Guidelines 2022";
const PMLA_CTR: &str = "PML Rules 2005, Rule 3(1)(A)-(B)";
const IRDAI_KYC: &str = "IRDAI AML/CFT Guidelines 2022, KYC and CDD requirements";
const IRDAI_MONITORING: &str = "IRDAI AML/CFT Guidelines 2022, ongoing transaction monitoring";
const IRDAI_INTERMEDIARY: &str = "IRDAI AML/CFT Guidelines 2022, intermediary and distribution oversight";
const IRDAI_CYBER: &str = "IRDAI Information and Cyber Security Guidelines 2023";

macro_rules! rule {
    ($trigger:ident, $code:literal, $title:literal, $desc:literal, $basis:expr, $tier:ident, $placeholder:literal) => {
        RuleInfo {
            trigger: TriggerCode::$trigger,
            code: $code,
            title: $title,
            description: $desc,
            regulatory_basis: $basis,
            tier: RuleTier::$tier,
            placeholder: $placeholder,
        }
    };
}

/// Full rule catalog in evaluation order
pub const RULES: [RuleInfo; 70] = [
    rule!(CashThreshold, "AML_001", "Cash Threshold", "Cash payment above the permitted cash limit", "Income-tax Rules 1962, Rule 114B; PML Rules 2005, Rule 3(1)(A)", Core, false),
    rule!(PanMismatch, "AML_002", "PAN Mismatch", "PAN could not be verified against the customer record", "Income-tax Rules 1962, Rule 114B; IRDAI AML/CFT Guidelines 2022", Core, false),
    rule!(NomineeChangePostDeath, "AML_003", "Nominee Change Post Death", "Nominee changed after the date of death of the life assured", PMLA_STR, Core, false),
    rule!(FrequentSurrenders, "AML_004", "Frequent Surrenders", "Customer surrendered policies unusually often", IRDAI_MONITORING, Core, false),
    rule!(RefundWithoutBond, "AML_005", "Refund Without Bond", "Refund issued before the policy bond was dispatched", IRDAI_MONITORING, Core, false),
    rule!(CtrAggregateMonitoring, "AML_006", "CTR Aggregate Monitoring", "Daily cash aggregate above the cash transaction reporting limit", PMLA_CTR, Core, false),
    rule!(ThirdPartyPanVerification, "AML_007", "Third-Party PAN Verification", "Third-party payer without a verified PAN", "Income-tax Rules 1962, Rule 114B; IRDAI AML/CFT Guidelines 2022", Core, false),
    rule!(BeneficialOwnershipVerification, "AML_008", "Beneficial Ownership Verification", "Legal-entity customer with beneficial owners requiring verification", "PML Rules 2005, Rule 9(3)", Core, false),
    rule!(StructuredDeposits, "AML_009", "Structured Deposits", "Repeated cash amounts just under the cash limit", PMLA_STR, Core, false),
    rule!(HighValueFirstPremium, "AML_010", "High-Value First Premium", "First premium disproportionate to declared annual income", IRDAI_KYC, Core, false),
    rule!(RapidTransactionFlow, "AML_011", "Rapid Transaction Flow", "Unusually many transactions within 24 hours", IRDAI_MONITORING, Core, false),
    rule!(ThirdPartyCashPayment, "AML_012", "Third-Party Cash Payment", "Premium paid in cash by a third party", PMLA_STR, Core, true),
    rule!(SessionAnomaly, "AML_013", "Session Anomaly", "Session duration or login attempts outside normal bounds", IRDAI_CYBER, Extended, false),
    rule!(AnomalyScoreThreshold, "AML_014", "Anomaly Score Threshold", "Account activity anomaly score above the alert threshold", IRDAI_MONITORING, Extended, false),
    rule!(RoundAmountPattern, "AML_015", "Round Amount Pattern", "Recurring round-figure payments", IRDAI_MONITORING, Extended, true),
    rule!(DormantPolicyReactivation, "AML_016", "Dormant Policy Reactivation", "Long-dormant policy suddenly funded", IRDAI_MONITORING, Extended, true),
    rule!(MultiplePoliciesShortSpan, "AML_017", "Multiple Policies Short Span", "Several policies purchased within a short period", IRDAI_MONITORING, Extended, true),
    rule!(PremiumOverpaymentRefund, "AML_018", "Premium Overpayment Refund", "Premium overpaid and refund requested", PMLA_STR, Extended, true),
    rule!(CrossBorderRemittance, "AML_019", "Cross-Border Remittance", "Premium funded from a foreign remittance", "FEMA 1999; IRDAI AML/CFT Guidelines 2022", Extended, true),
    rule!(HighRiskJurisdiction, "AML_020", "High-Risk Jurisdiction", "Counterparty in a FATF high-risk jurisdiction", "FATF Recommendation 19", Extended, true),
    rule!(MultiplePaymentInstruments, "AML_021", "Multiple Payment Instruments", "Single premium split across many instruments", IRDAI_MONITORING, Extended, true),
    rule!(PolicyLoanEarlyRepayment, "AML_022", "Policy Loan Early Repayment", "Policy loan repaid unusually soon after disbursement", IRDAI_MONITORING, Extended, true),
    rule!(SinglePremiumTopUp, "AML_023", "Single Premium Top-Up", "Large top-up on a single-premium policy", IRDAI_MONITORING, Extended, true),
    rule!(FreeLookCancellationRefund, "AML_024", "Free-Look Cancellation Refund", "Free-look cancellation with refund to a different account", PMLA_STR, Extended, true),
    rule!(EarlyDeathClaim, "AML_025", "Early Death Claim", "Death claim shortly after policy inception", "Insurance Act 1938, Section 45", Extended, true),
    rule!(ClaimAfterReinstatement, "AML_026", "Claim After Reinstatement", "Claim filed soon after a lapsed policy was reinstated", "Insurance Act 1938, Section 45", Extended, true),
    rule!(MultipleClaimsSameLife, "AML_027", "Multiple Claims Same Life", "Several claims lodged on the same life assured", IRDAI_MONITORING, Extended, true),
    rule!(MaturityPayoutToThirdParty, "AML_028", "Maturity Payout To Third Party", "Maturity proceeds directed to an unrelated account", PMLA_STR, Extended, true),
    rule!(SurvivalBenefitAccountChange, "AML_029", "Survival Benefit Account Change", "Payout bank account changed just before a survival benefit", IRDAI_MONITORING, Extended, true),
    rule!(DuplicateClaimDocuments, "AML_030", "Duplicate Claim Documents", "Claim documents already used on another claim", PMLA_STR, Extended, true),
    rule!(ClaimantNomineeMismatch, "AML_031", "Claimant Nominee Mismatch", "Claimant is not the registered nominee", "Insurance Act 1938, Section 39", Extended, true),
    rule!(AssignmentBeforeClaim, "AML_032", "Assignment Before Claim", "Policy assigned shortly before a claim", "Insurance Act 1938, Section 38", Extended, true),
    rule!(RepeatedOmbudsmanComplaints, "AML_033", "Repeated Ombudsman Complaints", "Repeated ombudsman complaints on the same policy", "Insurance Ombudsman Rules 2017", Extended, true),
    rule!(HighSumAssuredLowIncome, "AML_034", "High Sum Assured Low Income", "Sum assured far exceeds declared income", IRDAI_KYC, Extended, true),
    rule!(SanctionsListMatch, "AML_035", "Sanctions List Match", "Party matched a designated sanctions list", "UAPA 1967, Section 51A; UNSC Consolidated List", Extended, true),
    rule!(PoliticallyExposedPerson, "AML_036", "Politically Exposed Person", "Customer identified as a politically exposed person", "PML Rules 2005, Rule 9(12); FATF Recommendation 12", Extended, true),
    rule!(AddressMismatch, "AML_037", "Address Mismatch", "Declared address differs from verified address", IRDAI_KYC, Extended, true),
    rule!(AadhaarPanLinkMissing, "AML_038", "Aadhaar PAN Link Missing", "PAN not linked to Aadhaar", "Income-tax Act 1961, Section 139AA", Extended, true),
    rule!(ExpiredKycDocuments, "AML_039", "Expired KYC Documents", "KYC documents expired at transaction time", IRDAI_KYC, Extended, true),
    rule!(SharedContactDetails, "AML_040", "Shared Contact Details", "Contact details shared across unrelated customers", IRDAI_KYC, Extended, true),
    rule!(MinorAsPayer, "AML_041", "Minor As Payer", "Minor recorded as proposer or payer", IRDAI_KYC, Extended, true),
    rule!(FrequentContactChange, "AML_042", "Frequent Contact Change", "Contact details changed repeatedly", IRDAI_MONITORING, Extended, true),
    rule!(NriAccountMismatch, "AML_043", "NRI Account Mismatch", "Non-resident customer paying from a resident account", "FEMA 1999", Extended, true),
    rule!(ShellEntityIndicators, "AML_044", "Shell Entity Indicators", "Corporate customer shows shell-company indicators", "PML Rules 2005, Rule 9(3)", Extended, true),
    rule!(AgentHighCancellationRate, "AML_045", "Agent High Cancellation Rate", "Agent portfolio shows abnormal cancellation rate", IRDAI_INTERMEDIARY, Extended, true),
    rule!(AgentCommissionAnomaly, "AML_046", "Agent Commission Anomaly", "Agent commission out of line with business volume", IRDAI_INTERMEDIARY, Extended, true),
    rule!(AgentCustomerConcentration, "AML_047", "Agent Customer Concentration", "Agent business concentrated on few customers", IRDAI_INTERMEDIARY, Extended, true),
    rule!(AgentPaysPremium, "AML_048", "Agent Pays Premium", "Agent paid the premium on behalf of the customer", IRDAI_INTERMEDIARY, Extended, true),
    rule!(ChannelSwitching, "AML_049", "Channel Switching", "Customer switching payment channels repeatedly", IRDAI_MONITORING, Extended, true),
    rule!(BranchVelocitySpike, "AML_050", "Branch Velocity Spike", "Unusual transaction spike at a branch", IRDAI_MONITORING, Extended, true),
    rule!(PosCashCollectionAnomaly, "AML_051", "POS Cash Collection Anomaly", "Point-of-sale cash collections out of pattern", PMLA_CTR, Extended, true),
    rule!(OnlineToCashSwitch, "AML_052", "Online To Cash Switch", "Habitual online payer switching to cash", IRDAI_MONITORING, Extended, true),
    rule!(UnusualTransactionTime, "AML_053", "Unusual Transaction Time", "Transaction at an unusual hour for the customer", IRDAI_MONITORING, Extended, true),
    rule!(ProfileIncomeMismatch, "AML_054", "Profile Income Mismatch", "Premium volume inconsistent with occupation and income", IRDAI_KYC, Extended, true),
    rule!(SuddenActivitySpike, "AML_055", "Sudden Activity Spike", "Sharp increase against historical activity", IRDAI_MONITORING, Extended, true),
    rule!(PolicyChurning, "AML_056", "Policy Churning", "Repeated purchase and surrender cycles", IRDAI_MONITORING, Extended, true),
    rule!(FundFlowLayering, "AML_057", "Fund Flow Layering", "Funds routed through multiple intermediate accounts", PMLA_STR, Extended, true),
    rule!(CircularPremiumFunding, "AML_058", "Circular Premium Funding", "Premium funded by proceeds of an earlier payout", PMLA_STR, Extended, true),
    rule!(FrequentBeneficiaryChange, "AML_059", "Frequent Beneficiary Change", "Beneficiary changed repeatedly", IRDAI_MONITORING, Extended, true),
    rule!(SmurfingAcrossPolicies, "AML_060", "Smurfing Across Policies", "Cash split across related policies to stay under limits", PMLA_CTR, Extended, true),
    rule!(DeviceFingerprintReuse, "AML_061", "Device Fingerprint Reuse", "Device fingerprint previously linked to fraud", IRDAI_CYBER, Extended, true),
    rule!(IpGeolocationMismatch, "AML_062", "IP Geolocation Mismatch", "IP location inconsistent with customer residence", IRDAI_CYBER, Extended, true),
    rule!(VpnOrProxyUsage, "AML_063", "VPN Or Proxy Usage", "Session routed through an anonymising proxy", IRDAI_CYBER, Extended, true),
    rule!(ImpossibleTravel, "AML_064", "Impossible Travel", "Consecutive sessions from locations too far apart", IRDAI_CYBER, Extended, true),
    rule!(EmulatorOrRootedDevice, "AML_065", "Emulator Or Rooted Device", "Session from an emulator or rooted device", IRDAI_CYBER, Extended, true),
    rule!(RecentSimSwap, "AML_066", "Recent SIM Swap", "Registered mobile SIM swapped recently", IRDAI_CYBER, Extended, true),
    rule!(BotLikeInteraction, "AML_067", "Bot-Like Interaction", "Interaction cadence consistent with automation", IRDAI_CYBER, Extended, true),
    rule!(MultipleAccountsSameDevice, "AML_068", "Multiple Accounts Same Device", "Several customer accounts used from one device", IRDAI_CYBER, Extended, true),
    rule!(CredentialStuffing, "AML_069", "Credential Stuffing", "Burst of failed logins across accounts", IRDAI_CYBER, Extended, true),
    rule!(BrowserFingerprintAnomaly, "AML_070", "Browser Fingerprint Anomaly", "Browser fingerprint inconsistent with user agent", IRDAI_CYBER, Extended, true),
];

static CATALOG: [RuleInfo; 70] = RULES;

impl TriggerCode {
    /// All rules in catalog order
    pub const ALL: [TriggerCode; 70] = {
        let mut all = [TriggerCode::CashThreshold; 70];
        let mut i = 0;
        while i < RULES.len() {
            all[i] = RULES[i].trigger;
            i += 1;
        }
        all
    };

    /// Rules evaluated over the base context
    pub const CORE: [TriggerCode; 12] = {
        let mut core = [TriggerCode::CashThreshold; 12];
        let mut i = 0;
        while i < core.len() {
            core[i] = RULES[i].trigger;
            i += 1;
        }
        core
    };

    /// Catalog entry for this code
    pub fn info(&self) -> &'static RuleInfo {
        &CATALOG[*self as usize]
    }

    /// Stable code string, e.g. `AML_001`
    pub fn code(&self) -> &'static str {
        self.info().code
    }

    /// Short rule name
    pub fn title(&self) -> &'static str {
        self.info().title
    }

    /// What the rule detects
    pub fn description(&self) -> &'static str {
        self.info().description
    }

    /// Regulatory basis
    pub fn regulatory_basis(&self) -> &'static str {
        self.info().regulatory_basis
    }

    /// Evaluation tier
    pub fn tier(&self) -> RuleTier {
        self.info().tier
    }

    /// Declared rule without a wired-in detector
    pub fn is_placeholder(&self) -> bool {
        self.info().placeholder
    }
}

impl fmt::Display for TriggerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TriggerCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RULES
            .iter()
            .find(|rule| rule.code.eq_ignore_ascii_case(s.trim()))
            .map(|rule| rule.trigger)
            .ok_or_else(|| Error::UnknownTriggerCode(s.to_string()))
    }
}

impl TryFrom<String> for TriggerCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TriggerCode> for String {
    fn from(code: TriggerCode) -> Self {
        code.code().to_string()
    }
}
