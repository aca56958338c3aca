//! Rule evaluators
//!
//! One pure function per trigger code. [`evaluator`] maps every code in the
//! catalog to exactly one function; the exhaustive `match` keeps the
//! registry and the catalog in lockstep.

pub mod base;
pub mod extended;

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::config::Thresholds;
use crate::metadata::{Metadata, MetadataValue};
use crate::types::{ExtendedTransactionContext, TransactionContext, TriggerResult};
use rust_decimal::Decimal;

/// Evaluator over the base context
pub type CoreEvaluator = fn(&TransactionContext, &Thresholds) -> TriggerResult;

/// Evaluator over the extended context
pub type Evaluator = fn(&ExtendedTransactionContext, &Thresholds) -> TriggerResult;

/// Builder for a rule outcome
///
/// Carries what the rule would report if it fires. [`Outcome::resolve`]
/// strips risk, filing, block and reason when it does not.
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    code: TriggerCode,
    risk_level: RiskLevel,
    filing_type: Option<FilingType>,
    blocks: bool,
    reason: String,
    metadata: Metadata,
}

impl Outcome {
    pub(crate) fn new(code: TriggerCode, risk_level: RiskLevel) -> Self {
        Self {
            code,
            risk_level,
            filing_type: None,
            blocks: false,
            reason: String::new(),
            metadata: Metadata::new(),
        }
    }

    pub(crate) fn file(mut self, filing_type: FilingType) -> Self {
        self.filing_type = Some(filing_type);
        self
    }

    pub(crate) fn block(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub(crate) fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub(crate) fn meta(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub(crate) fn meta_opt<V: Into<MetadataValue>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.metadata.insert(key, value);
        }
        self
    }

    pub(crate) fn resolve(self, triggered: bool) -> TriggerResult {
        if triggered {
            TriggerResult {
                trigger_code: self.code,
                triggered: true,
                risk_level: Some(self.risk_level),
                description: self.code.description().to_string(),
                filing_required: self.filing_type.is_some(),
                filing_type: self.filing_type,
                transaction_blocked: self.blocks,
                reason: Some(self.reason),
                metadata: self.metadata,
            }
        } else {
            TriggerResult {
                trigger_code: self.code,
                triggered: false,
                risk_level: None,
                description: self.code.description().to_string(),
                filing_required: false,
                filing_type: None,
                transaction_blocked: false,
                reason: None,
                metadata: self.metadata,
            }
        }
    }
}

/// Sum of amounts, `None` when the total leaves the `Decimal` range
pub(crate) fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

/// Evaluator registered for a trigger code
pub fn evaluator(code: TriggerCode) -> Evaluator {
    use self::base as c;
    use self::extended::{behavioral as b, channel as ch, claims as cl, identity as id, payment as p, technical as t};
    use TriggerCode::*;

    match code {
        CashThreshold => |ctx, th| c::cash_threshold(&ctx.base, th),
        PanMismatch => |ctx, th| c::pan_mismatch(&ctx.base, th),
        NomineeChangePostDeath => |ctx, th| c::nominee_change_post_death(&ctx.base, th),
        FrequentSurrenders => |ctx, th| c::frequent_surrenders(&ctx.base, th),
        RefundWithoutBond => |ctx, th| c::refund_without_bond(&ctx.base, th),
        CtrAggregateMonitoring => |ctx, th| c::ctr_aggregate_monitoring(&ctx.base, th),
        ThirdPartyPanVerification => |ctx, th| c::third_party_pan_verification(&ctx.base, th),
        BeneficialOwnershipVerification => {
            |ctx, th| c::beneficial_ownership_verification(&ctx.base, th)
        }
        StructuredDeposits => |ctx, th| c::structured_deposits(&ctx.base, th),
        HighValueFirstPremium => |ctx, th| c::high_value_first_premium(&ctx.base, th),
        RapidTransactionFlow => |ctx, th| c::rapid_transaction_flow(&ctx.base, th),
        ThirdPartyCashPayment => |ctx, th| c::third_party_cash_payment(&ctx.base, th),

        SessionAnomaly => t::session_anomaly,
        AnomalyScoreThreshold => b::anomaly_score_threshold,

        RoundAmountPattern => |ctx, _| p::round_amount_pattern(ctx),
        DormantPolicyReactivation => |ctx, _| p::dormant_policy_reactivation(ctx),
        MultiplePoliciesShortSpan => |ctx, _| p::multiple_policies_short_span(ctx),
        PremiumOverpaymentRefund => |ctx, _| p::premium_overpayment_refund(ctx),
        CrossBorderRemittance => |ctx, _| p::cross_border_remittance(ctx),
        HighRiskJurisdiction => |ctx, _| p::high_risk_jurisdiction(ctx),
        MultiplePaymentInstruments => |ctx, _| p::multiple_payment_instruments(ctx),
        PolicyLoanEarlyRepayment => |ctx, _| p::policy_loan_early_repayment(ctx),
        SinglePremiumTopUp => |ctx, _| p::single_premium_top_up(ctx),
        FreeLookCancellationRefund => |ctx, _| p::free_look_cancellation_refund(ctx),

        EarlyDeathClaim => |ctx, _| cl::early_death_claim(ctx),
        ClaimAfterReinstatement => |ctx, _| cl::claim_after_reinstatement(ctx),
        MultipleClaimsSameLife => |ctx, _| cl::multiple_claims_same_life(ctx),
        MaturityPayoutToThirdParty => |ctx, _| cl::maturity_payout_to_third_party(ctx),
        SurvivalBenefitAccountChange => |ctx, _| cl::survival_benefit_account_change(ctx),
        DuplicateClaimDocuments => |ctx, _| cl::duplicate_claim_documents(ctx),
        ClaimantNomineeMismatch => |ctx, _| cl::claimant_nominee_mismatch(ctx),
        AssignmentBeforeClaim => |ctx, _| cl::assignment_before_claim(ctx),
        RepeatedOmbudsmanComplaints => |ctx, _| cl::repeated_ombudsman_complaints(ctx),
        HighSumAssuredLowIncome => |ctx, _| cl::high_sum_assured_low_income(ctx),

        SanctionsListMatch => |ctx, _| id::sanctions_list_match(ctx),
        PoliticallyExposedPerson => |ctx, _| id::politically_exposed_person(ctx),
        AddressMismatch => |ctx, _| id::address_mismatch(ctx),
        AadhaarPanLinkMissing => |ctx, _| id::aadhaar_pan_link_missing(ctx),
        ExpiredKycDocuments => |ctx, _| id::expired_kyc_documents(ctx),
        SharedContactDetails => |ctx, _| id::shared_contact_details(ctx),
        MinorAsPayer => |ctx, _| id::minor_as_payer(ctx),
        FrequentContactChange => |ctx, _| id::frequent_contact_change(ctx),
        NriAccountMismatch => |ctx, _| id::nri_account_mismatch(ctx),
        ShellEntityIndicators => |ctx, _| id::shell_entity_indicators(ctx),

        AgentHighCancellationRate => |ctx, _| ch::agent_high_cancellation_rate(ctx),
        AgentCommissionAnomaly => |ctx, _| ch::agent_commission_anomaly(ctx),
        AgentCustomerConcentration => |ctx, _| ch::agent_customer_concentration(ctx),
        AgentPaysPremium => |ctx, _| ch::agent_pays_premium(ctx),
        ChannelSwitching => |ctx, _| ch::channel_switching(ctx),
        BranchVelocitySpike => |ctx, _| ch::branch_velocity_spike(ctx),
        PosCashCollectionAnomaly => |ctx, _| ch::pos_cash_collection_anomaly(ctx),
        OnlineToCashSwitch => |ctx, _| ch::online_to_cash_switch(ctx),

        UnusualTransactionTime => |ctx, _| b::unusual_transaction_time(ctx),
        ProfileIncomeMismatch => |ctx, _| b::profile_income_mismatch(ctx),
        SuddenActivitySpike => |ctx, _| b::sudden_activity_spike(ctx),
        PolicyChurning => |ctx, _| b::policy_churning(ctx),
        FundFlowLayering => |ctx, _| b::fund_flow_layering(ctx),
        CircularPremiumFunding => |ctx, _| b::circular_premium_funding(ctx),
        FrequentBeneficiaryChange => |ctx, _| b::frequent_beneficiary_change(ctx),
        SmurfingAcrossPolicies => |ctx, _| b::smurfing_across_policies(ctx),

        DeviceFingerprintReuse => |ctx, _| t::device_fingerprint_reuse(ctx),
        IpGeolocationMismatch => |ctx, _| t::ip_geolocation_mismatch(ctx),
        VpnOrProxyUsage => |ctx, _| t::vpn_or_proxy_usage(ctx),
        ImpossibleTravel => |ctx, _| t::impossible_travel(ctx),
        EmulatorOrRootedDevice => |ctx, _| t::emulator_or_rooted_device(ctx),
        RecentSimSwap => |ctx, _| t::recent_sim_swap(ctx),
        BotLikeInteraction => |ctx, _| t::bot_like_interaction(ctx),
        MultipleAccountsSameDevice => |ctx, _| t::multiple_accounts_same_device(ctx),
        CredentialStuffing => |ctx, _| t::credential_stuffing(ctx),
        BrowserFingerprintAnomaly => |ctx, _| t::browser_fingerprint_anomaly(ctx),
    }
}

/// Evaluate a single rule over the extended context
pub fn evaluate(
    code: TriggerCode,
    ctx: &ExtendedTransactionContext,
    thresholds: &Thresholds,
) -> TriggerResult {
    evaluator(code)(ctx, thresholds)
}
