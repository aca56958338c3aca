//! Payment-pattern rules (AML_015 - AML_024)
//!
//! Declared detectors. Each fixes `detected` to `false`; the metadata names
//! the signal it will consume once wired in.

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::metadata::keys;
use crate::rules::Outcome;
use crate::types::{ExtendedTransactionContext, TriggerResult};

/// AML_015: recurring round-figure payments.
///
/// Intended signal: share of round-lakh amounts across the transaction
/// history.
pub fn round_amount_pattern(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::RoundAmountPattern, RiskLevel::Medium)
        .reason("Recurring round-figure payments")
        .meta(keys::SIGNAL, "round_amount_share")
        .meta(keys::AMOUNT, ctx.base.amount)
        .meta(keys::HISTORY_COUNT, ctx.transaction_history.len())
        .resolve(detected)
}

/// AML_016: long-dormant policy suddenly funded.
///
/// Intended signal: gap between the latest historical transaction and this
/// one.
pub fn dormant_policy_reactivation(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let last_activity = ctx
        .transaction_history
        .iter()
        .filter_map(|tx| tx.occurred_at)
        .max();

    Outcome::new(TriggerCode::DormantPolicyReactivation, RiskLevel::Medium)
        .reason("Dormant policy reactivated with fresh funds")
        .meta(keys::SIGNAL, "dormancy_gap")
        .meta(keys::POLICY_NUMBER, ctx.base.policy_number.as_str())
        .meta_opt(keys::LAST_ACTIVITY, last_activity)
        .resolve(detected)
}

/// AML_017: several policies bought within a short period.
pub fn multiple_policies_short_span(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::MultiplePoliciesShortSpan, RiskLevel::Medium)
        .reason("Multiple policies purchased within a short span")
        .meta(keys::SIGNAL, "policies_opened_last_90d")
        .meta(keys::POLICIES_OPENED_LAST_90D, ctx.customer_profile.policies_opened_last_90d)
        .meta(keys::CUSTOMER_ID, ctx.customer_profile.customer_id.as_str())
        .resolve(detected)
}

/// AML_018: premium overpaid and refund requested.
pub fn premium_overpayment_refund(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::PremiumOverpaymentRefund, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Premium overpaid followed by a refund request")
        .meta(keys::SIGNAL, "overpayment_refund")
        .meta(keys::AMOUNT, ctx.base.amount)
        .meta_opt(keys::REFUND_DATE, ctx.base.refund_date)
        .resolve(detected)
}

/// AML_019: premium funded from a foreign remittance.
///
/// Intended signal: originating country on the funding transaction.
pub fn cross_border_remittance(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let foreign = ctx
        .transaction_history
        .iter()
        .filter(|tx| tx.country.as_deref().is_some_and(|c| c != "IN"))
        .count();

    Outcome::new(TriggerCode::CrossBorderRemittance, RiskLevel::Medium)
        .reason("Premium funded by cross-border remittance")
        .meta(keys::SIGNAL, "remittance_origin")
        .meta(keys::FOREIGN_TRANSACTIONS, foreign)
        .resolve(detected)
}

/// AML_020: counterparty in a FATF high-risk jurisdiction.
///
/// Intended signal: jurisdiction list resolved by the caller.
pub fn high_risk_jurisdiction(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::HighRiskJurisdiction, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Counterparty located in a high-risk jurisdiction")
        .meta(keys::SIGNAL, "fatf_jurisdiction")
        .meta_opt(keys::COUNTRY, ctx.customer_profile.residence_country.as_deref())
        .meta_opt(keys::IP_COUNTRY, ctx.device.ip_country.as_deref())
        .resolve(detected)
}

/// AML_021: single premium split across many instruments.
pub fn multiple_payment_instruments(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let mut modes: Vec<&str> = ctx
        .transaction_history
        .iter()
        .map(|tx| tx.payment_mode.as_str())
        .collect();
    modes.sort_unstable();
    modes.dedup();

    Outcome::new(TriggerCode::MultiplePaymentInstruments, RiskLevel::Low)
        .reason("Premium split across multiple payment instruments")
        .meta(keys::SIGNAL, "instrument_count")
        .meta(keys::INSTRUMENT_COUNT, modes.len())
        .resolve(detected)
}

/// AML_022: policy loan repaid unusually soon after disbursement.
pub fn policy_loan_early_repayment(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::PolicyLoanEarlyRepayment, RiskLevel::Medium)
        .reason("Policy loan repaid shortly after disbursement")
        .meta(keys::SIGNAL, "loan_repayment_interval")
        .meta(keys::POLICY_NUMBER, ctx.base.policy_number.as_str())
        .meta(keys::AMOUNT, ctx.base.amount)
        .resolve(detected)
}

/// AML_023: large top-up on a single-premium policy.
pub fn single_premium_top_up(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SinglePremiumTopUp, RiskLevel::Medium)
        .reason("Large top-up on a single-premium policy")
        .meta(keys::SIGNAL, "top_up_ratio")
        .meta(keys::AMOUNT, ctx.base.amount)
        .meta_opt(keys::DECLARED_INCOME, ctx.base.declared_annual_income)
        .resolve(detected)
}

/// AML_024: free-look cancellation refunded to a different account.
///
/// Intended signal: refund account differs from the paying account.
pub fn free_look_cancellation_refund(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::FreeLookCancellationRefund, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Free-look refund directed to a different account")
        .meta(keys::SIGNAL, "refund_account_mismatch")
        .meta(keys::POLICY_NUMBER, ctx.base.policy_number.as_str())
        .meta_opt(keys::REFUND_DATE, ctx.base.refund_date)
        .resolve(detected)
}
