//! Behavioral rules (AML_014, AML_053 - AML_060)

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::config::Thresholds;
use crate::metadata::keys;
use crate::rules::{checked_total, Outcome};
use crate::types::{ExtendedTransactionContext, TriggerResult};
use chrono::Timelike;

/// AML_014: account activity score strictly above the threshold.
///
/// The score is on a 0-100 scale and produced upstream. No score, no alert.
pub fn anomaly_score_threshold(ctx: &ExtendedTransactionContext, t: &Thresholds) -> TriggerResult {
    let triggered = ctx
        .account_activity_score
        .is_some_and(|score| score > t.anomaly_score_threshold);

    Outcome::new(TriggerCode::AnomalyScoreThreshold, RiskLevel::High)
        .reason(format!(
            "Account activity score above {}",
            t.anomaly_score_threshold
        ))
        .meta_opt(keys::ANOMALY_SCORE, ctx.account_activity_score)
        .meta(keys::THRESHOLD, t.anomaly_score_threshold)
        .resolve(triggered)
}

/// AML_053: transaction at an unusual hour for the customer.
///
/// Intended signal: hour-of-day distribution of the customer's history.
pub fn unusual_transaction_time(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let hour = ctx.base.transaction_date.map(|at| at.hour());

    Outcome::new(TriggerCode::UnusualTransactionTime, RiskLevel::Low)
        .reason("Transaction outside the customer's usual hours")
        .meta(keys::SIGNAL, "hour_of_day_profile")
        .meta_opt(keys::TRANSACTION_HOUR, hour)
        .resolve(detected)
}

/// AML_054: premium volume inconsistent with occupation and income.
pub fn profile_income_mismatch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let paid = checked_total(ctx.transaction_history.iter().map(|tx| tx.amount));

    Outcome::new(TriggerCode::ProfileIncomeMismatch, RiskLevel::Medium)
        .file(FilingType::Str)
        .reason("Premium volume inconsistent with customer profile")
        .meta(keys::SIGNAL, "premium_to_income_ratio")
        .meta_opt(keys::PREMIUM_PAID_TOTAL, paid)
        .meta_opt(keys::DECLARED_INCOME, ctx.base.declared_annual_income)
        .meta_opt(keys::OCCUPATION, ctx.customer_profile.occupation.as_deref())
        .resolve(detected)
}

/// AML_055: sharp increase against historical activity.
pub fn sudden_activity_spike(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SuddenActivitySpike, RiskLevel::Medium)
        .reason("Activity spiked against the historical baseline")
        .meta(keys::SIGNAL, "activity_baseline_deviation")
        .meta(keys::TRANSACTION_COUNT, ctx.base.transactions_last_24h)
        .meta(keys::HISTORY_COUNT, ctx.transaction_history.len())
        .resolve(detected)
}

/// AML_056: repeated purchase and surrender cycles.
pub fn policy_churning(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::PolicyChurning, RiskLevel::Medium)
        .reason("Policies repeatedly bought and surrendered")
        .meta(keys::SIGNAL, "purchase_surrender_cycles")
        .meta(keys::SURRENDER_COUNT, ctx.base.surrender_count)
        .meta(keys::POLICIES_OPENED_LAST_90D, ctx.customer_profile.policies_opened_last_90d)
        .resolve(detected)
}

/// AML_057: funds routed through several intermediate accounts.
///
/// Intended signal: distinct counterparties in the funding chain.
pub fn fund_flow_layering(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let mut counterparties: Vec<&str> = ctx
        .transaction_history
        .iter()
        .filter_map(|tx| tx.counterparty.as_deref())
        .collect();
    counterparties.sort_unstable();
    counterparties.dedup();

    Outcome::new(TriggerCode::FundFlowLayering, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Funds layered through intermediate accounts")
        .meta(keys::SIGNAL, "counterparty_chain")
        .meta(keys::DISTINCT_COUNTERPARTIES, counterparties.len())
        .resolve(detected)
}

/// AML_058: premium funded by proceeds of an earlier payout.
pub fn circular_premium_funding(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::CircularPremiumFunding, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Premium funded from an earlier claim or surrender payout")
        .meta(keys::SIGNAL, "payout_reinvestment")
        .meta(keys::CLAIM_COUNT, ctx.claim_history.len())
        .meta(keys::AMOUNT, ctx.base.amount)
        .resolve(detected)
}

/// AML_059: beneficiary changed repeatedly.
pub fn frequent_beneficiary_change(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::FrequentBeneficiaryChange, RiskLevel::Medium)
        .reason("Beneficiary changed repeatedly")
        .meta(keys::SIGNAL, "beneficiary_changes_last_year")
        .meta(
            keys::BENEFICIARY_CHANGES_LAST_YEAR,
            ctx.customer_profile.beneficiary_changes_last_year,
        )
        .meta_opt(keys::NOMINEE_CHANGE_DATE, ctx.base.nominee_change_date)
        .resolve(detected)
}

/// AML_060: cash split across related policies to stay under limits.
pub fn smurfing_across_policies(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SmurfingAcrossPolicies, RiskLevel::High)
        .file(FilingType::Ctr)
        .reason("Cash split across related policies")
        .meta(keys::SIGNAL, "cross_policy_cash_split")
        .meta(keys::POLICIES_HELD, ctx.customer_profile.policies_held)
        .meta(keys::DAILY_CASH_AGGREGATE, ctx.base.daily_cash_aggregate)
        .resolve(detected)
}
