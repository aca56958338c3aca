//! Core rules over the base transaction context (AML_001 - AML_012)

use super::{CoreEvaluator, Outcome};
use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::config::Thresholds;
use crate::metadata::keys;
use crate::types::{TransactionContext, TriggerResult};
use rust_decimal::Decimal;

/// Core rules in catalog order
pub const CORE_RULES: [(TriggerCode, CoreEvaluator); 12] = [
    (TriggerCode::CashThreshold, cash_threshold),
    (TriggerCode::PanMismatch, pan_mismatch),
    (TriggerCode::NomineeChangePostDeath, nominee_change_post_death),
    (TriggerCode::FrequentSurrenders, frequent_surrenders),
    (TriggerCode::RefundWithoutBond, refund_without_bond),
    (TriggerCode::CtrAggregateMonitoring, ctr_aggregate_monitoring),
    (TriggerCode::ThirdPartyPanVerification, third_party_pan_verification),
    (TriggerCode::BeneficialOwnershipVerification, beneficial_ownership_verification),
    (TriggerCode::StructuredDeposits, structured_deposits),
    (TriggerCode::HighValueFirstPremium, high_value_first_premium),
    (TriggerCode::RapidTransactionFlow, rapid_transaction_flow),
    (TriggerCode::ThirdPartyCashPayment, third_party_cash_payment),
];

/// AML_001: cash payment strictly above the cash threshold.
pub fn cash_threshold(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    let triggered = ctx.is_cash() && ctx.amount > t.cash_threshold;

    Outcome::new(TriggerCode::CashThreshold, RiskLevel::High)
        .file(FilingType::Ctr)
        .reason(format!(
            "Cash payment of {} exceeds limit {}",
            ctx.amount, t.cash_threshold
        ))
        .meta(keys::AMOUNT, ctx.amount)
        .meta(keys::THRESHOLD, t.cash_threshold)
        .meta(keys::PAYMENT_MODE, ctx.payment_mode.as_str())
        .resolve(triggered)
}

/// AML_002: customer PAN not verified.
pub fn pan_mismatch(ctx: &TransactionContext, _t: &Thresholds) -> TriggerResult {
    Outcome::new(TriggerCode::PanMismatch, RiskLevel::Medium)
        .reason("PAN verification failed or pending")
        .meta(keys::PAN_VERIFIED, ctx.pan_verified)
        .meta(keys::CUSTOMER_ID, ctx.customer_id.as_str())
        .resolve(!ctx.pan_verified)
}

/// AML_003: nominee changed strictly after the death of the life assured.
///
/// Fires only when both dates are known. Blocks the transaction and owes an
/// STR.
pub fn nominee_change_post_death(ctx: &TransactionContext, _t: &Thresholds) -> TriggerResult {
    let triggered = match (ctx.nominee_change_date, ctx.death_date) {
        (Some(changed), Some(died)) => changed > died,
        _ => false,
    };

    Outcome::new(TriggerCode::NomineeChangePostDeath, RiskLevel::Critical)
        .file(FilingType::Str)
        .block()
        .reason("Nominee was changed after the date of death")
        .meta_opt(keys::NOMINEE_CHANGE_DATE, ctx.nominee_change_date)
        .meta_opt(keys::DEATH_DATE, ctx.death_date)
        .meta(keys::POLICY_NUMBER, ctx.policy_number.as_str())
        .resolve(triggered)
}

/// AML_004: more surrenders than allowed.
pub fn frequent_surrenders(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    Outcome::new(TriggerCode::FrequentSurrenders, RiskLevel::Medium)
        .reason(format!(
            "{} surrenders exceed limit {}",
            ctx.surrender_count, t.max_surrender_count
        ))
        .meta(keys::SURRENDER_COUNT, ctx.surrender_count)
        .meta(keys::THRESHOLD, t.max_surrender_count)
        .resolve(ctx.surrender_count > t.max_surrender_count)
}

/// AML_005: refund issued strictly before the policy bond was dispatched.
pub fn refund_without_bond(ctx: &TransactionContext, _t: &Thresholds) -> TriggerResult {
    let triggered = match (ctx.refund_date, ctx.bond_dispatch_date) {
        (Some(refund), Some(dispatch)) => refund < dispatch,
        _ => false,
    };

    Outcome::new(TriggerCode::RefundWithoutBond, RiskLevel::High)
        .reason("Refund processed before the policy bond was dispatched")
        .meta_opt(keys::REFUND_DATE, ctx.refund_date)
        .meta_opt(keys::BOND_DISPATCH_DATE, ctx.bond_dispatch_date)
        .meta(keys::POLICY_NUMBER, ctx.policy_number.as_str())
        .resolve(triggered)
}

/// AML_006: daily cash aggregate strictly above the reporting limit.
pub fn ctr_aggregate_monitoring(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    Outcome::new(TriggerCode::CtrAggregateMonitoring, RiskLevel::Critical)
        .file(FilingType::Ctr)
        .reason(format!(
            "Daily cash aggregate {} exceeds reporting limit {}",
            ctx.daily_cash_aggregate, t.ctr_daily_aggregate
        ))
        .meta(keys::DAILY_CASH_AGGREGATE, ctx.daily_cash_aggregate)
        .meta(keys::THRESHOLD, t.ctr_daily_aggregate)
        .resolve(ctx.daily_cash_aggregate > t.ctr_daily_aggregate)
}

/// AML_007: third-party payer whose PAN is not verified. Blocks.
pub fn third_party_pan_verification(ctx: &TransactionContext, _t: &Thresholds) -> TriggerResult {
    let triggered = ctx.third_party_payment && !ctx.third_party_pan_verified;

    Outcome::new(TriggerCode::ThirdPartyPanVerification, RiskLevel::Critical)
        .block()
        .reason("Third-party payment without a verified payer PAN")
        .meta(keys::THIRD_PARTY_PAYMENT, ctx.third_party_payment)
        .meta(keys::THIRD_PARTY_PAN_VERIFIED, ctx.third_party_pan_verified)
        .resolve(triggered)
}

/// AML_008: company, trust or NGO customer listing beneficial owners.
pub fn beneficial_ownership_verification(
    ctx: &TransactionContext,
    _t: &Thresholds,
) -> TriggerResult {
    let triggered = ctx.is_legal_entity() && !ctx.beneficial_owners.is_empty();

    Outcome::new(TriggerCode::BeneficialOwnershipVerification, RiskLevel::High)
        .reason(format!(
            "{} customer with {} beneficial owner(s) requires verification",
            ctx.customer_type,
            ctx.beneficial_owners.len()
        ))
        .meta(keys::CUSTOMER_TYPE, ctx.customer_type.as_str())
        .meta(keys::BENEFICIAL_OWNER_COUNT, ctx.beneficial_owners.len())
        .resolve(triggered)
}

/// AML_009: repeated cash amounts in `[band_floor, cash_threshold)`.
pub fn structured_deposits(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    let structured = ctx
        .recent_cash_transactions
        .iter()
        .filter(|amount| **amount >= t.structuring_band_floor && **amount < t.cash_threshold)
        .count();

    Outcome::new(TriggerCode::StructuredDeposits, RiskLevel::High)
        .reason(format!(
            "{} cash transactions between {} and {}",
            structured, t.structuring_band_floor, t.cash_threshold
        ))
        .meta(keys::STRUCTURED_COUNT, structured)
        .meta(keys::BAND_FLOOR, t.structuring_band_floor)
        .meta(keys::THRESHOLD, t.cash_threshold)
        .resolve(structured >= t.structuring_min_occurrences)
}

/// AML_010: first premium strictly above the permitted share of declared
/// annual income. No declared income, or zero income, never fires. The
/// ratio is left out of the metadata when it overflows.
pub fn high_value_first_premium(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    let income = ctx.declared_annual_income.filter(|income| *income > Decimal::ZERO);
    let ratio = income.and_then(|income| ctx.amount.checked_div(income));
    // A limit past the Decimal range is above any amount.
    let triggered = ctx.is_first_premium
        && income
            .and_then(|income| income.checked_mul(t.first_premium_income_ratio))
            .is_some_and(|limit| ctx.amount > limit);

    Outcome::new(TriggerCode::HighValueFirstPremium, RiskLevel::High)
        .reason(format!(
            "First premium {} exceeds {} of declared income",
            ctx.amount, t.first_premium_income_ratio
        ))
        .meta(keys::AMOUNT, ctx.amount)
        .meta_opt(keys::DECLARED_INCOME, ctx.declared_annual_income)
        .meta_opt(keys::INCOME_RATIO, ratio)
        .resolve(triggered)
}

/// AML_011: more transactions in 24 hours than allowed.
pub fn rapid_transaction_flow(ctx: &TransactionContext, t: &Thresholds) -> TriggerResult {
    Outcome::new(TriggerCode::RapidTransactionFlow, RiskLevel::High)
        .reason(format!(
            "{} transactions in 24 hours exceed limit {}",
            ctx.transactions_last_24h, t.max_transactions_per_day
        ))
        .meta(keys::TRANSACTION_COUNT, ctx.transactions_last_24h)
        .meta(keys::THRESHOLD, t.max_transactions_per_day)
        .resolve(ctx.transactions_last_24h > t.max_transactions_per_day)
}

/// AML_012: premium paid in cash by a third party.
///
/// Intended signal: payer relationship from the payment gateway, to tell a
/// family member paying in cash from an unrelated payer.
pub fn third_party_cash_payment(ctx: &TransactionContext, _t: &Thresholds) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ThirdPartyCashPayment, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Cash payment made by an unrelated third party")
        .meta(keys::SIGNAL, "payer_relationship")
        .meta(keys::THIRD_PARTY_PAYMENT, ctx.third_party_payment)
        .meta(keys::PAYMENT_MODE, ctx.payment_mode.as_str())
        .meta(keys::AMOUNT, ctx.amount)
        .resolve(detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BeneficialOwner;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn clean() -> TransactionContext {
        TransactionContext {
            policy_number: "POL-1001".to_string(),
            customer_id: "CUST-1".to_string(),
            amount: dec!(10000),
            payment_mode: "NEFT".to_string(),
            pan_verified: true,
            third_party_pan_verified: true,
            customer_type: "INDIVIDUAL".to_string(),
            ..Default::default()
        }
    }

    fn t() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_clean_context_triggers_nothing() {
        let ctx = clean();
        for (code, eval) in CORE_RULES {
            let result = eval(&ctx, &t());
            assert!(!result.triggered, "{} fired on clean context", code);
        }
    }

    #[test]
    fn test_cash_threshold_boundary() {
        let mut ctx = clean();
        ctx.payment_mode = "CASH".to_string();
        ctx.amount = dec!(50000);
        assert!(!cash_threshold(&ctx, &t()).triggered);

        ctx.amount = dec!(50001);
        let result = cash_threshold(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.risk_level, Some(RiskLevel::High));
        assert_eq!(result.filing_type, Some(FilingType::Ctr));
        assert!(result.filing_required);
        assert!(!result.transaction_blocked);
        assert_eq!(result.metadata.get_amount(keys::AMOUNT), Some(dec!(50001)));
    }

    #[test]
    fn test_cash_threshold_ignores_non_cash() {
        let mut ctx = clean();
        ctx.amount = dec!(900000);
        assert!(!cash_threshold(&ctx, &t()).triggered);

        // Mode matching is exact
        ctx.payment_mode = "cash".to_string();
        assert!(!cash_threshold(&ctx, &t()).triggered);
    }

    #[test]
    fn test_pan_mismatch() {
        let mut ctx = clean();
        assert!(!pan_mismatch(&ctx, &t()).triggered);
        ctx.pan_verified = false;
        let result = pan_mismatch(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.risk_level, Some(RiskLevel::Medium));
        assert!(!result.filing_required);
    }

    #[test]
    fn test_nominee_change_post_death() {
        let death = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut ctx = clean();

        ctx.death_date = Some(death);
        ctx.nominee_change_date = Some(death + Duration::days(1));
        let result = nominee_change_post_death(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.risk_level, Some(RiskLevel::Critical));
        assert_eq!(result.filing_type, Some(FilingType::Str));
        assert!(result.transaction_blocked);

        ctx.nominee_change_date = Some(death);
        assert!(!nominee_change_post_death(&ctx, &t()).triggered);

        ctx.nominee_change_date = Some(death - Duration::days(30));
        assert!(!nominee_change_post_death(&ctx, &t()).triggered);
    }

    #[test]
    fn test_nominee_change_missing_dates() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut ctx = clean();

        ctx.nominee_change_date = Some(date);
        assert!(!nominee_change_post_death(&ctx, &t()).triggered);

        ctx.nominee_change_date = None;
        ctx.death_date = Some(date);
        assert!(!nominee_change_post_death(&ctx, &t()).triggered);
    }

    #[test]
    fn test_frequent_surrenders_boundary() {
        let mut ctx = clean();
        ctx.surrender_count = 3;
        assert!(!frequent_surrenders(&ctx, &t()).triggered);
        ctx.surrender_count = 4;
        assert_eq!(frequent_surrenders(&ctx, &t()).risk_level, Some(RiskLevel::Medium));
    }

    #[test]
    fn test_refund_without_bond() {
        let dispatch = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let mut ctx = clean();

        ctx.bond_dispatch_date = Some(dispatch);
        ctx.refund_date = Some(dispatch - Duration::seconds(1));
        let result = refund_without_bond(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.risk_level, Some(RiskLevel::High));

        ctx.refund_date = Some(dispatch);
        assert!(!refund_without_bond(&ctx, &t()).triggered);

        ctx.refund_date = None;
        assert!(!refund_without_bond(&ctx, &t()).triggered);

        ctx.refund_date = Some(dispatch);
        ctx.bond_dispatch_date = None;
        assert!(!refund_without_bond(&ctx, &t()).triggered);
    }

    #[test]
    fn test_ctr_aggregate_boundary() {
        let mut ctx = clean();
        ctx.daily_cash_aggregate = dec!(1000000);
        assert!(!ctr_aggregate_monitoring(&ctx, &t()).triggered);

        ctx.daily_cash_aggregate = dec!(1000001);
        let result = ctr_aggregate_monitoring(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.risk_level, Some(RiskLevel::Critical));
        assert_eq!(result.filing_type, Some(FilingType::Ctr));
    }

    #[test]
    fn test_third_party_pan_verification() {
        let mut ctx = clean();
        ctx.third_party_pan_verified = false;
        // Not a third-party payment
        assert!(!third_party_pan_verification(&ctx, &t()).triggered);

        ctx.third_party_payment = true;
        let result = third_party_pan_verification(&ctx, &t());
        assert!(result.triggered);
        assert!(result.transaction_blocked);
        assert_eq!(result.risk_level, Some(RiskLevel::Critical));

        ctx.third_party_pan_verified = true;
        assert!(!third_party_pan_verification(&ctx, &t()).triggered);
    }

    #[test]
    fn test_beneficial_ownership() {
        let owner = BeneficialOwner {
            name: "A. Director".to_string(),
            ownership_percentage: dec!(40),
            pan: None,
        };
        let mut ctx = clean();
        ctx.beneficial_owners = vec![owner];
        assert!(!beneficial_ownership_verification(&ctx, &t()).triggered);

        for customer_type in ["COMPANY", "TRUST", "NGO"] {
            ctx.customer_type = customer_type.to_string();
            assert!(beneficial_ownership_verification(&ctx, &t()).triggered);
        }

        ctx.beneficial_owners.clear();
        assert!(!beneficial_ownership_verification(&ctx, &t()).triggered);
    }

    #[test]
    fn test_structured_deposits_band() {
        let mut ctx = clean();
        ctx.recent_cash_transactions = vec![dec!(49999), dec!(45000), dec!(50000)];
        // 50,000 sits outside the band
        assert!(!structured_deposits(&ctx, &t()).triggered);

        ctx.recent_cash_transactions.push(dec!(47500));
        let result = structured_deposits(&ctx, &t());
        assert!(result.triggered);
        assert_eq!(result.metadata.get_integer(keys::STRUCTURED_COUNT), Some(3));

        ctx.recent_cash_transactions = vec![dec!(44999.99); 5];
        assert!(!structured_deposits(&ctx, &t()).triggered);
    }

    #[test]
    fn test_high_value_first_premium() {
        let mut ctx = clean();
        ctx.is_first_premium = true;
        ctx.amount = dec!(300000);
        ctx.declared_annual_income = Some(dec!(600000));
        assert!(!high_value_first_premium(&ctx, &t()).triggered);

        ctx.amount = dec!(300001);
        assert!(high_value_first_premium(&ctx, &t()).triggered);

        ctx.is_first_premium = false;
        assert!(!high_value_first_premium(&ctx, &t()).triggered);
    }

    #[test]
    fn test_high_value_first_premium_without_income() {
        let mut ctx = clean();
        ctx.is_first_premium = true;
        ctx.amount = dec!(1000000);
        assert!(!high_value_first_premium(&ctx, &t()).triggered);

        ctx.declared_annual_income = Some(Decimal::ZERO);
        assert!(!high_value_first_premium(&ctx, &t()).triggered);
    }

    #[test]
    fn test_rapid_transaction_flow_boundary() {
        let mut ctx = clean();
        ctx.transactions_last_24h = 5;
        assert!(!rapid_transaction_flow(&ctx, &t()).triggered);
        ctx.transactions_last_24h = 6;
        assert!(rapid_transaction_flow(&ctx, &t()).triggered);
    }

    #[test]
    fn test_third_party_cash_payment_stays_inert() {
        let mut ctx = clean();
        ctx.third_party_payment = true;
        ctx.third_party_pan_verified = false;
        ctx.payment_mode = "CASH".to_string();
        ctx.amount = dec!(49000);

        let result = third_party_cash_payment(&ctx, &t());
        assert!(!result.triggered);
        assert_eq!(result.filing_type, None);
        assert_eq!(result.metadata.get_text(keys::SIGNAL), Some("payer_relationship"));
        assert_eq!(result.metadata.get_bool(keys::THIRD_PARTY_PAYMENT), Some(true));
    }

    #[test]
    fn test_pattern_rules_owe_no_filing() {
        let mut ctx = clean();
        ctx.recent_cash_transactions = vec![dec!(46000); 3];
        ctx.is_first_premium = true;
        ctx.amount = dec!(400000);
        ctx.declared_annual_income = Some(dec!(500000));
        ctx.transactions_last_24h = 9;

        for result in [
            structured_deposits(&ctx, &t()),
            high_value_first_premium(&ctx, &t()),
            rapid_transaction_flow(&ctx, &t()),
        ] {
            assert!(result.triggered, "{} did not fire", result.trigger_code);
            assert_eq!(result.risk_level, Some(RiskLevel::High));
            assert!(!result.filing_required);
            assert_eq!(result.filing_type, None);
        }
    }

    #[test]
    fn test_high_value_first_premium_extreme_amounts() {
        let mut ctx = clean();
        ctx.is_first_premium = true;
        ctx.amount = Decimal::MAX;
        ctx.declared_annual_income = Some(dec!(0.01));

        // Ratio overflows: rule still fires, ratio is omitted
        let result = high_value_first_premium(&ctx, &t());
        assert!(result.triggered);
        assert!(!result.metadata.contains_key(keys::INCOME_RATIO));
        assert_eq!(result.metadata.get_amount(keys::AMOUNT), Some(Decimal::MAX));

        ctx.amount = dec!(1000000000000000000000000000);
        assert!(high_value_first_premium(&ctx, &t()).triggered);

        // Limit overflows: no amount can exceed it
        let mut thresholds = t();
        thresholds.first_premium_income_ratio = dec!(10);
        ctx.declared_annual_income = Some(Decimal::MAX);
        ctx.amount = Decimal::MAX;
        let result = high_value_first_premium(&ctx, &thresholds);
        assert!(!result.triggered);
        assert_eq!(result.metadata.get_amount(keys::INCOME_RATIO), Some(Decimal::ONE));

        for (code, eval) in CORE_RULES {
            assert_eq!(eval(&ctx, &thresholds).trigger_code, code);
        }
    }

    #[test]
    fn test_custom_threshold() {
        let mut thresholds = t();
        thresholds.cash_threshold = dec!(20000);
        let mut ctx = clean();
        ctx.payment_mode = "CASH".to_string();
        ctx.amount = dec!(25000);
        assert!(cash_threshold(&ctx, &thresholds).triggered);
        assert!(!cash_threshold(&ctx, &t()).triggered);
    }
}
