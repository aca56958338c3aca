//! End-to-end evaluation scenarios
//!
//! Each fully specified rule gets a firing and a non-firing snapshot, and the
//! combined scenario checks aggregation and the policy decision.

use aml_engine::{
    BeneficialOwner, ClaimRecord, EnforcementAction, EngineConfig, ExtendedTransactionContext,
    FilingType, HistoricalTransaction, RiskLevel, RuleEngine, Thresholds, TransactionContext,
    TriggerCode,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn clean() -> TransactionContext {
    TransactionContext {
        policy_number: "POL-2024-0042".to_string(),
        customer_id: "CUST-7781".to_string(),
        amount: dec!(20000),
        payment_mode: "NEFT".to_string(),
        pan_verified: true,
        third_party_pan_verified: true,
        customer_type: "INDIVIDUAL".to_string(),
        ..Default::default()
    }
}

fn fired(engine: &RuleEngine, ctx: &TransactionContext) -> Vec<TriggerCode> {
    engine
        .evaluate_core(ctx)
        .into_iter()
        .map(|r| r.trigger_code)
        .collect()
}

/// (code, firing snapshot, non-firing snapshot) for every fully specified rule
fn cases() -> Vec<(TriggerCode, TransactionContext, TransactionContext)> {
    let died = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    vec![
        (
            TriggerCode::CashThreshold,
            TransactionContext {
                payment_mode: "CASH".to_string(),
                amount: dec!(50000.01),
                ..clean()
            },
            TransactionContext {
                payment_mode: "CASH".to_string(),
                amount: dec!(50000),
                ..clean()
            },
        ),
        (
            TriggerCode::PanMismatch,
            TransactionContext {
                pan_verified: false,
                ..clean()
            },
            clean(),
        ),
        (
            TriggerCode::NomineeChangePostDeath,
            TransactionContext {
                death_date: Some(died),
                nominee_change_date: Some(died + Duration::days(2)),
                ..clean()
            },
            TransactionContext {
                death_date: Some(died),
                nominee_change_date: Some(died),
                ..clean()
            },
        ),
        (
            TriggerCode::FrequentSurrenders,
            TransactionContext {
                surrender_count: 4,
                ..clean()
            },
            TransactionContext {
                surrender_count: 3,
                ..clean()
            },
        ),
        (
            TriggerCode::RefundWithoutBond,
            TransactionContext {
                refund_date: Some(died),
                bond_dispatch_date: Some(died + Duration::days(1)),
                ..clean()
            },
            TransactionContext {
                refund_date: Some(died + Duration::days(1)),
                bond_dispatch_date: Some(died),
                ..clean()
            },
        ),
        (
            TriggerCode::CtrAggregateMonitoring,
            TransactionContext {
                daily_cash_aggregate: dec!(1000001),
                ..clean()
            },
            TransactionContext {
                daily_cash_aggregate: dec!(1000000),
                ..clean()
            },
        ),
        (
            TriggerCode::ThirdPartyPanVerification,
            TransactionContext {
                third_party_payment: true,
                third_party_pan_verified: false,
                ..clean()
            },
            TransactionContext {
                third_party_payment: false,
                third_party_pan_verified: false,
                ..clean()
            },
        ),
        (
            TriggerCode::BeneficialOwnershipVerification,
            TransactionContext {
                customer_type: "TRUST".to_string(),
                beneficial_owners: vec![BeneficialOwner {
                    name: "R. Iyer".to_string(),
                    ownership_percentage: dec!(40),
                    pan: None,
                }],
                ..clean()
            },
            TransactionContext {
                customer_type: "TRUST".to_string(),
                ..clean()
            },
        ),
        (
            TriggerCode::StructuredDeposits,
            TransactionContext {
                recent_cash_transactions: vec![dec!(49000), dec!(45000), dec!(49999.99)],
                ..clean()
            },
            TransactionContext {
                recent_cash_transactions: vec![dec!(49000), dec!(44999), dec!(50000)],
                ..clean()
            },
        ),
        (
            TriggerCode::HighValueFirstPremium,
            TransactionContext {
                is_first_premium: true,
                amount: dec!(600000),
                declared_annual_income: Some(dec!(1000000)),
                ..clean()
            },
            TransactionContext {
                is_first_premium: false,
                amount: dec!(600000),
                declared_annual_income: Some(dec!(1000000)),
                ..clean()
            },
        ),
        (
            TriggerCode::RapidTransactionFlow,
            TransactionContext {
                transactions_last_24h: 6,
                ..clean()
            },
            TransactionContext {
                transactions_last_24h: 5,
                ..clean()
            },
        ),
    ]
}

#[test]
fn test_combined_scenario() {
    let died = Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap();
    let ctx = TransactionContext {
        payment_mode: "CASH".to_string(),
        amount: dec!(60000),
        pan_verified: false,
        death_date: Some(died),
        nominee_change_date: Some(died + Duration::days(5)),
        surrender_count: 5,
        daily_cash_aggregate: dec!(1200000),
        ..clean()
    };

    let engine = RuleEngine::default();
    assert_eq!(
        fired(&engine, &ctx),
        vec![
            TriggerCode::CashThreshold,
            TriggerCode::PanMismatch,
            TriggerCode::NomineeChangePostDeath,
            TriggerCode::FrequentSurrenders,
            TriggerCode::CtrAggregateMonitoring,
        ]
    );

    let assessment = engine.assess_core(&ctx);
    assert_eq!(assessment.overall_risk_level, RiskLevel::Critical);
    assert!(assessment.str_filing_required);
    assert!(assessment.ctr_filing_required);
    assert!(assessment.should_block_transaction);
    assert!((assessment.risk_score - 75.0).abs() < 1e-9);

    let decision = engine.decide(&assessment);
    assert_eq!(decision.action, EnforcementAction::Block);
    assert_eq!(decision.required_filings, vec![FilingType::Str, FilingType::Ctr]);
    assert_eq!(decision.blocking_triggers, vec![TriggerCode::NomineeChangePostDeath]);
}

#[test]
fn test_each_rule_fires_and_holds() {
    let engine = RuleEngine::default();

    for (code, firing, quiet) in cases() {
        assert_eq!(fired(&engine, &firing), vec![code], "{} should fire alone", code);
        assert!(
            !fired(&engine, &quiet).contains(&code),
            "{} should not fire on its boundary",
            code
        );
    }
}

#[test]
fn test_core_and_extended_agree_on_core_signals() {
    let engine = RuleEngine::default();

    for (code, firing, _) in cases() {
        let extended: ExtendedTransactionContext = firing.into();
        let codes: Vec<TriggerCode> = engine
            .evaluate_extended(&extended)
            .into_iter()
            .map(|r| r.trigger_code)
            .collect();
        assert_eq!(codes, vec![code]);
    }
}

#[test]
fn test_results_carry_only_triggered_entries() {
    let engine = RuleEngine::default();

    for (_, firing, quiet) in cases() {
        for ctx in [firing, quiet] {
            for result in engine.evaluate_core(&ctx) {
                assert!(result.triggered);
                assert!(result.risk_level.is_some());
                assert!(result.reason.is_some());
                assert_eq!(result.filing_required, result.filing_type.is_some());
            }
        }
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let engine = RuleEngine::default();
    let ctx: ExtendedTransactionContext = TransactionContext {
        payment_mode: "CASH".to_string(),
        amount: dec!(99000),
        third_party_payment: true,
        third_party_pan_verified: false,
        transactions_last_24h: 11,
        ..clean()
    }
    .into();

    let first = engine.evaluate_extended(&ctx);
    let second = engine.evaluate_extended(&ctx);
    assert_eq!(first, second);
    assert_eq!(engine.assess(&ctx), engine.assess(&ctx));
}

#[test]
fn test_custom_thresholds_shift_boundaries() {
    let config = EngineConfig {
        thresholds: Thresholds {
            cash_threshold: dec!(20000),
            max_surrender_count: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let engine = RuleEngine::from_config(&config);

    let ctx = TransactionContext {
        payment_mode: "CASH".to_string(),
        amount: dec!(25000),
        surrender_count: 2,
        ..clean()
    };
    assert_eq!(
        fired(&engine, &ctx),
        vec![TriggerCode::CashThreshold, TriggerCode::FrequentSurrenders]
    );
    assert!(fired(&RuleEngine::default(), &ctx).is_empty());
}

#[test]
fn test_context_from_json() {
    let raw = r#"{
        "base": {
            "policy_number": "POL-9",
            "amount": "75000",
            "payment_mode": "CASH",
            "pan_verified": true
        },
        "session": { "login_attempts": 8 }
    }"#;
    let ctx: ExtendedTransactionContext = serde_json::from_str(raw).unwrap();

    let assessment = RuleEngine::default().assess(&ctx);
    let codes: Vec<TriggerCode> = assessment.triggered.iter().map(|r| r.trigger_code).collect();
    assert_eq!(codes, vec![TriggerCode::CashThreshold, TriggerCode::SessionAnomaly]);

    let json = serde_json::to_value(&assessment).unwrap();
    assert_eq!(json["triggered"][0]["trigger_code"], "AML_001");
    assert_eq!(json["overall_risk_level"], "HIGH");
}

#[test]
fn test_third_party_cash_only_flags_unverified_payer() {
    let engine = RuleEngine::default();
    let ctx = TransactionContext {
        third_party_payment: true,
        payment_mode: "CASH".to_string(),
        amount: dec!(30000),
        ..clean()
    };
    assert!(fired(&engine, &ctx).is_empty());
    assert!(!engine.assess_core(&ctx).str_filing_required);
}

#[test]
fn test_extreme_amounts_never_panic() {
    let engine = RuleEngine::default();
    let base = TransactionContext {
        is_first_premium: true,
        amount: dec!(1000000000000000000000000000),
        declared_annual_income: Some(dec!(0.01)),
        daily_cash_aggregate: Decimal::MAX,
        recent_cash_transactions: vec![Decimal::MAX; 4],
        ..clean()
    };
    assert_eq!(
        fired(&engine, &base),
        vec![TriggerCode::CtrAggregateMonitoring, TriggerCode::HighValueFirstPremium]
    );

    let mut ctx = ExtendedTransactionContext::from(base);
    ctx.transaction_history = vec![
        HistoricalTransaction {
            amount: Decimal::MAX,
            ..Default::default()
        };
        2
    ];
    ctx.claim_history = vec![
        ClaimRecord {
            amount: Decimal::MAX,
            ..Default::default()
        };
        2
    ];

    let results = engine.evaluate_extended(&ctx);
    assert_eq!(results.len(), 2);
    assert_eq!(engine.evaluate_extended_concurrent(&ctx), results);
    for code in TriggerCode::ALL {
        assert_eq!(engine.evaluate_rule(code, &ctx).trigger_code, code);
    }
}
