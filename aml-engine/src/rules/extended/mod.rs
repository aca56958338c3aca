//! Extended rules over the enriched context (AML_013 - AML_070)
//!
//! AML_013 and AML_014 are live. The rest are declared detectors: each
//! returns a fully typed result carrying its intended risk, filing and
//! evidence, but its detection flag is fixed to `false` until the upstream
//! signal it needs is available.

pub mod behavioral;
pub mod channel;
pub mod claims;
pub mod identity;
pub mod payment;
pub mod technical;

#[cfg(test)]
mod tests {
    use crate::catalog::TriggerCode;
    use crate::config::Thresholds;
    use crate::metadata::keys;
    use crate::rules::evaluate;
    use crate::types::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    /// Context with every suspicious signal turned up
    fn suspicious() -> ExtendedTransactionContext {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 3, 0, 0).unwrap();
        let history = (0..20)
            .map(|i| HistoricalTransaction {
                transaction_id: Uuid::from_u128(i as u128),
                amount: dec!(100000),
                payment_mode: if i % 2 == 0 { "CASH" } else { "ONLINE" }.to_string(),
                occurred_at: Some(now - Duration::hours(i)),
                counterparty: Some(format!("ACC-{}", i % 3)),
                country: Some("KP".to_string()),
            })
            .collect();
        let claims = (0..4)
            .map(|i| ClaimRecord {
                claim_id: format!("CLM-{}", i),
                policy_number: "POL-1".to_string(),
                claim_type: if i == 0 { ClaimType::Ombudsman } else { ClaimType::Death },
                amount: dec!(5000000),
                filed_at: Some(now),
                policy_inception_date: Some(now - Duration::days(30)),
                claimant_is_nominee: false,
            })
            .collect();

        ExtendedTransactionContext {
            base: TransactionContext {
                amount: dec!(100000),
                payment_mode: "CASH".to_string(),
                transaction_date: Some(now),
                declared_annual_income: Some(dec!(120000)),
                nominee_change_date: Some(now - Duration::days(2)),
                third_party_payment: true,
                ..Default::default()
            },
            transaction_history: history,
            customer_profile: CustomerProfile {
                customer_id: "CUST-9".to_string(),
                is_non_resident: true,
                is_minor: true,
                is_pep: true,
                sanctions_hit: true,
                address_verified: false,
                aadhaar_pan_linked: false,
                kyc_expiry_date: Some(now - Duration::days(400)),
                contact_changes_last_90d: 12,
                customers_sharing_contact: 9,
                policies_held: 15,
                policies_opened_last_90d: 10,
                beneficiary_changes_last_year: 8,
                ..Default::default()
            },
            claim_history: claims,
            agent: Some(AgentProfile {
                agent_code: "AG-7".to_string(),
                cancellation_rate: 0.9,
                commission_last_30d: dec!(10000000),
                active_customers: 1,
                paid_on_behalf_of_customer: true,
            }),
            channel: ChannelInfo {
                channel: "POS".to_string(),
                branch_code: Some("BR-1".to_string()),
                previous_channel: Some("ONLINE".to_string()),
            },
            device: DeviceFingerprint {
                device_id: Some("dev-1".to_string()),
                ip_address: Some("10.0.0.1".to_string()),
                ip_country: Some("KP".to_string()),
                user_agent: Some("curl/8.0".to_string()),
                is_vpn: true,
                is_emulator: true,
                sim_swapped_at: Some(now - Duration::hours(1)),
                accounts_on_device: 25,
            },
            session: SessionInfo {
                duration_secs: Some(2),
                login_attempts: 1,
                started_at: Some(now),
            },
            account_activity_score: Some(10.0),
        }
    }

    #[test]
    fn test_placeholders_stay_inert() {
        let ctx = suspicious();
        let thresholds = Thresholds::default();
        for code in TriggerCode::ALL.iter().filter(|c| c.is_placeholder()) {
            let result = evaluate(*code, &ctx, &thresholds);
            assert!(!result.triggered, "{} fired", code);
            assert_eq!(result.risk_level, None);
            assert!(!result.transaction_blocked);
            assert_eq!(result.description, code.description());
            assert!(!result.metadata.is_empty(), "{} has no scaffolding", code);
        }
    }

    #[test]
    fn test_placeholders_stable_across_calls() {
        let ctx = suspicious();
        let thresholds = Thresholds::default();
        for code in TriggerCode::ALL.iter().filter(|c| c.is_placeholder()) {
            assert_eq!(evaluate(*code, &ctx, &thresholds), evaluate(*code, &ctx, &thresholds));
        }
    }

    #[test]
    fn test_placeholders_callable_on_empty_context() {
        let ctx = ExtendedTransactionContext::default();
        let thresholds = Thresholds::default();
        for code in TriggerCode::ALL.iter().filter(|c| c.is_placeholder()) {
            assert!(!evaluate(*code, &ctx, &thresholds).triggered);
        }
    }

    #[test]
    fn test_emitted_keys_are_catalogued() {
        let thresholds = Thresholds::default();
        for ctx in [suspicious(), ExtendedTransactionContext::default()] {
            for code in TriggerCode::ALL {
                let result = evaluate(code, &ctx, &thresholds);
                for (key, _) in result.metadata.iter() {
                    assert!(keys::ALL.contains(&key), "{} emits unlisted key {}", code, key);
                }
            }
        }
    }
}
