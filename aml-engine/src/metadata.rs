//! Trigger metadata
//!
//! Each rule attaches a small map of evidence to its result. Keys are stable
//! across releases and listed in [`keys`]; consumers can read known keys with
//! the typed getters and still carry unknown keys through untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable metadata keys
pub mod keys {
    /// Transaction amount
    pub const AMOUNT: &str = "amount";
    /// Configured limit the rule compared against
    pub const THRESHOLD: &str = "threshold";
    /// Payment mode as supplied
    pub const PAYMENT_MODE: &str = "payment_mode";
    /// Customer PAN verification flag
    pub const PAN_VERIFIED: &str = "pan_verified";
    /// Date the nominee was last changed
    pub const NOMINEE_CHANGE_DATE: &str = "nominee_change_date";
    /// Date of death of the life assured
    pub const DEATH_DATE: &str = "death_date";
    /// Policies surrendered by the customer
    pub const SURRENDER_COUNT: &str = "surrender_count";
    /// Date the premium refund was issued
    pub const REFUND_DATE: &str = "refund_date";
    /// Date the policy bond was dispatched
    pub const BOND_DISPATCH_DATE: &str = "bond_dispatch_date";
    /// Cash received from the customer today
    pub const DAILY_CASH_AGGREGATE: &str = "daily_cash_aggregate";
    /// Premium paid by someone other than the policyholder
    pub const THIRD_PARTY_PAYMENT: &str = "third_party_payment";
    /// Third-party payer PAN verification flag
    pub const THIRD_PARTY_PAN_VERIFIED: &str = "third_party_pan_verified";
    /// Customer type as supplied
    pub const CUSTOMER_TYPE: &str = "customer_type";
    /// Beneficial owners declared
    pub const BENEFICIAL_OWNER_COUNT: &str = "beneficial_owner_count";
    /// Recent cash amounts inside the structuring band
    pub const STRUCTURED_COUNT: &str = "structured_count";
    /// Lower bound of the structuring band
    pub const BAND_FLOOR: &str = "band_floor";
    /// Annual income declared at proposal
    pub const DECLARED_INCOME: &str = "declared_income";
    /// Amount divided by declared income, absent on overflow
    pub const INCOME_RATIO: &str = "income_ratio";
    /// Transactions in the last 24 hours
    pub const TRANSACTION_COUNT: &str = "transaction_count";
    /// Session length in seconds
    pub const SESSION_DURATION_SECS: &str = "session_duration_secs";
    /// Login attempts in the session
    pub const LOGIN_ATTEMPTS: &str = "login_attempts";
    /// Account activity anomaly score (0-100)
    pub const ANOMALY_SCORE: &str = "anomaly_score";
    /// Customer identifier
    pub const CUSTOMER_ID: &str = "customer_id";
    /// Policy identifier
    pub const POLICY_NUMBER: &str = "policy_number";
    /// Historical transactions supplied
    pub const HISTORY_COUNT: &str = "history_count";
    /// Claims matching the rule's claim type
    pub const CLAIM_COUNT: &str = "claim_count";
    /// Claim type the rule looks at
    pub const CLAIM_TYPE: &str = "claim_type";
    /// Counterparty or residence country
    pub const COUNTRY: &str = "country";
    /// Servicing agent code
    pub const AGENT_CODE: &str = "agent_code";
    /// Sales or servicing channel
    pub const CHANNEL: &str = "channel";
    /// Collecting branch
    pub const BRANCH_CODE: &str = "branch_code";
    /// Device identifier
    pub const DEVICE_ID: &str = "device_id";
    /// Client IP address
    pub const IP_ADDRESS: &str = "ip_address";
    /// Upstream detector that would supply the signal
    pub const DETECTOR: &str = "detector";
    /// Signal a placeholder rule waits for
    pub const SIGNAL: &str = "signal";
    /// Aadhaar and PAN linkage flag
    pub const AADHAAR_PAN_LINKED: &str = "aadhaar_pan_linked";
    /// Customer accounts seen on the device
    pub const ACCOUNTS_ON_DEVICE: &str = "accounts_on_device";
    /// Address verification flag
    pub const ADDRESS_VERIFIED: &str = "address_verified";
    /// Contact detail changes in the last 90 days
    pub const CONTACT_CHANGES_LAST_90D: &str = "contact_changes_last_90d";
    /// Other customers sharing the same contact details
    pub const CUSTOMERS_SHARING_CONTACT: &str = "customers_sharing_contact";
    /// Distinct counterparties in the history
    pub const DISTINCT_COUNTERPARTIES: &str = "distinct_counterparties";
    /// Historical transactions with a foreign country
    pub const FOREIGN_TRANSACTIONS: &str = "foreign_transactions";
    /// Distinct payment instruments in the history
    pub const INSTRUMENT_COUNT: &str = "instrument_count";
    /// Emulator or rooted device flag
    pub const IS_EMULATOR: &str = "is_emulator";
    /// Customer is a minor
    pub const IS_MINOR: &str = "is_minor";
    /// Customer is non-resident
    pub const IS_NON_RESIDENT: &str = "is_non_resident";
    /// Politically exposed person flag
    pub const IS_PEP: &str = "is_pep";
    /// VPN or proxy flag
    pub const IS_VPN: &str = "is_vpn";
    /// Claims filed by someone other than the nominee
    pub const NON_NOMINEE_CLAIMS: &str = "non_nominee_claims";
    /// Policies held by the customer
    pub const POLICIES_HELD: &str = "policies_held";
    /// Policies opened in the last 90 days
    pub const POLICIES_OPENED_LAST_90D: &str = "policies_opened_last_90d";
    /// Upstream sanctions screening hit
    pub const SANCTIONS_HIT: &str = "sanctions_hit";
    /// Active customers of the agent
    pub const ACTIVE_CUSTOMERS: &str = "active_customers";
    /// Agent policy cancellation rate
    pub const CANCELLATION_RATE: &str = "cancellation_rate";
    /// Sum of claimed amounts, absent on overflow
    pub const CLAIMED_TOTAL: &str = "claimed_total";
    /// Agent commission in the last 30 days
    pub const COMMISSION_LAST_30D: &str = "commission_last_30d";
    /// Country resolved from the client IP
    pub const IP_COUNTRY: &str = "ip_country";
    /// KYC document expiry date
    pub const KYC_EXPIRY_DATE: &str = "kyc_expiry_date";
    /// Most recent historical transaction
    pub const LAST_ACTIVITY: &str = "last_activity";
    /// Declared occupation
    pub const OCCUPATION: &str = "occupation";
    /// Sum of historical payments, absent on overflow
    pub const PREMIUM_PAID_TOTAL: &str = "premium_paid_total";
    /// Channel used for the previous transaction
    pub const PREVIOUS_CHANNEL: &str = "previous_channel";
    /// Session start time
    pub const SESSION_STARTED_AT: &str = "session_started_at";
    /// Most recent SIM swap
    pub const SIM_SWAPPED_AT: &str = "sim_swapped_at";
    /// When the transaction happened
    pub const TRANSACTION_DATE: &str = "transaction_date";
    /// Hour of day of the transaction (UTC)
    pub const TRANSACTION_HOUR: &str = "transaction_hour";
    /// Client user agent
    pub const USER_AGENT: &str = "user_agent";
    /// Beneficiary changes in the last year
    pub const BENEFICIARY_CHANGES_LAST_YEAR: &str = "beneficiary_changes_last_year";

    /// Every key an evaluator may emit
    pub const ALL: &[&str] = &[
        AMOUNT,
        THRESHOLD,
        PAYMENT_MODE,
        PAN_VERIFIED,
        NOMINEE_CHANGE_DATE,
        DEATH_DATE,
        SURRENDER_COUNT,
        REFUND_DATE,
        BOND_DISPATCH_DATE,
        DAILY_CASH_AGGREGATE,
        THIRD_PARTY_PAYMENT,
        THIRD_PARTY_PAN_VERIFIED,
        CUSTOMER_TYPE,
        BENEFICIAL_OWNER_COUNT,
        STRUCTURED_COUNT,
        BAND_FLOOR,
        DECLARED_INCOME,
        INCOME_RATIO,
        TRANSACTION_COUNT,
        SESSION_DURATION_SECS,
        LOGIN_ATTEMPTS,
        ANOMALY_SCORE,
        CUSTOMER_ID,
        POLICY_NUMBER,
        HISTORY_COUNT,
        CLAIM_COUNT,
        CLAIM_TYPE,
        COUNTRY,
        AGENT_CODE,
        CHANNEL,
        BRANCH_CODE,
        DEVICE_ID,
        IP_ADDRESS,
        DETECTOR,
        SIGNAL,
        AADHAAR_PAN_LINKED,
        ACCOUNTS_ON_DEVICE,
        ADDRESS_VERIFIED,
        CONTACT_CHANGES_LAST_90D,
        CUSTOMERS_SHARING_CONTACT,
        DISTINCT_COUNTERPARTIES,
        FOREIGN_TRANSACTIONS,
        INSTRUMENT_COUNT,
        IS_EMULATOR,
        IS_MINOR,
        IS_NON_RESIDENT,
        IS_PEP,
        IS_VPN,
        NON_NOMINEE_CLAIMS,
        POLICIES_HELD,
        POLICIES_OPENED_LAST_90D,
        SANCTIONS_HIT,
        ACTIVE_CUSTOMERS,
        CANCELLATION_RATE,
        CLAIMED_TOTAL,
        COMMISSION_LAST_30D,
        IP_COUNTRY,
        KYC_EXPIRY_DATE,
        LAST_ACTIVITY,
        OCCUPATION,
        PREMIUM_PAID_TOTAL,
        PREVIOUS_CHANNEL,
        SESSION_STARTED_AT,
        SIM_SWAPPED_AT,
        TRANSACTION_DATE,
        TRANSACTION_HOUR,
        USER_AGENT,
        BENEFICIARY_CHANGES_LAST_YEAR,
    ];
}

/// Typed metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    /// Flag
    Bool(bool),
    /// Count or integer quantity
    Integer(i64),
    /// Floating-point score or ratio
    Number(f64),
    /// Monetary amount
    Amount(Decimal),
    /// Free text
    Text(String),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        MetadataValue::Bool(v)
    }
}

impl From<u32> for MetadataValue {
    fn from(v: u32) -> Self {
        MetadataValue::Integer(i64::from(v))
    }
}

impl From<u64> for MetadataValue {
    fn from(v: u64) -> Self {
        MetadataValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for MetadataValue {
    fn from(v: usize) -> Self {
        MetadataValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Integer(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Number(v)
    }
}

impl From<Decimal> for MetadataValue {
    fn from(v: Decimal) -> Self {
        MetadataValue::Amount(v)
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::Text(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for MetadataValue {
    fn from(v: DateTime<Utc>) -> Self {
        MetadataValue::Timestamp(v)
    }
}

/// Evidence attached to a trigger result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value lookup
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            MetadataValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            MetadataValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            MetadataValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_amount(&self, key: &str) -> Option<Decimal> {
        match self.get(key)? {
            MetadataValue::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            MetadataValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            MetadataValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_typed_getters() {
        let mut metadata = Metadata::new();
        metadata.insert(keys::AMOUNT, dec!(60000));
        metadata.insert(keys::SURRENDER_COUNT, 5u32);
        metadata.insert(keys::PAYMENT_MODE, "CASH");

        assert_eq!(metadata.get_amount(keys::AMOUNT), Some(dec!(60000)));
        assert_eq!(metadata.get_integer(keys::SURRENDER_COUNT), Some(5));
        assert_eq!(metadata.get_text(keys::PAYMENT_MODE), Some("CASH"));
        // Wrong type yields None rather than a coerced value
        assert_eq!(metadata.get_bool(keys::AMOUNT), None);
        assert_eq!(metadata.len(), 3);
    }

    #[test]
    fn test_keys_unique() {
        let mut all = keys::ALL.to_vec();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), keys::ALL.len());
    }

    #[test]
    fn test_unknown_keys_survive_json() {
        let json = r#"{"amount":{"type":"amount","value":"125.50"},"vendor_flag":{"type":"bool","value":true}}"#;
        let metadata: Metadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.get_amount(keys::AMOUNT), Some(dec!(125.50)));
        assert_eq!(metadata.get_bool("vendor_flag"), Some(true));

        let back = serde_json::to_string(&metadata).unwrap();
        let again: Metadata = serde_json::from_str(&back).unwrap();
        assert_eq!(again, metadata);
    }
}
