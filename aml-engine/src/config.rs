//! Configuration for the AML engine
//!
//! Regulatory thresholds live here as named constants. [`Thresholds`]
//! carries them into the evaluators so a limit can change without touching
//! rule code.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cash payments above this amount trigger AML_001
pub const CASH_THRESHOLD: Decimal = dec!(50000);

/// Daily cash aggregate above this amount triggers AML_006
pub const CTR_DAILY_AGGREGATE_THRESHOLD: Decimal = dec!(1000000);

/// Surrender counts above this trigger AML_004
pub const MAX_SURRENDER_COUNT: u32 = 3;

/// Lower bound (inclusive) of the structuring band; the upper bound is the
/// cash threshold (exclusive)
pub const STRUCTURING_BAND_FLOOR: Decimal = dec!(45000);

/// Amounts inside the structuring band needed to trigger AML_009
pub const STRUCTURING_MIN_OCCURRENCES: usize = 3;

/// First premium above this share of declared annual income triggers AML_010
pub const FIRST_PREMIUM_INCOME_RATIO: Decimal = dec!(0.5);

/// Transactions in 24 hours above this trigger AML_011
pub const MAX_TRANSACTIONS_PER_DAY: u32 = 5;

/// Shortest normal session (seconds)
pub const MIN_SESSION_SECS: u64 = 1;

/// Longest normal session (seconds)
pub const MAX_SESSION_SECS: u64 = 3600;

/// Login attempts above this trigger AML_013
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Activity scores above this trigger AML_014 (0-100 scale)
pub const ANOMALY_SCORE_THRESHOLD: f64 = 75.0;

/// Worker threads used by concurrent evaluation
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Rule thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Cash threshold (AML_001)
    pub cash_threshold: Decimal,

    /// Daily cash aggregate threshold (AML_006)
    pub ctr_daily_aggregate: Decimal,

    /// Maximum surrenders before alerting (AML_004)
    pub max_surrender_count: u32,

    /// Structuring band floor (AML_009)
    pub structuring_band_floor: Decimal,

    /// Structuring occurrences (AML_009)
    pub structuring_min_occurrences: usize,

    /// First premium to income ratio (AML_010)
    pub first_premium_income_ratio: Decimal,

    /// Maximum transactions per 24 hours (AML_011)
    pub max_transactions_per_day: u32,

    /// Minimum session duration (AML_013)
    pub min_session_secs: u64,

    /// Maximum session duration (AML_013)
    pub max_session_secs: u64,

    /// Maximum login attempts (AML_013)
    pub max_login_attempts: u32,

    /// Anomaly score threshold (AML_014)
    pub anomaly_score_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cash_threshold: CASH_THRESHOLD,
            ctr_daily_aggregate: CTR_DAILY_AGGREGATE_THRESHOLD,
            max_surrender_count: MAX_SURRENDER_COUNT,
            structuring_band_floor: STRUCTURING_BAND_FLOOR,
            structuring_min_occurrences: STRUCTURING_MIN_OCCURRENCES,
            first_premium_income_ratio: FIRST_PREMIUM_INCOME_RATIO,
            max_transactions_per_day: MAX_TRANSACTIONS_PER_DAY,
            min_session_secs: MIN_SESSION_SECS,
            max_session_secs: MAX_SESSION_SECS,
            max_login_attempts: MAX_LOGIN_ATTEMPTS,
            anomaly_score_threshold: ANOMALY_SCORE_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Reject thresholds that would make a rule meaningless
    pub fn validate(&self) -> Result<()> {
        if self.cash_threshold <= Decimal::ZERO {
            return Err(Error::InvalidThreshold(format!(
                "cash_threshold must be positive, got {}",
                self.cash_threshold
            )));
        }
        if self.ctr_daily_aggregate <= Decimal::ZERO {
            return Err(Error::InvalidThreshold(format!(
                "ctr_daily_aggregate must be positive, got {}",
                self.ctr_daily_aggregate
            )));
        }
        if self.structuring_band_floor < Decimal::ZERO
            || self.structuring_band_floor >= self.cash_threshold
        {
            return Err(Error::InvalidThreshold(format!(
                "structuring_band_floor {} must lie in [0, {})",
                self.structuring_band_floor, self.cash_threshold
            )));
        }
        if self.structuring_min_occurrences == 0 {
            return Err(Error::InvalidThreshold(
                "structuring_min_occurrences must be at least 1".to_string(),
            ));
        }
        if self.first_premium_income_ratio <= Decimal::ZERO {
            return Err(Error::InvalidThreshold(format!(
                "first_premium_income_ratio must be positive, got {}",
                self.first_premium_income_ratio
            )));
        }
        if self.min_session_secs > self.max_session_secs {
            return Err(Error::InvalidThreshold(format!(
                "session bounds inverted: {} > {}",
                self.min_session_secs, self.max_session_secs
            )));
        }
        if !(0.0..=100.0).contains(&self.anomaly_score_threshold) {
            return Err(Error::InvalidThreshold(format!(
                "anomaly_score_threshold must lie in [0, 100], got {}",
                self.anomaly_score_threshold
            )));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Service name used in logs
    pub service_name: String,

    /// Worker threads for concurrent evaluation
    pub worker_threads: usize,

    /// Rule thresholds
    pub thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_name: "aml-engine".to_string(),
            worker_threads: DEFAULT_WORKER_THREADS,
            thresholds: Thresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Ok(name) = std::env::var("AML_SERVICE_NAME") {
            config.service_name = name;
        }
        if let Some(workers) = env_parse::<usize>("AML_WORKER_THREADS")? {
            config.worker_threads = workers;
        }
        if let Some(limit) = env_parse::<Decimal>("AML_CASH_THRESHOLD")? {
            config.thresholds.cash_threshold = limit;
        }
        if let Some(limit) = env_parse::<Decimal>("AML_CTR_DAILY_AGGREGATE")? {
            config.thresholds.ctr_daily_aggregate = limit;
        }
        if let Some(score) = env_parse::<f64>("AML_ANOMALY_SCORE_THRESHOLD")? {
            config.thresholds.anomaly_score_threshold = score;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(Error::Config("worker_threads must be at least 1".to_string()));
        }
        self.thresholds.validate()
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {}={}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
