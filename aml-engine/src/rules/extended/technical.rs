//! Session, device and network rules (AML_013, AML_061 - AML_070)

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::config::Thresholds;
use crate::metadata::keys;
use crate::rules::Outcome;
use crate::types::{ExtendedTransactionContext, TriggerResult};

/// AML_013: session length outside `[min_session_secs, max_session_secs]`,
/// or more login attempts than allowed.
///
/// An unknown session length only fails the login-attempt check.
pub fn session_anomaly(ctx: &ExtendedTransactionContext, t: &Thresholds) -> TriggerResult {
    let duration_out_of_bounds = ctx
        .session
        .duration_secs
        .is_some_and(|secs| secs < t.min_session_secs || secs > t.max_session_secs);
    let excessive_logins = ctx.session.login_attempts > t.max_login_attempts;

    Outcome::new(TriggerCode::SessionAnomaly, RiskLevel::Medium)
        .reason(match (duration_out_of_bounds, excessive_logins) {
            (true, true) => "Abnormal session duration and excessive login attempts",
            (true, false) => "Abnormal session duration",
            _ => "Excessive login attempts",
        })
        .meta_opt(keys::SESSION_DURATION_SECS, ctx.session.duration_secs)
        .meta(keys::LOGIN_ATTEMPTS, ctx.session.login_attempts)
        .meta_opt(keys::DEVICE_ID, ctx.device.device_id.as_deref())
        .resolve(duration_out_of_bounds || excessive_logins)
}

/// AML_061: device fingerprint previously linked to fraud.
pub fn device_fingerprint_reuse(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::DeviceFingerprintReuse, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Device fingerprint linked to prior fraud")
        .meta(keys::SIGNAL, "fraud_device_registry")
        .meta_opt(keys::DEVICE_ID, ctx.device.device_id.as_deref())
        .resolve(detected)
}

/// AML_062: IP location inconsistent with customer residence.
pub fn ip_geolocation_mismatch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::IpGeolocationMismatch, RiskLevel::Medium)
        .reason("IP geolocation differs from customer residence")
        .meta(keys::SIGNAL, "ip_geolocation")
        .meta_opt(keys::IP_ADDRESS, ctx.device.ip_address.as_deref())
        .meta_opt(keys::IP_COUNTRY, ctx.device.ip_country.as_deref())
        .meta_opt(keys::COUNTRY, ctx.customer_profile.residence_country.as_deref())
        .resolve(detected)
}

/// AML_063: session routed through a VPN or proxy.
pub fn vpn_or_proxy_usage(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::VpnOrProxyUsage, RiskLevel::Low)
        .reason("Session routed through an anonymising proxy")
        .meta(keys::SIGNAL, "anonymiser_detection")
        .meta(keys::IS_VPN, ctx.device.is_vpn)
        .meta_opt(keys::IP_ADDRESS, ctx.device.ip_address.as_deref())
        .resolve(detected)
}

/// AML_064: consecutive sessions from locations too far apart.
///
/// Intended signal: previous session geolocation and timestamp.
pub fn impossible_travel(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ImpossibleTravel, RiskLevel::High)
        .reason("Sessions from locations too far apart to travel between")
        .meta(keys::SIGNAL, "session_geovelocity")
        .meta_opt(keys::SESSION_STARTED_AT, ctx.session.started_at)
        .meta_opt(keys::IP_COUNTRY, ctx.device.ip_country.as_deref())
        .resolve(detected)
}

/// AML_065: session from an emulator or rooted device.
pub fn emulator_or_rooted_device(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::EmulatorOrRootedDevice, RiskLevel::Medium)
        .reason("Session from an emulator or rooted device")
        .meta(keys::SIGNAL, "device_integrity")
        .meta(keys::IS_EMULATOR, ctx.device.is_emulator)
        .resolve(detected)
}

/// AML_066: registered mobile SIM swapped recently. Blocks.
pub fn recent_sim_swap(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::RecentSimSwap, RiskLevel::Critical)
        .block()
        .reason("Registered SIM swapped shortly before the transaction")
        .meta(keys::SIGNAL, "sim_swap_age")
        .meta_opt(keys::SIM_SWAPPED_AT, ctx.device.sim_swapped_at)
        .meta_opt(keys::TRANSACTION_DATE, ctx.base.transaction_date)
        .resolve(detected)
}

/// AML_067: interaction cadence consistent with automation.
pub fn bot_like_interaction(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::BotLikeInteraction, RiskLevel::Medium)
        .reason("Interaction cadence consistent with automation")
        .meta(keys::SIGNAL, "interaction_timing")
        .meta_opt(keys::USER_AGENT, ctx.device.user_agent.as_deref())
        .meta_opt(keys::SESSION_DURATION_SECS, ctx.session.duration_secs)
        .resolve(detected)
}

/// AML_068: several customer accounts used from one device.
pub fn multiple_accounts_same_device(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::MultipleAccountsSameDevice, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Multiple customer accounts used from one device")
        .meta(keys::SIGNAL, "accounts_per_device")
        .meta(keys::ACCOUNTS_ON_DEVICE, ctx.device.accounts_on_device)
        .meta_opt(keys::DEVICE_ID, ctx.device.device_id.as_deref())
        .resolve(detected)
}

/// AML_069: burst of failed logins across accounts.
pub fn credential_stuffing(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::CredentialStuffing, RiskLevel::High)
        .block()
        .reason("Burst of failed logins across accounts")
        .meta(keys::SIGNAL, "cross_account_login_failures")
        .meta(keys::LOGIN_ATTEMPTS, ctx.session.login_attempts)
        .meta_opt(keys::IP_ADDRESS, ctx.device.ip_address.as_deref())
        .resolve(detected)
}

/// AML_070: browser fingerprint inconsistent with the user agent.
pub fn browser_fingerprint_anomaly(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::BrowserFingerprintAnomaly, RiskLevel::Low)
        .reason("Browser fingerprint inconsistent with user agent")
        .meta(keys::SIGNAL, "fingerprint_consistency")
        .meta_opt(keys::USER_AGENT, ctx.device.user_agent.as_deref())
        .resolve(detected)
}
