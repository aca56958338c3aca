//! Agent and channel rules (AML_045 - AML_052)

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::metadata::keys;
use crate::rules::Outcome;
use crate::types::{ExtendedTransactionContext, TriggerResult};

fn agent_code(ctx: &ExtendedTransactionContext) -> Option<&str> {
    ctx.agent.as_ref().map(|agent| agent.agent_code.as_str())
}

/// AML_045: agent portfolio with an abnormal cancellation rate.
pub fn agent_high_cancellation_rate(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AgentHighCancellationRate, RiskLevel::Medium)
        .reason("Agent cancellation rate above peer norm")
        .meta(keys::SIGNAL, "agent_cancellation_rate")
        .meta_opt(keys::AGENT_CODE, agent_code(ctx))
        .meta_opt(keys::CANCELLATION_RATE, ctx.agent.as_ref().map(|a| a.cancellation_rate))
        .resolve(detected)
}

/// AML_046: commission out of line with business volume.
pub fn agent_commission_anomaly(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AgentCommissionAnomaly, RiskLevel::Medium)
        .reason("Agent commission inconsistent with business volume")
        .meta(keys::SIGNAL, "commission_to_premium_ratio")
        .meta_opt(keys::AGENT_CODE, agent_code(ctx))
        .meta_opt(keys::COMMISSION_LAST_30D, ctx.agent.as_ref().map(|a| a.commission_last_30d))
        .resolve(detected)
}

/// AML_047: agent business concentrated on few customers.
pub fn agent_customer_concentration(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AgentCustomerConcentration, RiskLevel::Low)
        .reason("Agent business concentrated on a few customers")
        .meta(keys::SIGNAL, "agent_customer_share")
        .meta_opt(keys::AGENT_CODE, agent_code(ctx))
        .meta_opt(keys::ACTIVE_CUSTOMERS, ctx.agent.as_ref().map(|a| a.active_customers))
        .resolve(detected)
}

/// AML_048: agent paid the premium on the customer's behalf.
pub fn agent_pays_premium(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AgentPaysPremium, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Premium paid by the servicing agent")
        .meta(keys::SIGNAL, "payer_is_agent")
        .meta_opt(keys::AGENT_CODE, agent_code(ctx))
        .meta(keys::THIRD_PARTY_PAYMENT, ctx.base.third_party_payment)
        .resolve(detected)
}

/// AML_049: customer switching payment channels repeatedly.
pub fn channel_switching(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ChannelSwitching, RiskLevel::Low)
        .reason("Repeated switching between payment channels")
        .meta(keys::SIGNAL, "channel_transitions")
        .meta(keys::CHANNEL, ctx.channel.channel.as_str())
        .meta_opt(keys::PREVIOUS_CHANNEL, ctx.channel.previous_channel.as_deref())
        .resolve(detected)
}

/// AML_050: transaction spike at a branch.
pub fn branch_velocity_spike(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::BranchVelocitySpike, RiskLevel::Medium)
        .reason("Branch transaction volume spiked")
        .meta(keys::SIGNAL, "branch_daily_volume")
        .meta_opt(keys::BRANCH_CODE, ctx.channel.branch_code.as_deref())
        .resolve(detected)
}

/// AML_051: point-of-sale cash collections out of pattern.
pub fn pos_cash_collection_anomaly(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::PosCashCollectionAnomaly, RiskLevel::Medium)
        .file(FilingType::Ctr)
        .reason("POS cash collections outside the usual pattern")
        .meta(keys::SIGNAL, "pos_cash_volume")
        .meta(keys::CHANNEL, ctx.channel.channel.as_str())
        .meta(keys::PAYMENT_MODE, ctx.base.payment_mode.as_str())
        .meta(keys::AMOUNT, ctx.base.amount)
        .resolve(detected)
}

/// AML_052: habitual online payer switching to cash.
pub fn online_to_cash_switch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::OnlineToCashSwitch, RiskLevel::Medium)
        .reason("Habitual online payer switched to cash")
        .meta(keys::SIGNAL, "payment_mode_shift")
        .meta(keys::PAYMENT_MODE, ctx.base.payment_mode.as_str())
        .meta(keys::HISTORY_COUNT, ctx.transaction_history.len())
        .resolve(detected)
}
