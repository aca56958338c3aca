//! Claim-pattern rules (AML_025 - AML_034)

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::metadata::keys;
use crate::rules::{checked_total, Outcome};
use crate::types::{ClaimType, ExtendedTransactionContext, TriggerResult};

fn claims_of(ctx: &ExtendedTransactionContext, claim_type: ClaimType) -> usize {
    ctx.claim_history
        .iter()
        .filter(|claim| claim.claim_type == claim_type)
        .count()
}

/// AML_025: death claim shortly after policy inception.
///
/// Intended signal: days between inception and the death claim, against the
/// early-claim window.
pub fn early_death_claim(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::EarlyDeathClaim, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Death claim lodged shortly after policy inception")
        .meta(keys::SIGNAL, "inception_to_claim_days")
        .meta(keys::CLAIM_TYPE, ClaimType::Death.as_str())
        .meta(keys::CLAIM_COUNT, claims_of(ctx, ClaimType::Death))
        .meta_opt(keys::DEATH_DATE, ctx.base.death_date)
        .resolve(detected)
}

/// AML_026: claim soon after a lapsed policy was reinstated.
pub fn claim_after_reinstatement(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ClaimAfterReinstatement, RiskLevel::High)
        .reason("Claim filed soon after policy reinstatement")
        .meta(keys::SIGNAL, "reinstatement_to_claim_days")
        .meta(keys::POLICY_NUMBER, ctx.base.policy_number.as_str())
        .meta(keys::CLAIM_COUNT, ctx.claim_history.len())
        .resolve(detected)
}

/// AML_027: several claims on the same life assured.
pub fn multiple_claims_same_life(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::MultipleClaimsSameLife, RiskLevel::Medium)
        .reason("Multiple claims on the same life assured")
        .meta(keys::SIGNAL, "claims_per_life")
        .meta(keys::CLAIM_COUNT, ctx.claim_history.len())
        .resolve(detected)
}

/// AML_028: maturity proceeds directed to an unrelated account.
pub fn maturity_payout_to_third_party(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::MaturityPayoutToThirdParty, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Maturity payout directed to a third-party account")
        .meta(keys::SIGNAL, "payout_account_owner")
        .meta(keys::CLAIM_TYPE, ClaimType::Maturity.as_str())
        .meta(keys::CLAIM_COUNT, claims_of(ctx, ClaimType::Maturity))
        .resolve(detected)
}

/// AML_029: payout account changed just before a survival benefit.
pub fn survival_benefit_account_change(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SurvivalBenefitAccountChange, RiskLevel::Medium)
        .reason("Bank account changed ahead of a survival benefit payout")
        .meta(keys::SIGNAL, "account_change_to_payout_days")
        .meta(keys::CLAIM_TYPE, ClaimType::SurvivalBenefit.as_str())
        .meta(keys::CLAIM_COUNT, claims_of(ctx, ClaimType::SurvivalBenefit))
        .resolve(detected)
}

/// AML_030: claim documents already presented on another claim.
///
/// Intended signal: document hash collisions from document storage.
pub fn duplicate_claim_documents(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::DuplicateClaimDocuments, RiskLevel::Critical)
        .file(FilingType::Str)
        .block()
        .reason("Claim documents reused from another claim")
        .meta(keys::SIGNAL, "document_hash_collision")
        .meta(keys::CLAIM_COUNT, ctx.claim_history.len())
        .resolve(detected)
}

/// AML_031: claimant is not the registered nominee.
pub fn claimant_nominee_mismatch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let non_nominee = ctx
        .claim_history
        .iter()
        .filter(|claim| !claim.claimant_is_nominee)
        .count();

    Outcome::new(TriggerCode::ClaimantNomineeMismatch, RiskLevel::High)
        .reason("Claimant differs from the registered nominee")
        .meta(keys::SIGNAL, "claimant_identity")
        .meta(keys::NON_NOMINEE_CLAIMS, non_nominee)
        .resolve(detected)
}

/// AML_032: policy assigned shortly before a claim.
pub fn assignment_before_claim(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AssignmentBeforeClaim, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Policy assigned shortly before a claim")
        .meta(keys::SIGNAL, "assignment_to_claim_days")
        .meta(keys::POLICY_NUMBER, ctx.base.policy_number.as_str())
        .resolve(detected)
}

/// AML_033: repeated ombudsman complaints on one policy.
pub fn repeated_ombudsman_complaints(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::RepeatedOmbudsmanComplaints, RiskLevel::Low)
        .reason("Repeated ombudsman complaints on the same policy")
        .meta(keys::SIGNAL, "ombudsman_complaint_count")
        .meta(keys::CLAIM_TYPE, ClaimType::Ombudsman.as_str())
        .meta(keys::CLAIM_COUNT, claims_of(ctx, ClaimType::Ombudsman))
        .resolve(detected)
}

/// AML_034: claimed amount far above declared income.
pub fn high_sum_assured_low_income(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;
    let claimed = checked_total(ctx.claim_history.iter().map(|claim| claim.amount));

    Outcome::new(TriggerCode::HighSumAssuredLowIncome, RiskLevel::Medium)
        .reason("Sum assured out of proportion to declared income")
        .meta(keys::SIGNAL, "sum_assured_income_multiple")
        .meta_opt(keys::CLAIMED_TOTAL, claimed)
        .meta_opt(keys::DECLARED_INCOME, ctx.base.declared_annual_income)
        .resolve(detected)
}
