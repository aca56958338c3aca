//! Identity and KYC rules (AML_035 - AML_044)
//!
//! Screening and verification results are resolved upstream and handed in
//! through [`CustomerProfile`](crate::types::CustomerProfile).

use crate::catalog::{FilingType, RiskLevel, TriggerCode};
use crate::metadata::keys;
use crate::rules::Outcome;
use crate::types::{ExtendedTransactionContext, TriggerResult};

/// AML_035: party matched a designated sanctions list. Blocks.
///
/// Intended signal: `customer_profile.sanctions_hit` once the screening
/// feed is certified.
pub fn sanctions_list_match(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SanctionsListMatch, RiskLevel::Critical)
        .file(FilingType::Str)
        .block()
        .reason("Party matched a sanctions list")
        .meta(keys::SIGNAL, "sanctions_hit")
        .meta(keys::SANCTIONS_HIT, ctx.customer_profile.sanctions_hit)
        .meta(keys::CUSTOMER_ID, ctx.customer_profile.customer_id.as_str())
        .resolve(detected)
}

/// AML_036: customer is a politically exposed person.
pub fn politically_exposed_person(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::PoliticallyExposedPerson, RiskLevel::High)
        .reason("Customer is a politically exposed person")
        .meta(keys::SIGNAL, "pep_flag")
        .meta(keys::IS_PEP, ctx.customer_profile.is_pep)
        .resolve(detected)
}

/// AML_037: declared address differs from the verified one.
pub fn address_mismatch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AddressMismatch, RiskLevel::Low)
        .reason("Declared address does not match verified address")
        .meta(keys::SIGNAL, "address_verification")
        .meta(keys::ADDRESS_VERIFIED, ctx.customer_profile.address_verified)
        .resolve(detected)
}

/// AML_038: PAN not linked to Aadhaar.
pub fn aadhaar_pan_link_missing(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::AadhaarPanLinkMissing, RiskLevel::Low)
        .reason("PAN is not linked to Aadhaar")
        .meta(keys::SIGNAL, "aadhaar_pan_link")
        .meta(keys::AADHAAR_PAN_LINKED, ctx.customer_profile.aadhaar_pan_linked)
        .meta(keys::PAN_VERIFIED, ctx.base.pan_verified)
        .resolve(detected)
}

/// AML_039: KYC documents expired at transaction time.
pub fn expired_kyc_documents(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ExpiredKycDocuments, RiskLevel::Medium)
        .reason("KYC documents expired")
        .meta(keys::SIGNAL, "kyc_expiry")
        .meta_opt(keys::KYC_EXPIRY_DATE, ctx.customer_profile.kyc_expiry_date)
        .meta_opt(keys::TRANSACTION_DATE, ctx.base.transaction_date)
        .resolve(detected)
}

/// AML_040: contact details shared with unrelated customers.
pub fn shared_contact_details(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::SharedContactDetails, RiskLevel::Medium)
        .reason("Contact details shared across unrelated customers")
        .meta(keys::SIGNAL, "shared_contact_count")
        .meta(keys::CUSTOMERS_SHARING_CONTACT, ctx.customer_profile.customers_sharing_contact)
        .resolve(detected)
}

/// AML_041: minor recorded as proposer or payer.
pub fn minor_as_payer(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::MinorAsPayer, RiskLevel::Medium)
        .reason("Minor recorded as proposer or payer")
        .meta(keys::SIGNAL, "payer_age")
        .meta(keys::IS_MINOR, ctx.customer_profile.is_minor)
        .resolve(detected)
}

/// AML_042: contact details changed repeatedly.
pub fn frequent_contact_change(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::FrequentContactChange, RiskLevel::Low)
        .reason("Contact details changed repeatedly")
        .meta(keys::SIGNAL, "contact_changes_last_90d")
        .meta(keys::CONTACT_CHANGES_LAST_90D, ctx.customer_profile.contact_changes_last_90d)
        .resolve(detected)
}

/// AML_043: non-resident customer paying from a resident account.
pub fn nri_account_mismatch(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::NriAccountMismatch, RiskLevel::Medium)
        .reason("Non-resident customer paying from a resident account")
        .meta(keys::SIGNAL, "nre_nro_account_type")
        .meta(keys::IS_NON_RESIDENT, ctx.customer_profile.is_non_resident)
        .meta_opt(keys::COUNTRY, ctx.customer_profile.residence_country.as_deref())
        .resolve(detected)
}

/// AML_044: corporate customer shows shell-company indicators.
///
/// Intended signal: registry data (incorporation age, filings, directors)
/// for COMPANY customers.
pub fn shell_entity_indicators(ctx: &ExtendedTransactionContext) -> TriggerResult {
    let detected = false;

    Outcome::new(TriggerCode::ShellEntityIndicators, RiskLevel::High)
        .file(FilingType::Str)
        .reason("Corporate customer shows shell-entity indicators")
        .meta(keys::SIGNAL, "registry_profile")
        .meta(keys::CUSTOMER_TYPE, ctx.base.customer_type.as_str())
        .meta(keys::BENEFICIAL_OWNER_COUNT, ctx.base.beneficial_owners.len())
        .resolve(detected)
}
