//! Hard-No invariants: absolute rejections that no trust score or
//! confirmation token can override.
//!
//! All three rules are structural checks against closed lists. The lists are
//! part of the deployment contract; extending one is a breaking change to
//! the statement language, not a tuning knob.

use super::ast::{Sensitivity, VerbClass};
use super::error::{ValidationError, ValidationErrorCode};

/// Actions treated as deletion for the irreversible-deletion rule.
///
/// Compared ASCII case-insensitively against `verb.action`.
pub const DELETE_ACTIONS: &[&str] = &["DELETE", "ERASE", "PURGE", "REMOVE"];

/// Object identifier prefixes that indicate credential material.
///
/// Compared ASCII case-insensitively against the start of
/// `object.identifier`, ignoring a leading `/`.
pub const CREDENTIAL_IDENTIFIER_PREFIXES: &[&str] = &[
    "credential",
    "password",
    "secret",
    "token",
    "keychain",
    "vault",
];

/// Action names that operate on credentials regardless of target.
pub const CREDENTIAL_ACTIONS: &[&str] =
    &["HARVEST_CREDENTIALS", "EXPORT_SECRETS", "READ_KEYCHAIN"];

/// Actions treated as financial mutation for the HRC rule.
pub const FINANCIAL_ACTIONS: &[&str] = &["PAY", "TRANSFER", "PURCHASE", "WITHDRAW", "REFUND"];

fn in_list(list: &[&str], candidate: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(candidate))
}

fn has_credential_prefix(identifier: &str) -> bool {
    let trimmed = identifier.strip_prefix('/').unwrap_or(identifier);
    CREDENTIAL_IDENTIFIER_PREFIXES.iter().any(|prefix| {
        trimmed
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Checks the three Hard-No invariants against a validated statement.
///
/// Runs last in the validation pipeline: the inputs are already known to be
/// structurally sound, so the checks are pure predicate evaluation.
///
/// # Errors
///
/// Returns `HARD_NO_VIOLATION` when any rule fires.
pub(super) fn check_hard_no(
    verb_class: VerbClass,
    action: &str,
    object_identifier: &str,
    reversible: bool,
    sensitivity: Sensitivity,
    hrc_required: bool,
) -> Result<(), ValidationError> {
    // Rule 1: silent/irreversible deletion.
    if verb_class == VerbClass::Mutate && in_list(DELETE_ACTIONS, action) && !reversible {
        return Err(ValidationError::without_location(
            ValidationErrorCode::HardNoViolation,
            "irreversible deletion is prohibited",
        ));
    }

    // Rule 2: credential access, by identifier prefix or dedicated action.
    if has_credential_prefix(object_identifier) || in_list(CREDENTIAL_ACTIONS, action) {
        return Err(ValidationError::without_location(
            ValidationErrorCode::HardNoViolation,
            "credential access is prohibited",
        ));
    }

    // Rule 3: high-sensitivity financial mutation without HRC.
    if verb_class == VerbClass::Mutate
        && in_list(FINANCIAL_ACTIONS, action)
        && sensitivity == Sensitivity::High
        && !hrc_required
    {
        return Err(ValidationError::without_location(
            ValidationErrorCode::HardNoViolation,
            "high-sensitivity financial mutation requires HRC",
        ));
    }

    Ok(())
}
