//! Validator pipeline tests.

use super::*;

const HAPPY: &str =
    "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/home/alice/in/a.txt) META(home,true,LOW,false)";

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_happy_path_builds_ast() {
    let ast = validate(HAPPY).unwrap();

    assert_eq!(ast.subject.subject_type, SubjectType::User);
    assert_eq!(ast.subject.identifier, "alice");
    assert_eq!(ast.verb.verb_class, VerbClass::Mutate);
    assert_eq!(ast.verb.action, "MOVE");
    assert_eq!(ast.object.object_type, ObjectType::File);
    assert_eq!(ast.object.identifier, "/home/alice/in/a.txt");
    assert_eq!(ast.metadata.scope, "home");
    assert!(ast.metadata.reversible);
    assert_eq!(ast.metadata.sensitivity, Sensitivity::Low);
    assert!(!ast.metadata.hrc_required);
}

#[test]
fn test_blocks_may_be_separated_by_newlines() {
    let text = "SUBJECT(USER,alice)\nVERB(MUTATE,MOVE)\nOBJECT(FILE,/tmp/a.txt)\nMETA(home,true,LOW,false)";
    let ast = validate(text).unwrap();
    assert_eq!(ast.verb.action, "MOVE");
}

#[test]
fn test_validate_is_deterministic() {
    let first = validate(HAPPY).unwrap();
    let second = validate(HAPPY).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_interior_whitespace_is_ignored() {
    let text = "SUBJECT( USER , alice )\tVERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a.txt) META(home,true,LOW,false)";
    let ast = validate(text).unwrap();
    assert_eq!(ast.subject.identifier, "alice");
}

// =============================================================================
// Syntax Errors
// =============================================================================

#[test]
fn test_empty_input_is_syntax_error() {
    let err = validate("").unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_whitespace_only_input_is_syntax_error() {
    let err = validate(" \n\t ").unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_syntax_error_carries_location() {
    let err = validate("SUBJECT(USER,al ice) VERB(MUTATE,MOVE)").unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
    assert!(err.location.is_some());
}

#[test]
fn test_unknown_block_keyword_is_syntax_error() {
    let text = "ACTOR(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_out_of_order_blocks_are_syntax_error() {
    let text = "VERB(MUTATE,MOVE) SUBJECT(USER,alice) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_newline_inside_block_is_syntax_error() {
    let text = "SUBJECT(USER,\nalice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_action_may_not_contain_slash() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MO/VE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

#[test]
fn test_wrong_arity_subject_is_syntax_error() {
    let text = "SUBJECT(USER) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::SyntaxError);
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_missing_meta_block() {
    let err = validate("SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a)").unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::MissingRequiredField);
}

#[test]
fn test_missing_subject_block() {
    let err = validate("VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)").unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::MissingRequiredField);
}

#[test]
fn test_duplicate_block_rejected() {
    let text = "SUBJECT(USER,alice) SUBJECT(USER,bob) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::MissingRequiredField);
}

// =============================================================================
// Enum Validation
// =============================================================================

#[test]
fn test_unknown_subject_type() {
    let text = "SUBJECT(ROBOT,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::UnknownSubjectType);
}

#[test]
fn test_subject_type_is_case_sensitive() {
    let text = "SUBJECT(user,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::UnknownSubjectType);
}

#[test]
fn test_unknown_verb_class() {
    let text = "SUBJECT(USER,alice) VERB(DESTROY,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::UnknownVerbClass);
}

#[test]
fn test_unknown_object_type() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(WIDGET,/tmp/a) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::UnknownObjectType);
}

#[test]
fn test_invalid_sensitivity() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,EXTREME,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::InvalidMetadataValue);
}

#[test]
fn test_boolean_must_be_lowercase_literal() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,True,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::InvalidMetadataValue);
}

#[test]
fn test_boolean_one_zero_rejected() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,1,LOW,0)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::InvalidMetadataValue);
}

// =============================================================================
// Completeness and Scope
// =============================================================================

#[test]
fn test_meta_with_three_fields_is_missing_field() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,true,LOW)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::MissingRequiredField);
}

#[test]
fn test_empty_scope_is_missing_field() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::MissingRequiredField);
}

#[test]
fn test_multi_scope_is_ambiguous() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/tmp/a) META(home,work,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::AmbiguousScope);
}

// =============================================================================
// Hard-No Precedence
// =============================================================================

#[test]
fn test_irreversible_delete_is_hard_no() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,DELETE) OBJECT(FILE,/home/alice/in/a.txt) META(home,false,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::HardNoViolation);
}

#[test]
fn test_reversible_delete_validates() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,DELETE) OBJECT(FILE,/home/alice/in/a.txt) META(home,true,LOW,false)";
    validate(text).unwrap();
}

#[test]
fn test_credential_target_is_hard_no_even_at_low_sensitivity() {
    let text = "SUBJECT(USER,alice) VERB(TRANSFORM,READ) OBJECT(FILE,/secrets/api) META(home,true,LOW,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::HardNoViolation);
}

#[test]
fn test_financial_high_without_hrc_is_hard_no() {
    let text = "SUBJECT(USER,alice) VERB(MUTATE,TRANSFER) OBJECT(DATASET,account-main) META(bank,true,HIGH,false)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::HardNoViolation);
}

#[test]
fn test_hard_no_fires_before_any_trust_input_exists() {
    // The validator has no trust inputs at all; a Hard-No rejection here
    // proves no later stage can resurrect the statement.
    let text = "SUBJECT(SYSTEM,scheduler) VERB(MUTATE,PURGE) OBJECT(FOLDER,/var/cache) META(system,false,HIGH,true)";
    let err = validate(text).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::HardNoViolation);
}
