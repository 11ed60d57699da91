//! The statement validator: text in, typed AST or typed rejection out.
//!
//! The pipeline runs in the fixed order syntax -> structure -> enums ->
//! completeness -> scope -> Hard-No, and the first failure halts it. There
//! is deliberately nothing here beyond judgment: no auto-correction, no
//! defaults, no recovery.

use super::ast::{
    Ast, MetadataNode, ObjectNode, ObjectType, SubjectNode, SubjectType, Sensitivity, VerbClass,
    VerbNode,
};
use super::error::{ValidationError, ValidationErrorCode};
use super::hard_no::check_hard_no;
use super::lexer::{self, RawArg, RawBlock};

/// The four block keywords, in the only order the grammar admits.
const BLOCK_ORDER: [&str; 4] = ["SUBJECT", "VERB", "OBJECT", "META"];

/// Validates a statement and produces its typed AST.
///
/// Pure and deterministic over the input bytes: no I/O, no clock, no
/// randomness. The same text always yields the same result.
///
/// # Errors
///
/// Returns a [`ValidationError`] with a code from the validator's closed
/// set. Only syntax errors carry a source location.
pub fn validate(text: &str) -> Result<Ast, ValidationError> {
    let blocks = lexer::lex(text)?;
    let [subject_block, verb_block, object_block, meta_block] = check_structure(&blocks)?;

    // Enum validation runs for the whole statement before completeness or
    // scope checks, so an unknown enum wins over a missing metadata field
    // appearing later in the statement.
    let subject = build_subject(subject_block)?;
    let verb = build_verb(verb_block)?;
    let object = build_object(object_block)?;
    let metadata = build_metadata(meta_block)?;

    check_hard_no(
        verb.verb_class,
        &verb.action,
        &object.identifier,
        metadata.reversible,
        metadata.sensitivity,
        metadata.hrc_required,
    )?;

    Ok(Ast {
        subject,
        verb,
        object,
        metadata,
    })
}

/// Enforces exactly one of each block, in grammar order.
fn check_structure(blocks: &[RawBlock]) -> Result<[&RawBlock; 4], ValidationError> {
    for block in blocks {
        if !BLOCK_ORDER.contains(&block.name.as_str()) {
            return Err(ValidationError::at(
                ValidationErrorCode::SyntaxError,
                format!("unknown block keyword: {}", block.name),
                block.line,
                block.column,
            ));
        }
    }

    for keyword in BLOCK_ORDER {
        let count = blocks.iter().filter(|b| b.name == keyword).count();
        if count == 0 {
            return Err(ValidationError::without_location(
                ValidationErrorCode::MissingRequiredField,
                format!("missing required {keyword} block"),
            ));
        }
        if count > 1 {
            return Err(ValidationError::without_location(
                ValidationErrorCode::MissingRequiredField,
                format!("exactly one {keyword} block is required, found {count}"),
            ));
        }
    }

    // All four present exactly once; anything left is an ordering offense.
    for (block, expected) in blocks.iter().zip(BLOCK_ORDER) {
        if block.name != expected {
            return Err(ValidationError::at(
                ValidationErrorCode::SyntaxError,
                format!("expected {expected} block, found {}", block.name),
                block.line,
                block.column,
            ));
        }
    }

    Ok([&blocks[0], &blocks[1], &blocks[2], &blocks[3]])
}

/// Two-argument blocks (SUBJECT, VERB, OBJECT) take their arity from the
/// grammar itself; a wrong count is a syntax error, not a missing field.
fn two_args<'a>(block: &'a RawBlock) -> Result<(&'a RawArg, &'a RawArg), ValidationError> {
    if block.args.len() != 2 {
        return Err(ValidationError::at(
            ValidationErrorCode::SyntaxError,
            format!(
                "{} takes exactly 2 arguments, found {}",
                block.name,
                block.args.len()
            ),
            block.line,
            block.column,
        ));
    }
    Ok((&block.args[0], &block.args[1]))
}

fn require_non_empty(block: &RawBlock, arg: &RawArg, what: &str) -> Result<(), ValidationError> {
    if arg.value.is_empty() {
        return Err(ValidationError::at(
            ValidationErrorCode::SyntaxError,
            format!("{} requires a non-empty {what}", block.name),
            arg.line,
            arg.column,
        ));
    }
    Ok(())
}

fn build_subject(block: &RawBlock) -> Result<SubjectNode, ValidationError> {
    let (type_arg, id_arg) = two_args(block)?;
    require_non_empty(block, id_arg, "identifier")?;
    let subject_type = SubjectType::parse(&type_arg.value)?;
    Ok(SubjectNode {
        subject_type,
        identifier: id_arg.value.clone(),
    })
}

fn build_verb(block: &RawBlock) -> Result<VerbNode, ValidationError> {
    let (class_arg, action_arg) = two_args(block)?;
    require_non_empty(block, action_arg, "action")?;
    let verb_class = VerbClass::parse(&class_arg.value)?;

    // The action charset is narrower than the identifier charset: no '/'
    // and no '.'.
    if !action_arg
        .value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::at(
            ValidationErrorCode::SyntaxError,
            format!("action contains characters outside [A-Za-z0-9_-]: {}", action_arg.value),
            action_arg.line,
            action_arg.column,
        ));
    }

    Ok(VerbNode {
        verb_class,
        action: action_arg.value.clone(),
    })
}

fn build_object(block: &RawBlock) -> Result<ObjectNode, ValidationError> {
    let (type_arg, id_arg) = two_args(block)?;
    require_non_empty(block, id_arg, "identifier")?;
    let object_type = ObjectType::parse(&type_arg.value)?;
    Ok(ObjectNode {
        object_type,
        identifier: id_arg.value.clone(),
    })
}

fn build_metadata(block: &RawBlock) -> Result<MetadataNode, ValidationError> {
    match block.args.len() {
        0..=3 => {
            return Err(ValidationError::without_location(
                ValidationErrorCode::MissingRequiredField,
                format!(
                    "META requires scope, reversible, sensitivity, hrc_required; found {} fields",
                    block.args.len()
                ),
            ));
        },
        4 => {},
        // More than four fields can only arise from commas inside the scope
        // position: a comma-separated multi-scope.
        _ => {
            return Err(ValidationError::at(
                ValidationErrorCode::AmbiguousScope,
                "scope must name exactly one scope, found a comma-separated list",
                block.args[0].line,
                block.args[0].column,
            ));
        },
    }

    let scope_arg = &block.args[0];
    let reversible_arg = &block.args[1];
    let sensitivity_arg = &block.args[2];
    let hrc_arg = &block.args[3];

    // Enum validation first: booleans are strictly "true"/"false",
    // sensitivity is a closed set.
    let reversible = parse_bool(reversible_arg, "reversible")?;
    let sensitivity = Sensitivity::parse(&sensitivity_arg.value)?;
    let hrc_required = parse_bool(hrc_arg, "hrc_required")?;

    // Completeness: the scope is the one metadata field the enum pass
    // cannot judge.
    if scope_arg.value.is_empty() {
        return Err(ValidationError::without_location(
            ValidationErrorCode::MissingRequiredField,
            "metadata scope must be non-empty",
        ));
    }

    Ok(MetadataNode {
        scope: scope_arg.value.clone(),
        reversible,
        sensitivity,
        hrc_required,
    })
}

fn parse_bool(arg: &RawArg, field: &str) -> Result<bool, ValidationError> {
    match arg.value.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ValidationError::at(
            ValidationErrorCode::InvalidMetadataValue,
            format!("{field} must be \"true\" or \"false\", found {other:?}"),
            arg.line,
            arg.column,
        )),
    }
}
