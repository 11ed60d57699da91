//! Canonical JSON encoding for hashing and signing.
//!
//! A single canonical form, based on RFC 8785 (JCS), is the cross-cutting
//! primitive that makes `task_id`, `ast_hash`, and every signature input
//! reproducible:
//!
//! - UTF-8, no whitespace between tokens
//! - object keys sorted in byte order
//! - arrays in source order
//! - booleans as literal `true`/`false`
//! - integers only, in minimal decimal form (floats are rejected; nothing in
//!   the kernel produces one)
//! - minimal string escaping per RFC 8785 §3.2.2.2
//!
//! The canonical bytes of an [`Ast`] are the sole input to `task_id`
//! derivation and provenance hashing.

use std::fmt::Write as _;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::dsl::Ast;

/// Errors that can occur while producing canonical bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonicalError {
    /// A floating-point number was encountered.
    ///
    /// The canonical form is integer-only so that identical values have
    /// identical bytes on every platform.
    #[error("float not allowed in canonical form")]
    FloatNotAllowed,

    /// The value could not be converted to a JSON tree.
    #[error("serialization failed: {message}")]
    Serialization {
        /// Description of the underlying serde failure.
        message: String,
    },
}

/// Produces the canonical string for a JSON value.
///
/// # Errors
///
/// Returns [`CanonicalError::FloatNotAllowed`] if the tree contains a
/// non-integer number.
pub fn to_canonical_string(value: &Value) -> Result<String, CanonicalError> {
    let mut output = String::new();
    emit_value(value, &mut output)?;
    Ok(output)
}

/// Produces the canonical byte sequence for an AST.
///
/// This is the unique encoding hashed into `task_id` and
/// `provenance.ast_hash`.
///
/// # Errors
///
/// Returns [`CanonicalError::Serialization`] if the AST cannot be converted
/// to a JSON tree; this does not happen for a validator-produced AST.
pub fn canonical_ast_bytes(ast: &Ast) -> Result<Vec<u8>, CanonicalError> {
    let value = serde_json::to_value(ast).map_err(|e| CanonicalError::Serialization {
        message: e.to_string(),
    })?;
    Ok(to_canonical_string(&value)?.into_bytes())
}

fn emit_value(value: &Value, output: &mut String) -> Result<(), CanonicalError> {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                let _ = write!(output, "{i}");
            } else if let Some(u) = n.as_u64() {
                let _ = write!(output, "{u}");
            } else {
                return Err(CanonicalError::FloatNotAllowed);
            }
        },
        Value::String(s) => emit_string(s, output),
        Value::Array(arr) => {
            output.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                emit_value(item, output)?;
            }
            output.push(']');
        },
        Value::Object(obj) => emit_object(obj, output)?,
    }
    Ok(())
}

/// Emits a string with minimal escaping per RFC 8785 §3.2.2.2: only `"`,
/// `\`, and the C0 controls are escaped, the latter with short escapes
/// where JSON defines them.
fn emit_string(s: &str, output: &mut String) {
    output.push('"');
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if ('\u{0000}'..='\u{001F}').contains(&c) => {
                let _ = write!(output, "\\u{:04x}", c as u32);
            },
            c => output.push(c),
        }
    }
    output.push('"');
}

fn emit_object(obj: &Map<String, Value>, output: &mut String) -> Result<(), CanonicalError> {
    let mut sorted_keys: Vec<&String> = obj.keys().collect();
    sorted_keys.sort();

    output.push('{');
    for (i, key) in sorted_keys.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        emit_string(key, output);
        output.push(':');
        emit_value(&obj[*key], output)?;
    }
    output.push('}');
    Ok(())
}
