//! The blueprint compiler: typed AST in, immutable task manifest out.
//!
//! Compilation deterministically derives a [`TaskManifest`] from a validated
//! statement:
//!
//! - `task_id` and `provenance.ast_hash` are the lower-case hex SHA-256 of
//!   the canonical AST bytes, so the same statement always names the same
//!   task;
//! - the capability is resolved through the closed table in
//!   [`capability::CAPABILITY_TABLE`];
//! - inputs are copied verbatim under the capability schema's well-known
//!   keys, with no transformation, normalization, or inference;
//! - constraints are propagated byte-for-byte.
//!
//! Identical `(ast, aux)` pairs yield byte-identical manifests. Any other
//! outcome is a defect.

pub mod capability;
mod error;


use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

pub use capability::{BindingSource, BindingSpec, CapabilityEntry, CapabilityId, CAPABILITY_TABLE};
pub use error::{CompileError, CompileErrorCode};

use crate::canonical::canonical_ast_bytes;
use crate::dsl::Ast;
use crate::manifest::{Constraints, Provenance, TaskManifest};

/// Auxiliary input bindings supplied alongside the statement.
///
/// Some capability schemas need identifiers the four-block grammar has no
/// position for (a move's destination, a search's query). The caller binds
/// them here; the compiler copies the values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxInputs {
    values: BTreeMap<String, String>,
}

impl AuxInputs {
    /// Creates an empty binding table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value under a well-known key. The last binding for a key wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the bound value for a key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Compiles a validated statement into a task manifest.
///
/// Pure and deterministic: no I/O, no clock, no randomness.
///
/// # Errors
///
/// Returns a [`CompileError`] with a code from the compiler's closed set:
/// `UNKNOWN_CAPABILITY` for an unregistered triple, `UNSUPPORTED_ACTION` for
/// a registered triple whose action is not in its canonical spelling,
/// `INVALID_BINDING` when the schema's required keys cannot be bound, and
/// `COMPILATION_FAILURE` for internal canonicalization failure.
pub fn compile(ast: &Ast, aux: &AuxInputs) -> Result<TaskManifest, CompileError> {
    let entry = resolve_capability(ast)?;
    let inputs = bind_inputs(ast, aux, entry)?;

    let canonical = canonical_ast_bytes(ast).map_err(|e| {
        CompileError::new(
            CompileErrorCode::CompilationFailure,
            format!("canonicalization failed: {e}"),
        )
    })?;
    let digest = sha256_hex(&canonical);

    Ok(TaskManifest {
        task_id: digest.clone(),
        capability_id: entry.capability,
        inputs,
        constraints: Constraints {
            scope: ast.metadata.scope.clone(),
            reversible: ast.metadata.reversible,
            sensitivity: ast.metadata.sensitivity,
            hrc_required: ast.metadata.hrc_required,
        },
        provenance: Provenance { ast_hash: digest },
    })
}

/// Renders a SHA-256 digest of `bytes` as lower-case hex.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    crate::crypto::encode_hex(&Sha256::digest(bytes))
}

fn resolve_capability(ast: &Ast) -> Result<&'static CapabilityEntry, CompileError> {
    let class = ast.verb.verb_class;
    let object = ast.object.object_type;
    let action = ast.verb.action.as_str();

    if let Some(entry) = capability::lookup(class, object, action) {
        return Ok(entry);
    }

    // A registered triple reached with a non-canonical action spelling is a
    // malformed action, not an unknown capability.
    if let Some(entry) = capability::lookup_ignore_case(class, object, action) {
        return Err(CompileError::new(
            CompileErrorCode::UnsupportedAction,
            format!(
                "action {action:?} is malformed for {}; the registered spelling is {:?}",
                entry.capability, entry.action
            ),
        ));
    }

    Err(CompileError::new(
        CompileErrorCode::UnknownCapability,
        format!("no capability registered for ({class}, {object}, {action})"),
    ))
}

fn bind_inputs(
    ast: &Ast,
    aux: &AuxInputs,
    entry: &CapabilityEntry,
) -> Result<BTreeMap<String, String>, CompileError> {
    let mut inputs = BTreeMap::new();

    for spec in entry.schema {
        let value = match spec.source {
            BindingSource::ObjectIdentifier => Some(ast.object.identifier.clone()),
            BindingSource::Scope => Some(ast.metadata.scope.clone()),
            BindingSource::Const(v) => Some(v.to_string()),
            BindingSource::Aux => aux.get(spec.key).map(ToOwned::to_owned),
        };

        match value {
            Some(v) if !v.is_empty() => {
                inputs.insert(spec.key.to_string(), v);
            },
            _ => {
                return Err(CompileError::new(
                    CompileErrorCode::InvalidBinding,
                    format!(
                        "capability {} requires input {:?}",
                        entry.capability, spec.key
                    ),
                ));
            },
        }
    }

    Ok(inputs)
}
