//! Shared task entities: the manifest, its constraints, and the read-only
//! inputs to lease evaluation.
//!
//! Every type here is immutable once constructed and owned by its producer
//! until handed to the next stage. There is no shared mutable state anywhere
//! in the kernel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dsl::Sensitivity;

/// Constraints propagated verbatim from the statement metadata.
///
/// The compiler copies these byte-for-byte; no stage interprets them except
/// the lease manager (HRC gate) and executors (reversibility discipline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    /// Opaque scope identifier.
    pub scope: String,

    /// Whether the effect can be undone.
    pub reversible: bool,

    /// Declared sensitivity.
    pub sensitivity: Sensitivity,

    /// Whether hardware-rooted confirmation is required.
    pub hrc_required: bool,
}

/// Provenance of a manifest: how it traces back to the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provenance {
    /// Lower-case hex SHA-256 of the canonical AST bytes.
    pub ast_hash: String,
}

/// The compiled, immutable description of what will execute and under what
/// constraints.
///
/// Created by the compiler, consumed by the lease manager and the executor,
/// never mutated. `task_id` doubles as the idempotency key downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskManifest {
    /// Deterministic fingerprint of the statement: lower-case hex SHA-256 of
    /// the canonical AST bytes.
    pub task_id: String,

    /// Resolved capability from the closed table, e.g. `FILE_MOVE`.
    pub capability_id: crate::compiler::CapabilityId,

    /// Input bindings under the capability schema's well-known keys, copied
    /// verbatim from the statement and auxiliary bindings.
    pub inputs: BTreeMap<String, String>,

    /// Constraints copied verbatim from the statement metadata.
    pub constraints: Constraints,

    /// How this manifest traces back to the statement.
    pub provenance: Provenance,
}

/// Read-only view of the trust matrix at the instant of lease evaluation.
///
/// The lease manager never writes back; assembling the snapshot (and its
/// revocation view) is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustSnapshot {
    /// Current trust score for the requesting subject.
    pub trust_score: f64,

    /// Minimum score required to grant a lease.
    pub minimum_required: f64,
}

/// Hardware-rooted confirmation: a physical-device acknowledgment required
/// for high-sensitivity actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HrcToken {
    /// Whether the human confirmed on the hardware device.
    pub confirmed: bool,

    /// When the confirmation happened, in milliseconds since the Unix epoch.
    pub confirmed_at: u64,
}
