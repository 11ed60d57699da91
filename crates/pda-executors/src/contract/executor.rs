//! Shared execution discipline: gate, idempotency, signing.
//!
//! Every reference executor drives its effect through [`ExecutorCore::run`],
//! which enforces the contract invariants in one place: the gate runs
//! first, a completed task's recorded result is returned verbatim, and
//! every answer, success or failure alike, leaves signed.

use pda_core::compiler::CapabilityId;
use pda_core::crypto::{LeaseVerifier, Signer};
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::Value;
use tracing::debug;

use super::error::ExecutorError;
use super::gate::pre_execution_gate;
use super::idempotency::IdempotencyCache;
use super::result::ExecutionResult;

/// Key material an executor holds: the kernel's verification material and
/// its own result-signing key.
///
/// Executors never hold the kernel's signing key; in the Ed25519 deployment
/// variant they could not mint a lease even if compromised.
pub struct ExecutorKeys {
    /// Verifies lease signatures issued by the kernel.
    pub lease_verifier: LeaseVerifier,

    /// Signs this executor's results.
    pub result_signer: Signer,
}

impl std::fmt::Debug for ExecutorKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorKeys").finish_non_exhaustive()
    }
}

/// The synchronous executor interface: one task, one call, one signed
/// result.
pub trait Executor {
    /// The closed capability set this executor serves.
    fn capabilities(&self) -> &'static [CapabilityId];

    /// Executes one task at the given instant.
    ///
    /// The clock is host-injected: executors have no ambient time source,
    /// which keeps the lease-window judgment reproducible in tests and
    /// leaves wall-clock authority with the host.
    fn execute(&self, manifest: &TaskManifest, lease: &LeaseToken, now_ms: u64)
        -> ExecutionResult;
}

/// Gate + cache + signing wrapper around a capability effect.
#[derive(Debug)]
pub struct ExecutorCore {
    keys: ExecutorKeys,
    cache: IdempotencyCache,
    supported: &'static [CapabilityId],
}

impl ExecutorCore {
    /// Creates the shared core for an executor serving `supported`.
    #[must_use]
    pub fn new(keys: ExecutorKeys, supported: &'static [CapabilityId]) -> Self {
        Self {
            keys,
            cache: IdempotencyCache::new(),
            supported,
        }
    }

    /// The capability set this core admits.
    #[must_use]
    pub const fn supported(&self) -> &'static [CapabilityId] {
        self.supported
    }

    /// The executor's result verification key, for callers that check
    /// signatures.
    #[must_use]
    pub fn result_verifying_key(&self) -> pda_core::crypto::VerifyingKey {
        self.keys.result_signer.verifying_key()
    }

    /// Runs one task: gate, idempotency lookup, effect, sign, record.
    ///
    /// `effect` performs the per-capability input validation (gate step 5)
    /// and the side effect itself, returning the structured output or a
    /// typed failure. It is only invoked when the gate passes and no
    /// recorded result exists, so an irreversible effect cannot reoccur.
    pub fn run<F>(
        &self,
        manifest: &TaskManifest,
        lease: &LeaseToken,
        now_ms: u64,
        effect: F,
    ) -> ExecutionResult
    where
        F: FnOnce() -> Result<Value, ExecutorError>,
    {
        if let Err(error) = pre_execution_gate(
            manifest,
            lease,
            now_ms,
            &self.keys.lease_verifier,
            self.supported,
        ) {
            return ExecutionResult::failure(
                &manifest.task_id,
                manifest.capability_id,
                error,
                &self.keys.result_signer,
            );
        }

        // The gate has passed, so returning the recorded result does not
        // extend authority past the lease window.
        if let Some(previous) = self.cache.get(&manifest.task_id) {
            debug!(task_id = %manifest.task_id, "returning recorded result");
            return previous;
        }

        let result = match effect() {
            Ok(output) => ExecutionResult::success(
                &manifest.task_id,
                manifest.capability_id,
                output,
                &self.keys.result_signer,
            ),
            Err(error) => ExecutionResult::failure(
                &manifest.task_id,
                manifest.capability_id,
                error,
                &self.keys.result_signer,
            ),
        };

        if result.outcome.is_success() {
            self.cache.record(&result);
        }
        result
    }
}
