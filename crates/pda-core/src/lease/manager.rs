//! Lease evaluation and token issuance.

use std::collections::BTreeSet;

use super::error::{LeaseError, LeaseErrorCode};
use super::token::LeaseToken;
use crate::crypto::{LeaseSigner, encode_hex, wire};
use crate::manifest::{HrcToken, TaskManifest, TrustSnapshot};

/// Default lease lifetime in milliseconds.
///
/// A per-deployment constant, not a per-call parameter; override it with
/// [`LeaseManager::with_duration_ms`].
pub const DEFAULT_LEASE_DURATION_MS: u64 = 60_000;

/// Read-only view of revoked task ids at the instant of evaluation.
///
/// Revocation semantics live in the caller that assembles this view; the
/// lease manager only consults it and fails closed on membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationSnapshot {
    revoked: BTreeSet<String>,
}

impl RevocationSnapshot {
    /// Creates an empty view: nothing revoked.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a view from revoked task ids.
    #[must_use]
    pub fn from_task_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revoked: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the task is revoked.
    #[must_use]
    pub fn contains(&self, task_id: &str) -> bool {
        self.revoked.contains(task_id)
    }
}

/// The lease manager: turns a manifest plus read-only trust inputs into a
/// signed, time-bounded lease, or a typed denial.
///
/// Construction fixes everything that is per-deployment: the signature
/// scheme, the lease duration, the evaluation ceiling, and the revocation
/// view. `evaluate` itself is then a pure function of its arguments; the
/// same `(manifest, trust, now, hrc)` always yields the same decision and
/// the same signature bytes.
pub struct LeaseManager {
    signer: LeaseSigner,
    duration_ms: u64,
    /// Optional upper bound on the evaluation instant. Evaluations at or
    /// past this instant are denied `LEASE_EXPIRED` before anything else is
    /// consulted.
    expiry_ceiling_ms: Option<u64>,
    revocations: RevocationSnapshot,
}

impl LeaseManager {
    /// Creates a manager with the default duration, no evaluation ceiling,
    /// and an empty revocation view.
    #[must_use]
    pub fn new(signer: LeaseSigner) -> Self {
        Self {
            signer,
            duration_ms: DEFAULT_LEASE_DURATION_MS,
            expiry_ceiling_ms: None,
            revocations: RevocationSnapshot::empty(),
        }
    }

    /// Overrides the lease duration for this deployment.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the caller-supplied expiry upper bound for evaluations.
    #[must_use]
    pub const fn with_expiry_ceiling_ms(mut self, ceiling_ms: u64) -> Self {
        self.expiry_ceiling_ms = Some(ceiling_ms);
        self
    }

    /// Installs the revocation view consulted at evaluation time.
    #[must_use]
    pub fn with_revocations(mut self, revocations: RevocationSnapshot) -> Self {
        self.revocations = revocations;
        self
    }

    /// Returns this deployment's lease duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Evaluates a manifest and either issues a lease or denies.
    ///
    /// The pipeline runs in strict order (manifest integrity, time window,
    /// trust threshold, HRC gate, revocation) and the first failure halts
    /// it. Fail-closed: any doubt denies.
    ///
    /// # Errors
    ///
    /// Returns a [`LeaseError`] with a code from the manager's closed set.
    pub fn evaluate(
        &self,
        manifest: &TaskManifest,
        trust: &TrustSnapshot,
        now_ms: u64,
        hrc_token: Option<&HrcToken>,
    ) -> Result<LeaseToken, LeaseError> {
        self.check_manifest(manifest)?;
        self.check_time_window(now_ms)?;
        Self::check_trust(trust)?;
        Self::check_hrc(manifest, hrc_token)?;
        self.check_revocation(manifest)?;

        Ok(self.issue(&manifest.task_id, now_ms))
    }

    fn check_manifest(&self, manifest: &TaskManifest) -> Result<(), LeaseError> {
        if manifest.task_id.is_empty() {
            return Err(LeaseError::new(
                LeaseErrorCode::InvalidManifest,
                "task_id must be non-empty",
            ));
        }
        if manifest.provenance.ast_hash.is_empty() {
            return Err(LeaseError::new(
                LeaseErrorCode::InvalidManifest,
                "provenance.ast_hash must be non-empty",
            ));
        }
        Ok(())
    }

    fn check_time_window(&self, now_ms: u64) -> Result<(), LeaseError> {
        if let Some(ceiling) = self.expiry_ceiling_ms {
            if now_ms >= ceiling {
                return Err(LeaseError::new(
                    LeaseErrorCode::LeaseExpired,
                    format!("evaluation instant {now_ms} is at or past the ceiling {ceiling}"),
                ));
            }
        }
        Ok(())
    }

    fn check_trust(trust: &TrustSnapshot) -> Result<(), LeaseError> {
        // NaN on either side fails the comparison and therefore denies.
        let sufficient = trust.trust_score >= trust.minimum_required;
        if !sufficient {
            return Err(LeaseError::new(
                LeaseErrorCode::InsufficientTrust,
                format!(
                    "trust score {} below minimum {}",
                    trust.trust_score, trust.minimum_required
                ),
            ));
        }
        Ok(())
    }

    fn check_hrc(
        manifest: &TaskManifest,
        hrc_token: Option<&HrcToken>,
    ) -> Result<(), LeaseError> {
        if !manifest.constraints.hrc_required {
            return Ok(());
        }
        match hrc_token {
            None => Err(LeaseError::new(
                LeaseErrorCode::HrcRequired,
                "hardware-rooted confirmation required but no token supplied",
            )),
            Some(token) if !token.confirmed => Err(LeaseError::new(
                LeaseErrorCode::HrcRequired,
                "hardware-rooted confirmation token is not confirmed",
            )),
            Some(_) => Ok(()),
        }
    }

    fn check_revocation(&self, manifest: &TaskManifest) -> Result<(), LeaseError> {
        if self.revocations.contains(&manifest.task_id) {
            return Err(LeaseError::new(
                LeaseErrorCode::LeaseRevoked,
                format!("task {} is revoked", manifest.task_id),
            ));
        }
        Ok(())
    }

    fn issue(&self, task_id: &str, now_ms: u64) -> LeaseToken {
        let issued_at = now_ms;
        let expires_at = now_ms.saturating_add(self.duration_ms);
        let message = wire::lease_message(task_id, issued_at, expires_at);
        let signature = encode_hex(&self.signer.sign(&message));

        LeaseToken {
            task_id: task_id.to_string(),
            issued_at,
            expires_at,
            signature,
        }
    }
}

impl std::fmt::Debug for LeaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseManager")
            .field("duration_ms", &self.duration_ms)
            .field("expiry_ceiling_ms", &self.expiry_ceiling_ms)
            .finish_non_exhaustive()
    }
}
