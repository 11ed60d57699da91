//! The pre-execution gate every executor runs before touching the world.

use pda_core::compiler::CapabilityId;
use pda_core::crypto::{LeaseVerifier, decode_hex};
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;

use super::error::{ExecutorError, ExecutorErrorCode};

/// Checks a `(manifest, lease)` pair at the execution instant.
///
/// Ordered; the first failure aborts:
///
/// 1. lease signature verifies against the kernel verification material:
///    `INVALID_LEASE`
/// 2. the lease is bound to this manifest (`task_id` match):
///    `INVALID_LEASE`
/// 3. the lease window contains `now`: `LEASE_EXPIRED`
/// 4. the capability is in this executor's closed set:
///    `UNSUPPORTED_CAPABILITY`
///
/// Per-capability input validation (step 5) happens in the executor after
/// the gate passes.
///
/// # Errors
///
/// Returns the typed failure the executor must sign and report.
pub fn pre_execution_gate(
    manifest: &TaskManifest,
    lease: &LeaseToken,
    now_ms: u64,
    verifier: &LeaseVerifier,
    supported: &[CapabilityId],
) -> Result<(), ExecutorError> {
    let Some(signature) = decode_hex(&lease.signature) else {
        return Err(ExecutorError::new(
            ExecutorErrorCode::InvalidLease,
            "lease signature is not valid hex",
        ));
    };
    if !verifier.verify(&lease.signing_message(), &signature) {
        return Err(ExecutorError::new(
            ExecutorErrorCode::InvalidLease,
            "lease signature verification failed",
        ));
    }

    if lease.task_id != manifest.task_id {
        return Err(ExecutorError::new(
            ExecutorErrorCode::InvalidLease,
            "lease is not bound to this manifest",
        ));
    }

    if now_ms >= lease.expires_at {
        return Err(ExecutorError::new(
            ExecutorErrorCode::LeaseExpired,
            format!(
                "lease expired at {}, execution attempted at {now_ms}",
                lease.expires_at
            ),
        ));
    }

    if !supported.contains(&manifest.capability_id) {
        return Err(ExecutorError::new(
            ExecutorErrorCode::UnsupportedCapability,
            format!("unsupported capability: {}", manifest.capability_id),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pda_core::compiler::{AuxInputs, compile};
    use pda_core::crypto::{LeaseMac, LeaseSigner};
    use pda_core::dsl::validate;
    use pda_core::lease::LeaseManager;
    use pda_core::manifest::TrustSnapshot;

    use super::*;

    const NOW_MS: u64 = 1_700_000_000_000;

    fn manifest() -> TaskManifest {
        let ast = validate(
            "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/home/alice/in/a.txt) META(home,true,LOW,false)",
        )
        .unwrap();
        let mut aux = AuxInputs::new();
        aux.insert("destination_path", "/home/alice/out/a.txt");
        compile(&ast, &aux).unwrap()
    }

    fn mac() -> LeaseMac {
        LeaseMac::new(vec![3u8; 32]).unwrap()
    }

    fn granted_lease(manifest: &TaskManifest) -> LeaseToken {
        let manager = LeaseManager::new(LeaseSigner::Hmac(mac()));
        let trust = TrustSnapshot {
            trust_score: 0.8,
            minimum_required: 0.5,
        };
        manager.evaluate(manifest, &trust, NOW_MS, None).unwrap()
    }

    #[test]
    fn test_gate_passes_valid_pair() {
        let manifest = manifest();
        let lease = granted_lease(&manifest);
        pre_execution_gate(
            &manifest,
            &lease,
            NOW_MS + 1,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::FileMove],
        )
        .unwrap();
    }

    #[test]
    fn test_gate_rejects_tampered_signature() {
        let manifest = manifest();
        let mut lease = granted_lease(&manifest);
        lease.signature = "00".repeat(32);

        let err = pre_execution_gate(
            &manifest,
            &lease,
            NOW_MS + 1,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::FileMove],
        )
        .unwrap_err();
        assert_eq!(err.code, ExecutorErrorCode::InvalidLease);
    }

    #[test]
    fn test_gate_rejects_unbound_lease() {
        let manifest = manifest();
        let mut lease = granted_lease(&manifest);
        // Valid signature over different fields still fails binding first
        // through the signature check; rebinding task_id alone fails both.
        lease.task_id = "other-task".to_string();

        let err = pre_execution_gate(
            &manifest,
            &lease,
            NOW_MS + 1,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::FileMove],
        )
        .unwrap_err();
        assert_eq!(err.code, ExecutorErrorCode::InvalidLease);
    }

    #[test]
    fn test_gate_rejects_expired_lease_exactly_at_boundary() {
        let manifest = manifest();
        let lease = granted_lease(&manifest);

        let err = pre_execution_gate(
            &manifest,
            &lease,
            lease.expires_at,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::FileMove],
        )
        .unwrap_err();
        assert_eq!(err.code, ExecutorErrorCode::LeaseExpired);
    }

    #[test]
    fn test_gate_rejects_foreign_capability() {
        let manifest = manifest();
        let lease = granted_lease(&manifest);

        let err = pre_execution_gate(
            &manifest,
            &lease,
            NOW_MS + 1,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::MediaPlay],
        )
        .unwrap_err();
        assert_eq!(err.code, ExecutorErrorCode::UnsupportedCapability);
    }

    #[test]
    fn test_signature_check_precedes_expiry_check() {
        let manifest = manifest();
        let mut lease = granted_lease(&manifest);
        lease.signature = "00".repeat(32);

        // Expired AND tampered: the signature failure wins.
        let err = pre_execution_gate(
            &manifest,
            &lease,
            lease.expires_at + 1,
            &LeaseVerifier::Hmac(mac()),
            &[CapabilityId::FileMove],
        )
        .unwrap_err();
        assert_eq!(err.code, ExecutorErrorCode::InvalidLease);
    }
}
