//! MEDIA executor tests.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use pda_core::compiler::CapabilityId;
use pda_core::crypto::{LeaseMac, LeaseSigner, LeaseVerifier, Signer};
use pda_core::dsl::Sensitivity;
use pda_core::lease::{LeaseManager, LeaseToken};
use pda_core::manifest::{Constraints, Provenance, TaskManifest, TrustSnapshot};

use super::*;
use crate::contract::{Executor as _, ExecutionResult, ExecutorErrorCode, ExecutorKeys, Outcome};
use crate::host::{StaticHostAdapter, StaticHostConfig};

const NOW_MS: u64 = 1_700_000_000_000;
const SECRET: [u8; 32] = [6u8; 32];

fn executor() -> MediaExecutor<StaticHostAdapter> {
    let keys = ExecutorKeys {
        lease_verifier: LeaseVerifier::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()),
        result_signer: Signer::generate(),
    };
    let config = MediaExecutorConfig {
        device_allowlist: BTreeSet::from(["living-room-tv".to_string(), "kitchen".to_string()]),
    };
    MediaExecutor::new(config, keys, StaticHostAdapter::new(StaticHostConfig::default()))
}

fn manifest(capability: CapabilityId, inputs: &[(&str, &str)]) -> TaskManifest {
    TaskManifest {
        task_id: "task-media".to_string(),
        capability_id: capability,
        inputs: inputs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
        constraints: Constraints {
            scope: "media".to_string(),
            reversible: true,
            sensitivity: Sensitivity::Low,
            hrc_required: false,
        },
        provenance: Provenance {
            ast_hash: "0".repeat(64),
        },
    }
}

fn lease_for(manifest: &TaskManifest) -> LeaseToken {
    let manager = LeaseManager::new(LeaseSigner::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()));
    let trust = TrustSnapshot {
        trust_score: 0.9,
        minimum_required: 0.5,
    };
    manager.evaluate(manifest, &trust, NOW_MS, None).unwrap()
}

fn error_code(result: &ExecutionResult) -> ExecutorErrorCode {
    match &result.outcome {
        Outcome::Failure { error } => error.code,
        Outcome::Success { .. } => panic!("expected failure"),
    }
}

#[test]
fn test_play_on_allowlisted_device() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaPlay,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "living-room-tv"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);

    let Outcome::Success { output } = &result.outcome else {
        panic!("play failed: {:?}", result.outcome);
    };
    assert_eq!(output["device"], "living-room-tv");
    assert_eq!(output["status"], "applied");
    assert!(result.verify(&exec.result_verifying_key()));
}

#[test]
fn test_seek_requires_integer_position() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaSeek,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "kitchen"),
            ("position_seconds", "90"),
        ],
    );
    assert!(exec.execute(&m, &lease_for(&m), NOW_MS + 1).outcome.is_success());
}

#[test]
fn test_seek_rejects_negative_position() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaSeek,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "kitchen"),
            ("position_seconds", "-5"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_seek_rejects_fractional_position() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaSeek,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "kitchen"),
            ("position_seconds", "1.5"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_unlisted_device_rejected() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaPlay,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "neighbours-tv"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_query_string_uri_rejected() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaPlay,
        &[
            ("media_uri", "media://library/search?q=jazz"),
            ("target_device", "kitchen"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_missing_device_rejected() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaPlay,
        &[("media_uri", "media://library/track-42")],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_expired_lease_rejected_and_signed() {
    let exec = executor();
    let m = manifest(
        CapabilityId::MediaPlay,
        &[
            ("media_uri", "media://library/track-42"),
            ("target_device", "kitchen"),
        ],
    );
    let lease = lease_for(&m);
    let result = exec.execute(&m, &lease, lease.expires_at);

    assert_eq!(error_code(&result), ExecutorErrorCode::LeaseExpired);
    assert!(result.verify(&exec.result_verifying_key()));
}
