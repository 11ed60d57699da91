//! APP_LAUNCH executor tests.

use std::collections::{BTreeMap, BTreeSet};

use pda_core::compiler::CapabilityId;
use pda_core::crypto::{LeaseMac, LeaseSigner, LeaseVerifier, Signer};
use pda_core::dsl::Sensitivity;
use pda_core::lease::{LeaseManager, LeaseToken};
use pda_core::manifest::{Constraints, Provenance, TaskManifest, TrustSnapshot};

use super::*;
use crate::contract::{Executor as _, ExecutionResult, ExecutorErrorCode, ExecutorKeys, Outcome};
use crate::host::{StaticHostAdapter, StaticHostConfig};

const NOW_MS: u64 = 1_700_000_000_000;
const SECRET: [u8; 32] = [7u8; 32];

fn executor(running: &[&str]) -> AppLaunchExecutor<StaticHostAdapter> {
    let keys = ExecutorKeys {
        lease_verifier: LeaseVerifier::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()),
        result_signer: Signer::generate(),
    };
    let config = AppLaunchExecutorConfig {
        app_allowlist: BTreeSet::from(["org.music.player".to_string(), "org.mail".to_string()]),
    };
    let host_config = StaticHostConfig {
        running_apps: running.iter().map(ToString::to_string).collect(),
        ..StaticHostConfig::default()
    };
    AppLaunchExecutor::new(config, keys, StaticHostAdapter::new(host_config))
}

fn manifest(capability: CapabilityId, app_id: &str, environment: &str) -> TaskManifest {
    TaskManifest {
        task_id: "task-app".to_string(),
        capability_id: capability,
        inputs: BTreeMap::from([
            ("app_id".to_string(), app_id.to_string()),
            ("target_environment".to_string(), environment.to_string()),
        ]),
        constraints: Constraints {
            scope: "apps".to_string(),
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

fn success_output(result: &ExecutionResult) -> &serde_json::Value {
    match &result.outcome {
        Outcome::Success { output } => output,
        Outcome::Failure { error } => panic!("expected success, got {error}"),
    }
}

fn error_code(result: &ExecutionResult) -> ExecutorErrorCode {
    match &result.outcome {
        Outcome::Failure { error } => error.code,
        Outcome::Success { .. } => panic!("expected failure"),
    }
}

#[test]
fn test_launch_not_running_app() {
    let exec = executor(&[]);
    let m = manifest(CapabilityId::AppLaunch, "org.music.player", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);

    assert_eq!(success_output(&result)["status"], "launched");
    assert!(result.verify(&exec.result_verifying_key()));
}

#[test]
fn test_launch_running_app_brings_to_front() {
    // The build-time policy is BringToFront; this pins it.
    assert_eq!(ON_ALREADY_RUNNING, AlreadyRunningPolicy::BringToFront);

    let exec = executor(&["org.music.player"]);
    let m = manifest(CapabilityId::AppLaunch, "org.music.player", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);

    assert_eq!(success_output(&result)["status"], "brought_to_front");
}

#[test]
fn test_focus_running_app() {
    let exec = executor(&["org.mail"]);
    let m = manifest(CapabilityId::AppFocus, "org.mail", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(success_output(&result)["status"], "focused");
}

#[test]
fn test_close_is_graceful() {
    let exec = executor(&["org.mail"]);
    let m = manifest(CapabilityId::AppClose, "org.mail", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(success_output(&result)["status"], "closed");
}

#[test]
fn test_unlisted_app_rejected() {
    let exec = executor(&[]);
    let m = manifest(CapabilityId::AppLaunch, "org.unknown", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_allowlist_is_exact_match() {
    let exec = executor(&[]);
    let m = manifest(CapabilityId::AppLaunch, "org.music", "desktop");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_unknown_environment_rejected() {
    let exec = executor(&[]);
    let m = manifest(CapabilityId::AppLaunch, "org.music.player", "watch");
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_all_environments_accepted() {
    for environment in ["desktop", "mobile", "tv"] {
        let exec = executor(&[]);
        let m = manifest(CapabilityId::AppLaunch, "org.music.player", environment);
        let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
        assert!(result.outcome.is_success(), "environment {environment}");
    }
}
