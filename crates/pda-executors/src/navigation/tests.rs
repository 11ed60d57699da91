//! NAVIGATION executor tests.

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
const SECRET: [u8; 32] = [8u8; 32];

fn executor() -> NavigationExecutor<StaticHostAdapter> {
    let keys = ExecutorKeys {
        lease_verifier: LeaseVerifier::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()),
        result_signer: Signer::generate(),
    };
    let host_config = StaticHostConfig {
        known_apps: BTreeSet::from(["org.editor".to_string()]),
        known_windows: BTreeSet::from(["main-window".to_string()]),
        known_files: BTreeSet::from(["/docs/readme".to_string()]),
        allowed_url_schemes: BTreeSet::from(["http".to_string(), "https".to_string()]),
        inaccessible_targets: BTreeSet::from(["secret-window".to_string()]),
        ..StaticHostConfig::default()
    };
    NavigationExecutor::new(keys, StaticHostAdapter::new(host_config))
}

fn manifest(capability: CapabilityId, inputs: &[(&str, &str)]) -> TaskManifest {
    TaskManifest {
        task_id: "task-nav".to_string(),
        capability_id: capability,
        inputs: inputs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
        constraints: Constraints {
            scope: "desktop".to_string(),
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

fn nav_inputs<'a>(
    target_type: &'a str,
    target_id: &'a str,
) -> Vec<(&'a str, &'a str)> {
    vec![
        ("target_type", target_type),
        ("target_id", target_id),
        ("navigation_mode", "foreground"),
        ("focus_policy", "request"),
    ]
}

#[test]
fn test_navigate_to_known_app() {
    let exec = executor();
    let m = manifest(CapabilityId::NavigateApp, &nav_inputs("app", "org.editor"));
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);

    let Outcome::Success { output } = &result.outcome else {
        panic!("navigation failed: {:?}", result.outcome);
    };
    assert_eq!(output["navigation_result"], "success");
    assert!(result.verify(&exec.result_verifying_key()));
}

#[test]
fn test_navigate_to_allowed_url() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateUrl,
        &nav_inputs("url", "https://example.org/page"),
    );
    assert!(exec.execute(&m, &lease_for(&m), NOW_MS + 1).outcome.is_success());
}

#[test]
fn test_unknown_target_is_not_found() {
    let exec = executor();
    let m = manifest(CapabilityId::NavigateApp, &nav_inputs("app", "org.ghost"));
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::TargetNotFound);
}

#[test]
fn test_unpermitted_target_is_not_accessible() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateWindow,
        &nav_inputs("window", "secret-window"),
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::TargetNotAccessible);
}

#[test]
fn test_unsupported_url_scheme_is_blocked() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateUrl,
        &nav_inputs("url", "gopher://old.example.org"),
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::NavigationBlocked);
}

#[test]
fn test_malformed_url_rejected() {
    let exec = executor();
    let m = manifest(CapabilityId::NavigateUrl, &nav_inputs("url", "not-a-url"));
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_target_type_must_match_capability() {
    let exec = executor();
    let m = manifest(CapabilityId::NavigateApp, &nav_inputs("url", "https://x.org"));
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_unknown_navigation_mode_rejected() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateApp,
        &[
            ("target_type", "app"),
            ("target_id", "org.editor"),
            ("navigation_mode", "sideways"),
            ("focus_policy", "request"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_unknown_focus_policy_rejected() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateApp,
        &[
            ("target_type", "app"),
            ("target_id", "org.editor"),
            ("navigation_mode", "foreground"),
            ("focus_policy", "grab"),
        ],
    );
    let result = exec.execute(&m, &lease_for(&m), NOW_MS + 1);
    assert_eq!(error_code(&result), ExecutorErrorCode::ExecutionFailed);
}

#[test]
fn test_navigate_file_through_host_resolution() {
    let exec = executor();
    let m = manifest(
        CapabilityId::NavigateFile,
        &nav_inputs("file", "/docs/readme"),
    );
    assert!(exec.execute(&m, &lease_for(&m), NOW_MS + 1).outcome.is_success());
}
