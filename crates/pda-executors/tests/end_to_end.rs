//! End-to-end pipeline scenarios: DSL text through validation, compilation,
//! lease evaluation, and execution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pda_core::compiler::{AuxInputs, CapabilityId, compile};
use pda_core::crypto::{LeaseMac, LeaseSigner, LeaseVerifier, Signer};
use pda_core::dsl::{ValidationErrorCode, validate};
use pda_core::lease::{LeaseErrorCode, LeaseManager};
use pda_core::manifest::TrustSnapshot;
use pda_executors::contract::{Executor as _, ExecutorErrorCode, ExecutorKeys, Outcome};
use pda_executors::file::{FileExecutor, FileExecutorConfig};
use pda_executors::search::{ScopeBacking, SearchExecutor, SearchScopes};
use tempfile::TempDir;

const T0_MS: u64 = 1_700_000_000_000;
const SECRET: [u8; 32] = [11u8; 32];

fn lease_manager() -> LeaseManager {
    LeaseManager::new(LeaseSigner::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()))
}

fn executor_keys() -> ExecutorKeys {
    ExecutorKeys {
        lease_verifier: LeaseVerifier::Hmac(LeaseMac::new(SECRET.to_vec()).unwrap()),
        result_signer: Signer::generate(),
    }
}

fn trust(score: f64, min: f64) -> TrustSnapshot {
    TrustSnapshot {
        trust_score: score,
        minimum_required: min,
    }
}

fn file_executor(base: &Path) -> FileExecutor {
    FileExecutor::new(
        FileExecutorConfig {
            base_directories: vec![base.to_path_buf()],
        },
        executor_keys(),
    )
    .unwrap()
}

/// Scenario 1: happy-path file move, DSL text to signed SUCCESS.
#[test]
fn scenario_happy_path_file_move() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("in")).unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let source = dir.path().join("in/a.txt");
    let dest = dir.path().join("out/a.txt");
    fs::write(&source, b"hello").unwrap();

    let statement = format!(
        "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,{}) META(home,true,LOW,false)",
        source.display()
    );
    let ast = validate(&statement).expect("statement validates");

    let mut aux = AuxInputs::new();
    aux.insert("destination_path", dest.to_string_lossy());
    let manifest = compile(&ast, &aux).expect("capability resolves");
    assert_eq!(manifest.capability_id, CapabilityId::FileMove);

    // task_id is the SHA-256 of the canonical AST.
    let canonical = pda_core::canonical::canonical_ast_bytes(&ast).unwrap();
    assert_eq!(manifest.task_id, pda_core::compiler::sha256_hex(&canonical));

    let lease = lease_manager()
        .evaluate(&manifest, &trust(0.8, 0.5), T0_MS, None)
        .expect("score 0.8 clears threshold 0.5 with no HRC requirement");

    let exec = file_executor(dir.path());
    let result = exec.execute(&manifest, &lease, T0_MS + 1);

    let Outcome::Success { output } = &result.outcome else {
        panic!("move failed: {:?}", result.outcome);
    };
    let resolved_source = fs::canonicalize(dir.path()).unwrap().join("in/a.txt");
    assert_eq!(
        output["undo_metadata"]["original_path"],
        resolved_source.to_string_lossy().as_ref()
    );
    assert!(!source.exists());
    assert_eq!(fs::read(&dest).unwrap(), b"hello");
    assert!(result.verify(&exec.result_verifying_key()));
}

/// Scenario 2: irreversible delete is rejected at validation; no manifest
/// is ever produced.
#[test]
fn scenario_irreversible_delete_rejected() {
    let statement = "SUBJECT(USER,alice) VERB(MUTATE,DELETE) OBJECT(FILE,/home/alice/in/a.txt) META(home,false,LOW,false)";
    let err = validate(statement).unwrap_err();
    assert_eq!(err.code, ValidationErrorCode::HardNoViolation);
}

/// Scenario 3: a lease issued at t0 with D = 60_000 ms is inert at
/// t0 + 60_001; the gate reports a signed FAILURE and nothing moves.
#[test]
fn scenario_expired_lease() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.txt");
    let dest = dir.path().join("b.txt");
    fs::write(&source, b"x").unwrap();

    let statement = format!(
        "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,{}) META(home,true,LOW,false)",
        source.display()
    );
    let ast = validate(&statement).unwrap();
    let mut aux = AuxInputs::new();
    aux.insert("destination_path", dest.to_string_lossy());
    let manifest = compile(&ast, &aux).unwrap();

    let lease = lease_manager()
        .with_duration_ms(60_000)
        .evaluate(&manifest, &trust(0.8, 0.5), T0_MS, None)
        .unwrap();

    let exec = file_executor(dir.path());
    let result = exec.execute(&manifest, &lease, T0_MS + 60_001);

    let Outcome::Failure { error } = &result.outcome else {
        panic!("expired lease must not execute");
    };
    assert_eq!(error.code, ExecutorErrorCode::LeaseExpired);
    assert!(source.exists(), "no side effect");
    assert!(!dest.exists());
    assert!(result.verify(&exec.result_verifying_key()), "failure is signed");
}

/// Scenario 4: an HRC-gated manifest with no token is denied before any
/// executor is involved.
#[test]
fn scenario_hrc_gated_action_denied() {
    let statement = "SUBJECT(USER,alice) VERB(MUTATE,SEEK) OBJECT(DEVICE,living-room-tv) META(media,true,HIGH,true)";
    let ast = validate(statement).unwrap();
    let mut aux = AuxInputs::new();
    aux.insert("media_uri", "media://library/track-1");
    aux.insert("position_seconds", "30");
    let manifest = compile(&ast, &aux).unwrap();

    let err = lease_manager()
        .evaluate(&manifest, &trust(0.9, 0.5), T0_MS, None)
        .unwrap_err();
    assert_eq!(err.code, LeaseErrorCode::HrcRequired);
}

/// Scenario 5: search truncation and ordering over
/// `["b.md", "A.md", "c.md"]` with `max_results = 2`.
#[test]
fn scenario_search_truncation_and_ordering() {
    let dir = TempDir::new().unwrap();
    for name in ["b.md", "A.md", "c.md"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }

    let statement =
        "SUBJECT(USER,alice) VERB(TRANSFORM,SEARCH) OBJECT(FOLDER,documents) META(notes,true,LOW,false)";
    let ast = validate(statement).unwrap();
    let mut aux = AuxInputs::new();
    aux.insert("query", "md");
    aux.insert("max_results", "2");
    let manifest = compile(&ast, &aux).unwrap();
    assert_eq!(manifest.capability_id, CapabilityId::SearchFiles);

    let lease = lease_manager()
        .evaluate(&manifest, &trust(0.8, 0.5), T0_MS, None)
        .unwrap();

    let mut scopes = SearchScopes::new();
    scopes.insert(
        "notes",
        ScopeBacking::Files {
            root: dir.path().to_path_buf(),
        },
    );
    let exec = SearchExecutor::new(scopes, executor_keys());
    let result = exec.execute(&manifest, &lease, T0_MS + 1);

    let Outcome::Success { output } = &result.outcome else {
        panic!("search failed: {:?}", result.outcome);
    };
    assert_eq!(output["count"], 3);
    assert_eq!(output["truncated"], true);
    let names: Vec<&str> = output["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            Path::new(r["id"].as_str().unwrap())
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
        })
        .collect();
    assert_eq!(names, ["A.md", "b.md"]);
}

/// Scenario 6: re-executing an identical `(manifest, lease)` pair returns
/// the recorded signed result and leaves the filesystem untouched.
#[test]
fn scenario_reexecution_idempotency() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.txt");
    let dest = dir.path().join("b.txt");
    fs::write(&source, b"payload").unwrap();

    let statement = format!(
        "SUBJECT(USER,alice) VERB(DISSEMINATE,COPY) OBJECT(FILE,{}) META(home,true,LOW,false)",
        source.display()
    );
    let ast = validate(&statement).unwrap();
    let mut aux = AuxInputs::new();
    aux.insert("destination_path", dest.to_string_lossy());
    let manifest = compile(&ast, &aux).unwrap();
    assert_eq!(manifest.capability_id, CapabilityId::FileCopy);

    let lease = lease_manager()
        .evaluate(&manifest, &trust(0.8, 0.5), T0_MS, None)
        .unwrap();

    let exec = file_executor(dir.path());
    let first = exec.execute(&manifest, &lease, T0_MS + 1);
    assert!(first.outcome.is_success());

    let snapshot: BTreeMap<String, Vec<u8>> = dir_state(dir.path());
    let second = exec.execute(&manifest, &lease, T0_MS + 2);

    assert_eq!(first, second, "second call returns the recorded result");
    assert_eq!(dir_state(dir.path()), snapshot, "filesystem unchanged");
}

/// The pure pipeline is deterministic end to end: same text, same aux,
/// same instant, same bytes.
#[test]
fn pipeline_is_deterministic() {
    let statement =
        "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/home/alice/in/a.txt) META(home,true,LOW,false)";
    let mut aux = AuxInputs::new();
    aux.insert("destination_path", "/home/alice/out/a.txt");

    let run = || {
        let ast = validate(statement).unwrap();
        let manifest = compile(&ast, &aux).unwrap();
        let lease = lease_manager()
            .evaluate(&manifest, &trust(0.8, 0.5), T0_MS, None)
            .unwrap();
        (manifest, lease)
    };

    let (manifest_a, lease_a) = run();
    let (manifest_b, lease_b) = run();
    assert_eq!(manifest_a, manifest_b);
    assert_eq!(lease_a, lease_b);
    assert_eq!(
        serde_json::to_string(&lease_a).unwrap(),
        serde_json::to_string(&lease_b).unwrap()
    );
}

fn dir_state(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}
