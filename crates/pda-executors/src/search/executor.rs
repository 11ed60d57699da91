//! SEARCH executor implementation.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use pda_core::compiler::CapabilityId;
use unicode_normalization::UnicodeNormalization;
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::{Value, json};

use super::scope::{DatasetRecord, EmailRecord, ScopeBacking, SearchScopes};
use super::snippet::snippet;
use crate::contract::{
    Executor, ExecutorCore, ExecutorError, ExecutorErrorCode, ExecutorKeys, ExecutionResult,
};

/// The SEARCH executor's closed capability set.
pub const SEARCH_CAPABILITIES: &[CapabilityId] = &[
    CapabilityId::SearchFiles,
    CapabilityId::SearchEmails,
    CapabilityId::SearchDatasets,
];

/// Maximum query length in Unicode code points.
const MAX_QUERY_CODE_POINTS: usize = 4096;

/// Bounds on `max_results`.
const MAX_RESULTS_CEILING: usize = 1000;

/// One entry of the ordered match list.
struct Match {
    id: String,
    match_field: String,
    match_text: String,
}

/// Reference executor for deterministic literal search.
pub struct SearchExecutor {
    core: ExecutorCore,
    scopes: SearchScopes,
}

impl SearchExecutor {
    /// Creates a SEARCH executor over a static scope table.
    #[must_use]
    pub fn new(scopes: SearchScopes, keys: ExecutorKeys) -> Self {
        Self {
            core: ExecutorCore::new(keys, SEARCH_CAPABILITIES),
            scopes,
        }
    }

    /// The executor's result verification key.
    #[must_use]
    pub fn result_verifying_key(&self) -> pda_core::crypto::VerifyingKey {
        self.core.result_verifying_key()
    }

    fn effect(&self, manifest: &TaskManifest) -> Result<Value, ExecutorError> {
        let query = Self::checked_query(manifest)?;
        let max_results = Self::checked_max_results(manifest)?;

        let target_scope = manifest
            .inputs
            .get("target_scope")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ExecutorError::new(ExecutorErrorCode::ScopeNotAllowed, "no target_scope bound")
            })?;
        let backing = self.scopes.get(target_scope).ok_or_else(|| {
            ExecutorError::new(
                ExecutorErrorCode::ScopeNotAllowed,
                format!("scope {target_scope:?} is not on the allowlist"),
            )
        })?;

        let matches = match (manifest.capability_id, backing) {
            (CapabilityId::SearchFiles, ScopeBacking::Files { root }) => {
                search_files(root, &query)?
            },
            (CapabilityId::SearchEmails, ScopeBacking::Emails { records }) => {
                search_emails(records, &query)
            },
            (CapabilityId::SearchDatasets, ScopeBacking::Datasets { records }) => {
                search_datasets(records, &query)
            },
            // Allowlisted scope, wrong kind of backing store for this
            // capability.
            _ => {
                return Err(ExecutorError::new(
                    ExecutorErrorCode::ScopeUnavailable,
                    format!(
                        "scope {target_scope:?} does not back {}",
                        manifest.capability_id
                    ),
                ));
            },
        };

        let count = matches.len();
        let truncated = count > max_results;
        let results: Vec<Value> = matches
            .into_iter()
            .take(max_results)
            .map(|m| {
                json!({
                    "id": m.id,
                    "match_field": m.match_field,
                    "snippet": snippet(&m.match_text, &query),
                })
            })
            .collect();

        Ok(json!({
            "target_scope": target_scope,
            "results": results,
            "count": count,
            "truncated": truncated,
        }))
    }

    /// Trims and NFC-normalizes the query, then enforces the 1..=4096
    /// code-point bound.
    fn checked_query(manifest: &TaskManifest) -> Result<String, ExecutorError> {
        let raw = manifest.inputs.get("query").map(String::as_str).ok_or_else(|| {
            ExecutorError::new(ExecutorErrorCode::InvalidQuery, "no query bound")
        })?;

        let normalized: String = raw.trim().nfc().collect();
        let code_points = normalized.chars().count();
        if code_points == 0 || code_points > MAX_QUERY_CODE_POINTS {
            return Err(ExecutorError::new(
                ExecutorErrorCode::InvalidQuery,
                format!("query must be 1..={MAX_QUERY_CODE_POINTS} code points, found {code_points}"),
            ));
        }
        Ok(normalized)
    }

    fn checked_max_results(manifest: &TaskManifest) -> Result<usize, ExecutorError> {
        let raw = manifest
            .inputs
            .get("max_results")
            .map(String::as_str)
            .ok_or_else(|| {
                ExecutorError::new(ExecutorErrorCode::InvalidQuery, "no max_results bound")
            })?;
        let value: usize = raw.parse().map_err(|_| {
            ExecutorError::new(
                ExecutorErrorCode::InvalidQuery,
                format!("max_results must be an integer, found {raw:?}"),
            )
        })?;
        if !(1..=MAX_RESULTS_CEILING).contains(&value) {
            return Err(ExecutorError::new(
                ExecutorErrorCode::InvalidQuery,
                format!("max_results must be in 1..={MAX_RESULTS_CEILING}, found {value}"),
            ));
        }
        Ok(value)
    }
}

impl Executor for SearchExecutor {
    fn capabilities(&self) -> &'static [CapabilityId] {
        SEARCH_CAPABILITIES
    }

    fn execute(
        &self,
        manifest: &TaskManifest,
        lease: &LeaseToken,
        now_ms: u64,
    ) -> ExecutionResult {
        self.core
            .run(manifest, lease, now_ms, || self.effect(manifest))
    }
}

impl std::fmt::Debug for SearchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchExecutor").finish_non_exhaustive()
    }
}

/// Walks the scope subtree and matches file names. Directories are visited
/// in code-point order of their entry names so iteration order is a
/// property of the tree, not of the filesystem driver. Symlinks are never
/// followed.
fn search_files(root: &Path, query: &str) -> Result<Vec<Match>, ExecutorError> {
    if !root.is_dir() {
        return Err(ExecutorError::new(
            ExecutorErrorCode::ScopeUnavailable,
            "scope root is not a directory",
        ));
    }

    let mut matches = Vec::new();
    walk(root, query, &mut matches)?;

    // Full ordered list first: code-point order of the file name, path as
    // the tie-break.
    matches.sort_by(|a, b| {
        a.match_text
            .cmp(&b.match_text)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(matches)
}

fn walk(dir: &Path, query: &str, matches: &mut Vec<Match>) -> Result<(), ExecutorError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ExecutorError::execution_failed(format!("read_dir failed: {e}")))?;

    let mut entries: Vec<_> = entries
        .collect::<Result<_, _>>()
        .map_err(|e| ExecutorError::execution_failed(format!("read_dir failed: {e}")))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let file_type = entry
            .file_type()
            .map_err(|e| ExecutorError::execution_failed(format!("stat failed: {e}")))?;
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            walk(&entry.path(), query, matches)?;
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            // Non-UTF-8 names cannot match a UTF-8 query.
            continue;
        };
        if name.contains(query) {
            matches.push(Match {
                id: entry.path().to_string_lossy().into_owned(),
                match_field: "filename".to_string(),
                match_text: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Matches email fields in the fixed order from, to, subject, body; sorts
/// by receive timestamp ascending with id as the tie-break. Records whose
/// timestamp does not parse are excluded entirely.
fn search_emails(records: &[EmailRecord], query: &str) -> Vec<Match> {
    let mut matched: Vec<(i64, Match)> = Vec::new();

    for record in records {
        let Ok(received) = DateTime::parse_from_rfc3339(&record.received_at) else {
            continue;
        };
        let ordered_fields = [
            ("from", &record.sender),
            ("to", &record.recipient),
            ("subject", &record.subject),
            ("body", &record.body),
        ];
        if let Some((field, text)) = ordered_fields.iter().find(|(_, v)| v.contains(query)) {
            matched.push((
                received.timestamp_millis(),
                Match {
                    id: record.id.clone(),
                    match_field: (*field).to_string(),
                    match_text: (*text).clone(),
                },
            ));
        }
    }

    matched.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    matched.into_iter().map(|(_, m)| m).collect()
}

/// Matches dataset string fields in lexicographic field order; sorts by
/// integer primary key ascending.
fn search_datasets(records: &[DatasetRecord], query: &str) -> Vec<Match> {
    let mut matched: Vec<(i64, Match)> = Vec::new();

    for record in records {
        if let Some((field, text)) = record.fields.iter().find(|(_, v)| v.contains(query)) {
            matched.push((
                record.id,
                Match {
                    id: record.id.to_string(),
                    match_field: field.clone(),
                    match_text: text.clone(),
                },
            ));
        }
    }

    matched.sort_by_key(|(id, _)| *id);
    matched.into_iter().map(|(_, m)| m).collect()
}
