//! Idempotency cache: `task_id` deduplicates re-execution.
//!
//! Lock poisoning indicates a panic in another thread, which is
//! unrecoverable.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::RwLock;

use super::result::ExecutionResult;

/// In-memory store of completed, signed results keyed by `task_id`.
///
/// Only success results are recorded: a completed effect must not reoccur,
/// while a failed gate or effect simply reports again. The store is opaque
/// to everyone but its executor; the kernel persists nothing.
///
/// Lock poisoning would indicate a panic in another thread mid-insert; the
/// cache treats that as unrecoverable and propagates the panic.
#[derive(Debug, Default)]
pub struct IdempotencyCache {
    completed: RwLock<HashMap<String, ExecutionResult>>,
}

impl IdempotencyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previously recorded result for a task, verbatim.
    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<ExecutionResult> {
        self.completed.read().unwrap().get(task_id).cloned()
    }

    /// Records a completed result. The first recording wins; a concurrent
    /// duplicate is dropped so re-execution can never overwrite history.
    pub fn record(&self, result: &ExecutionResult) {
        self.completed
            .write()
            .unwrap()
            .entry(result.task_id.clone())
            .or_insert_with(|| result.clone());
    }
}
