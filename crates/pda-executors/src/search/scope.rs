//! Scope table and record types for the SEARCH executor.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A mail message visible to `SEARCH_EMAILS`.
///
/// `received_at` is RFC 3339; a record whose timestamp does not parse is
/// excluded from every search rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailRecord {
    /// Stable message identifier.
    pub id: String,

    /// RFC 3339 receive timestamp, e.g. `2026-03-01T10:15:00Z`.
    pub received_at: String,

    /// Sender address.
    #[serde(rename = "from")]
    pub sender: String,

    /// Recipient address.
    #[serde(rename = "to")]
    pub recipient: String,

    /// Subject line.
    pub subject: String,

    /// Message body.
    pub body: String,
}

/// A dataset row visible to `SEARCH_DATASETS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetRecord {
    /// Integer primary key; the sort key for dataset results.
    pub id: i64,

    /// String fields, searched in lexicographic field order.
    pub fields: BTreeMap<String, String>,
}

/// What a scope name resolves to.
#[derive(Debug, Clone)]
pub enum ScopeBacking {
    /// A filesystem subtree searched by file name.
    Files {
        /// Root directory of the subtree.
        root: PathBuf,
    },
    /// An in-memory mailbox snapshot.
    Emails {
        /// The messages, in source order.
        records: Vec<EmailRecord>,
    },
    /// An in-memory dataset snapshot.
    Datasets {
        /// The rows, in source order.
        records: Vec<DatasetRecord>,
    },
}

/// The static scope allowlist: scope name to backing store.
///
/// Loaded once at startup; a scope name outside this table is
/// `SCOPE_NOT_ALLOWED` no matter what it is.
#[derive(Debug, Clone, Default)]
pub struct SearchScopes {
    scopes: BTreeMap<String, ScopeBacking>,
}

impl SearchScopes {
    /// Creates an empty scope table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope. The last registration for a name wins.
    pub fn insert(&mut self, name: impl Into<String>, backing: ScopeBacking) {
        self.scopes.insert(name.into(), backing);
    }

    /// Returns the backing for a scope name, if allowlisted.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScopeBacking> {
        self.scopes.get(name)
    }
}
