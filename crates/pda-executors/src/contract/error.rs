//! The executor failure taxonomy.
//!
//! The shared codes apply to every executor; the capability-specific codes
//! are listed here too because the taxonomy is closed system-wide: an
//! executor may only fail with a code from this set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of executor error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum ExecutorErrorCode {
    /// Lease signature invalid or lease not bound to this manifest.
    #[serde(rename = "INVALID_LEASE")]
    InvalidLease,
    /// The lease window does not contain the execution instant.
    #[serde(rename = "LEASE_EXPIRED")]
    LeaseExpired,
    /// The capability is outside this executor's closed set.
    #[serde(rename = "UNSUPPORTED_CAPABILITY")]
    UnsupportedCapability,
    /// The effect could not be performed.
    #[serde(rename = "EXECUTION_FAILED")]
    ExecutionFailed,
    /// The host sandbox terminated the executor for breaching a resource cap.
    #[serde(rename = "RESOURCE_EXHAUSTED")]
    ResourceExhausted,
    /// The search query is malformed or out of bounds.
    #[serde(rename = "INVALID_QUERY")]
    InvalidQuery,
    /// The scope is not on the static allowlist.
    #[serde(rename = "SCOPE_NOT_ALLOWED")]
    ScopeNotAllowed,
    /// The scope is allowlisted but its backing store is absent.
    #[serde(rename = "SCOPE_UNAVAILABLE")]
    ScopeUnavailable,
    /// The navigation target did not resolve.
    #[serde(rename = "TARGET_NOT_FOUND")]
    TargetNotFound,
    /// The navigation target resolved but is not permitted.
    #[serde(rename = "TARGET_NOT_ACCESSIBLE")]
    TargetNotAccessible,
    /// The navigation was refused (e.g. unsupported URL scheme).
    #[serde(rename = "NAVIGATION_BLOCKED")]
    NavigationBlocked,
}

impl ExecutorErrorCode {
    /// Returns the stable wire spelling of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidLease => "INVALID_LEASE",
            Self::LeaseExpired => "LEASE_EXPIRED",
            Self::UnsupportedCapability => "UNSUPPORTED_CAPABILITY",
            Self::ExecutionFailed => "EXECUTION_FAILED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::ScopeNotAllowed => "SCOPE_NOT_ALLOWED",
            Self::ScopeUnavailable => "SCOPE_UNAVAILABLE",
            Self::TargetNotFound => "TARGET_NOT_FOUND",
            Self::TargetNotAccessible => "TARGET_NOT_ACCESSIBLE",
            Self::NavigationBlocked => "NAVIGATION_BLOCKED",
        }
    }
}

impl std::fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed executor failure, carried inside a signed FAILURE result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[error("{code}: {message}")]
pub struct ExecutorError {
    /// Stable error code from the executor taxonomy.
    #[serde(rename = "error_code")]
    pub code: ExecutorErrorCode,

    /// Human-readable description of the failure.
    pub message: String,
}

impl ExecutorError {
    /// Creates a new executor failure.
    #[must_use]
    pub fn new(code: ExecutorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for an `EXECUTION_FAILED` failure.
    #[must_use]
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorCode::ExecutionFailed, message)
    }
}
