//! Lease-manager error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of lease-manager error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum LeaseErrorCode {
    /// The manifest is structurally unusable.
    #[serde(rename = "INVALID_MANIFEST")]
    InvalidManifest,
    /// The evaluation instant is outside the admissible window.
    #[serde(rename = "LEASE_EXPIRED")]
    LeaseExpired,
    /// The trust score does not meet the snapshot's minimum.
    #[serde(rename = "INSUFFICIENT_TRUST")]
    InsufficientTrust,
    /// Hardware-rooted confirmation is required and absent or unconfirmed.
    #[serde(rename = "HRC_REQUIRED")]
    HrcRequired,
    /// The task is on the revocation view.
    #[serde(rename = "LEASE_REVOKED")]
    LeaseRevoked,
}

impl LeaseErrorCode {
    /// Returns the stable wire spelling of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidManifest => "INVALID_MANIFEST",
            Self::LeaseExpired => "LEASE_EXPIRED",
            Self::InsufficientTrust => "INSUFFICIENT_TRUST",
            Self::HrcRequired => "HRC_REQUIRED",
            Self::LeaseRevoked => "LEASE_REVOKED",
        }
    }
}

impl std::fmt::Display for LeaseErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed denial from the lease manager.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[error("{code}: {message}")]
pub struct LeaseError {
    /// Stable error code from the lease manager's closed set.
    pub code: LeaseErrorCode,

    /// Human-readable description of the denial.
    pub message: String,
}

impl LeaseError {
    /// Creates a new lease denial.
    #[must_use]
    pub fn new(code: LeaseErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
