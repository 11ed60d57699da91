//! The lease token: time-bounded execution authority for one task.

use serde::{Deserialize, Serialize};

use crate::crypto::wire;

/// Cryptographically verifiable, time-bounded authorization for exactly one
/// task.
///
/// The token binds to one manifest through `task_id` and is inert outside
/// `[issued_at, expires_at)` regardless of signature validity. It is not
/// transferable: there is nothing in it an executor could rebind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaseToken {
    /// The task this lease authorizes.
    pub task_id: String,

    /// Issuance instant, milliseconds since the Unix epoch.
    pub issued_at: u64,

    /// Expiry instant (exclusive), milliseconds since the Unix epoch.
    pub expires_at: u64,

    /// Signature over the lease wire message, lower-case hex.
    pub signature: String,
}

impl LeaseToken {
    /// Returns the canonical signing message for this token's fields.
    #[must_use]
    pub fn signing_message(&self) -> Vec<u8> {
        wire::lease_message(&self.task_id, self.issued_at, self.expires_at)
    }

    /// Returns true if the lease window contains `now_ms`.
    ///
    /// This is a time check only; signature validity is a separate,
    /// independent question.
    #[must_use]
    pub const fn window_contains(&self, now_ms: u64) -> bool {
        self.issued_at <= now_ms && now_ms < self.expires_at
    }
}
