//! Lease management: time-bounded execution authority.
//!
//! The lease manager is the kernel's decision point. It consumes a compiled
//! manifest plus read-only snapshots of trust and revocation state, and
//! either issues a signed [`LeaseToken`] or denies with a typed reason.
//!
//! # Pipeline
//!
//! ```text
//! TaskManifest + TrustSnapshot + now + HrcToken?
//!     |
//!     v
//! integrity -> time window -> trust -> HRC -> revocation
//!     |
//!     v
//! LeaseToken { task_id, issued_at, expires_at, signature }
//! ```
//!
//! # Security Properties
//!
//! - **Fail-closed**: every check denies on doubt; a NaN trust score is a
//!   denial, not a panic.
//! - **Read-only inputs**: the manager never writes to the trust matrix or
//!   the revocation view.
//! - **Deterministic issuance**: signatures carry no nonce; the same
//!   `(manifest, now)` yields the same token bytes.
//! - **Inert outside its window**: `[issued_at, expires_at)` bounds the
//!   token's authority regardless of signature validity.

mod error;
mod manager;
mod token;


pub use error::{LeaseError, LeaseErrorCode};
pub use manager::{DEFAULT_LEASE_DURATION_MS, LeaseManager, RevocationSnapshot};
pub use token::LeaseToken;
