//! Cryptographic primitives for the PDA kernel.
//!
//! This module provides the signing machinery behind leases and execution
//! results:
//!
//! - **SHA-256 hashing** for `task_id` and provenance digests
//! - **HMAC-SHA-256** lease signatures for self-contained deployments
//! - **Ed25519 signatures** for cross-trust-domain leases and for executor
//!   result signing
//! - **Length-prefixed wire encoding** so every signature binds its fields
//!   unambiguously
//!
//! # Determinism
//!
//! Nothing here uses a nonce: HMAC is a pure function of key and message,
//! and Ed25519 derives its nonce from the key and message. Identical inputs
//! always yield identical signatures, which the kernel's reproducibility
//! guarantees depend on.
//!
//! # Key Hygiene
//!
//! Secret material lives in zeroizing containers and never appears in
//! `Debug` output. Key generation is a setup-time concern; the decision
//! pipeline itself never generates anything.

mod mac;
mod scheme;
mod sign;
pub mod wire;

pub use mac::{LeaseMac, MAC_SIZE, MIN_SECRET_LEN};
pub use scheme::{LeaseSigner, LeaseVerifier};
pub use sign::{
    PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE, Signer, SignerError, VerifyingKey,
};

use std::fmt::Write as _;

/// Renders bytes as lower-case hex.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

/// Parses lower- or upper-case hex into bytes.
///
/// Returns `None` for odd lengths or non-hex characters; callers treat that
/// as a failed verification, never as an error to recover from.
#[must_use]
pub fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
