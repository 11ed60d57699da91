//! HMAC-SHA-256 lease signatures for self-contained deployments.
//!
//! When the kernel and its executors share a process (and therefore a trust
//! domain), lease signatures use a shared secret instead of an asymmetric
//! keypair. Verification compares in constant time.

#![allow(clippy::missing_panics_doc)]

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Size of an HMAC-SHA-256 tag in bytes.
pub const MAC_SIZE: usize = 32;

/// Minimum accepted secret length in bytes.
///
/// Shorter secrets weaken the MAC below its design strength.
pub const MIN_SECRET_LEN: usize = 32;

/// A shared-secret MAC keyed for lease signing.
///
/// The secret lives in a [`SecretBox`] and is zeroized on drop.
pub struct LeaseMac {
    secret: SecretBox<Vec<u8>>,
}

impl LeaseMac {
    /// Creates a MAC from a shared secret.
    ///
    /// Returns `None` if the secret is shorter than [`MIN_SECRET_LEN`].
    #[must_use]
    pub fn new(secret: Vec<u8>) -> Option<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return None;
        }
        Some(Self {
            secret: SecretBox::new(Box::new(secret)),
        })
    }

    /// Computes the tag for a message.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; MAC_SIZE] {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret())
            .expect("HMAC accepts keys of any length");
        mac.update(message);
        mac.finalize().into_bytes().into()
    }

    /// Verifies a tag in constant time.
    #[must_use]
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> bool {
        let expected = self.sign(message);
        if tag.len() != MAC_SIZE {
            return false;
        }
        expected[..].ct_eq(tag).into()
    }
}

impl std::fmt::Debug for LeaseMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("LeaseMac").finish_non_exhaustive()
    }
}
