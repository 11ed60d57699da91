//! Ed25519 signing and verification wrappers.
//!
//! Used by the lease manager in the asymmetric deployment variant (kernel
//! signs, executors hold only the verifying key) and by executors to sign
//! their results. Signing is deterministic: Ed25519 derives its nonce from
//! the key and message, so identical inputs yield identical signatures.

use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, Verifier as _};
use thiserror::Error;
use zeroize::Zeroizing;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 secret key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// Errors that can occur while handling signing key material.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignerError {
    /// The provided bytes are not a valid public key.
    #[error("invalid public key: {message}")]
    InvalidPublicKey {
        /// Description of the parse failure.
        message: String,
    },

    /// The provided bytes have the wrong length for a key or signature.
    #[error("invalid length: expected {expected} bytes, found {found}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        found: usize,
    },
}

/// An Ed25519 signing key with its derived verifying key.
///
/// Key generation happens at setup time, outside the kernel's pure stages;
/// the kernel only ever signs with material loaded at startup.
pub struct Signer {
    signing_key: SigningKey,
}

impl Signer {
    /// Generates a fresh keypair from the operating system RNG.
    ///
    /// Setup-time only. Nothing inside the decision pipeline calls this.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Reconstructs a signer from secret key bytes.
    #[must_use]
    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Returns the secret key bytes in a zeroizing container.
    #[must_use]
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_SIZE]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Returns the verifying key for this signer.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            key: self.signing_key.verifying_key(),
        }
    }

    /// Signs a message, returning the 64-byte signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

/// An Ed25519 verifying (public) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyingKey {
    key: ed25519_dalek::VerifyingKey,
}

impl VerifyingKey {
    /// Parses a verifying key from its 32-byte encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidPublicKey`] if the bytes are not a
    /// valid curve point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, SignerError> {
        ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map(|key| Self { key })
            .map_err(|e| SignerError::InvalidPublicKey {
                message: e.to_string(),
            })
    }

    /// Returns the 32-byte encoding of this key.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.key.to_bytes()
    }

    /// Verifies a signature over a message.
    ///
    /// Malformed signatures verify as false; verification never errors.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; SIGNATURE_SIZE]>::try_from(signature) else {
            return false;
        };
        let signature = DalekSignature::from_bytes(&sig_bytes);
        self.key.verify(message, &signature).is_ok()
    }
}
