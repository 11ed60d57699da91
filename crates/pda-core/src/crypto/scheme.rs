//! Deployment-level choice of lease signature scheme.
//!
//! Exactly one scheme is fixed per deployment and carried through every
//! comparison:
//!
//! - **HMAC-SHA-256** for self-contained deployments where the kernel also
//!   invokes the executor. Signing and verification share the secret.
//! - **Ed25519** when executors run in a separate trust domain. The kernel
//!   holds the signing key; executors hold only the verifying key and can
//!   never mint leases of their own.
//!
//! Both schemes are nonce-free: identical inputs yield identical signatures.

use super::mac::LeaseMac;
use super::sign::{Signer, VerifyingKey};

/// Lease-signing material held by the kernel.
pub enum LeaseSigner {
    /// Shared-secret HMAC signing.
    Hmac(LeaseMac),
    /// Asymmetric Ed25519 signing.
    Ed25519(Signer),
}

impl LeaseSigner {
    /// Signs a wire message.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Hmac(mac) => mac.sign(message).to_vec(),
            Self::Ed25519(signer) => signer.sign(message).to_vec(),
        }
    }

    /// Returns the verification material executors should hold.
    ///
    /// In the HMAC scheme there is no separable verifier; callers clone the
    /// secret out-of-band. This returns the Ed25519 verifying key when the
    /// deployment has one.
    #[must_use]
    pub fn verifying_key(&self) -> Option<VerifyingKey> {
        match self {
            Self::Hmac(_) => None,
            Self::Ed25519(signer) => Some(signer.verifying_key()),
        }
    }
}

impl std::fmt::Debug for LeaseSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hmac(_) => f.write_str("LeaseSigner::Hmac"),
            Self::Ed25519(_) => f.write_str("LeaseSigner::Ed25519"),
        }
    }
}

/// Lease verification material held by executors.
///
/// The HMAC variant exists for self-contained deployments only; it
/// necessarily contains the shared secret. The Ed25519 variant is the
/// preferred cross-trust-domain shape: it cannot sign.
pub enum LeaseVerifier {
    /// Shared-secret verification (self-contained deployments).
    Hmac(LeaseMac),
    /// Public-key verification (separate trust domain).
    Ed25519(VerifyingKey),
}

impl LeaseVerifier {
    /// Verifies a signature over a wire message. Fails closed.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Hmac(mac) => mac.verify(message, signature),
            Self::Ed25519(key) => key.verify(message, signature),
        }
    }
}

impl std::fmt::Debug for LeaseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hmac(_) => f.write_str("LeaseVerifier::Hmac"),
            Self::Ed25519(_) => f.write_str("LeaseVerifier::Ed25519"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::wire::lease_message;
    use super::*;

    #[test]
    fn test_hmac_scheme_roundtrip() {
        let signer = LeaseSigner::Hmac(LeaseMac::new(vec![9u8; 32]).unwrap());
        let verifier = LeaseVerifier::Hmac(LeaseMac::new(vec![9u8; 32]).unwrap());

        let message = lease_message("task-1", 1000, 61_000);
        let signature = signer.sign(&message);
        assert!(verifier.verify(&message, &signature));
    }

    #[test]
    fn test_ed25519_scheme_roundtrip() {
        let keypair = Signer::generate();
        let verifier = LeaseVerifier::Ed25519(keypair.verifying_key());
        let signer = LeaseSigner::Ed25519(keypair);

        let message = lease_message("task-1", 1000, 61_000);
        let signature = signer.sign(&message);
        assert!(verifier.verify(&message, &signature));
    }

    #[test]
    fn test_schemes_do_not_cross_verify() {
        let keypair = Signer::generate();
        let ed_verifier = LeaseVerifier::Ed25519(keypair.verifying_key());
        let hmac_signer = LeaseSigner::Hmac(LeaseMac::new(vec![9u8; 32]).unwrap());

        let message = lease_message("task-1", 1000, 61_000);
        let signature = hmac_signer.sign(&message);
        assert!(!ed_verifier.verify(&message, &signature));
    }
}
