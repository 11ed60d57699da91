//! Signed execution results.
//!
//! Every result, success or failure alike, is signed by the executor over the
//! length-prefixed message `task_id ‖ capability_id ‖ status ‖
//! canonical(output|error)`. The kernel rejects unsigned or unverifiable
//! results, so a forged or tampered result never reaches the caller as
//! authentic.

use pda_core::canonical::to_canonical_string;
use pda_core::compiler::CapabilityId;
use pda_core::crypto::{Signer, VerifyingKey, decode_hex, encode_hex, wire};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ExecutorError;

/// The mutually exclusive outcome of an execution.
///
/// `output` is present iff the status is SUCCESS, `error` iff FAILURE; the
/// sum type makes any other combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Outcome {
    /// The effect completed; `output` is the capability-specific payload.
    #[serde(rename = "SUCCESS")]
    Success {
        /// Structured, capability-specific output.
        output: Value,
    },
    /// The effect did not complete; `error` explains why.
    #[serde(rename = "FAILURE")]
    Failure {
        /// The typed failure.
        error: ExecutorError,
    },
}

impl Outcome {
    /// Returns the wire spelling of the status discriminant.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Success { .. } => "SUCCESS",
            Self::Failure { .. } => "FAILURE",
        }
    }

    /// Returns true for a success outcome.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A signed execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The task this result answers.
    pub task_id: String,

    /// The capability that produced it.
    pub capability_id: CapabilityId,

    /// Success or failure, with the corresponding payload.
    #[serde(flatten)]
    pub outcome: Outcome,

    /// Executor signature over the result message, lower-case hex.
    pub signature: String,
}

impl ExecutionResult {
    /// Builds and signs a success result.
    ///
    /// If the output cannot be canonicalized (it contains a float, which nothing
    /// a conforming executor produces), the result degrades to a signed
    /// `EXECUTION_FAILED` so the caller still receives a verifiable answer.
    #[must_use]
    pub fn success(
        task_id: &str,
        capability_id: CapabilityId,
        output: Value,
        signer: &Signer,
    ) -> Self {
        match to_canonical_string(&output) {
            Ok(canonical) => {
                let signature = sign_payload(task_id, capability_id, "SUCCESS", &canonical, signer);
                Self {
                    task_id: task_id.to_string(),
                    capability_id,
                    outcome: Outcome::Success { output },
                    signature,
                }
            },
            Err(e) => Self::failure(
                task_id,
                capability_id,
                ExecutorError::execution_failed(format!("output canonicalization failed: {e}")),
                signer,
            ),
        }
    }

    /// Builds and signs a failure result.
    #[must_use]
    pub fn failure(
        task_id: &str,
        capability_id: CapabilityId,
        error: ExecutorError,
        signer: &Signer,
    ) -> Self {
        let canonical = canonical_error(&error);
        let signature = sign_payload(task_id, capability_id, "FAILURE", &canonical, signer);
        Self {
            task_id: task_id.to_string(),
            capability_id,
            outcome: Outcome::Failure { error },
            signature,
        }
    }

    /// Verifies this result's signature against the executor's public key.
    ///
    /// Fails closed: malformed signatures and non-canonical payloads verify
    /// as false.
    #[must_use]
    pub fn verify(&self, key: &VerifyingKey) -> bool {
        let canonical = match &self.outcome {
            Outcome::Success { output } => match to_canonical_string(output) {
                Ok(c) => c,
                Err(_) => return false,
            },
            Outcome::Failure { error } => canonical_error(error),
        };
        let message = wire::result_message(
            &self.task_id,
            self.capability_id.as_str(),
            self.outcome.status_str(),
            &canonical,
        );
        let Some(signature) = decode_hex(&self.signature) else {
            return false;
        };
        key.verify(&message, &signature)
    }
}

fn canonical_error(error: &ExecutorError) -> String {
    // An ExecutorError is two strings; canonicalization cannot fail.
    let value = serde_json::json!({
        "error_code": error.code.as_str(),
        "message": error.message,
    });
    to_canonical_string(&value).unwrap_or_default()
}

fn sign_payload(
    task_id: &str,
    capability_id: CapabilityId,
    status: &str,
    canonical_payload: &str,
    signer: &Signer,
) -> String {
    let message = wire::result_message(task_id, capability_id.as_str(), status, canonical_payload);
    encode_hex(&signer.sign(&message))
}
