//! Compiler-specific error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of compiler error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum CompileErrorCode {
    /// The `(verb.class, object.type, verb.action)` triple is not in the
    /// capability table.
    #[serde(rename = "UNKNOWN_CAPABILITY")]
    UnknownCapability,
    /// The triple is registered but the action is malformed for the target
    /// capability.
    #[serde(rename = "UNSUPPORTED_ACTION")]
    UnsupportedAction,
    /// A required input key of the resolved capability has no value.
    #[serde(rename = "INVALID_BINDING")]
    InvalidBinding,
    /// Internal failure while canonicalizing the AST.
    #[serde(rename = "COMPILATION_FAILURE")]
    CompilationFailure,
}

impl CompileErrorCode {
    /// Returns the stable wire spelling of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCapability => "UNKNOWN_CAPABILITY",
            Self::UnsupportedAction => "UNSUPPORTED_ACTION",
            Self::InvalidBinding => "INVALID_BINDING",
            Self::CompilationFailure => "COMPILATION_FAILURE",
        }
    }
}

impl std::fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed rejection from the blueprint compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[error("{code}: {message}")]
pub struct CompileError {
    /// Stable error code from the compiler's closed set.
    pub code: CompileErrorCode,

    /// Human-readable description of the rejection.
    pub message: String,
}

impl CompileError {
    /// Creates a new compile error.
    #[must_use]
    pub fn new(code: CompileErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
