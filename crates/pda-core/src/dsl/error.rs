//! Validator-specific error types.
//!
//! The validator is the only stage that reports a source location: lexing
//! and parsing know where in the statement text they stopped, later stages
//! do not.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of validator error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum ValidationErrorCode {
    /// The statement text does not conform to the grammar.
    #[serde(rename = "SYNTAX_ERROR")]
    SyntaxError,
    /// Subject type outside {USER, SYSTEM}.
    #[serde(rename = "UNKNOWN_SUBJECT_TYPE")]
    UnknownSubjectType,
    /// Object type outside {FILE, FOLDER, EMAIL, DATASET, DEVICE}.
    #[serde(rename = "UNKNOWN_OBJECT_TYPE")]
    UnknownObjectType,
    /// Verb class outside {MUTATE, TRANSFORM, DISSEMINATE}.
    #[serde(rename = "UNKNOWN_VERB_CLASS")]
    UnknownVerbClass,
    /// A required block or metadata field is absent or empty.
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// A metadata value is outside its closed set.
    #[serde(rename = "INVALID_METADATA_VALUE")]
    InvalidMetadataValue,
    /// The scope is empty or names more than one scope.
    #[serde(rename = "AMBIGUOUS_SCOPE")]
    AmbiguousScope,
    /// An absolute invariant was violated; trust cannot override this.
    #[serde(rename = "HARD_NO_VIOLATION")]
    HardNoViolation,
}

impl ValidationErrorCode {
    /// Returns the stable wire spelling of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::UnknownSubjectType => "UNKNOWN_SUBJECT_TYPE",
            Self::UnknownObjectType => "UNKNOWN_OBJECT_TYPE",
            Self::UnknownVerbClass => "UNKNOWN_VERB_CLASS",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::InvalidMetadataValue => "INVALID_METADATA_VALUE",
            Self::AmbiguousScope => "AMBIGUOUS_SCOPE",
            Self::HardNoViolation => "HARD_NO_VIOLATION",
        }
    }
}

impl std::fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of the offending token in the statement text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

/// A typed rejection from the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[error("{code}: {message}")]
pub struct ValidationError {
    /// Stable error code from the validator's closed set.
    pub code: ValidationErrorCode,

    /// Human-readable description of the rejection.
    pub message: String,

    /// Where in the statement the failure was detected, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ValidationError {
    /// Creates an error anchored at a source location.
    #[must_use]
    pub fn at(
        code: ValidationErrorCode,
        message: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            location: Some(Location { line, column }),
        }
    }

    /// Creates an error with no source location.
    ///
    /// Used by stages past parsing, where the offending token is no longer
    /// tied to a position in the input text.
    #[must_use]
    pub fn without_location(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }
}
