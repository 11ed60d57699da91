//! Typed AST produced by the validator.
//!
//! Every enumerated set here is closed-world: the validator rejects anything
//! outside it, so downstream stages never see an unknown variant. Enum values
//! travel on the wire in their canonical SCREAMING case spelling via the
//! `as_str()`/`parse()` pairs.

use serde::{Deserialize, Serialize};

use super::error::{ValidationError, ValidationErrorCode};

/// Who is asking: a human principal or the system itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum SubjectType {
    /// A human principal.
    #[serde(rename = "USER")]
    User,
    /// The system acting on its own schedule.
    #[serde(rename = "SYSTEM")]
    System,
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SubjectType {
    /// Parses a subject type from its exact canonical spelling.
    ///
    /// Matches are case-sensitive; `"user"` is not a subject type.
    ///
    /// # Errors
    ///
    /// Returns `UNKNOWN_SUBJECT_TYPE` for any other input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "USER" => Ok(Self::User),
            "SYSTEM" => Ok(Self::System),
            other => Err(ValidationError::without_location(
                ValidationErrorCode::UnknownSubjectType,
                format!("unknown subject type: {other}"),
            )),
        }
    }

    /// Returns the canonical spelling of this subject type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::System => "SYSTEM",
        }
    }
}

/// The effect class of a verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum VerbClass {
    /// Changes state in place.
    #[serde(rename = "MUTATE")]
    Mutate,
    /// Derives new state from existing state.
    #[serde(rename = "TRANSFORM")]
    Transform,
    /// Moves state across a boundary.
    #[serde(rename = "DISSEMINATE")]
    Disseminate,
}

impl std::fmt::Display for VerbClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VerbClass {
    /// Parses a verb class from its exact canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns `UNKNOWN_VERB_CLASS` for any other input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "MUTATE" => Ok(Self::Mutate),
            "TRANSFORM" => Ok(Self::Transform),
            "DISSEMINATE" => Ok(Self::Disseminate),
            other => Err(ValidationError::without_location(
                ValidationErrorCode::UnknownVerbClass,
                format!("unknown verb class: {other}"),
            )),
        }
    }

    /// Returns the canonical spelling of this verb class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mutate => "MUTATE",
            Self::Transform => "TRANSFORM",
            Self::Disseminate => "DISSEMINATE",
        }
    }
}

/// The kind of entity a verb targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum ObjectType {
    /// A regular file.
    #[serde(rename = "FILE")]
    File,
    /// A directory.
    #[serde(rename = "FOLDER")]
    Folder,
    /// A mail message.
    #[serde(rename = "EMAIL")]
    Email,
    /// A structured record collection.
    #[serde(rename = "DATASET")]
    Dataset,
    /// A physical or virtual device.
    #[serde(rename = "DEVICE")]
    Device,
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ObjectType {
    /// Parses an object type from its exact canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns `UNKNOWN_OBJECT_TYPE` for any other input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "FILE" => Ok(Self::File),
            "FOLDER" => Ok(Self::Folder),
            "EMAIL" => Ok(Self::Email),
            "DATASET" => Ok(Self::Dataset),
            "DEVICE" => Ok(Self::Device),
            other => Err(ValidationError::without_location(
                ValidationErrorCode::UnknownObjectType,
                format!("unknown object type: {other}"),
            )),
        }
    }

    /// Returns the canonical spelling of this object type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Folder => "FOLDER",
            Self::Email => "EMAIL",
            Self::Dataset => "DATASET",
            Self::Device => "DEVICE",
        }
    }
}

/// Declared sensitivity of the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Sensitivity {
    /// Routine, low-impact action.
    #[serde(rename = "LOW")]
    Low,
    /// Action that warrants elevated trust.
    #[serde(rename = "MEDIUM")]
    Medium,
    /// Action that may require hardware-rooted confirmation.
    #[serde(rename = "HIGH")]
    High,
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Sensitivity {
    /// Parses a sensitivity level from its exact canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_METADATA_VALUE` for any other input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(ValidationError::without_location(
                ValidationErrorCode::InvalidMetadataValue,
                format!("invalid sensitivity value: {other}"),
            )),
        }
    }

    /// Returns the canonical spelling of this sensitivity level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// The `SUBJECT(type, id)` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectNode {
    /// Whether the subject is a user or the system.
    #[serde(rename = "type")]
    pub subject_type: SubjectType,

    /// Opaque principal identifier. No whitespace, no free-form text.
    pub identifier: String,
}

/// The `VERB(class, action)` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerbNode {
    /// Effect class of the action.
    #[serde(rename = "class")]
    pub verb_class: VerbClass,

    /// Action name. Charset `[A-Za-z0-9_-]`, validated by the grammar.
    pub action: String,
}

/// The `OBJECT(type, id)` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectNode {
    /// Kind of entity targeted.
    #[serde(rename = "type")]
    pub object_type: ObjectType,

    /// Opaque object identifier. May contain `/` for path-like targets.
    pub identifier: String,
}

/// The `META(scope, reversible, sensitivity, hrc_required)` block.
///
/// All four fields are mandatory. The validator supplies no defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataNode {
    /// Opaque scope identifier the host maps to a data source or subtree.
    pub scope: String,

    /// Whether the effect can be undone.
    pub reversible: bool,

    /// Declared sensitivity.
    pub sensitivity: Sensitivity,

    /// Whether hardware-rooted confirmation is required before leasing.
    pub hrc_required: bool,
}

/// The typed, normalized tree produced by [`validate`](super::validate).
///
/// Exactly one of each node; immutable once constructed. The canonical
/// serialization of this tree (see [`crate::canonical`]) is the sole input
/// to `task_id` derivation and provenance hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ast {
    /// Who is asking.
    pub subject: SubjectNode,

    /// What is to be done.
    pub verb: VerbNode,

    /// What it is done to.
    pub object: ObjectNode,

    /// Constraints the action carries through compilation and leasing.
    pub metadata: MetadataNode,
}
