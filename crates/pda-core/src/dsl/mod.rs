//! Statement language validation.
//!
//! This module turns textual intent into the typed [`Ast`] consumed by the
//! blueprint compiler. A statement is four blocks in fixed order:
//!
//! ```text
//! SUBJECT(type, id) VERB(class, action) OBJECT(type, id)
//! META(scope, reversible, sensitivity, hrc_required)
//! ```
//!
//! # Pipeline
//!
//! Validation runs in strict order and halts on the first failure:
//!
//! 1. lex + parse (`SYNTAX_ERROR` with line/column)
//! 2. structure: exactly one of each block (`MISSING_REQUIRED_FIELD`)
//! 3. enums (`UNKNOWN_SUBJECT_TYPE`, `UNKNOWN_OBJECT_TYPE`,
//!    `UNKNOWN_VERB_CLASS`, `INVALID_METADATA_VALUE`)
//! 4. completeness (`MISSING_REQUIRED_FIELD`)
//! 5. scope sanity (`AMBIGUOUS_SCOPE`)
//! 6. Hard-No invariants (`HARD_NO_VIOLATION`)
//!
//! # Security Properties
//!
//! - **Closed world**: every enumerated set is exhaustive; unknown values
//!   are rejections, never fall-through defaults.
//! - **Hard-No precedence**: a statement that trips a Hard-No rule is
//!   rejected before trust or confirmation are ever consulted.
//! - **No heuristics**: the validator never guesses, corrects, or infers.

mod ast;
mod error;
mod hard_no;
mod lexer;
mod validator;

#[cfg(test)]
mod tests;

pub use ast::{
    Ast, MetadataNode, ObjectNode, ObjectType, SubjectNode, SubjectType, Sensitivity, VerbClass,
    VerbNode,
};
pub use error::{Location, ValidationError, ValidationErrorCode};
pub use hard_no::{
    CREDENTIAL_ACTIONS, CREDENTIAL_IDENTIFIER_PREFIXES, DELETE_ACTIONS, FINANCIAL_ACTIONS,
};
pub use validator::validate;
