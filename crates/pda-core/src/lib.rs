//! # pda-core
//!
//! Deterministic kernel for the Personal Digital Authority (PDA).
//!
//! The PDA lets a human delegate bounded digital tasks to a deterministic
//! kernel. Natural-language parsing happens outside the system; this crate
//! consumes a typed action language and decides what may execute, under what
//! constraints, with what authority.
//!
//! ## Pipeline
//!
//! Data flows strictly forward, leaves first:
//!
//! ```text
//! DSL text --> Validator --> Ast --> Compiler --> TaskManifest --> LeaseManager --> LeaseToken
//! ```
//!
//! Every stage in this crate is a pure function: no I/O, no clocks, no
//! randomness, no logging. Identical inputs yield byte-identical outputs,
//! including signatures.
//!
//! ## Example
//!
//! ```rust
//! use pda_core::compiler::{AuxInputs, compile};
//! use pda_core::dsl::validate;
//!
//! let ast = validate(
//!     "SUBJECT(USER,alice) VERB(MUTATE,MOVE) OBJECT(FILE,/home/alice/in/a.txt) \
//!      META(home,true,LOW,false)",
//! )
//! .expect("statement is well-formed");
//!
//! let mut aux = AuxInputs::new();
//! aux.insert("destination_path", "/home/alice/out/a.txt");
//! let manifest = compile(&ast, &aux).expect("capability resolves");
//! assert_eq!(manifest.capability_id.as_str(), "FILE_MOVE");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod compiler;
pub mod crypto;
pub mod dsl;
pub mod lease;
pub mod manifest;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compiler::{AuxInputs, CapabilityId, compile};
    pub use crate::dsl::{Ast, validate};
    pub use crate::lease::{LeaseManager, LeaseToken};
    pub use crate::manifest::{HrcToken, TaskManifest, TrustSnapshot};
}

/// Re-export commonly used types at the crate root.
pub use compiler::CapabilityId;
pub use dsl::Ast;
pub use lease::LeaseToken;
pub use manifest::TaskManifest;
