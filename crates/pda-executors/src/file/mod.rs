//! Reference FILE executor: `FILE_MOVE`, `FILE_COPY`, `FILE_DELETE`.
//!
//! # Path Discipline
//!
//! Every path must be absolute, UTF-8, and refer to a regular file strictly
//! inside one of the statically configured base directories. A `..`
//! component, a symlink at any position (before or after resolution), or a
//! non-regular target is an `EXECUTION_FAILED`; the executor never
//! follows a link and never steps outside its bases.
//!
//! # Reversibility
//!
//! `FILE_DELETE` refuses outright unless the manifest carries
//! `reversible = true`, and captures a full recovery record (content and
//! digest) before unlinking. Irreversible deletion is unrepresentable here;
//! the validator's Hard-No rule already rejects it upstream, and this
//! executor enforces it again independently.

mod executor;


pub use executor::{FILE_CAPABILITIES, FileExecutor, FileExecutorConfig};
