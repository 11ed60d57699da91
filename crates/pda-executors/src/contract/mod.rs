//! The executor contract: gate, idempotency, and signed-result discipline.
//!
//! An executor is a sandboxed, non-authoritative performer of side effects
//! for exactly one capability family. Its obligations, in order:
//!
//! 1. run the pre-execution gate (lease signature, binding, window,
//!    capability set);
//! 2. return a completed task's recorded result verbatim instead of
//!    re-performing the effect;
//! 3. validate inputs against the capability schema;
//! 4. perform the effect synchronously;
//! 5. sign the result, success or failure alike, with its own key.
//!
//! # Security Properties
//!
//! - **Lease binding**: no SUCCESS ever leaves an executor when the lease
//!   is unbound or outside its window, signature validity notwithstanding.
//! - **Idempotency**: `task_id` is the idempotency key; irreversible
//!   effects never reoccur.
//! - **Non-authority**: executors hold the kernel's verification material
//!   only; they cannot mint authority, and they never attempt
//!   self-extension of a dying lease.

mod error;
mod executor;
mod gate;
mod idempotency;
mod result;

pub use executor::{Executor, ExecutorCore, ExecutorKeys};
pub use error::{ExecutorError, ExecutorErrorCode};
pub use gate::pre_execution_gate;
pub use idempotency::IdempotencyCache;
pub use result::{ExecutionResult, Outcome};
