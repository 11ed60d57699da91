//! # pda-executors
//!
//! Executor contract, host-adapter boundary, and the five reference
//! executors for the Personal Digital Authority.
//!
//! The kernel (`pda-core`) decides; executors perform. The boundary between
//! the two carries the security model: an executor receives a compiled
//! [`TaskManifest`](pda_core::manifest::TaskManifest) and a signed
//! [`LeaseToken`](pda_core::lease::LeaseToken), verifies both through its
//! pre-execution gate, performs exactly one side effect, and answers with a
//! result signed by its own key. Executors hold the kernel's verification
//! material only, never its signing key.
//!
//! ## Reference executors
//!
//! | family | capabilities |
//! |---|---|
//! | [`file`] | `FILE_MOVE`, `FILE_COPY`, `FILE_DELETE` |
//! | [`media`] | `MEDIA_PLAY`, `MEDIA_PAUSE`, `MEDIA_STOP`, `MEDIA_SEEK` |
//! | [`app_launch`] | `APP_LAUNCH`, `APP_FOCUS`, `APP_CLOSE` |
//! | [`navigation`] | `NAVIGATE_APP`, `NAVIGATE_WINDOW`, `NAVIGATE_URL`, `NAVIGATE_FILE` |
//! | [`search`] | `SEARCH_FILES`, `SEARCH_EMAILS`, `SEARCH_DATASETS` |
//!
//! Platform effects go through the narrow, synchronous [`host`] boundary;
//! the FILE and SEARCH executors are themselves the reference filesystem
//! binding, confined to statically configured roots.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod app_launch;
pub mod contract;
pub mod file;
pub mod host;
pub mod media;
pub mod navigation;
pub mod search;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::app_launch::AppLaunchExecutor;
    pub use crate::contract::{Executor, ExecutionResult, ExecutorError, ExecutorKeys, Outcome};
    pub use crate::file::FileExecutor;
    pub use crate::host::{HostAdapter, StaticHostAdapter};
    pub use crate::media::MediaExecutor;
    pub use crate::navigation::NavigationExecutor;
    pub use crate::search::SearchExecutor;
}

pub use contract::{Executor, ExecutionResult, ExecutorError, ExecutorErrorCode, ExecutorKeys};
