//! Reference MEDIA executor: `MEDIA_PLAY`, `MEDIA_PAUSE`, `MEDIA_STOP`,
//! `MEDIA_SEEK`.
//!
//! The executor validates inputs (explicit `media_uri` with no query
//! string, `target_device` on the static allowlist, non-negative integer
//! seek position) and hands the effect to the host adapter. There is no
//! content discovery, no download, and no inference of what the user
//! "meant" to play.

mod executor;

#[cfg(test)]
mod tests;

pub use executor::{MEDIA_CAPABILITIES, MediaExecutor, MediaExecutorConfig};
