//! Reference SEARCH executor: `SEARCH_FILES`, `SEARCH_EMAILS`,
//! `SEARCH_DATASETS`.
//!
//! Matching is case-sensitive, literal substring over Unicode code points:
//! no stemming, no fuzziness, no ranking heuristics. The full ordered match
//! list is always computed first; `count` reports the total, `results`
//! carries the first `max_results`, and `truncated` says whether anything
//! was cut.
//!
//! # Ordering
//!
//! - files: code-point order of the file name (never following symlinks)
//! - emails: `received_at` ascending, then id; records without a parseable
//!   timestamp are excluded
//! - datasets: integer primary key ascending

mod executor;
mod scope;
mod snippet;


pub use executor::{SEARCH_CAPABILITIES, SearchExecutor};
pub use scope::{DatasetRecord, EmailRecord, ScopeBacking, SearchScopes};
