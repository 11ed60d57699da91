//! Reference NAVIGATION executor: `NAVIGATE_APP`, `NAVIGATE_WINDOW`,
//! `NAVIGATE_URL`, `NAVIGATE_FILE`.
//!
//! Target resolution is delegated to the host adapter; the executor only
//! judges inputs and maps the adapter's result codes onto the failure
//! taxonomy: unresolved targets are `TARGET_NOT_FOUND`, resolvable but
//! unpermitted targets are `TARGET_NOT_ACCESSIBLE`, and refused
//! navigations (such as an unsupported URL scheme) are
//! `NAVIGATION_BLOCKED`.

mod executor;

#[cfg(test)]
mod tests;

pub use executor::{NAVIGATION_CAPABILITIES, NavigationExecutor};
