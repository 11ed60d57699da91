//! Reference APP_LAUNCH executor: `APP_LAUNCH`, `APP_FOCUS`, `APP_CLOSE`.
//!
//! `app_id` must exactly match a static allowlist entry and
//! `target_environment` is one of desktop, mobile, tv. Launching an app
//! that is already running brings it to the front, a build-time policy
//! (see [`executor::ON_ALREADY_RUNNING`]) that never varies at runtime.
//! Closing is graceful only; a force-kill is not expressible through the
//! host-adapter request type.

mod executor;

#[cfg(test)]
mod tests;

pub use executor::{
    APP_CAPABILITIES, AlreadyRunningPolicy, AppLaunchExecutor, AppLaunchExecutorConfig,
    ON_ALREADY_RUNNING,
};
