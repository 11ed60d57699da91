//! APP_LAUNCH executor implementation.

use std::collections::BTreeSet;

use pda_core::compiler::CapabilityId;
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::{Value, json};

use crate::contract::{
    Executor, ExecutorCore, ExecutorError, ExecutorKeys, ExecutionResult,
};
use crate::host::{EffectOutcome, EffectRequest, HostAdapter, TargetEnvironment};

/// The APP_LAUNCH executor's closed capability set.
pub const APP_CAPABILITIES: &[CapabilityId] = &[
    CapabilityId::AppLaunch,
    CapabilityId::AppFocus,
    CapabilityId::AppClose,
];

/// What APP_LAUNCH does when the app is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlreadyRunningPolicy {
    /// Bring the running instance to the front.
    BringToFront,
    /// Do nothing and report `no_op`.
    NoOp,
}

/// The build-time launch policy. Fixed forever; changing it is a new
/// deployment, not a configuration edit.
pub const ON_ALREADY_RUNNING: AlreadyRunningPolicy = AlreadyRunningPolicy::BringToFront;

/// Static configuration for the APP_LAUNCH executor.
#[derive(Debug, Clone)]
pub struct AppLaunchExecutorConfig {
    /// Applications that may be launched, focused, or closed. Exact match.
    pub app_allowlist: BTreeSet<String>,
}

/// Reference executor for application lifecycle operations.
pub struct AppLaunchExecutor<H> {
    core: ExecutorCore,
    config: AppLaunchExecutorConfig,
    host: H,
}

impl<H: HostAdapter> AppLaunchExecutor<H> {
    /// Creates an APP_LAUNCH executor over a host adapter.
    #[must_use]
    pub fn new(config: AppLaunchExecutorConfig, keys: ExecutorKeys, host: H) -> Self {
        Self {
            core: ExecutorCore::new(keys, APP_CAPABILITIES),
            config,
            host,
        }
    }

    /// The executor's result verification key.
    #[must_use]
    pub fn result_verifying_key(&self) -> pda_core::crypto::VerifyingKey {
        self.core.result_verifying_key()
    }

    fn effect(&self, manifest: &TaskManifest) -> Result<Value, ExecutorError> {
        let app_id = required(manifest, "app_id")?;
        let environment_raw = required(manifest, "target_environment")?;

        if !self.config.app_allowlist.contains(app_id) {
            return Err(ExecutorError::execution_failed(format!(
                "app {app_id:?} is not on the allowlist"
            )));
        }
        let environment = TargetEnvironment::parse(environment_raw).ok_or_else(|| {
            ExecutorError::execution_failed(format!(
                "target_environment must be desktop, mobile, or tv; found {environment_raw:?}"
            ))
        })?;

        let (request, reported) = match manifest.capability_id {
            CapabilityId::AppLaunch => {
                if self.host.app_is_running(app_id, environment) {
                    match ON_ALREADY_RUNNING {
                        AlreadyRunningPolicy::BringToFront => (
                            EffectRequest::AppFocus {
                                app_id,
                                environment,
                            },
                            "brought_to_front",
                        ),
                        AlreadyRunningPolicy::NoOp => {
                            return Ok(json!({
                                "app": app_id,
                                "environment": environment_raw,
                                "status": "no_op",
                            }));
                        },
                    }
                } else {
                    (
                        EffectRequest::AppLaunch {
                            app_id,
                            environment,
                        },
                        "launched",
                    )
                }
            },
            CapabilityId::AppFocus => (
                EffectRequest::AppFocus {
                    app_id,
                    environment,
                },
                "focused",
            ),
            CapabilityId::AppClose => (
                EffectRequest::AppClose {
                    app_id,
                    environment,
                },
                "closed",
            ),
            other => {
                return Err(ExecutorError::execution_failed(format!(
                    "capability {other} is not an app operation"
                )));
            },
        };

        match self.host.perform(request) {
            EffectOutcome::Success => Ok(json!({
                "app": app_id,
                "environment": environment_raw,
                "status": reported,
            })),
            EffectOutcome::NoOp => Ok(json!({
                "app": app_id,
                "environment": environment_raw,
                "status": "no_op",
            })),
            EffectOutcome::NavigationBlocked | EffectOutcome::Failed => Err(
                ExecutorError::execution_failed("host refused the app effect"),
            ),
        }
    }
}

impl<H: HostAdapter> Executor for AppLaunchExecutor<H> {
    fn capabilities(&self) -> &'static [CapabilityId] {
        APP_CAPABILITIES
    }

    fn execute(
        &self,
        manifest: &TaskManifest,
        lease: &LeaseToken,
        now_ms: u64,
    ) -> ExecutionResult {
        self.core
            .run(manifest, lease, now_ms, || self.effect(manifest))
    }
}

impl<H> std::fmt::Debug for AppLaunchExecutor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLaunchExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn required<'a>(manifest: &'a TaskManifest, key: &str) -> Result<&'a str, ExecutorError> {
    manifest
        .inputs
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExecutorError::execution_failed(format!("missing required input {key:?}")))
}
