//! NAVIGATION executor implementation.

use pda_core::compiler::CapabilityId;
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::{Value, json};

use crate::contract::{
    Executor, ExecutorCore, ExecutorError, ExecutorErrorCode, ExecutorKeys, ExecutionResult,
};
use crate::host::{
    EffectOutcome, EffectRequest, FocusPolicy, HostAdapter, NavigationMode, TargetResolution,
    TargetType,
};

/// The NAVIGATION executor's closed capability set.
pub const NAVIGATION_CAPABILITIES: &[CapabilityId] = &[
    CapabilityId::NavigateApp,
    CapabilityId::NavigateWindow,
    CapabilityId::NavigateUrl,
    CapabilityId::NavigateFile,
];

/// Reference executor for deterministic navigation.
pub struct NavigationExecutor<H> {
    core: ExecutorCore,
    host: H,
}

impl<H: HostAdapter> NavigationExecutor<H> {
    /// Creates a NAVIGATION executor over a host adapter.
    #[must_use]
    pub fn new(keys: ExecutorKeys, host: H) -> Self {
        Self {
            core: ExecutorCore::new(keys, NAVIGATION_CAPABILITIES),
            host,
        }
    }

    /// The executor's result verification key.
    #[must_use]
    pub fn result_verifying_key(&self) -> pda_core::crypto::VerifyingKey {
        self.core.result_verifying_key()
    }

    /// The target type each capability is fixed to.
    const fn expected_target_type(capability: CapabilityId) -> Option<TargetType> {
        match capability {
            CapabilityId::NavigateApp => Some(TargetType::App),
            CapabilityId::NavigateWindow => Some(TargetType::Window),
            CapabilityId::NavigateUrl => Some(TargetType::Url),
            CapabilityId::NavigateFile => Some(TargetType::File),
            _ => None,
        }
    }

    fn effect(&self, manifest: &TaskManifest) -> Result<Value, ExecutorError> {
        let target_type_raw = required(manifest, "target_type")?;
        let target_id = required(manifest, "target_id")?.trim();
        let mode_raw = required(manifest, "navigation_mode")?;
        let focus_raw = required(manifest, "focus_policy")?;

        let target_type = TargetType::parse(target_type_raw).ok_or_else(|| {
            ExecutorError::execution_failed(format!("unknown target_type {target_type_raw:?}"))
        })?;
        let expected = Self::expected_target_type(manifest.capability_id).ok_or_else(|| {
            ExecutorError::execution_failed(format!(
                "capability {} is not a navigation",
                manifest.capability_id
            ))
        })?;
        if target_type != expected {
            return Err(ExecutorError::execution_failed(format!(
                "{} requires target_type {:?}, found {target_type_raw:?}",
                manifest.capability_id,
                expected.as_str()
            )));
        }

        if target_id.is_empty() {
            return Err(ExecutorError::execution_failed("target_id must be non-empty"));
        }
        let mode = NavigationMode::parse(mode_raw).ok_or_else(|| {
            ExecutorError::execution_failed(format!("unknown navigation_mode {mode_raw:?}"))
        })?;
        let focus = FocusPolicy::parse(focus_raw).ok_or_else(|| {
            ExecutorError::execution_failed(format!("unknown focus_policy {focus_raw:?}"))
        })?;

        match self.host.resolve_target(target_type, target_id) {
            TargetResolution::Resolved => {},
            TargetResolution::NotFound => {
                return Err(ExecutorError::new(
                    ExecutorErrorCode::TargetNotFound,
                    format!("target {target_id:?} did not resolve"),
                ));
            },
            TargetResolution::NotAccessible => {
                return Err(ExecutorError::new(
                    ExecutorErrorCode::TargetNotAccessible,
                    format!("target {target_id:?} is not accessible"),
                ));
            },
            TargetResolution::InvalidFormat => {
                return Err(ExecutorError::execution_failed(format!(
                    "target {target_id:?} is not a well-formed {} identifier",
                    expected.as_str()
                )));
            },
        }

        let outcome = self.host.perform(EffectRequest::Navigate {
            target_type,
            target_id,
            mode,
            focus,
        });

        match outcome {
            EffectOutcome::Success => Ok(json!({
                "target_type": target_type.as_str(),
                "target_id": target_id,
                "navigation_result": "success",
            })),
            EffectOutcome::NoOp => Ok(json!({
                "target_type": target_type.as_str(),
                "target_id": target_id,
                "navigation_result": "no_op",
            })),
            EffectOutcome::NavigationBlocked => Err(ExecutorError::new(
                ExecutorErrorCode::NavigationBlocked,
                format!("host refused navigation to {target_id:?}"),
            )),
            EffectOutcome::Failed => Err(ExecutorError::execution_failed(
                "host could not perform the navigation",
            )),
        }
    }
}

impl<H: HostAdapter> Executor for NavigationExecutor<H> {
    fn capabilities(&self) -> &'static [CapabilityId] {
        NAVIGATION_CAPABILITIES
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

impl<H> std::fmt::Debug for NavigationExecutor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationExecutor").finish_non_exhaustive()
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
