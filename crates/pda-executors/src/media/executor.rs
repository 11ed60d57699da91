//! MEDIA executor implementation.

use std::collections::BTreeSet;

use pda_core::compiler::CapabilityId;
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::{Value, json};

use crate::contract::{
    Executor, ExecutorCore, ExecutorError, ExecutorKeys, ExecutionResult,
};
use crate::host::{EffectOutcome, EffectRequest, HostAdapter};

/// The MEDIA executor's closed capability set.
pub const MEDIA_CAPABILITIES: &[CapabilityId] = &[
    CapabilityId::MediaPlay,
    CapabilityId::MediaPause,
    CapabilityId::MediaStop,
    CapabilityId::MediaSeek,
];

/// Static configuration for the MEDIA executor.
#[derive(Debug, Clone)]
pub struct MediaExecutorConfig {
    /// Devices playback may target. Exact-match allowlist.
    pub device_allowlist: BTreeSet<String>,
}

/// Reference executor for media transport control.
pub struct MediaExecutor<H> {
    core: ExecutorCore,
    config: MediaExecutorConfig,
    host: H,
}

impl<H: HostAdapter> MediaExecutor<H> {
    /// Creates a MEDIA executor over a host adapter.
    #[must_use]
    pub fn new(config: MediaExecutorConfig, keys: ExecutorKeys, host: H) -> Self {
        Self {
            core: ExecutorCore::new(keys, MEDIA_CAPABILITIES),
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
        let media_uri = required(manifest, "media_uri")?;
        let target_device = required(manifest, "target_device")?;

        if media_uri.contains('?') {
            return Err(ExecutorError::execution_failed(
                "media_uri must not carry a query string",
            ));
        }
        if !self.config.device_allowlist.contains(target_device) {
            return Err(ExecutorError::execution_failed(format!(
                "device {target_device:?} is not on the allowlist"
            )));
        }

        let request = match manifest.capability_id {
            CapabilityId::MediaPlay => EffectRequest::MediaPlay {
                media_uri,
                target_device,
            },
            CapabilityId::MediaPause => EffectRequest::MediaPause {
                media_uri,
                target_device,
            },
            CapabilityId::MediaStop => EffectRequest::MediaStop {
                media_uri,
                target_device,
            },
            CapabilityId::MediaSeek => {
                let raw = required(manifest, "position_seconds")?;
                let position_seconds: u64 = raw.parse().map_err(|_| {
                    ExecutorError::execution_failed(format!(
                        "position_seconds must be a non-negative integer, found {raw:?}"
                    ))
                })?;
                EffectRequest::MediaSeek {
                    media_uri,
                    target_device,
                    position_seconds,
                }
            },
            other => {
                return Err(ExecutorError::execution_failed(format!(
                    "capability {other} is not a media operation"
                )));
            },
        };

        match self.host.perform(request) {
            EffectOutcome::Success => Ok(json!({
                "device": target_device,
                "media_uri": media_uri,
                "status": "applied",
            })),
            EffectOutcome::NoOp => Ok(json!({
                "device": target_device,
                "media_uri": media_uri,
                "status": "no_op",
            })),
            EffectOutcome::NavigationBlocked | EffectOutcome::Failed => Err(
                ExecutorError::execution_failed("host refused the media effect"),
            ),
        }
    }
}

impl<H: HostAdapter> Executor for MediaExecutor<H> {
    fn capabilities(&self) -> &'static [CapabilityId] {
        MEDIA_CAPABILITIES
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

impl<H> std::fmt::Debug for MediaExecutor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaExecutor")
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
