//! A reference host adapter with a statically configured world view.
//!
//! The adapter answers every query from immutable configuration loaded at
//! startup: which apps exist, which windows are open, which URL schemes the
//! host will open, which targets are off-limits. Deterministic by
//! construction: the same request against the same configuration always
//! returns the same result code.

use std::collections::BTreeSet;

use super::{
    EffectOutcome, EffectRequest, HostAdapter, HostCapabilities, KernelMaterialVerifier,
    LeaseVerification, TargetResolution, TargetType,
};

/// Static world view for a [`StaticHostAdapter`].
#[derive(Debug, Clone, Default)]
pub struct StaticHostConfig {
    /// Reported adapter version.
    pub adapter_version: String,

    /// Applications that resolve.
    pub known_apps: BTreeSet<String>,

    /// Window identifiers that resolve.
    pub known_windows: BTreeSet<String>,

    /// File targets that resolve.
    pub known_files: BTreeSet<String>,

    /// URL schemes the host will navigate to (e.g. `http`, `https`).
    pub allowed_url_schemes: BTreeSet<String>,

    /// Targets that resolve but are not permitted.
    pub inaccessible_targets: BTreeSet<String>,

    /// Applications currently running.
    pub running_apps: BTreeSet<String>,
}

/// Host adapter backed by [`StaticHostConfig`].
pub struct StaticHostAdapter {
    config: StaticHostConfig,
    lease_verifier: Option<KernelMaterialVerifier>,
}

impl StaticHostAdapter {
    /// Creates an adapter without lease verification material.
    ///
    /// `verify_lease_signature` fails closed until material is supplied
    /// with [`Self::with_lease_verifier`].
    #[must_use]
    pub const fn new(config: StaticHostConfig) -> Self {
        Self {
            config,
            lease_verifier: None,
        }
    }

    /// Provisions kernel verification material.
    #[must_use]
    pub fn with_lease_verifier(mut self, verifier: KernelMaterialVerifier) -> Self {
        self.lease_verifier = Some(verifier);
        self
    }

    fn url_scheme(url: &str) -> Option<&str> {
        let (scheme, _) = url.split_once("://")?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
            return None;
        }
        Some(scheme)
    }
}

impl HostAdapter for StaticHostAdapter {
    fn verify_lease_signature(&self, message: &[u8], signature: &[u8]) -> LeaseVerification {
        self.lease_verifier
            .as_ref()
            .map_or(LeaseVerification::Invalid, |v| {
                v.verify(message, signature)
            })
    }

    fn resolve_target(&self, target_type: TargetType, target_id: &str) -> TargetResolution {
        if self.config.inaccessible_targets.contains(target_id) {
            return TargetResolution::NotAccessible;
        }
        match target_type {
            TargetType::App => {
                if self.config.known_apps.contains(target_id) {
                    TargetResolution::Resolved
                } else {
                    TargetResolution::NotFound
                }
            },
            TargetType::Window => {
                if self.config.known_windows.contains(target_id) {
                    TargetResolution::Resolved
                } else {
                    TargetResolution::NotFound
                }
            },
            TargetType::File => {
                if self.config.known_files.contains(target_id) {
                    TargetResolution::Resolved
                } else {
                    TargetResolution::NotFound
                }
            },
            TargetType::Url => {
                if Self::url_scheme(target_id).is_some() {
                    TargetResolution::Resolved
                } else {
                    TargetResolution::InvalidFormat
                }
            },
        }
    }

    fn perform(&self, request: EffectRequest<'_>) -> EffectOutcome {
        match request {
            EffectRequest::Navigate {
                target_type: TargetType::Url,
                target_id,
                ..
            } => match Self::url_scheme(target_id) {
                Some(scheme) if self.config.allowed_url_schemes.contains(scheme) => {
                    EffectOutcome::Success
                },
                _ => EffectOutcome::NavigationBlocked,
            },
            EffectRequest::Navigate { .. }
            | EffectRequest::MediaPlay { .. }
            | EffectRequest::MediaPause { .. }
            | EffectRequest::MediaStop { .. }
            | EffectRequest::MediaSeek { .. }
            | EffectRequest::AppLaunch { .. }
            | EffectRequest::AppFocus { .. }
            | EffectRequest::AppClose { .. } => EffectOutcome::Success,
        }
    }

    fn app_is_running(&self, app_id: &str, _environment: super::TargetEnvironment) -> bool {
        self.config.running_apps.contains(app_id)
    }

    fn host_capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            adapter_version: self.config.adapter_version.clone(),
            effect_families: vec![
                "media".to_string(),
                "app".to_string(),
                "navigation".to_string(),
            ],
        }
    }
}

impl std::fmt::Debug for StaticHostAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticHostAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
