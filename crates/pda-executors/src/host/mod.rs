//! The host-adapter boundary.
//!
//! Executors touch the outside world through this narrow, synchronous
//! interface only. Every operation returns an explicit result code, never
//! panics across the boundary, and is deterministic given identical host
//! state. Blocking is permitted here and nowhere else.
//!
//! The four operation families:
//!
//! 1. lease signature verification
//! 2. target resolution
//! 3. capability-specific effect calls
//! 4. static host capability description

mod static_adapter;

pub use static_adapter::{StaticHostAdapter, StaticHostConfig};

use pda_core::crypto::LeaseVerifier;
use serde::{Deserialize, Serialize};

/// Outcome of lease signature verification at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseVerification {
    /// The signature verifies against the kernel verification material.
    Verified,
    /// Anything else. Fail-closed: unknown is invalid.
    Invalid,
}

/// Outcome of resolving a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResolution {
    /// The target exists and is reachable.
    Resolved,
    /// No such target.
    NotFound,
    /// The target exists but access is not permitted.
    NotAccessible,
    /// The identifier is not even shaped like a target of this type.
    InvalidFormat,
}

/// Outcome of a capability-specific effect call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect was applied.
    Success,
    /// The world was already in the requested state.
    NoOp,
    /// The host refused the navigation (e.g. unsupported URL scheme).
    NavigationBlocked,
    /// The effect could not be applied.
    Failed,
}

/// The kind of entity a navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// An installed application.
    App,
    /// An open window.
    Window,
    /// A URL.
    Url,
    /// A file on the host.
    File,
}

impl TargetType {
    /// Parses a target type from its lowercase wire spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "app" => Some(Self::App),
            "window" => Some(Self::Window),
            "url" => Some(Self::Url),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Returns the lowercase wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Window => "window",
            Self::Url => "url",
            Self::File => "file",
        }
    }
}

/// Whether a navigation lands in front of the user or behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// The target surfaces immediately.
    Foreground,
    /// The target loads without surfacing.
    Background,
}

impl NavigationMode {
    /// Parses a navigation mode from its lowercase wire spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "foreground" => Some(Self::Foreground),
            "background" => Some(Self::Background),
            _ => None,
        }
    }
}

/// How aggressively a navigation may take input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPolicy {
    /// Take focus unconditionally.
    Steal,
    /// Ask the window manager for focus.
    Request,
    /// Never touch focus.
    None,
}

impl FocusPolicy {
    /// Parses a focus policy from its lowercase wire spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "steal" => Some(Self::Steal),
            "request" => Some(Self::Request),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// The environment an app operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEnvironment {
    /// A desktop session.
    Desktop,
    /// A mobile device.
    Mobile,
    /// A television.
    Tv,
}

impl TargetEnvironment {
    /// Parses a target environment from its lowercase wire spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop" => Some(Self::Desktop),
            "mobile" => Some(Self::Mobile),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }
}

/// A capability-specific effect request.
///
/// One closed enum rather than one method per capability keeps the adapter
/// surface auditable: a host implements exactly these effects and nothing
/// else is expressible. Graceful-only semantics are baked in; there is no
/// force-kill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectRequest<'a> {
    /// Start playback of `media_uri` on `target_device`.
    MediaPlay {
        /// Explicit media URI; never discovered.
        media_uri: &'a str,
        /// Allowlisted output device.
        target_device: &'a str,
    },
    /// Pause playback on `target_device`.
    MediaPause {
        /// Explicit media URI.
        media_uri: &'a str,
        /// Allowlisted output device.
        target_device: &'a str,
    },
    /// Stop playback on `target_device`.
    MediaStop {
        /// Explicit media URI.
        media_uri: &'a str,
        /// Allowlisted output device.
        target_device: &'a str,
    },
    /// Seek to an absolute position on `target_device`.
    MediaSeek {
        /// Explicit media URI.
        media_uri: &'a str,
        /// Allowlisted output device.
        target_device: &'a str,
        /// Absolute position in whole seconds.
        position_seconds: u64,
    },
    /// Launch an allowlisted application.
    AppLaunch {
        /// Exact allowlist entry.
        app_id: &'a str,
        /// Where to launch it.
        environment: TargetEnvironment,
    },
    /// Bring an application to the front.
    AppFocus {
        /// Exact allowlist entry.
        app_id: &'a str,
        /// Where it runs.
        environment: TargetEnvironment,
    },
    /// Close an application gracefully.
    AppClose {
        /// Exact allowlist entry.
        app_id: &'a str,
        /// Where it runs.
        environment: TargetEnvironment,
    },
    /// Navigate to a resolved target.
    Navigate {
        /// Kind of target.
        target_type: TargetType,
        /// Resolved target identifier.
        target_id: &'a str,
        /// Foreground or background.
        mode: NavigationMode,
        /// Focus discipline.
        focus: FocusPolicy,
    },
}

/// Static description of what a host can do, reported once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostCapabilities {
    /// Adapter implementation version string.
    pub adapter_version: String,

    /// Effect families this host supports, by capability family name.
    pub effect_families: Vec<String>,
}

/// The synchronous, exception-free host interface executors consume.
///
/// Implementations must be deterministic given identical host state and
/// must never panic across this boundary; failures are result codes.
pub trait HostAdapter {
    /// Verifies a lease signature against the kernel verification material
    /// the host was provisioned with.
    fn verify_lease_signature(&self, message: &[u8], signature: &[u8]) -> LeaseVerification;

    /// Resolves a navigation target.
    fn resolve_target(&self, target_type: TargetType, target_id: &str) -> TargetResolution;

    /// Performs one capability-specific effect.
    fn perform(&self, request: EffectRequest<'_>) -> EffectOutcome;

    /// Returns true if the app is currently running in the environment.
    ///
    /// Drives the launch-when-already-running policy; a host without
    /// process visibility reports false and launches idempotently.
    fn app_is_running(&self, app_id: &str, environment: TargetEnvironment) -> bool;

    /// Returns the static capability description.
    fn host_capabilities(&self) -> HostCapabilities;
}

/// A host-side lease verifier backed by kernel verification material.
///
/// Hosts that own the kernel's verifying key (or shared secret) can wrap it
/// here to satisfy the `verify_lease_signature` family.
pub struct KernelMaterialVerifier {
    verifier: LeaseVerifier,
}

impl KernelMaterialVerifier {
    /// Wraps kernel verification material.
    #[must_use]
    pub const fn new(verifier: LeaseVerifier) -> Self {
        Self { verifier }
    }

    /// Verifies a signature, fail-closed.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> LeaseVerification {
        if self.verifier.verify(message, signature) {
            LeaseVerification::Verified
        } else {
            LeaseVerification::Invalid
        }
    }
}

impl std::fmt::Debug for KernelMaterialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelMaterialVerifier").finish_non_exhaustive()
    }
}
