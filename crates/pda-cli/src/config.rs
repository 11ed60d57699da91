//! Static configuration for the `pda` binary.
//!
//! Everything here is loaded once at startup and immutable for the life of
//! the process: key material, trust snapshot, allowlists, scope table.
//! Runtime mutation is not a thing: change the file, restart the process.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use pda_core::crypto::{LeaseMac, LeaseSigner, LeaseVerifier, decode_hex};
use pda_executors::host::StaticHostConfig;
use pda_executors::search::{DatasetRecord, EmailRecord, ScopeBacking, SearchScopes};
use serde::Deserialize;

/// Top-level configuration file, `pda.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdaConfig {
    /// Kernel key material and lease policy.
    pub kernel: KernelConfig,

    /// The read-only trust snapshot handed to the lease manager.
    #[serde(default)]
    pub trust: TrustConfig,

    /// FILE executor confinement.
    #[serde(default)]
    pub file: FileConfig,

    /// MEDIA executor device allowlist.
    #[serde(default)]
    pub media: MediaConfig,

    /// APP_LAUNCH executor app allowlist.
    #[serde(default)]
    pub apps: AppsConfig,

    /// Static host world view for the reference adapter.
    #[serde(default)]
    pub host: HostConfig,

    /// SEARCH executor scope table.
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[kernel]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KernelConfig {
    /// Shared HMAC secret, lower-case hex, at least 32 bytes decoded.
    pub secret_hex: String,

    /// Lease duration in milliseconds.
    #[serde(default = "default_lease_duration_ms")]
    pub lease_duration_ms: u64,

    /// Task ids revoked at startup.
    #[serde(default)]
    pub revoked_task_ids: Vec<String>,
}

const fn default_lease_duration_ms() -> u64 {
    pda_core::lease::DEFAULT_LEASE_DURATION_MS
}

/// `[trust]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrustConfig {
    /// Current trust score.
    pub trust_score: f64,

    /// Minimum score required to grant a lease.
    pub minimum_required: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            trust_score: 0.0,
            minimum_required: 1.0,
        }
    }
}

/// `[file]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base directories file operations are confined to.
    #[serde(default)]
    pub base_directories: Vec<PathBuf>,
}

/// `[media]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Devices playback may target.
    #[serde(default)]
    pub device_allowlist: BTreeSet<String>,
}

/// `[apps]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppsConfig {
    /// Applications that may be launched, focused, or closed.
    #[serde(default)]
    pub allowlist: BTreeSet<String>,
}

/// `[host]` section: the static world view of the reference adapter.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Reported adapter version.
    #[serde(default)]
    pub adapter_version: String,

    /// Applications that resolve as navigation targets.
    #[serde(default)]
    pub known_apps: BTreeSet<String>,

    /// Windows that resolve as navigation targets.
    #[serde(default)]
    pub known_windows: BTreeSet<String>,

    /// Files that resolve as navigation targets.
    #[serde(default)]
    pub known_files: BTreeSet<String>,

    /// URL schemes the host will navigate to.
    #[serde(default)]
    pub allowed_url_schemes: BTreeSet<String>,

    /// Targets that resolve but are not permitted.
    #[serde(default)]
    pub inaccessible_targets: BTreeSet<String>,

    /// Applications currently running.
    #[serde(default)]
    pub running_apps: BTreeSet<String>,
}

/// `[search]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Scope table entries.
    #[serde(default)]
    pub scopes: Vec<ScopeEntry>,
}

/// One `[[search.scopes]]` entry.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScopeEntry {
    /// A filesystem scope.
    Files {
        /// Scope name.
        name: String,
        /// Root directory.
        root: PathBuf,
    },
    /// An email scope backed by a JSON records file.
    Emails {
        /// Scope name.
        name: String,
        /// Path to a JSON array of email records.
        records_file: PathBuf,
    },
    /// A dataset scope backed by a JSON records file.
    Datasets {
        /// Scope name.
        name: String,
        /// Path to a JSON array of dataset rows.
        records_file: PathBuf,
    },
}

impl PdaConfig {
    /// Loads and parses the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Decodes the kernel's shared secret.
    pub fn secret(&self) -> Result<Vec<u8>> {
        let Some(secret) = decode_hex(&self.kernel.secret_hex) else {
            bail!("kernel.secret_hex is not valid hex");
        };
        Ok(secret)
    }

    /// Builds the kernel-side lease signer.
    pub fn lease_signer(&self) -> Result<LeaseSigner> {
        let mac = LeaseMac::new(self.secret()?)
            .context("kernel.secret_hex must decode to at least 32 bytes")?;
        Ok(LeaseSigner::Hmac(mac))
    }

    /// Builds the executor-side lease verifier.
    pub fn lease_verifier(&self) -> Result<LeaseVerifier> {
        let mac = LeaseMac::new(self.secret()?)
            .context("kernel.secret_hex must decode to at least 32 bytes")?;
        Ok(LeaseVerifier::Hmac(mac))
    }

    /// Builds the static host adapter configuration.
    #[must_use]
    pub fn host_config(&self) -> StaticHostConfig {
        StaticHostConfig {
            adapter_version: self.host.adapter_version.clone(),
            known_apps: self.host.known_apps.clone(),
            known_windows: self.host.known_windows.clone(),
            known_files: self.host.known_files.clone(),
            allowed_url_schemes: self.host.allowed_url_schemes.clone(),
            inaccessible_targets: self.host.inaccessible_targets.clone(),
            running_apps: self.host.running_apps.clone(),
        }
    }

    /// Builds the SEARCH scope table, loading record files relative to
    /// `config_dir`.
    pub fn search_scopes(&self, config_dir: &Path) -> Result<SearchScopes> {
        let mut scopes = SearchScopes::new();
        for entry in &self.search.scopes {
            match entry {
                ScopeEntry::Files { name, root } => {
                    scopes.insert(name.clone(), ScopeBacking::Files { root: root.clone() });
                },
                ScopeEntry::Emails { name, records_file } => {
                    let records: Vec<EmailRecord> =
                        load_records(config_dir, records_file)?;
                    scopes.insert(name.clone(), ScopeBacking::Emails { records });
                },
                ScopeEntry::Datasets { name, records_file } => {
                    let records: Vec<DatasetRecord> =
                        load_records(config_dir, records_file)?;
                    scopes.insert(name.clone(), ScopeBacking::Datasets { records });
                },
            }
        }
        Ok(scopes)
    }
}

fn load_records<T: serde::de::DeserializeOwned>(
    config_dir: &Path,
    records_file: &Path,
) -> Result<Vec<T>> {
    let path = if records_file.is_absolute() {
        records_file.to_path_buf()
    } else {
        config_dir.join(records_file)
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("cannot read records file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("cannot parse records file {}", path.display()))
}
