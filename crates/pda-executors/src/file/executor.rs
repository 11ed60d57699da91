//! FILE executor implementation.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use pda_core::compiler::{CapabilityId, sha256_hex};
use pda_core::crypto::encode_hex;
use pda_core::lease::LeaseToken;
use pda_core::manifest::TaskManifest;
use serde_json::{Value, json};
use tracing::debug;

use crate::contract::{Executor, ExecutorCore, ExecutorError, ExecutorKeys, ExecutionResult};

/// The FILE executor's closed capability set.
pub const FILE_CAPABILITIES: &[CapabilityId] = &[
    CapabilityId::FileMove,
    CapabilityId::FileCopy,
    CapabilityId::FileDelete,
];

/// Static configuration for the FILE executor.
#[derive(Debug, Clone)]
pub struct FileExecutorConfig {
    /// Directories file operations are confined to. Each must exist at
    /// startup; they are canonicalized once and never re-read.
    pub base_directories: Vec<PathBuf>,
}

/// Reference executor for file operations on the local filesystem.
pub struct FileExecutor {
    core: ExecutorCore,
    bases: Vec<PathBuf>,
}

impl FileExecutor {
    /// Creates a FILE executor confined to the configured base directories.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a base directory does not exist or cannot be
    /// canonicalized. Startup is the only moment this executor is allowed
    /// to fail loudly; afterwards every failure is a signed result.
    pub fn new(config: FileExecutorConfig, keys: ExecutorKeys) -> io::Result<Self> {
        let mut bases = Vec::with_capacity(config.base_directories.len());
        for dir in &config.base_directories {
            bases.push(fs::canonicalize(dir)?);
        }
        Ok(Self {
            core: ExecutorCore::new(keys, FILE_CAPABILITIES),
            bases,
        })
    }

    /// The executor's result verification key.
    #[must_use]
    pub fn result_verifying_key(&self) -> pda_core::crypto::VerifyingKey {
        self.core.result_verifying_key()
    }

    fn effect(&self, manifest: &TaskManifest) -> Result<Value, ExecutorError> {
        let source = self.checked_source(manifest)?;

        match manifest.capability_id {
            CapabilityId::FileMove => self.do_move(manifest, &source),
            CapabilityId::FileCopy => self.do_copy(manifest, &source),
            CapabilityId::FileDelete => Self::do_delete(manifest, &source),
            // Unreachable past the gate; answered defensively all the same.
            other => Err(ExecutorError::execution_failed(format!(
                "capability {other} is not a file operation"
            ))),
        }
    }

    fn input<'a>(manifest: &'a TaskManifest, key: &str) -> Result<&'a str, ExecutorError> {
        manifest
            .inputs
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ExecutorError::execution_failed(format!("missing required input {key:?}"))
            })
    }

    /// Validates the source path: absolute, no `..`, no symlink before or
    /// after resolution, a regular file, inside a base directory.
    fn checked_source(&self, manifest: &TaskManifest) -> Result<PathBuf, ExecutorError> {
        let raw = Self::input(manifest, "source_path")?;
        let path = Self::plain_absolute(raw)?;

        let pre = fs::symlink_metadata(&path)
            .map_err(|_| ExecutorError::execution_failed("source does not exist"))?;
        if pre.file_type().is_symlink() {
            return Err(ExecutorError::execution_failed("source is a symlink"));
        }

        let resolved = fs::canonicalize(&path)
            .map_err(|_| ExecutorError::execution_failed("source cannot be resolved"))?;
        if !resolved.is_file() {
            return Err(ExecutorError::execution_failed(
                "source is not a regular file",
            ));
        }
        self.confine(&resolved)?;
        Ok(resolved)
    }

    /// Validates the destination path: absolute, no `..`, absent, parent
    /// resolves inside a base directory.
    fn checked_destination(&self, manifest: &TaskManifest) -> Result<PathBuf, ExecutorError> {
        let raw = Self::input(manifest, "destination_path")?;
        let path = Self::plain_absolute(raw)?;

        // symlink_metadata succeeds for dangling symlinks too, so this
        // rejects both an existing destination and a symlink squatting on
        // the destination name.
        if fs::symlink_metadata(&path).is_ok() {
            return Err(ExecutorError::execution_failed(
                "destination already exists",
            ));
        }

        let parent = path
            .parent()
            .ok_or_else(|| ExecutorError::execution_failed("destination has no parent"))?;
        let file_name = path
            .file_name()
            .ok_or_else(|| ExecutorError::execution_failed("destination has no file name"))?;

        let resolved_parent = fs::canonicalize(parent)
            .map_err(|_| ExecutorError::execution_failed("destination parent does not exist"))?;
        let resolved = resolved_parent.join(file_name);
        self.confine(&resolved)?;
        Ok(resolved)
    }

    /// Rejects relative paths and `..` components before any I/O happens.
    fn plain_absolute(raw: &str) -> Result<PathBuf, ExecutorError> {
        let path = PathBuf::from(raw);
        if !path.is_absolute() {
            return Err(ExecutorError::execution_failed("path must be absolute"));
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ExecutorError::execution_failed(
                "path must not contain '..' components",
            ));
        }
        Ok(path)
    }

    fn confine(&self, resolved: &Path) -> Result<(), ExecutorError> {
        if self.bases.iter().any(|base| resolved.starts_with(base)) {
            Ok(())
        } else {
            Err(ExecutorError::execution_failed(
                "path is outside every allowed base directory",
            ))
        }
    }

    fn do_move(&self, manifest: &TaskManifest, source: &Path) -> Result<Value, ExecutorError> {
        let dest = self.checked_destination(manifest)?;
        let size = file_size(source)?;

        // rename is atomic within a filesystem; a cross-device move fails
        // rather than degrading to copy-then-delete.
        fs::rename(source, &dest)
            .map_err(|e| ExecutorError::execution_failed(format!("move failed: {e}")))?;
        debug!(source = %source.display(), destination = %dest.display(), "moved file");

        let mut output = json!({
            "operation": "move",
            "source": path_str(source),
            "destination": path_str(&dest),
            "size_bytes": size,
        });
        if manifest.constraints.reversible {
            output["undo_metadata"] = json!({
                "operation": "move",
                "original_path": path_str(source),
            });
        }
        Ok(output)
    }

    fn do_copy(&self, manifest: &TaskManifest, source: &Path) -> Result<Value, ExecutorError> {
        let dest = self.checked_destination(manifest)?;

        let size = fs::copy(source, &dest)
            .map_err(|e| ExecutorError::execution_failed(format!("copy failed: {e}")))?;
        debug!(source = %source.display(), destination = %dest.display(), "copied file");

        let mut output = json!({
            "operation": "copy",
            "source": path_str(source),
            "destination": path_str(&dest),
            "size_bytes": size,
        });
        if manifest.constraints.reversible {
            output["undo_metadata"] = json!({
                "operation": "copy",
                "created_path": path_str(&dest),
            });
        }
        Ok(output)
    }

    fn do_delete(manifest: &TaskManifest, source: &Path) -> Result<Value, ExecutorError> {
        // Independent of the validator's Hard-No rule: a manifest that
        // arrived here some other way still cannot delete irreversibly.
        if !manifest.constraints.reversible {
            return Err(ExecutorError::execution_failed(
                "FILE_DELETE requires the reversible constraint",
            ));
        }

        let content = fs::read(source)
            .map_err(|e| ExecutorError::execution_failed(format!("read failed: {e}")))?;
        let digest = sha256_hex(&content);
        let size = content.len();

        fs::remove_file(source)
            .map_err(|e| ExecutorError::execution_failed(format!("delete failed: {e}")))?;
        debug!(source = %source.display(), size_bytes = size, "deleted file with recovery record");

        Ok(json!({
            "operation": "delete",
            "source": path_str(source),
            "size_bytes": size,
            "sha256": digest,
            "undo_metadata": {
                "operation": "delete",
                "original_path": path_str(source),
                "size_bytes": size,
                "sha256": digest,
                "content_hex": encode_hex(&content),
            },
        }))
    }
}

impl Executor for FileExecutor {
    fn capabilities(&self) -> &'static [CapabilityId] {
        FILE_CAPABILITIES
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

impl std::fmt::Debug for FileExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileExecutor")
            .field("bases", &self.bases)
            .finish_non_exhaustive()
    }
}

fn file_size(path: &Path) -> Result<u64, ExecutorError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| ExecutorError::execution_failed(format!("stat failed: {e}")))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
