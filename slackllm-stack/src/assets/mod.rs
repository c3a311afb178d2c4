//! Code-asset planning for the function package
//!
//! Synthesis never zips or uploads anything. It fingerprints the source
//! tree, derives a content-addressed artifact key, and records the build
//! steps an external packager runs before the stack is applied. The same
//! tree always maps to the same key, so re-synthesizing an unchanged
//! stack produces an artifact the store already holds.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

pub use error::{AssetError, AssetResult};

/// Dependency manifest consumed by the bundling step.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// How the function source becomes a deployable package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackagingMode {
    /// Zip the source tree as-is
    SourceTree,
    /// Install the declared dependencies into the staged tree first
    #[default]
    BundledDependencies,
}

impl PackagingMode {
    /// Discriminator folded into the fingerprint so a mode change maps
    /// to a new artifact even for an identical tree.
    const fn fingerprint_tag(self) -> &'static [u8] {
        match self {
            Self::SourceTree => b"source-tree",
            Self::BundledDependencies => b"bundled-dependencies",
        }
    }
}

/// A planned, content-addressed code artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeAsset {
    /// Artifact object key, derived from the source fingerprint
    pub s3_key: String,
    /// Hex SHA-256 over relative paths, contents, and packaging mode
    pub source_hash: String,
    /// Directory the packager stages from
    pub source_dir: PathBuf,
    /// Commands the packager runs inside the staged copy, in order
    pub build_steps: Vec<String>,
}

/// Manifest handed to the external packager alongside the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    /// Artifact store bucket the template's code locations point into
    pub bucket: String,
    /// Planned artifacts
    pub assets: Vec<CodeAsset>,
}

impl AssetManifest {
    /// Pretty-printed manifest body, the form written to `assets.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plans the code artifact for `source_dir` under `mode`.
///
/// The fingerprint covers every regular file's relative path and bytes
/// in sorted order plus the packaging mode, so identical trees map to
/// the same artifact key and any content or mode change produces a new
/// one.
///
/// # Errors
///
/// Returns `AssetError::SourceMissing` if `source_dir` is not a
/// directory, or `AssetError::Io` if the tree cannot be read.
pub fn plan_code_asset(source_dir: &Path, mode: PackagingMode) -> AssetResult<CodeAsset> {
    if !source_dir.is_dir() {
        return Err(AssetError::SourceMissing {
            path: source_dir.to_path_buf(),
        });
    }

    let mut hasher = Sha256::new();
    hasher.update(mode.fingerprint_tag());
    hash_tree(&mut hasher, source_dir, Path::new(""))?;
    let source_hash = hex::encode(hasher.finalize());

    let s3_key = format!("slackllm-{}.zip", &source_hash[..16]);
    let mut build_steps = Vec::new();
    if mode == PackagingMode::BundledDependencies {
        build_steps.push(format!("pip install -r {REQUIREMENTS_FILE} -t ."));
    }
    build_steps.push(format!("zip -r {s3_key} ."));

    debug!("planned code asset {} from {}", s3_key, source_dir.display());

    Ok(CodeAsset {
        s3_key,
        source_hash,
        source_dir: source_dir.to_path_buf(),
        build_steps,
    })
}

/// Feeds the tree under `dir` into `hasher`, entries sorted by name.
///
/// Each file contributes its relative path (separator normalized so the
/// fingerprint is host-stable), a NUL, its length, and its bytes.
/// Symlinks are skipped; the packager stages regular files only.
fn hash_tree(hasher: &mut Sha256, dir: &Path, prefix: &Path) -> AssetResult<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let relative = prefix.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            hash_tree(hasher, &entry.path(), &relative)?;
        } else if file_type.is_file() {
            let name = relative.to_string_lossy().replace('\\', "/");
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            let bytes = fs::read(entry.path())?;
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(&bytes);
        }
    }
    Ok(())
}
