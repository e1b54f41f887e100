//! Versions obtained from the core package's own build backend.
//!
//! The backend's `prepare_metadata_for_build_wheel` hook writes a
//! `.dist-info` directory into scratch space and the version is read from
//! its METADATA.

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::errors::VersionError;
use crate::core::Manifest;
use crate::util::fs::read_to_string;
use crate::version::VersionProvider;

/// The `[build-system]` declaration of the core package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    pub backend: String,
    pub backend_path: Vec<String>,
    pub requires: Vec<String>,
}

impl BackendSpec {
    /// Read the declaration, failing if no backend is named.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let backend = manifest
            .build_backend()
            .ok_or(VersionError::MissingBuildBackend)?;

        Ok(BackendSpec {
            backend: backend.to_string(),
            backend_path: manifest.backend_path(),
            requires: manifest.build_requires(),
        })
    }
}

/// Ask the core package's backend for its version.
///
/// The metadata directory is temporary and removed on every path out of
/// this function.
pub fn version_via_backend(
    companion: &Manifest,
    companion_dir: &Path,
    provider: &dyn VersionProvider,
) -> Result<String> {
    let spec = BackendSpec::from_manifest(companion)?;

    let scratch = TempDir::new().context("failed to create temporary metadata directory")?;
    let dist_info = provider.prepare_metadata(companion_dir, &spec, scratch.path())?;
    let metadata = read_to_string(&scratch.path().join(&dist_info).join("METADATA"))?;

    parse_version_header(&metadata).ok_or_else(|| {
        VersionError::MissingVersionHeader {
            backend: spec.backend.clone(),
        }
        .into()
    })
}

/// Read the `Version` header of a core metadata document.
pub fn parse_version_header(metadata: &str) -> Option<String> {
    metadata
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("version"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}
