//! Build-info cache.
//!
//! When an sdist is built, the resolved version and the core package's
//! `[project]` table are written to `.rind_cache.json` inside the archive.
//! A wheel built from the unpacked sdist finds the file and reuses it instead
//! of looking for the core package or its git history, which are not there.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Table;
use crate::util::fs::{read_to_string, remove_file_if_exists, write_string};

/// Cache file name, relative to the project root.
pub const CACHED_BUILD_INFO_FILE: &str = ".rind_cache.json";

/// The cached resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Resolved version of the core package
    pub version: String,
    /// The core package's `[project]` table
    pub core_project: Table,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>, core_project: Table) -> Self {
        BuildInfo {
            version: version.into(),
            core_project,
        }
    }

    /// Location of the cache file in `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CACHED_BUILD_INFO_FILE)
    }

    /// Load the cache from a project root. `None` means "resolve live".
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(project_root);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = read_to_string(&path)?;
        let info: BuildInfo = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse build info: {}", path.display()))?;
        if info.version.trim().is_empty() {
            bail!("build info at {} has an empty version", path.display());
        }

        tracing::debug!("using cached build info from {}", path.display());
        Ok(Some(info))
    }

    /// Serialized form, as written to disk.
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).context("failed to serialize build info")?;
        json.push('\n');
        Ok(json)
    }

    /// Write the cache into `dest_dir`.
    ///
    /// The returned handle deletes the file when dropped.
    pub fn save(&self, dest_dir: &Path) -> Result<BuildInfoFile> {
        let path = Self::path_in(dest_dir);
        write_string(&path, &self.to_json()?)?;
        Ok(BuildInfoFile {
            path,
            removed: false,
        })
    }
}

/// A cache file written by [`BuildInfo::save`].
#[derive(Debug)]
pub struct BuildInfoFile {
    path: PathBuf,
    removed: bool,
}

impl BuildInfoFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Calling this again, or after the file is already
    /// gone, is not an error.
    pub fn remove(&mut self) -> Result<()> {
        if !self.removed {
            remove_file_if_exists(&self.path)?;
            self.removed = true;
        }
        Ok(())
    }
}

impl Drop for BuildInfoFile {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            tracing::warn!("{:#}", e);
        }
    }
}
