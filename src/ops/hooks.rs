//! PEP 517 build hooks.
//!
//! Every hook takes the project root explicitly and never consults the
//! process working directory. Config settings are accepted for interface
//! compatibility and otherwise ignored.

use std::path::Path;

use anyhow::Result;

use crate::core::manifest::MANIFEST_NAME;
use crate::core::{Manifest, ToolConfig};
use crate::ops::metadata::{build_metadata, VersionSource};
use crate::ops::{sdist, wheel};
use crate::util::fs::ensure_dir;
use crate::util::ConfigSettings;
use crate::version::requires_for_version;

/// Extra requirements needed to build a wheel.
pub fn get_requires_for_build_wheel(
    project_root: &Path,
    settings: &ConfigSettings,
) -> Result<Vec<String>> {
    requires_for_build(project_root, settings)
}

/// Extra requirements needed to build an sdist.
pub fn get_requires_for_build_sdist(
    project_root: &Path,
    settings: &ConfigSettings,
) -> Result<Vec<String>> {
    requires_for_build(project_root, settings)
}

/// Write `{name}-{version}.dist-info` into `metadata_dir`; returns its name.
pub fn prepare_metadata_for_build_wheel(
    project_root: &Path,
    metadata_dir: &Path,
    settings: &ConfigSettings,
) -> Result<String> {
    let meta = build_metadata(project_root, settings)?;
    ensure_dir(metadata_dir)?;
    wheel::write_dist_info(&meta, metadata_dir)
}

/// Build the metadata-only wheel into `wheel_dir`; returns its file name.
pub fn build_wheel(
    project_root: &Path,
    wheel_dir: &Path,
    settings: &ConfigSettings,
    metadata_dir: Option<&Path>,
) -> Result<String> {
    let meta = build_metadata(project_root, settings)?;
    ensure_dir(wheel_dir)?;
    wheel::write_wheel(&meta, wheel_dir, metadata_dir)
}

/// Build the sdist into `sdist_dir`; returns its file name.
pub fn build_sdist(
    project_root: &Path,
    sdist_dir: &Path,
    settings: &ConfigSettings,
) -> Result<String> {
    let meta = build_metadata(project_root, settings)?;
    ensure_dir(sdist_dir)?;
    sdist::write_sdist(&meta, project_root, sdist_dir)
}

fn requires_for_build(project_root: &Path, settings: &ConfigSettings) -> Result<Vec<String>> {
    if !settings.is_empty() {
        tracing::debug!("ignoring {} config setting(s)", settings.len());
    }

    let local = Manifest::load(&project_root.join(MANIFEST_NAME))?;
    let tool: ToolConfig = local.tool_config()?;

    let requires = match VersionSource::locate(project_root, &tool)? {
        VersionSource::Cached(_) => {
            tracing::debug!("build-info cache present, nothing extra to install");
            Vec::new()
        }
        VersionSource::Live(companion) => requires_for_version(&companion),
    };

    Ok(requires)
}
