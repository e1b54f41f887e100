//! Versions from version-control history.
//!
//! The core package's own setuptools-scm (or hatch-vcs) configuration picks
//! the version scheme, tag pattern and fallback. Those settings are carried
//! to setuptools_scm unchanged so that the pin matches the version the core
//! package's own build reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::core::errors::VersionError;
use crate::core::{Manifest, Table};
use crate::version::VersionProvider;

/// Options that make setuptools_scm write files into the core's tree.
const WRITE_OPTIONS: [&str; 4] = [
    "write_to",
    "write_to_template",
    "version_file",
    "version_file_template",
];

/// hatch-vcs keys and the setuptools_scm options they stand for.
const HATCH_OPTIONS: [(&str, &str); 2] = [
    ("tag-pattern", "tag_regex"),
    ("fallback-version", "fallback_version"),
];

/// Keyword arguments for setuptools_scm's `get_version`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScmQuery {
    workdir: PathBuf,
    options: Table,
}

impl ScmQuery {
    /// Build the query for the core package in `companion_dir`.
    ///
    /// Starts from `[tool.setuptools_scm]`, or from hatch-vcs's
    /// `raw-options` plus its `tag-pattern`/`fallback-version` keys. A
    /// configured `root` stays relative to the core manifest; otherwise the
    /// core directory is the root. Parent directories are searched for the
    /// repository unless the configuration says otherwise.
    pub fn from_manifest(companion: &Manifest, companion_dir: &Path) -> Self {
        let mut options = plugin_options(companion);

        for key in WRITE_OPTIONS {
            if options.remove(key).is_some() {
                tracing::debug!("not passing `{}` to setuptools_scm", key);
            }
        }

        if options.contains_key("root") {
            options
                .entry("relative_to")
                .or_insert_with(|| Value::from(companion.path().display().to_string()));
        } else {
            options.insert(
                "root".to_string(),
                Value::from(companion_dir.display().to_string()),
            );
        }
        options
            .entry("search_parent_directories")
            .or_insert(Value::Bool(true));

        ScmQuery {
            workdir: companion_dir.to_path_buf(),
            options,
        }
    }

    /// Directory the query runs in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn options(&self) -> &Table {
        &self.options
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The options as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.options).context("failed to serialize setuptools_scm options")
    }
}

fn plugin_options(companion: &Manifest) -> Table {
    if let Some(table) = companion
        .lookup(&["tool", "setuptools_scm"])
        .and_then(Value::as_object)
    {
        return table.clone();
    }

    let Some(hatch) = companion
        .lookup(&["tool", "hatch", "version"])
        .and_then(Value::as_object)
        .filter(|t| t.get("source").and_then(Value::as_str) == Some("vcs"))
    else {
        return Table::new();
    };

    let mut options = hatch
        .get("raw-options")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (hatch_key, scm_key) in HATCH_OPTIONS {
        if let Some(value) = hatch.get(hatch_key) {
            options
                .entry(scm_key)
                .or_insert_with(|| value.clone());
        }
    }
    options
}

/// Ask setuptools_scm for the core package's version.
pub fn version_from_scm(
    companion: &Manifest,
    companion_dir: &Path,
    provider: &dyn VersionProvider,
) -> Result<String> {
    let query = ScmQuery::from_manifest(companion, companion_dir);
    tracing::debug!(options = ?query.options(), "querying setuptools_scm");

    let version = provider.scm_version(&query)?;
    let version = version.trim();
    if version.is_empty() {
        return Err(VersionError::EmptyScmVersion(companion_dir.to_path_buf()).into());
    }
    Ok(version.to_string())
}
