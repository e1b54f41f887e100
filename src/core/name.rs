//! Package name normalization and path resolution.

use std::path::{Path, PathBuf};

use crate::core::manifest::MANIFEST_NAME;
use crate::util::fs::normalize_path;

/// Platform tag for metadata-only wheels.
pub const WHEEL_TAG: &str = "py3-none-any";

/// Canonicalize a package name (PEP 503).
///
/// Lowercases and collapses each run of `-`, `_` and `.` into a single `-`.
pub fn canonicalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }

    out
}

/// Name as it appears in wheel and sdist filenames: canonical, with underscores.
pub fn safe_name(name: &str) -> String {
    canonicalize_name(name).replace('-', "_")
}

/// `{name}-{version}-py3-none-any.whl`
pub fn wheel_filename(name: &str, version: &str) -> String {
    format!("{}-{}-{}.whl", safe_name(name), version, WHEEL_TAG)
}

/// `{name}-{version}.dist-info`
pub fn dist_info_dir(name: &str, version: &str) -> String {
    format!("{}-{}.dist-info", safe_name(name), version)
}

/// `{name}-{version}`: top-level directory of the sdist, and its file stem.
pub fn sdist_basename(name: &str, version: &str) -> String {
    format!("{}-{}", safe_name(name), version)
}

/// Resolve the configured `core-path` against the project root.
///
/// Returns the location of the core package's manifest.
pub fn core_manifest_path(project_root: &Path, core_path: &str) -> PathBuf {
    normalize_path(&project_root.join(core_path).join(MANIFEST_NAME))
}
