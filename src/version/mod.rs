//! Version detection for the core package.
//!
//! The strategy is chosen from the core manifest alone:
//!
//! 1. **Static**: `project.version` is set and not listed in `project.dynamic`.
//! 2. **SourceControlManaged**: the core builds with setuptools-scm or
//!    hatch-vcs; setuptools_scm is asked, with the core's own settings.
//! 3. **BackendDelegated**: anything else; the core's own build backend is
//!    asked for its metadata.
//!
//! The first match wins and there is no fallback between strategies.

pub mod delegate;
pub mod python;
pub mod scm;

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::core::name::safe_name;
use crate::core::Manifest;

pub use delegate::BackendSpec;
pub use python::PythonTools;
pub use scm::ScmQuery;

/// Build requirement for the source-control strategy.
pub const SCM_REQUIREMENT: &str = "setuptools_scm>=8.0";

/// Build requirement for calling another backend's hooks.
pub const HOOKS_REQUIREMENT: &str = "pyproject_hooks";

/// Version-control plugins, in `safe_name` form.
const SCM_PLUGINS: [&str; 2] = ["setuptools_scm", "hatch_vcs"];

/// Leading distribution name of a PEP 508 requirement.
static REQUIREMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)").unwrap());

/// The tools the dynamic strategies call out to.
///
/// Both run third-party Python code with its own dependencies, so neither
/// runs in-process. [`PythonTools`] is the shipped adapter.
pub trait VersionProvider {
    /// Write a `.dist-info` directory for `source_dir` into `metadata_dir`
    /// and return its name.
    fn prepare_metadata(
        &self,
        source_dir: &Path,
        backend: &BackendSpec,
        metadata_dir: &Path,
    ) -> Result<String>;

    /// The version setuptools_scm reports for `query`.
    fn scm_version(&self, query: &ScmQuery) -> Result<String>;
}

/// How the core package's version is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStrategy {
    Static,
    SourceControlManaged,
    BackendDelegated,
}

impl VersionStrategy {
    /// Classify a core manifest.
    pub fn detect(companion: &Manifest) -> Self {
        if static_version(companion).is_some() {
            VersionStrategy::Static
        } else if uses_scm_plugin(companion) {
            VersionStrategy::SourceControlManaged
        } else {
            VersionStrategy::BackendDelegated
        }
    }

    /// Extra build requirements this strategy needs.
    pub fn requirements(self, companion: &Manifest) -> Vec<String> {
        match self {
            VersionStrategy::Static => Vec::new(),
            VersionStrategy::SourceControlManaged => vec![SCM_REQUIREMENT.to_string()],
            VersionStrategy::BackendDelegated => std::iter::once(HOOKS_REQUIREMENT.to_string())
                .chain(companion.build_requires())
                .collect(),
        }
    }
}

impl fmt::Display for VersionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionStrategy::Static => write!(f, "static"),
            VersionStrategy::SourceControlManaged => write!(f, "source control"),
            VersionStrategy::BackendDelegated => write!(f, "build backend"),
        }
    }
}

/// Build requirements needed to determine the core package's version.
pub fn requires_for_version(companion: &Manifest) -> Vec<String> {
    VersionStrategy::detect(companion).requirements(companion)
}

/// Determine the core package's version.
pub fn resolve_version(companion: &Manifest, companion_dir: &Path) -> Result<String> {
    resolve_version_with(companion, companion_dir, &PythonTools::new())
}

/// Determine the core package's version, calling out through `provider`
/// for the dynamic strategies.
pub fn resolve_version_with(
    companion: &Manifest,
    companion_dir: &Path,
    provider: &dyn VersionProvider,
) -> Result<String> {
    let strategy = VersionStrategy::detect(companion);
    tracing::debug!(
        "using {} version strategy for {}",
        strategy,
        companion.path().display()
    );

    match strategy {
        VersionStrategy::Static => Ok(static_version(companion).unwrap_or_default().to_string()),
        VersionStrategy::SourceControlManaged => {
            scm::version_from_scm(companion, companion_dir, provider)
        }
        VersionStrategy::BackendDelegated => {
            delegate::version_via_backend(companion, companion_dir, provider)
        }
    }
}

/// `project.version`, unless it is declared dynamic.
fn static_version(companion: &Manifest) -> Option<&str> {
    let project = companion.project()?;
    let version = project
        .get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())?;

    let dynamic = project
        .get("dynamic")
        .and_then(Value::as_array)
        .is_some_and(|fields| fields.iter().any(|f| f.as_str() == Some("version")));

    (!dynamic).then_some(version)
}

fn uses_scm_plugin(companion: &Manifest) -> bool {
    let in_requires = companion
        .build_requires()
        .iter()
        .any(|req| SCM_PLUGINS.contains(&requirement_name(req).as_str()));
    if in_requires {
        return true;
    }

    if companion.lookup(&["tool", "setuptools_scm"]).is_some() {
        return true;
    }

    companion
        .lookup(&["tool", "hatch", "version", "source"])
        .and_then(Value::as_str)
        == Some("vcs")
}

/// Distribution name of a requirement string, normalized with `safe_name`.
///
/// `"Setuptools-SCM[toml] >= 8"` → `"setuptools_scm"`.
pub fn requirement_name(requirement: &str) -> String {
    REQUIREMENT_NAME
        .captures(requirement)
        .map(|caps| safe_name(&caps[1]))
        .unwrap_or_default()
}
