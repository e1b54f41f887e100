//! The Python adapter for [`VersionProvider`].
//!
//! Both queries run in a fresh interpreter found on `PATH`. Results come back
//! through a file in a scratch directory so that anything the third-party
//! code prints cannot corrupt them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::util::fs::read_to_string;
use crate::util::process::{find_python, ProcessBuilder};
use crate::version::delegate::BackendSpec;
use crate::version::scm::ScmQuery;
use crate::version::VersionProvider;

/// argv: source_dir, backend, metadata_dir, result_file, *backend_path
const HOOK_SCRIPT: &str = r#"
import sys
from pyproject_hooks import BuildBackendHookCaller

source_dir, backend, metadata_dir, result_file = sys.argv[1:5]
backend_path = sys.argv[5:] or None

hooks = BuildBackendHookCaller(source_dir, backend, backend_path=backend_path)
dist_info = hooks.prepare_metadata_for_build_wheel(metadata_dir)

with open(result_file, "w") as fp:
    fp.write(dist_info)
"#;

/// argv: options_json, result_file
const SCM_SCRIPT: &str = r#"
import inspect
import json
import sys
from setuptools_scm import get_version

options = json.loads(sys.argv[1])
result_file = sys.argv[2]

accepted = inspect.signature(get_version).parameters
ignored = sorted(key for key in options if key not in accepted)
if ignored:
    print("ignoring setuptools_scm options: " + ", ".join(ignored), file=sys.stderr)

version = get_version(**{key: value for key, value in options.items() if key in accepted})

with open(result_file, "w") as fp:
    fp.write(version)
"#;

/// Runs build-backend hooks and setuptools_scm in a Python subprocess.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonTools;

impl PythonTools {
    pub fn new() -> Self {
        PythonTools
    }

    fn python(&self, purpose: &str) -> Result<PathBuf> {
        find_python().with_context(|| {
            format!(
                "no Python interpreter found on PATH; one is needed to run {}",
                purpose
            )
        })
    }
}

impl VersionProvider for PythonTools {
    fn prepare_metadata(
        &self,
        source_dir: &Path,
        backend: &BackendSpec,
        metadata_dir: &Path,
    ) -> Result<String> {
        let python = self.python(&format!("the core package's build backend `{}`", backend.backend))?;
        let result_file = metadata_dir.join(".rind-dist-info-name");

        tracing::debug!(
            "Calling `{}.prepare_metadata_for_build_wheel()` in {}",
            backend.backend,
            source_dir.display()
        );

        ProcessBuilder::new(&python)
            .arg("-c")
            .arg(HOOK_SCRIPT)
            .arg(source_dir)
            .arg(&backend.backend)
            .arg(metadata_dir)
            .arg(&result_file)
            .args(&backend.backend_path)
            .cwd(source_dir)
            .exec_and_check()
            .with_context(|| {
                format!(
                    "call to `{}.prepare_metadata_for_build_wheel` failed",
                    backend.backend
                )
            })?;

        let name = read_to_string(&result_file)?;
        Ok(name.trim().to_string())
    }

    fn scm_version(&self, query: &ScmQuery) -> Result<String> {
        let python = self.python("setuptools_scm")?;
        let scratch = TempDir::new().context("failed to create temporary directory")?;
        let result_file = scratch.path().join("version");

        tracing::debug!("Calling `setuptools_scm.get_version()` in {}", query.workdir().display());

        let output = ProcessBuilder::new(&python)
            .arg("-c")
            .arg(SCM_SCRIPT)
            .arg(query.to_json()?)
            .arg(&result_file)
            .cwd(query.workdir())
            .exec_and_check()
            .context("call to `setuptools_scm.get_version` failed")?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!("setuptools_scm: {}", stderr.trim());
        }

        read_to_string(&result_file)
    }
}
