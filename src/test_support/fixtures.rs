//! Test fixtures for common test scenarios.
//!
//! Pre-built pyproject.toml documents and a helper that lays out a core
//! package next to a meta package on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Core package with a static version and every inheritable field.
pub const CORE_STATIC: &str = r#"[project]
name = "acme-core"
version = "2.0.0"
description = "Acme core library"
requires-python = ">=3.9"
license = {text = "MIT"}
authors = [
    {name = "Ada", email = "ada@example.com"},
    {email = "team@example.com"},
    {name = "Grace"},
]
classifiers = ["Programming Language :: Python :: 3"]
keywords = ["acme", "core"]

[project.urls]
Homepage = "https://example.com"
Source = "https://example.com/src"

[project.optional-dependencies]
a = ["dep-a>=1"]
b = ["dep-b>=2"]
c = ["dep-c>=3"]
fast = ["uvloop"]

[build-system]
requires = ["setuptools>=61"]
build-backend = "setuptools.build_meta"
"#;

/// Core package versioned from git tags.
pub const CORE_SCM: &str = r#"[project]
name = "acme-core"
description = "Acme core library"
dynamic = ["version"]

[project.optional-dependencies]
recommended = ["requests"]
test = ["pytest"]

[build-system]
requires = ["setuptools>=61", "setuptools_scm>=8"]
build-backend = "setuptools.build_meta"

[tool.setuptools_scm]
"#;

/// Meta package pinning `acme-core[fast]`.
pub const META_BASIC: &str = r#"[build-system]
requires = ["rind"]
build-backend = "rind"

[project]
name = "acme"

[tool.rind]
core-path = "../core"
include-extras = ["fast"]
passthrough-extras = ["a", "b"]
"#;

/// A core package and a meta package side by side in a temporary directory.
pub struct ProjectFixture {
    tmp: TempDir,
}

impl ProjectFixture {
    /// Write `core/pyproject.toml` and `meta/pyproject.toml`.
    pub fn new(core: &str, meta: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let fixture = ProjectFixture { tmp };
        fixture.write("core/pyproject.toml", core);
        fixture.write("meta/pyproject.toml", meta);
        fixture
    }

    /// Only a meta package, no core next to it.
    pub fn meta_only(meta: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let fixture = ProjectFixture { tmp };
        fixture.write("meta/pyproject.toml", meta);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn core_dir(&self) -> PathBuf {
        self.tmp.path().join("core")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.tmp.path().join("meta")
    }

    /// Write a file relative to the fixture root.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// A fresh empty directory inside the fixture.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.tmp.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }
}
