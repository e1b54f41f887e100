//! Test utilities for Rind unit tests.
//!
//! Fixture projects, git repositories, and a stand-in for the Python tools
//! the dynamic version strategies call.

pub mod fixtures;
pub mod git;

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::name::dist_info_dir;
use crate::version::{BackendSpec, ScmQuery, VersionProvider};

pub use fixtures::*;

/// A [`VersionProvider`] that answers with a canned version and records its
/// calls.
#[derive(Debug, Default)]
pub struct FakeProvider {
    name: String,
    version: Option<String>,
    failure: Option<String>,
    calls: RefCell<Vec<(PathBuf, BackendSpec, PathBuf)>>,
    scm_queries: RefCell<Vec<ScmQuery>>,
}

impl FakeProvider {
    pub fn new(name: &str, version: &str) -> Self {
        FakeProvider {
            name: name.to_string(),
            version: Some(version.to_string()),
            ..Default::default()
        }
    }

    /// Produces METADATA with no Version header.
    pub fn without_version(name: &str) -> Self {
        FakeProvider {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Fails every call with `message`.
    pub fn failing(message: &str) -> Self {
        FakeProvider {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// `(source_dir, backend, metadata_dir)` of every backend call so far.
    pub fn calls(&self) -> Vec<(PathBuf, BackendSpec, PathBuf)> {
        self.calls.borrow().clone()
    }

    /// Every setuptools_scm query so far.
    pub fn scm_queries(&self) -> Vec<ScmQuery> {
        self.scm_queries.borrow().clone()
    }
}

impl VersionProvider for FakeProvider {
    fn prepare_metadata(
        &self,
        source_dir: &Path,
        backend: &BackendSpec,
        metadata_dir: &Path,
    ) -> Result<String> {
        self.calls.borrow_mut().push((
            source_dir.to_path_buf(),
            backend.clone(),
            metadata_dir.to_path_buf(),
        ));

        if let Some(message) = &self.failure {
            bail!("{}", message);
        }

        let version = self.version.as_deref().unwrap_or("0");
        let dir = dist_info_dir(&self.name, version);
        fs::create_dir_all(metadata_dir.join(&dir))?;

        let mut metadata = format!("Metadata-Version: 2.1\nName: {}\n", self.name);
        if let Some(version) = &self.version {
            metadata.push_str(&format!("Version: {}\n", version));
        }
        fs::write(metadata_dir.join(&dir).join("METADATA"), metadata)?;

        Ok(dir)
    }

    fn scm_version(&self, query: &ScmQuery) -> Result<String> {
        self.scm_queries.borrow_mut().push(query.clone());

        if let Some(message) = &self.failure {
            bail!("{}", message);
        }
        match &self.version {
            Some(version) => Ok(version.clone()),
            None => bail!("no version configured for {}", self.name),
        }
    }
}
