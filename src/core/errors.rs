//! Error types for configuration and version resolution.
//!
//! Every error is fatal. They are raised where the problem is detected and
//! travel up as `anyhow::Error`, so callers that care can `downcast_ref`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A required piece of configuration is missing or malformed.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("package name is not set")]
    #[diagnostic(
        code(rind::config::missing_name),
        help("set `name = ...` in [tool.rind] or in [project]")
    )]
    MissingName,

    #[error("`core-path` is not set")]
    #[diagnostic(
        code(rind::config::missing_core_path),
        help("set `core-path` in [tool.rind] to the directory containing the core package, e.g. `core-path = \"..\"`")
    )]
    MissingCorePath,

    #[error("could not determine the core package name")]
    #[diagnostic(
        code(rind::config::missing_core_package),
        help("the core package's pyproject.toml must set `name = ...` in [project]")
    )]
    MissingCorePackage,

    #[error("invalid value for `{field}` in {location}: {reason}")]
    #[diagnostic(code(rind::config::invalid_field))]
    InvalidField {
        field: String,
        location: String,
        reason: String,
    },

    #[error("`passthrough-extras` mixes \"*\" with named extras")]
    #[diagnostic(
        code(rind::config::mixed_wildcard),
        help("use `passthrough-extras = [\"*\"]` alone, or list the extras by name")
    )]
    MixedWildcard,
}

/// The core package's version could not be determined.
#[derive(Debug, Error, Diagnostic)]
pub enum VersionError {
    #[error("core package has no build-backend specified")]
    #[diagnostic(
        code(rind::version::missing_build_backend),
        help("set `build-backend` in the core package's [build-system], or give it a static version")
    )]
    MissingBuildBackend,

    #[error("setuptools_scm returned an empty version for {}", .0.display())]
    #[diagnostic(
        code(rind::version::empty_scm_version),
        help("check the core package's [tool.setuptools_scm] settings, or set `fallback_version` there")
    )]
    EmptyScmVersion(PathBuf),

    #[error("metadata produced by `{backend}` has no Version field")]
    #[diagnostic(code(rind::version::missing_version_header))]
    MissingVersionHeader { backend: String },
}
