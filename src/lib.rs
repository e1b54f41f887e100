//! Rind - A metadata-only build backend for Python meta-packages
//!
//! This crate provides the library behind the `rind` backend: it reads a
//! meta package's configuration, resolves the version of the core package it
//! wraps, and writes wheels and sdists that pin that exact version.

pub mod core;
pub mod ops;
pub mod util;
pub mod version;

/// Test utilities for Rind unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides fixture projects, throwaway git repositories
/// and a fake build backend.
#[cfg(test)]
pub mod test_support;

pub use core::{ConfigError, Manifest, ToolConfig, VersionError};
pub use ops::{BuildInfo, ResolvedMetadata};
pub use version::VersionStrategy;
