//! Core data structures for Rind.
//!
//! - Manifest loading and the `[tool.rind]` schema
//! - Package name normalization
//! - Configuration and version errors

pub mod errors;
pub mod manifest;
pub mod name;

pub use errors::{ConfigError, VersionError};
pub use manifest::{Manifest, PassthroughExtras, Table, ToolConfig, MANIFEST_NAME, TOOL_NAME};
