//! High-level operations.
//!
//! This module contains the build hooks and everything they are made of:
//! metadata resolution, the build-info cache and the archive writers.

pub mod build_info;
pub mod core_metadata;
pub mod hooks;
pub mod metadata;
pub mod sdist;
pub mod wheel;

pub use build_info::{BuildInfo, BuildInfoFile, CACHED_BUILD_INFO_FILE};
pub use hooks::{
    build_sdist, build_wheel, get_requires_for_build_sdist, get_requires_for_build_wheel,
    prepare_metadata_for_build_wheel,
};
pub use metadata::{
    build_metadata, build_metadata_with, resolve_metadata, MetadataFields, OptionalDependencies,
    ResolvedMetadata, VersionSource,
};
