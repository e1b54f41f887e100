//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Read a file to bytes.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Remove a file, treating "already gone" as success.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove file: {}", path.display())),
    }
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Create a temporary file inside `dir` that an archive writer can fill.
///
/// The file is deleted on drop unless [`finalize`] moves it into place, so a
/// failed build never leaves a half-written archive behind.
pub fn staging_file(dir: &Path) -> Result<NamedTempFile> {
    ensure_dir(dir)?;
    tempfile::Builder::new()
        .prefix(".rind-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))
}

/// Move a staged file to its final location.
pub fn finalize(staged: NamedTempFile, dest: &Path) -> Result<()> {
    staged
        .persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}
