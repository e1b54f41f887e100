//! Metadata-only sdist writer.
//!
//! The sdist holds the meta package's pyproject.toml, the build-info cache
//! and a PKG-INFO. Building a wheel from it needs neither the core package
//! nor its repository.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, Header};
use tempfile::TempDir;

use crate::core::manifest::MANIFEST_NAME;
use crate::core::name::sdist_basename;
use crate::ops::build_info::CACHED_BUILD_INFO_FILE;
use crate::ops::core_metadata::render_pkg_info;
use crate::ops::metadata::ResolvedMetadata;
use crate::util::fs::{finalize, read, staging_file};

/// Build the sdist into `sdist_dir`; returns the archive's file name.
pub fn write_sdist(
    meta: &ResolvedMetadata,
    project_root: &Path,
    sdist_dir: &Path,
) -> Result<String> {
    let base = sdist_basename(&meta.name, &meta.version);
    let filename = format!("{}.tar.gz", base);

    let manifest = read(&project_root.join(MANIFEST_NAME))?;

    // The cache is written to scratch space, never into the project itself.
    let scratch = TempDir::new().context("failed to create temporary directory")?;
    let mut cache_file = meta.build_info().save(scratch.path())?;
    let cache = read(cache_file.path())?;

    let pkg_info = render_pkg_info(meta);

    let staged = staging_file(sdist_dir)?;
    {
        let encoder = GzEncoder::new(staged.as_file(), Compression::default());
        let mut builder = Builder::new(encoder);

        append_file(&mut builder, &format!("{}/{}", base, MANIFEST_NAME), &manifest)?;
        append_file(
            &mut builder,
            &format!("{}/{}", base, CACHED_BUILD_INFO_FILE),
            &cache,
        )?;
        append_file(&mut builder, &format!("{}/PKG-INFO", base), pkg_info.as_bytes())?;

        let encoder = builder.into_inner().context("failed to finish sdist archive")?;
        encoder.finish().context("failed to compress sdist archive")?;
    }
    cache_file.remove()?;

    let dest = sdist_dir.join(&filename);
    finalize(staged, &dest)?;
    tracing::info!("Built {}", dest.display());

    Ok(filename)
}

fn append_file<W: Write>(builder: &mut Builder<W>, path: &str, data: &[u8]) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder
        .append_data(&mut header, path, data)
        .with_context(|| format!("failed to add {} to sdist", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Table;
    use crate::ops::build_info::BuildInfo;
    use crate::ops::metadata::{MetadataFields, OptionalDependencies};
    use flate2::read::GzDecoder;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::io::Read;
    use tar::Archive;
    use tempfile::TempDir;

    fn resolved() -> ResolvedMetadata {
        let mut core_project = Table::new();
        core_project.insert("name".to_string(), "acme-core".into());
        ResolvedMetadata {
            name: "Acme".to_string(),
            version: "2.0.0".to_string(),
            metadata_fields: MetadataFields::default(),
            dependencies: vec!["acme-core==2.0.0".to_string()],
            optional_deps: OptionalDependencies::default(),
            core_package: "acme-core".to_string(),
            core_project,
        }
    }

    fn members(path: &Path) -> BTreeMap<String, String> {
        let mut archive = Archive::new(GzDecoder::new(File::open(path).unwrap()));
        let mut out = BTreeMap::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            out.insert(name, contents);
        }
        out
    }

    #[test]
    fn test_sdist_contents() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("meta");
        let out = tmp.path().join("dist");
        std::fs::create_dir_all(&project).unwrap();
        let manifest = "[project]\nname = \"Acme\"\n# kept verbatim\n";
        std::fs::write(project.join(MANIFEST_NAME), manifest).unwrap();

        let filename = write_sdist(&resolved(), &project, &out).unwrap();
        assert_eq!(filename, "acme-2.0.0.tar.gz");

        let files = members(&out.join(&filename));
        assert_eq!(
            files.keys().collect::<Vec<_>>(),
            [
                "acme-2.0.0/.rind_cache.json",
                "acme-2.0.0/PKG-INFO",
                "acme-2.0.0/pyproject.toml"
            ]
        );
        assert_eq!(files["acme-2.0.0/pyproject.toml"], manifest);
        assert!(files["acme-2.0.0/PKG-INFO"].contains("Name: Acme\nVersion: 2.0.0\n"));

        let cached: BuildInfo = serde_json::from_str(&files["acme-2.0.0/.rind_cache.json"]).unwrap();
        assert_eq!(cached.version, "2.0.0");
        assert_eq!(cached.core_project["name"], "acme-core");
    }

    #[test]
    fn test_sdist_leaves_no_cache_in_project() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("meta");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join(MANIFEST_NAME), "[project]\n").unwrap();

        write_sdist(&resolved(), &project, &tmp.path().join("dist")).unwrap();

        assert!(!project.join(CACHED_BUILD_INFO_FILE).exists());
    }

    #[test]
    fn test_missing_manifest_leaves_no_archive() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("dist");
        std::fs::create_dir_all(&out).unwrap();

        assert!(write_sdist(&resolved(), &tmp.path().join("missing"), &out).is_err());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
