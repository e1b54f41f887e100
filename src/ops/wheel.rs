//! Metadata-only wheel writer.
//!
//! A wheel here holds nothing but `{name}-{version}.dist-info/` with
//! METADATA, WHEEL and RECORD.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::core::name::{dist_info_dir, wheel_filename};
use crate::ops::core_metadata::{render_metadata, render_wheel_file};
use crate::ops::metadata::ResolvedMetadata;
use crate::util::fs::{ensure_dir, finalize, read_to_string, staging_file, write_string};
use crate::util::hash::record_hash;

/// Write the `.dist-info` directory into `metadata_dir`; returns its name.
pub fn write_dist_info(meta: &ResolvedMetadata, metadata_dir: &Path) -> Result<String> {
    let dist_info = dist_info_dir(&meta.name, &meta.version);
    let dir = metadata_dir.join(&dist_info);
    ensure_dir(&dir)?;

    write_string(&dir.join("METADATA"), &render_metadata(meta))?;
    write_string(&dir.join("WHEEL"), &render_wheel_file())?;

    tracing::debug!("wrote {}", dir.display());
    Ok(dist_info)
}

/// Build the wheel into `wheel_dir`; returns the wheel's file name.
///
/// If `metadata_dir` holds a `.dist-info` prepared earlier for the same
/// name and version, its METADATA is reused verbatim.
pub fn write_wheel(
    meta: &ResolvedMetadata,
    wheel_dir: &Path,
    metadata_dir: Option<&Path>,
) -> Result<String> {
    let filename = wheel_filename(&meta.name, &meta.version);
    let dist_info = dist_info_dir(&meta.name, &meta.version);

    let metadata = match prepared_metadata(metadata_dir, &dist_info)? {
        Some(prepared) => prepared,
        None => render_metadata(meta),
    };
    let wheel = render_wheel_file();

    let members = [
        (format!("{}/METADATA", dist_info), metadata.into_bytes()),
        (format!("{}/WHEEL", dist_info), wheel.into_bytes()),
    ];

    let mut record = String::new();
    for (path, data) in &members {
        record.push_str(&format!("{},{},{}\n", path, record_hash(data), data.len()));
    }
    let record_path = format!("{}/RECORD", dist_info);
    record.push_str(&format!("{},,\n", record_path));

    let staged = staging_file(wheel_dir)?;
    {
        let mut zip = ZipWriter::new(staged.as_file());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        for (path, data) in members
            .iter()
            .map(|(p, d)| (p.as_str(), d.as_slice()))
            .chain(std::iter::once((record_path.as_str(), record.as_bytes())))
        {
            zip.start_file(path, options)
                .with_context(|| format!("failed to add {} to wheel", path))?;
            zip.write_all(data)?;
        }

        zip.finish().context("failed to finish wheel archive")?;
    }

    let dest = wheel_dir.join(&filename);
    finalize(staged, &dest)?;
    tracing::info!("Built {}", dest.display());

    Ok(filename)
}

fn prepared_metadata(metadata_dir: Option<&Path>, dist_info: &str) -> Result<Option<String>> {
    let Some(dir) = metadata_dir else {
        return Ok(None);
    };
    let path = dir.join(dist_info).join("METADATA");
    if !path.is_file() {
        tracing::debug!(
            "no prepared metadata at {}, rendering it again",
            path.display()
        );
        return Ok(None);
    }
    read_to_string(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Table;
    use crate::ops::metadata::{MetadataFields, OptionalDependencies};
    use std::fs::File;
    use std::io::Read;
    use tempfile::TempDir;

    fn resolved() -> ResolvedMetadata {
        ResolvedMetadata {
            name: "acme".to_string(),
            version: "2.0.0".to_string(),
            metadata_fields: MetadataFields {
                description: Some("Batteries".to_string()),
                ..Default::default()
            },
            dependencies: vec!["acme-core[fast]==2.0.0".to_string()],
            optional_deps: OptionalDependencies::default(),
            core_package: "acme-core".to_string(),
            core_project: Table::new(),
        }
    }

    fn read_member(wheel: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(File::open(wheel).unwrap()).unwrap();
        let mut member = archive.by_name(name).unwrap();
        let mut contents = String::new();
        member.read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn test_wheel_layout() {
        let tmp = TempDir::new().unwrap();
        let filename = write_wheel(&resolved(), tmp.path(), None).unwrap();
        assert_eq!(filename, "acme-2.0.0-py3-none-any.whl");

        let wheel = tmp.path().join(&filename);
        let archive = zip::ZipArchive::new(File::open(&wheel).unwrap()).unwrap();
        let names: Vec<_> = archive.file_names().map(str::to_string).collect();

        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.starts_with("acme-2.0.0.dist-info/")));
        assert!(names.contains(&"acme-2.0.0.dist-info/METADATA".to_string()));
        assert!(names.contains(&"acme-2.0.0.dist-info/WHEEL".to_string()));
        assert!(names.contains(&"acme-2.0.0.dist-info/RECORD".to_string()));

        // Only the finished wheel remains.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_record_matches_members() {
        let tmp = TempDir::new().unwrap();
        let filename = write_wheel(&resolved(), tmp.path(), None).unwrap();
        let wheel = tmp.path().join(filename);

        let record = read_member(&wheel, "acme-2.0.0.dist-info/RECORD");
        let lines: Vec<_> = record.lines().collect();
        assert_eq!(lines.len(), 3);

        let metadata = read_member(&wheel, "acme-2.0.0.dist-info/METADATA");
        assert_eq!(
            lines[0],
            format!(
                "acme-2.0.0.dist-info/METADATA,{},{}",
                record_hash(metadata.as_bytes()),
                metadata.len()
            )
        );
        assert!(lines[1].starts_with("acme-2.0.0.dist-info/WHEEL,sha256="));
        assert_eq!(lines[2], "acme-2.0.0.dist-info/RECORD,,");
    }

    #[test]
    fn test_prepared_metadata_is_reused() {
        let tmp = TempDir::new().unwrap();
        let prepared = tmp.path().join("prepared");
        let out = tmp.path().join("out");

        let dist_info = write_dist_info(&resolved(), &prepared).unwrap();
        assert_eq!(dist_info, "acme-2.0.0.dist-info");
        let metadata_path = prepared.join(&dist_info).join("METADATA");
        let original = std::fs::read_to_string(&metadata_path).unwrap();
        assert!(original.contains("Summary: Batteries"));
        assert!(prepared.join(&dist_info).join("WHEEL").exists());

        let edited = original.replace("Batteries", "Prepared");
        std::fs::write(&metadata_path, &edited).unwrap();

        let filename = write_wheel(&resolved(), &out, Some(&prepared)).unwrap();
        let metadata = read_member(&out.join(filename), "acme-2.0.0.dist-info/METADATA");
        assert_eq!(metadata, edited);
    }

    #[test]
    fn test_wheel_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");

        let name = write_wheel(&resolved(), &a, None).unwrap();
        write_wheel(&resolved(), &b, None).unwrap();

        assert_eq!(
            std::fs::read(a.join(&name)).unwrap(),
            std::fs::read(b.join(&name)).unwrap()
        );
    }
}
