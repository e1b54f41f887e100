//! Core metadata documents: METADATA, WHEEL and PKG-INFO.

use crate::core::name::WHEEL_TAG;
use crate::ops::metadata::{License, ResolvedMetadata};

/// Core metadata version written to METADATA and PKG-INFO.
pub const METADATA_VERSION: &str = "2.1";

/// Generator tag in the WHEEL file.
pub fn generator() -> String {
    format!("rind {}", env!("CARGO_PKG_VERSION"))
}

/// The wheel's METADATA document.
pub fn render_metadata(meta: &ResolvedMetadata) -> String {
    let fields = &meta.metadata_fields;
    let mut lines = vec![
        format!("Metadata-Version: {}", METADATA_VERSION),
        format!("Name: {}", meta.name),
        format!("Version: {}", meta.version),
    ];

    if let Some(description) = non_empty(fields.description.as_deref()) {
        lines.push(format!("Summary: {}", description));
    }

    if let Some(requires_python) = non_empty(fields.requires_python.as_deref()) {
        lines.push(format!("Requires-Python: {}", requires_python));
    }

    if let Some(license) = fields.license.as_ref().filter(|l| is_declared(l)) {
        lines.push(format!("License: {}", license.text()));
    }

    for (label, url) in fields.urls.iter().flatten() {
        lines.push(format!("Project-URL: {}, {}", label, url));
    }

    if let Some(authors) = &fields.authors {
        let names: Vec<&str> = authors.iter().filter_map(|a| a.name.as_deref()).collect();
        if !names.is_empty() {
            lines.push(format!("Author: {}", names.join(", ")));
        }
        let emails: Vec<&str> = authors.iter().filter_map(|a| a.email.as_deref()).collect();
        if !emails.is_empty() {
            lines.push(format!("Author-email: {}", emails.join(", ")));
        }
    }

    for classifier in fields.classifiers.iter().flatten() {
        lines.push(format!("Classifier: {}", classifier));
    }

    if let Some(keywords) = &fields.keywords {
        let joined = keywords.joined();
        if !joined.is_empty() {
            lines.push(format!("Keywords: {}", joined));
        }
    }

    for dep in &meta.dependencies {
        lines.push(format!("Requires-Dist: {}", dep));
    }

    for (extra, deps) in meta.optional_deps.iter() {
        lines.push(format!("Provides-Extra: {}", extra));
        for dep in deps {
            lines.push(format!("Requires-Dist: {}; extra == '{}'", dep, extra));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The wheel's WHEEL document.
pub fn render_wheel_file() -> String {
    format!(
        "Wheel-Version: 1.0\nGenerator: {}\nRoot-Is-Purelib: true\nTag: {}\n",
        generator(),
        WHEEL_TAG
    )
}

/// The sdist's PKG-INFO document.
pub fn render_pkg_info(meta: &ResolvedMetadata) -> String {
    format!(
        "Metadata-Version: {}\nName: {}\nVersion: {}\nSummary: {}\n",
        METADATA_VERSION,
        meta.name,
        meta.version,
        meta.metadata_fields.description.as_deref().unwrap_or("")
    )
}

/// Empty text and an empty table declare nothing; a `{file = ...}` table
/// still gets a (blank) `License:` line.
fn is_declared(license: &License) -> bool {
    match license {
        License::Text(text) => !text.is_empty(),
        License::Table { text, file } => text.is_some() || file.is_some(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
