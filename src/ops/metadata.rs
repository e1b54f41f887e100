//! Metadata resolution.
//!
//! Merges the meta package's own configuration with what it inherits from
//! the core package into a single [`ResolvedMetadata`] record. Both emitters
//! work from that record, so a wheel and an sdist built in one invocation
//! always agree on name and version.

use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::core::errors::ConfigError;
use crate::core::manifest::{Manifest, PassthroughExtras, Table, ToolConfig, MANIFEST_NAME};
use crate::core::name::core_manifest_path;
use crate::ops::build_info::BuildInfo;
use crate::util::ConfigSettings;
use crate::version::{resolve_version_with, PythonTools, VersionProvider};

/// `license = "MIT"` or `license = {text = "MIT"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum License {
    Text(String),
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<String>,
    },
}

impl License {
    /// Text for the `License:` header. A table without `text` renders empty.
    pub fn text(&self) -> &str {
        match self {
            License::Text(text) => text,
            License::Table { text, .. } => text.as_deref().unwrap_or(""),
        }
    }
}

/// An entry of `authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `keywords` as one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    One(String),
    Many(Vec<String>),
}

impl Keywords {
    /// Comma-joined form for the `Keywords:` header.
    pub fn joined(&self) -> String {
        match self {
            Keywords::One(s) => s.clone(),
            Keywords::Many(list) => list.join(","),
        }
    }
}

/// The seven inheritable metadata fields after priority resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetadataFields {
    pub description: Option<String>,
    pub requires_python: Option<String>,
    pub license: Option<License>,
    pub authors: Option<Vec<Author>>,
    /// `(label, url)` in declared order
    pub urls: Option<Vec<(String, String)>>,
    pub classifiers: Option<Vec<String>>,
    pub keywords: Option<Keywords>,
}

/// Extras of the meta package, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalDependencies(Vec<(String, Vec<String>)>);

impl OptionalDependencies {
    pub fn get(&self, extra: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == extra)
            .map(|(_, deps)| deps.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for OptionalDependencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, deps) in &self.0 {
            map.serialize_entry(name, deps)?;
        }
        map.end()
    }
}

/// Everything the emitters need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMetadata {
    pub name: String,
    pub version: String,
    pub metadata_fields: MetadataFields,
    /// The core dependency first, then `additional-dependencies`
    pub dependencies: Vec<String>,
    pub optional_deps: OptionalDependencies,
    pub core_package: String,
    /// Snapshot of the core package's `[project]` table
    pub core_project: Table,
}

impl ResolvedMetadata {
    /// The cache record that reproduces this resolution.
    pub fn build_info(&self) -> BuildInfo {
        BuildInfo::new(self.version.clone(), self.core_project.clone())
    }
}

/// Where the version and the core project table come from.
#[derive(Debug)]
pub enum VersionSource {
    /// A build-info cache, e.g. inside an unpacked sdist
    Cached(BuildInfo),
    /// The core package's manifest on disk
    Live(Manifest),
}

impl VersionSource {
    /// Prefer the cache in `project_root`; otherwise load the core manifest
    /// named by `core-path`.
    pub fn locate(project_root: &Path, tool: &ToolConfig) -> Result<Self> {
        if let Some(info) = BuildInfo::load(project_root)? {
            return Ok(VersionSource::Cached(info));
        }

        let core_path = tool
            .core_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::MissingCorePath)?;
        let manifest_path = core_manifest_path(project_root, core_path);
        tracing::debug!("reading core manifest {}", manifest_path.display());

        Ok(VersionSource::Live(Manifest::load(&manifest_path)?))
    }

    /// The version and the core package's `[project]` table.
    pub fn resolve(self, provider: &dyn VersionProvider) -> Result<(String, Table)> {
        match self {
            VersionSource::Cached(info) => Ok((info.version, info.core_project)),
            VersionSource::Live(companion) => {
                let version = resolve_version_with(&companion, companion.dir(), provider)?;
                Ok((version, companion.project_or_empty()))
            }
        }
    }
}

/// Resolve metadata for the project in `project_root`.
pub fn build_metadata(project_root: &Path, settings: &ConfigSettings) -> Result<ResolvedMetadata> {
    if !settings.is_empty() {
        tracing::debug!("ignoring {} config setting(s)", settings.len());
    }
    build_metadata_with(project_root, &PythonTools::new())
}

/// [`build_metadata`] with an explicit backend delegate.
pub fn build_metadata_with(
    project_root: &Path,
    provider: &dyn VersionProvider,
) -> Result<ResolvedMetadata> {
    let local = Manifest::load(&project_root.join(MANIFEST_NAME))?;
    let tool = local.tool_config()?;
    resolve_metadata(&tool, &local, project_root, provider)
}

/// Merge local configuration with the core package's version and metadata.
pub fn resolve_metadata(
    tool: &ToolConfig,
    local: &Manifest,
    project_root: &Path,
    provider: &dyn VersionProvider,
) -> Result<ResolvedMetadata> {
    let local_project = local.project_or_empty();

    let name = non_blank(tool.name.clone())
        .or_else(|| non_blank(string_value(local_project.get("name"))))
        .ok_or(ConfigError::MissingName)?;

    let (version, core_project) = VersionSource::locate(project_root, tool)?.resolve(provider)?;

    let empty = Table::new();
    let inherited = if tool.inherit_metadata {
        &core_project
    } else {
        &empty
    };

    let core_package =
        non_blank(string_value(core_project.get("name"))).ok_or(ConfigError::MissingCorePackage)?;

    let mut dependencies = vec![core_dependency(&core_package, &tool.include_extras, &version)];
    dependencies.extend(tool.additional_dependencies.iter().cloned());

    let optional_deps = passthrough_dependencies(
        &tool.passthrough_extras,
        &core_project,
        &core_package,
        &version,
    );

    let sources = FieldSources {
        tool: &tool.overrides,
        local: &local_project,
        inherited,
        local_path: local.path(),
    };
    let metadata_fields = sources.resolve()?;

    tracing::debug!(
        "resolved {} {} pinned to {}",
        name,
        version,
        dependencies[0]
    );

    Ok(ResolvedMetadata {
        name,
        version,
        metadata_fields,
        dependencies,
        optional_deps,
        core_package,
        core_project,
    })
}

/// `core[extra1,extra2]==version`, or `core==version` without extras.
pub fn core_dependency(core_package: &str, extras: &[String], version: &str) -> String {
    if extras.is_empty() {
        format!("{}=={}", core_package, version)
    } else {
        format!("{}[{}]=={}", core_package, extras.join(","), version)
    }
}

/// One `core[extra]==version` requirement per passed-through extra.
pub fn passthrough_dependencies(
    extras: &PassthroughExtras,
    core_project: &Table,
    core_package: &str,
    version: &str,
) -> OptionalDependencies {
    let names: Vec<String> = match extras {
        PassthroughExtras::Listed(names) => names.clone(),
        PassthroughExtras::All => core_project
            .get("optional-dependencies")
            .and_then(Value::as_object)
            .map(|groups| groups.keys().cloned().collect())
            .unwrap_or_default(),
    };

    OptionalDependencies(
        names
            .into_iter()
            .map(|extra| {
                let dep = format!("{}[{}]=={}", core_package, extra, version);
                (extra, vec![dep])
            })
            .collect(),
    )
}

fn string_value(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Empty and whitespace-only strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The three places a metadata field can come from, highest priority first.
struct FieldSources<'a> {
    tool: &'a Table,
    local: &'a Table,
    inherited: &'a Table,
    local_path: &'a Path,
}

impl FieldSources<'_> {
    fn resolve(&self) -> Result<MetadataFields> {
        Ok(MetadataFields {
            description: self.typed("description")?,
            requires_python: self.typed("requires-python")?,
            license: self.typed("license")?,
            authors: self.typed("authors")?,
            urls: self.urls()?,
            classifiers: self.typed("classifiers")?,
            keywords: self.typed("keywords")?,
        })
    }

    /// The winning value and a description of where it came from.
    fn lookup(&self, field: &str) -> Option<(&Value, String)> {
        if let Some(value) = self.tool.get(field) {
            return Some((value, format!("[tool.rind] of {}", self.local_path.display())));
        }
        if let Some(value) = self.local.get(field) {
            return Some((value, format!("[project] of {}", self.local_path.display())));
        }
        self.inherited
            .get(field)
            .map(|value| (value, "the core package's [project]".to_string()))
    }

    fn typed<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>> {
        let Some((value, location)) = self.lookup(field) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| invalid(field, location, e.to_string()))
    }

    fn urls(&self) -> Result<Option<Vec<(String, String)>>> {
        let Some((value, location)) = self.lookup("urls") else {
            return Ok(None);
        };
        let table = value
            .as_object()
            .ok_or_else(|| invalid("urls", location.clone(), "expected a table".to_string()))?;

        table
            .iter()
            .map(|(label, url)| match url.as_str() {
                Some(url) => Ok((label.clone(), url.to_string())),
                None => Err(invalid(
                    "urls",
                    location.clone(),
                    format!("`{}` is not a string", label),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

fn invalid(field: &str, location: String, reason: String) -> anyhow::Error {
    ConfigError::InvalidField {
        field: field.to_string(),
        location,
        reason,
    }
    .into()
}
