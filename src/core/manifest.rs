//! pyproject.toml loading and the `[tool.rind]` schema.
//!
//! The document is kept as an ordered key-value tree (`serde_json::Value`
//! with insertion order preserved) so that project tables read from TOML and
//! project tables restored from the build-info cache look exactly the same to
//! the metadata resolver.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::core::errors::ConfigError;
use crate::util::fs::read_to_string;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "pyproject.toml";

/// Key of this backend's table under `[tool]`.
pub const TOOL_NAME: &str = "rind";

/// Sentinel that passes through every extra of the core package.
pub const WILDCARD: &str = "*";

/// An ordered table of manifest values.
pub type Table = serde_json::Map<String, Value>;

/// A parsed pyproject.toml.
#[derive(Debug, Clone)]
pub struct Manifest {
    document: Table,
    path: PathBuf,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        Self::parse(&contents, path)
    }

    /// Parse manifest text; `path` is used for messages and to locate the
    /// manifest's directory.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let raw: toml::Table = toml::from_str(contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let document = match serde_json::to_value(raw)
            .with_context(|| format!("failed to convert {}", path.display()))?
        {
            Value::Object(map) => map,
            _ => Table::new(),
        };

        Ok(Manifest {
            document,
            path: path.to_path_buf(),
        })
    }

    /// Path the manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Follow a chain of table keys.
    pub fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.document.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// The `[project]` table, if any.
    pub fn project(&self) -> Option<&Table> {
        self.lookup(&["project"]).and_then(Value::as_object)
    }

    /// The `[project]` table, or an empty table.
    pub fn project_or_empty(&self) -> Table {
        self.project().cloned().unwrap_or_default()
    }

    /// `build-system.requires`, in declared order.
    pub fn build_requires(&self) -> Vec<String> {
        string_list(self.lookup(&["build-system", "requires"]))
    }

    /// `build-system.build-backend`, treating an empty string as absent.
    pub fn build_backend(&self) -> Option<&str> {
        self.lookup(&["build-system", "build-backend"])
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// `build-system.backend-path`.
    pub fn backend_path(&self) -> Vec<String> {
        string_list(self.lookup(&["build-system", "backend-path"]))
    }

    /// The parsed `[tool.rind]` table (defaults when absent).
    pub fn tool_config(&self) -> Result<ToolConfig> {
        match self.lookup(&["tool", TOOL_NAME]) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                ConfigError::InvalidField {
                    field: format!("tool.{}", TOOL_NAME),
                    location: self.path.display().to_string(),
                    reason: e.to_string(),
                }
                .into()
            }),
            None => Ok(ToolConfig::default()),
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Configuration from `[tool.rind]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Distribution name override
    #[serde(default)]
    pub name: Option<String>,

    /// Directory of the core package, relative to this manifest
    #[serde(default)]
    pub core_path: Option<String>,

    /// Inherit metadata fields from the core package (default: true)
    #[serde(default = "default_true")]
    pub inherit_metadata: bool,

    /// Extras folded into the core dependency
    #[serde(default)]
    pub include_extras: Vec<String>,

    /// Requirements appended verbatim after the core dependency
    #[serde(default)]
    pub additional_dependencies: Vec<String>,

    /// Core extras re-exported as extras of this package
    #[serde(default)]
    pub passthrough_extras: PassthroughExtras,

    /// Everything else, including metadata field overrides
    #[serde(flatten)]
    pub overrides: Table,
}

fn default_true() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            name: None,
            core_path: None,
            inherit_metadata: true,
            include_extras: Vec::new(),
            additional_dependencies: Vec::new(),
            passthrough_extras: PassthroughExtras::default(),
            overrides: Table::new(),
        }
    }
}

/// Which core extras to re-export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPassthrough")]
pub enum PassthroughExtras {
    /// These extras, in this order
    Listed(Vec<String>),
    /// Every optional-dependency group the core package declares
    All,
}

impl Default for PassthroughExtras {
    fn default() -> Self {
        PassthroughExtras::Listed(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPassthrough {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<RawPassthrough> for PassthroughExtras {
    type Error = ConfigError;

    fn try_from(raw: RawPassthrough) -> Result<Self, Self::Error> {
        let names = match raw {
            RawPassthrough::One(name) => vec![name],
            RawPassthrough::Many(names) => names,
        };

        if !names.iter().any(|n| n == WILDCARD) {
            return Ok(PassthroughExtras::Listed(names));
        }
        if names.len() == 1 {
            Ok(PassthroughExtras::All)
        } else {
            Err(ConfigError::MixedWildcard)
        }
    }
}
