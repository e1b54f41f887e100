//! Frontend-supplied configuration settings.
//!
//! Build frontends may pass an opaque `config_settings` mapping to every hook.
//! Rind accepts them (`-C KEY=VALUE` on the command line) so that frontends
//! can forward their settings unchanged, but no resolution step reads them.

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Error};

/// A single `KEY=VALUE` pair as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSetting {
    pub key: String,
    pub value: String,
}

impl FromStr for ConfigSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("expected KEY=VALUE, found `{}`", s);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("config setting `{}` has an empty key", s);
        }
        Ok(ConfigSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Opaque settings forwarded by the build frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSettings {
    entries: BTreeMap<String, Vec<String>>,
}

impl ConfigSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. Repeated keys accumulate, like a frontend's list values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<ConfigSetting> for ConfigSettings {
    fn from_iter<I: IntoIterator<Item = ConfigSetting>>(iter: I) -> Self {
        let mut settings = ConfigSettings::new();
        for setting in iter {
            settings.insert(setting.key, setting.value);
        }
        settings
    }
}
