//! Command implementations

pub mod build_sdist;
pub mod build_wheel;
pub mod metadata;
pub mod prepare_metadata;
pub mod requires;

use std::path::PathBuf;

use anyhow::{Context, Result};
use rind::util::fs::normalize_path;
use rind::util::{ConfigSetting, ConfigSettings};

/// Inputs shared by every hook.
pub struct HookContext {
    pub project_root: PathBuf,
    pub settings: ConfigSettings,
}

impl HookContext {
    pub fn new(project_root: Option<PathBuf>, settings: Vec<ConfigSetting>) -> Result<Self> {
        let project_root = match project_root {
            Some(root) => root,
            None => std::env::current_dir().context("failed to get current directory")?,
        };

        Ok(HookContext {
            project_root: normalize_path(&project_root),
            settings: settings.into_iter().collect(),
        })
    }
}
