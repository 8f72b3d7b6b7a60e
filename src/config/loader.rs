use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "httpreplay.json";

/// Defaults read from `httpreplay.json`. Command line flags win over these.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplayConfig {
    pub output: Option<PathBuf>,
    pub retry: Option<u32>,
    pub sleep: Option<u64>,
    pub timeout: Option<u64>,
    pub keep_going: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ReplayConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

impl LoadedConfig {
    /// Configured output prefix, relative ones resolved against the config directory.
    pub fn output(&self) -> Option<PathBuf> {
        self.config.output.as_ref().map(|output| {
            if output.is_absolute() {
                output.clone()
            } else {
                self.dir.join(output)
            }
        })
    }
}

pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        (resolved, dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: ReplayConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}
