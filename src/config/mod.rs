//! Configuration module for fanout-search
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Load settings from the first file found, or defaults, then apply the environment
///
/// Runs before logging is initialized, so it does not log.
pub fn load() -> Result<Settings> {
    let mut settings = match settings_path() {
        Some(path) => Settings::from_file(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Settings::default(),
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

/// First existing settings file in lookup order
pub fn settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FANOUT_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/fanout-search/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("fanout-search/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}
