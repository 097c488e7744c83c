// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Config file serialization.
//!
//! The config is read once at startup and rewritten in full whenever a folder
//! or the model changes, and when the window closes. A missing or unreadable
//! file never stops the application; defaults are used instead.

use crate::error::{CutoutError, Result};
use crate::models::catalog::{is_known_model, DEFAULT_MODEL};
use crate::models::config::PersistedConfig;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "cutout";
const CONFIG_FILE_NAME: &str = "config.json";
const HOME_FALLBACK_NAME: &str = ".cutout_config.json";

/// Per-user config location.
pub fn config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_FALLBACK_NAME),
    }
}

/// Parse a config file.
pub fn import_json(path: &Path) -> Result<PersistedConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json).map_err(|e| CutoutError::Config(e.to_string()))?;
    Ok(config)
}

/// Write a config file, replacing any previous contents.
pub fn export_json(config: &PersistedConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|e| CutoutError::Config(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load the config, falling back to defaults on any problem.
pub fn load_config(path: &Path) -> PersistedConfig {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return PersistedConfig::default();
    }

    let mut config = match import_json(path) {
        Ok(config) => config,
        Err(e) => {
            log::info!("Error loading config {}: {}; using defaults", path.display(), e);
            return PersistedConfig::default();
        }
    };

    if !is_known_model(&config.selected_model) {
        log::warn!(
            "Unknown model '{}' in config, using {}",
            config.selected_model,
            DEFAULT_MODEL
        );
        config.selected_model = DEFAULT_MODEL.to_string();
    }
    config
}

/// Save the config, logging instead of failing.
pub fn save_config(config: &PersistedConfig, path: &Path) {
    match export_json(config, path) {
        Ok(()) => log::debug!("Saved config to {}", path.display()),
        Err(e) => log::error!("Error saving config {}: {}", path.display(), e),
    }
}
