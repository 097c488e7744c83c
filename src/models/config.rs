// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings remembered between runs.

use super::catalog::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Folders and model choice, stored as a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    #[serde(default)]
    pub input_folder: Option<PathBuf>,
    #[serde(default)]
    pub output_folder: Option<PathBuf>,
    #[serde(default = "default_model")]
    pub selected_model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            input_folder: None,
            output_folder: None,
            selected_model: default_model(),
        }
    }
}
