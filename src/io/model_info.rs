// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Model weight file lookup for the model info line.
//!
//! This is a diagnostic only. When the active backend reports where it keeps
//! weights, that directory is used; otherwise the usual `~/.u2net` cache is
//! guessed.

use super::removal::Remover;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelInfoProvider {
    /// Directory reported by the removal backend.
    Backend(PathBuf),
    /// Guessed cache directory.
    Heuristic(PathBuf),
}

impl ModelInfoProvider {
    pub fn detect(remover: &dyn Remover) -> Self {
        match remover.model_dir() {
            Some(dir) => ModelInfoProvider::Backend(dir),
            None => ModelInfoProvider::Heuristic(
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".u2net"),
            ),
        }
    }

    pub fn model_path(&self, model: &str) -> PathBuf {
        let dir = match self {
            ModelInfoProvider::Backend(dir) | ModelInfoProvider::Heuristic(dir) => dir,
        };
        dir.join(format!("{model}.onnx"))
    }

    /// One-line summary such as `Model: u2net | File Size: 168.10 MB`.
    pub fn describe(&self, model: &str) -> String {
        let size_text = match file_size_mb(&self.model_path(model)) {
            Some(mb) => format!("{mb:.2} MB"),
            None => match self {
                ModelInfoProvider::Backend(_) => "File not found".to_string(),
                ModelInfoProvider::Heuristic(_) => {
                    "File not found (backend did not report a model directory)".to_string()
                }
            },
        };
        format!("Model: {model} | File Size: {size_text}")
    }
}

fn file_size_mb(path: &Path) -> Option<f64> {
    let meta = std::fs::metadata(path).ok()?;
    meta.is_file()
        .then(|| meta.len() as f64 / (1024.0 * 1024.0))
}
