// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the pipeline, batch controller and config layer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No supported image files found in {}", .0.display())]
    NoImages(PathBuf),
}

impl CutoutError {
    /// True for inference-side failures (bad model, failed run, unusable output).
    pub fn is_model_error(&self) -> bool {
        matches!(self, CutoutError::Model(_))
    }

    /// True for file-side failures (unreadable input, unwritable output, bad format).
    pub fn is_io_error(&self) -> bool {
        matches!(self, CutoutError::Io(_) | CutoutError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, CutoutError>;
