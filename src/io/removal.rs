// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background removal backends.
//!
//! A [`Remover`] opens sessions for a named model; a [`RemovalSession`] turns
//! encoded image bytes into encoded image bytes with an alpha channel. The
//! segmentation itself is opaque to the rest of the application.

use crate::error::{CutoutError, Result};
use crate::models::catalog::is_known_model;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Failures of the inference process count as model errors, not file errors.
fn process_error(program: &Path, action: &str, e: std::io::Error) -> CutoutError {
    CutoutError::Model(format!("failed to {} {}: {}", action, program.display(), e))
}

/// A loaded model, reusable across many images.
pub trait RemovalSession: Send {
    fn model_name(&self) -> &str;

    /// Remove the background from an encoded image.
    fn remove(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Factory for removal sessions.
pub trait Remover: Send {
    fn new_session(&self, model_name: &str) -> Result<Box<dyn RemovalSession>>;

    /// Label for the device inference runs on.
    fn device(&self) -> String {
        "CPU".to_string()
    }

    /// Directory the backend loads model weights from, if it knows.
    fn model_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// Runs the `rembg` command line tool once per image.
pub struct RembgCli {
    program: PathBuf,
}

impl RembgCli {
    pub fn new() -> Self {
        Self::with_program("rembg")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for RembgCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Remover for RembgCli {
    fn new_session(&self, model_name: &str) -> Result<Box<dyn RemovalSession>> {
        if !is_known_model(model_name) {
            return Err(CutoutError::Model(format!("unknown model '{model_name}'")));
        }
        Ok(Box::new(RembgCliSession {
            program: self.program.clone(),
            model: model_name.to_string(),
        }))
    }

    fn model_dir(&self) -> Option<PathBuf> {
        std::env::var_os("U2NET_HOME").map(PathBuf::from)
    }
}

struct RembgCliSession {
    program: PathBuf,
    model: String,
}

impl RemovalSession for RembgCliSession {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn remove(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(["i", "-m", &self.model, "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| process_error(&self.program, "start", e))?;

        // stdin is fed from its own thread while stdout and stderr drain
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CutoutError::Model("stdin not captured".to_string()))?;
        let data = input.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&data));

        let output = child
            .wait_with_output()
            .map_err(|e| process_error(&self.program, "wait for", e))?;
        let write_result = writer
            .join()
            .map_err(|_| CutoutError::Model("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CutoutError::Model(format!(
                "rembg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        write_result.map_err(|e| process_error(&self.program, "write to", e))?;
        if output.stdout.is_empty() {
            return Err(CutoutError::Model("rembg produced no output".to_string()));
        }
        Ok(output.stdout)
    }
}
