// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Folder listing and batch background removal.
//!
//! A batch walks the listed files in order, writes `<stem>_no_bg.png` for each
//! into the output folder and reports progress through a callback. A file
//! that fails is logged and skipped; the rest of the batch still runs.
//! Cancellation is checked once before each file, never during one.

use crate::error::{CutoutError, Result};
use crate::io::media::{is_supported_image, output_file_name, save_png};
use crate::io::removal::Remover;
use crate::models::pair::ImagePair;
use crate::pipeline::build_pair;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Where the batch controller is in its lifecycle.
///
/// Selecting a new input folder always goes back to `Listing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Listing,
    Processing { done: usize, total: usize },
    Completed { processed: usize },
    Cancelled { processed: usize },
}

impl BatchState {
    pub fn is_processing(&self) -> bool {
        matches!(self, BatchState::Processing { .. })
    }

    pub fn finished(outcome: &BatchOutcome) -> Self {
        if outcome.cancelled {
            BatchState::Cancelled {
                processed: outcome.processed,
            }
        } else {
            BatchState::Completed {
                processed: outcome.processed,
            }
        }
    }
}

/// Files found in one input folder, plus the preview cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub input_folder: PathBuf,
    /// File names, not necessarily valid UTF-8.
    pub files: Vec<OsString>,
    pub cursor: usize,
}

impl BatchJob {
    pub fn path_of(&self, index: usize) -> PathBuf {
        self.input_folder.join(&self.files[index])
    }

    pub fn display_name(&self, index: usize) -> String {
        self.files[index].to_string_lossy().into_owned()
    }

    /// Move the cursor by `offset`, wrapping around both ends.
    pub fn step(&mut self, offset: isize) -> usize {
        let len = self.files.len() as isize;
        if len > 0 {
            self.cursor = (self.cursor as isize + offset).rem_euclid(len) as usize;
        }
        self.cursor
    }
}

/// List supported images directly inside `folder`, sorted by name.
///
/// Fails with [`CutoutError::NoImages`] when nothing matches.
pub fn list_files(folder: &Path) -> Result<BatchJob> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_supported_image(&path) {
            continue;
        }
        if let Some(name) = path.file_name() {
            files.push(name.to_os_string());
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(CutoutError::NoImages(folder.to_path_buf()));
    }
    log::info!("Found {} image(s) in {}", files.len(), folder.display());
    Ok(BatchJob {
        input_folder: folder.to_path_buf(),
        files,
        cursor: 0,
    })
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent {
    /// A file was written; its pair becomes the live preview.
    Processed {
        index: usize,
        output: PathBuf,
        pair: ImagePair,
    },
    Failed {
        index: usize,
        file: String,
        error: String,
    },
    /// Emitted after every file, successful or not.
    Progress { done: usize, total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
    pub cancelled: bool,
}

/// Options fixed for the duration of one batch.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub output_folder: PathBuf,
    pub model_name: String,
    pub crop_to_content: bool,
}

/// Process every file of `job` in order.
///
/// Only an empty job fails the whole call; everything else, including a model
/// that cannot be loaded, is counted per file in the outcome.
pub fn process_all(
    job: &BatchJob,
    settings: &BatchSettings,
    remover: &dyn Remover,
    cancel: &CancelToken,
    mut on_event: impl FnMut(BatchEvent),
) -> Result<BatchOutcome> {
    if job.files.is_empty() {
        return Err(CutoutError::NoImages(job.input_folder.clone()));
    }
    // A model that fails to load fails every file instead of the batch
    let mut session = remover.new_session(&settings.model_name).map_err(|e| {
        log::error!("Failed to load model {}: {}", settings.model_name, e);
        match e {
            CutoutError::Model(message) => message,
            other => other.to_string(),
        }
    });

    let total = job.files.len();
    let mut outcome = BatchOutcome {
        processed: 0,
        failed: 0,
        total,
        cancelled: false,
    };

    log::info!(
        "Processing {} file(s) with {} into {}",
        total,
        settings.model_name,
        settings.output_folder.display()
    );

    for index in 0..total {
        if cancel.is_cancelled() {
            log::info!("Processing cancelled after {} images", outcome.processed);
            outcome.cancelled = true;
            break;
        }

        let file = job.display_name(index);
        let output = settings.output_folder.join(output_file_name(&job.files[index]));
        let result = match session.as_mut() {
            Ok(session) => {
                build_pair(&job.path_of(index), session.as_mut(), settings.crop_to_content)
                    .and_then(|pair| save_png(&pair.processed, &output).map(|()| pair))
            }
            Err(message) => Err(CutoutError::Model(message.clone())),
        };

        match result {
            Ok(pair) => {
                outcome.processed += 1;
                on_event(BatchEvent::Processed {
                    index,
                    output,
                    pair,
                });
            }
            Err(e) => {
                let kind = if e.is_model_error() {
                    "model"
                } else if e.is_io_error() {
                    "file"
                } else {
                    "other"
                };
                log::warn!("Error processing {} ({} error): {}", file, kind, e);
                outcome.failed += 1;
                on_event(BatchEvent::Failed {
                    index,
                    file,
                    error: e.to_string(),
                });
            }
        }
        on_event(BatchEvent::Progress {
            done: index + 1,
            total,
        });
    }

    if !outcome.cancelled {
        log::info!(
            "Processed {}/{} image(s), {} failed",
            outcome.processed,
            outcome.total,
            outcome.failed
        );
    }
    Ok(outcome)
}
