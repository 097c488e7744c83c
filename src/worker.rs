// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background thread running inference and batch jobs.
//!
//! The UI thread sends commands and polls results once per frame, so model
//! runs never block drawing. The worker never touches the viewport or the
//! displayed pair; it only hands finished pairs back.

use crate::batch::{process_all, BatchEvent, BatchJob, BatchOutcome, BatchSettings, CancelToken};
use crate::error::{CutoutError, Result};
use crate::io::removal::{RemovalSession, Remover};
use crate::models::pair::ImagePair;
use crate::pipeline::build_pair;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

pub enum WorkerCommand {
    Preview {
        index: usize,
        path: PathBuf,
        model_name: String,
        crop_to_content: bool,
    },
    ProcessAll {
        job: BatchJob,
        settings: BatchSettings,
        cancel: CancelToken,
    },
}

#[derive(Debug)]
pub enum WorkerResult {
    PreviewReady { index: usize, pair: ImagePair },
    PreviewFailed { index: usize, error: String },
    Batch(BatchEvent),
    BatchFinished(std::result::Result<BatchOutcome, String>),
}

/// UI-side handle to the worker thread. Dropping it stops the thread.
pub struct WorkerHandle {
    commands: Sender<WorkerCommand>,
    results: Receiver<WorkerResult>,
}

impl WorkerHandle {
    pub fn spawn(remover: Box<dyn Remover>) -> Self {
        let (command_tx, command_rx) = channel();
        let (result_tx, result_rx) = channel();

        std::thread::spawn(move || {
            let mut worker = Worker {
                remover,
                session: None,
                results: result_tx,
            };
            while let Ok(command) = command_rx.recv() {
                if !worker.handle(command) {
                    break;
                }
            }
            log::debug!("Worker thread exiting");
        });

        Self {
            commands: command_tx,
            results: result_rx,
        }
    }

    pub fn send(&self, command: WorkerCommand) {
        if self.commands.send(command).is_err() {
            log::error!("Worker thread is gone, command dropped");
        }
    }

    /// Next finished result, if any.
    pub fn try_recv(&self) -> Option<WorkerResult> {
        match self.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Worker thread disconnected");
                None
            }
        }
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<WorkerResult> {
        self.results.recv_timeout(timeout).ok()
    }
}

struct Worker {
    remover: Box<dyn Remover>,
    /// Cached preview session, replaced when the model changes.
    session: Option<Box<dyn RemovalSession>>,
    results: Sender<WorkerResult>,
}

impl Worker {
    /// Returns false once the UI side has hung up.
    fn handle(&mut self, command: WorkerCommand) -> bool {
        match command {
            WorkerCommand::Preview {
                index,
                path,
                model_name,
                crop_to_content,
            } => {
                let result = match self.preview(&path, &model_name, crop_to_content) {
                    Ok(pair) => WorkerResult::PreviewReady { index, pair },
                    Err(e) => {
                        log::error!("Error in preview of {}: {}", path.display(), e);
                        WorkerResult::PreviewFailed {
                            index,
                            error: e.to_string(),
                        }
                    }
                };
                self.results.send(result).is_ok()
            }
            WorkerCommand::ProcessAll {
                job,
                settings,
                cancel,
            } => {
                let results = self.results.clone();
                let outcome = process_all(&job, &settings, self.remover.as_ref(), &cancel, |event| {
                    // Nobody is listening any more, stop after this file
                    if results.send(WorkerResult::Batch(event)).is_err() && !cancel.is_cancelled() {
                        log::warn!("UI disconnected, cancelling batch");
                        cancel.cancel();
                    }
                })
                .map_err(|e| {
                    log::error!("Batch failed: {}", e);
                    e.to_string()
                });
                self.results.send(WorkerResult::BatchFinished(outcome)).is_ok()
            }
        }
    }

    fn preview(&mut self, path: &Path, model_name: &str, crop: bool) -> Result<ImagePair> {
        let stale = self
            .session
            .as_ref()
            .map_or(true, |s| s.model_name() != model_name);
        if stale {
            log::info!("Opening session for model {}", model_name);
            self.session = None;
            self.session = Some(self.remover.new_session(model_name)?);
        }

        let session = self
            .session
            .as_mut()
            .ok_or_else(|| CutoutError::Model("no session".to_string()))?;
        build_pair(path, session.as_mut(), crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::list_files;
    use crate::test_support::{write_png, FakeRemover, Mask};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn preview(index: usize, path: PathBuf, model: &str) -> WorkerCommand {
        WorkerCommand::Preview {
            index,
            path,
            model_name: model.to_string(),
            crop_to_content: false,
        }
    }

    #[test]
    fn test_preview_roundtrip_reuses_session() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 12, 8);
        let remover = FakeRemover::new(Mask::CenterHalf);
        let handle = WorkerHandle::spawn(Box::new(remover.clone()));

        for index in 0..2 {
            handle.send(preview(index, dir.path().join("a.png"), "u2net"));
            match handle.recv_timeout(TIMEOUT) {
                Some(WorkerResult::PreviewReady { index: got, pair }) => {
                    assert_eq!(got, index);
                    assert_eq!(pair.original_size(), (12, 8));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
        assert_eq!(remover.sessions_opened(), 1);

        handle.send(preview(0, dir.path().join("a.png"), "silueta"));
        assert!(matches!(
            handle.recv_timeout(TIMEOUT),
            Some(WorkerResult::PreviewReady { .. })
        ));
        assert_eq!(remover.sessions_opened(), 2);
    }

    #[test]
    fn test_preview_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let handle = WorkerHandle::spawn(Box::new(FakeRemover::new(Mask::CenterHalf)));
        handle.send(preview(3, dir.path().join("missing.png"), "u2net"));
        assert!(matches!(
            handle.recv_timeout(TIMEOUT),
            Some(WorkerResult::PreviewFailed { index: 3, .. })
        ));
    }

    #[test]
    fn test_batch_streams_events_then_finishes() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png"] {
            write_png(input.path(), name, 4, 4);
        }
        let handle = WorkerHandle::spawn(Box::new(FakeRemover::new(Mask::CenterHalf)));
        handle.send(WorkerCommand::ProcessAll {
            job: list_files(input.path()).unwrap(),
            settings: BatchSettings {
                output_folder: output.path().to_path_buf(),
                model_name: "u2net".to_string(),
                crop_to_content: false,
            },
            cancel: CancelToken::new(),
        });

        let mut processed = 0;
        loop {
            match handle.recv_timeout(TIMEOUT) {
                Some(WorkerResult::Batch(BatchEvent::Processed { .. })) => processed += 1,
                Some(WorkerResult::Batch(_)) => {}
                Some(WorkerResult::BatchFinished(outcome)) => {
                    assert_eq!(outcome.unwrap().processed, 2);
                    break;
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
        assert_eq!(processed, 2);
    }

    #[test]
    fn test_batch_stops_when_ui_hangs_up() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_png(input.path(), name, 4, 4);
        }
        let (results, receiver) = channel();
        drop(receiver);
        let mut worker = Worker {
            remover: Box::new(FakeRemover::new(Mask::CenterHalf)),
            session: None,
            results,
        };

        let cancel = CancelToken::new();
        let keep_running = worker.handle(WorkerCommand::ProcessAll {
            job: list_files(input.path()).unwrap(),
            settings: BatchSettings {
                output_folder: output.path().to_path_buf(),
                model_name: "u2net".to_string(),
                crop_to_content: false,
            },
            cancel: cancel.clone(),
        });

        assert!(!keep_running);
        assert!(cancel.is_cancelled());
        assert!(output.path().join("a_no_bg.png").is_file());
        assert!(!output.path().join("b_no_bg.png").exists());
        assert!(!output.path().join("c_no_bg.png").exists());
    }
}
