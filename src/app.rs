// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `CutoutApp` owns every piece of mutable UI state: the folders and model
//! choice, the listed files, the displayed image pair and its viewport. Model
//! work happens on the worker thread; results are applied here, on the UI
//! thread, so nothing else ever mutates the viewport or the pair.

use crate::batch::{list_files, BatchEvent, BatchJob, BatchSettings, BatchState, CancelToken};
use crate::error::CutoutError;
use crate::io::media::to_color_image;
use crate::io::model_info::ModelInfoProvider;
use crate::io::removal::Remover;
use crate::io::serialization::save_config;
use crate::models::config::PersistedConfig;
use crate::models::pair::ImagePair;
use crate::models::viewport::{SurfaceSize, ViewportState, ZoomLimits};
use crate::preview;
use crate::ui::controls::{self, ControlsAction, ControlsInfo};
use crate::ui::preview_panel::{self, PreviewAction, PreviewTextures};
use crate::worker::{WorkerCommand, WorkerHandle, WorkerResult};
use std::path::PathBuf;

/// Show a blocking native message box.
fn notify(level: rfd::MessageLevel, title: &str, description: &str) {
    rfd::MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// The pair on screen and how it is currently viewed.
struct PreviewState {
    pair: ImagePair,
    viewport: ViewportState,
}

/// Main application state.
pub struct CutoutApp {
    /// Folders and model, persisted on every change
    config: PersistedConfig,
    config_path: PathBuf,

    /// Tight-crop processed images to their visible pixels
    crop_to_content: bool,

    /// Files of the current input folder
    job: Option<BatchJob>,

    batch_state: BatchState,
    cancel: Option<CancelToken>,
    /// Files done and total of the running or last batch
    progress: Option<(usize, usize)>,

    /// Pair and viewport being previewed
    preview: Option<PreviewState>,
    textures: Option<PreviewTextures>,
    surface: SurfaceSize,
    zoom_limits: ZoomLimits,

    worker: WorkerHandle,
    model_info: ModelInfoProvider,
    model_info_text: String,
    device: String,

    /// Loading state message
    loading_message: Option<String>,
    status: String,
}

impl CutoutApp {
    /// Create the application around a removal backend and a loaded config.
    pub fn new(remover: Box<dyn Remover>, config: PersistedConfig, config_path: PathBuf) -> Self {
        let model_info = ModelInfoProvider::detect(remover.as_ref());
        let model_info_text = model_info.describe(&config.selected_model);
        let device = remover.device();

        let mut app = Self {
            config,
            config_path,
            crop_to_content: false,
            job: None,
            batch_state: BatchState::Idle,
            cancel: None,
            progress: None,
            preview: None,
            textures: None,
            surface: SurfaceSize::PREVIEW,
            zoom_limits: ZoomLimits::default(),
            worker: WorkerHandle::spawn(remover),
            model_info,
            model_info_text,
            device,
            loading_message: None,
            status: String::new(),
        };

        if app.config.input_folder.is_some() {
            app.list_input_folder();
        }
        app
    }

    fn save_config(&self) {
        save_config(&self.config, &self.config_path);
    }

    /// Re-list the input folder and preview its first file.
    fn list_input_folder(&mut self) {
        let Some(folder) = self.config.input_folder.clone() else {
            return;
        };
        self.batch_state = BatchState::Listing;
        self.job = None;
        self.preview = None;
        self.textures = None;
        self.progress = None;

        match list_files(&folder) {
            Ok(job) => {
                self.job = Some(job);
                self.request_preview(0);
            }
            Err(CutoutError::NoImages(_)) => {
                notify(
                    rfd::MessageLevel::Info,
                    "No Images",
                    "No supported image files found in the selected input folder.",
                );
            }
            Err(e) => {
                log::error!("Failed to list {}: {}", folder.display(), e);
                self.status = format!("Failed to list input folder: {e}");
            }
        }
        self.batch_state = BatchState::Idle;
    }

    /// Ask the worker to build the pair for the file `offset` away from the cursor.
    fn request_preview(&mut self, offset: isize) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let index = job.step(offset);
        let path = job.path_of(index);

        self.loading_message = Some(format!("Removing background from {}...", job.display_name(index)));
        self.worker.send(WorkerCommand::Preview {
            index,
            path,
            model_name: self.config.selected_model.clone(),
            crop_to_content: self.crop_to_content,
        });
    }

    fn select_input_folder(&mut self) {
        if let Some(folder) = rfd::FileDialog::new()
            .set_title("Select Input Folder")
            .pick_folder()
        {
            log::info!("Input folder: {}", folder.display());
            self.config.input_folder = Some(folder);
            self.save_config();
            self.list_input_folder();
        }
    }

    fn select_output_folder(&mut self) {
        if let Some(folder) = rfd::FileDialog::new()
            .set_title("Select Output Folder")
            .pick_folder()
        {
            log::info!("Output folder: {}", folder.display());
            self.config.output_folder = Some(folder);
            self.save_config();
        }
    }

    fn process_folder(&mut self) {
        let (Some(input), Some(output)) = (
            self.config.input_folder.clone(),
            self.config.output_folder.clone(),
        ) else {
            notify(
                rfd::MessageLevel::Warning,
                "Folder Not Selected",
                "Please select both input and output folders first.",
            );
            return;
        };

        if self.job.is_none() {
            self.batch_state = BatchState::Listing;
            match list_files(&input) {
                Ok(job) => self.job = Some(job),
                Err(e) => {
                    log::info!("Nothing to process: {}", e);
                    self.batch_state = BatchState::Idle;
                    notify(
                        rfd::MessageLevel::Info,
                        "No Images",
                        "No supported image files found in the selected input folder.",
                    );
                    return;
                }
            }
        }
        let Some(job) = self.job.clone() else {
            return;
        };

        let cancel = CancelToken::new();
        self.cancel = Some(cancel.clone());
        self.batch_state = BatchState::Processing {
            done: 0,
            total: job.files.len(),
        };
        self.progress = Some((0, job.files.len()));
        self.status.clear();
        self.worker.send(WorkerCommand::ProcessAll {
            job,
            settings: BatchSettings {
                output_folder: output,
                model_name: self.config.selected_model.clone(),
                crop_to_content: self.crop_to_content,
            },
            cancel,
        });
    }

    fn cancel_processing(&mut self) {
        if let Some(cancel) = &self.cancel {
            log::info!("Cancel requested");
            cancel.cancel();
        }
    }

    /// Show a freshly built pair, resetting the viewport to fit.
    fn show_pair(&mut self, ctx: &egui::Context, pair: ImagePair) {
        let viewport = ViewportState::fit(
            pair.original_size(),
            pair.processed_size(),
            self.surface,
            self.zoom_limits,
        );
        self.preview = Some(PreviewState { pair, viewport });
        self.render_previews(ctx);
    }

    /// Re-render both surfaces from the current pair and viewport.
    fn render_previews(&mut self, ctx: &egui::Context) {
        let Some(state) = &self.preview else {
            return;
        };
        let (original, processed) = preview::render(&state.pair, &state.viewport, self.surface);
        let original = to_color_image(&original);
        let processed = to_color_image(&processed);

        match &mut self.textures {
            Some(textures) => {
                textures.original.set(original, egui::TextureOptions::LINEAR);
                textures.processed.set(processed, egui::TextureOptions::LINEAR);
            }
            None => {
                self.textures = Some(PreviewTextures {
                    original: ctx.load_texture("preview_original", original, egui::TextureOptions::LINEAR),
                    processed: ctx.load_texture("preview_processed", processed, egui::TextureOptions::LINEAR),
                });
            }
        }
    }

    /// Apply everything the worker finished since the last frame.
    fn poll_worker(&mut self, ctx: &egui::Context) {
        while let Some(result) = self.worker.try_recv() {
            match result {
                WorkerResult::PreviewReady { index, pair } => {
                    // Ignore previews the user has already navigated away from
                    if self.job.as_ref().map(|j| j.cursor) == Some(index) {
                        self.loading_message = None;
                        self.show_pair(ctx, pair);
                    }
                }
                WorkerResult::PreviewFailed { index, error } => {
                    if self.job.as_ref().map(|j| j.cursor) == Some(index) {
                        self.loading_message = None;
                        self.status = format!("Error in preview: {error}");
                    }
                }
                WorkerResult::Batch(BatchEvent::Processed { index, output, pair }) => {
                    log::info!("Wrote {}", output.display());
                    if let Some(job) = self.job.as_mut() {
                        job.cursor = index;
                    }
                    self.show_pair(ctx, pair);
                }
                WorkerResult::Batch(BatchEvent::Failed { index, file, error }) => {
                    self.status = format!("Error processing {file} (#{}): {error}", index + 1);
                }
                WorkerResult::Batch(BatchEvent::Progress { done, total }) => {
                    self.batch_state = BatchState::Processing { done, total };
                    self.progress = Some((done, total));
                }
                WorkerResult::BatchFinished(Ok(outcome)) => {
                    self.cancel = None;
                    self.batch_state = BatchState::finished(&outcome);
                    if outcome.cancelled {
                        notify(
                            rfd::MessageLevel::Info,
                            "Processing Cancelled",
                            &format!("Processing cancelled after {} images.", outcome.processed),
                        );
                    } else {
                        notify(
                            rfd::MessageLevel::Info,
                            "Folder Processing",
                            &format!("Processed {} image(s).", outcome.processed),
                        );
                    }
                }
                WorkerResult::BatchFinished(Err(error)) => {
                    self.cancel = None;
                    self.batch_state = BatchState::Idle;
                    notify(rfd::MessageLevel::Error, "Processing Failed", &error);
                }
            }
        }
    }
}

impl eframe::App for CutoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);

        // Keep polling while the worker is busy
        if self.loading_message.is_some() || self.batch_state.is_processing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.cancel_processing();
            self.save_config();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Controls (top)
        let info = ControlsInfo {
            model_info: &self.model_info_text,
            device: &self.device,
            status: &self.status,
            progress: self.progress,
            processing: self.batch_state.is_processing(),
            can_navigate: self.job.is_some(),
        };
        let mut config = self.config.clone();
        let mut crop_to_content = self.crop_to_content;
        let controls_action = egui::TopBottomPanel::top("controls")
            .show(ctx, |ui| controls::show(ui, &mut config, &mut crop_to_content, &info))
            .inner;
        self.config = config;
        self.crop_to_content = crop_to_content;

        match controls_action {
            ControlsAction::SelectInputFolder => self.select_input_folder(),
            ControlsAction::SelectOutputFolder => self.select_output_folder(),
            ControlsAction::ModelChanged => {
                log::info!("Model changed to {}", self.config.selected_model);
                self.model_info_text = self.model_info.describe(&self.config.selected_model);
                self.save_config();
            }
            ControlsAction::ProcessFolder => self.process_folder(),
            ControlsAction::CancelProcessing => self.cancel_processing(),
            ControlsAction::Navigate(step) => self.request_preview(step),
            ControlsAction::None => {}
        }

        // Preview (center)
        let preview_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                preview_panel::show(ui, &self.textures, self.surface, &self.loading_message)
            })
            .inner;

        let changed = match (&mut self.preview, preview_action) {
            (Some(state), PreviewAction::Zoom { factor, cursor }) => {
                state.viewport.zoom_at(factor, cursor, self.surface);
                true
            }
            (Some(state), PreviewAction::Pan(drag)) => {
                state.viewport.pan(drag);
                true
            }
            _ => false,
        };
        if changed {
            self.render_previews(ctx);
        }
    }
}
