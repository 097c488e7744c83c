// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Folder, model and batch controls.

use crate::models::catalog::{AVAILABLE_MODELS, DEFAULT_MODEL};
use crate::models::config::PersistedConfig;

/// Result of control panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsAction {
    None,
    SelectInputFolder,
    SelectOutputFolder,
    ModelChanged,
    ProcessFolder,
    CancelProcessing,
    /// Move the preview by this many files.
    Navigate(isize),
}

/// Read-only labels shown by the panel.
pub struct ControlsInfo<'a> {
    pub model_info: &'a str,
    pub device: &'a str,
    pub status: &'a str,
    pub progress: Option<(usize, usize)>,
    pub processing: bool,
    pub can_navigate: bool,
}

fn folder_text(folder: &Option<std::path::PathBuf>) -> String {
    folder
        .as_ref()
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "Not selected".to_string())
}

/// Display the controls and report which one was used.
pub fn show(
    ui: &mut egui::Ui,
    config: &mut PersistedConfig,
    crop_to_content: &mut bool,
    info: &ControlsInfo,
) -> ControlsAction {
    let mut action = ControlsAction::None;
    let idle = !info.processing;

    ui.vertical_centered(|ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(idle, egui::Button::new("Select Input Folder"))
                .clicked()
            {
                action = ControlsAction::SelectInputFolder;
            }
            if ui
                .add_enabled(idle, egui::Button::new("Select Output Folder"))
                .clicked()
            {
                action = ControlsAction::SelectOutputFolder;
            }
        });
        ui.label(format!("Input Folder: {}", folder_text(&config.input_folder)));
        ui.label(format!("Output Folder: {}", folder_text(&config.output_folder)));

        ui.add_enabled_ui(idle, |ui| {
            egui::ComboBox::from_label("Model")
                .selected_text(config.selected_model.as_str())
                .show_ui(ui, |ui| {
                    for model in AVAILABLE_MODELS {
                        if ui
                            .selectable_value(&mut config.selected_model, model.to_string(), *model)
                            .changed()
                        {
                            action = ControlsAction::ModelChanged;
                        }
                    }
                });
        });
        ui.label(
            egui::RichText::new("Warning: Changing models may download additional large files.")
                .strong()
                .color(egui::Color32::RED),
        );
        ui.label(format!("Default Model (preinstalled): {DEFAULT_MODEL}"));
        ui.label(info.model_info);

        ui.checkbox(crop_to_content, "Crop Transparent Borders");
        ui.label(format!("Processing Device: {}", info.device));

        let (done, total) = info.progress.unwrap_or((0, 0));
        let fraction = if total > 0 {
            done as f32 / total as f32
        } else {
            0.0
        };
        ui.add(egui::ProgressBar::new(fraction).text(format!("{done} / {total}")));

        ui.horizontal(|ui| {
            if ui
                .add_enabled(idle, egui::Button::new("Process Folder"))
                .clicked()
            {
                action = ControlsAction::ProcessFolder;
            }
            if ui
                .add_enabled(info.processing, egui::Button::new("Cancel Processing"))
                .clicked()
            {
                action = ControlsAction::CancelProcessing;
            }
        });

        ui.add_enabled_ui(idle && info.can_navigate, |ui| {
            ui.horizontal(|ui| {
                for (text, step) in [
                    ("<< Prev 10", -10),
                    ("< Prev", -1),
                    ("Next >", 1),
                    ("Next 10 >>", 10),
                ] {
                    if ui.button(text).clicked() {
                        action = ControlsAction::Navigate(step);
                    }
                }
            });
        });

        if !info.status.is_empty() {
            ui.label(egui::RichText::new(info.status).weak());
        }
    });

    action
}
