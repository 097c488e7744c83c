// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Side-by-side before/after preview.
//!
//! Shows the two rendered surfaces and turns mouse wheel and drag input over
//! either of them into zoom and pan requests in surface pixels.

use crate::models::viewport::{Point, SurfaceSize};

/// Result of preview interaction.
pub enum PreviewAction {
    None,
    Zoom { factor: f64, cursor: Point },
    Pan(Point),
}

/// Textures for the two surfaces, original first.
pub struct PreviewTextures {
    pub original: egui::TextureHandle,
    pub processed: egui::TextureHandle,
}

const ZOOM_IN: f64 = 1.1;
const ZOOM_OUT: f64 = 0.9;

/// Display the previews and report zoom/pan input.
pub fn show(
    ui: &mut egui::Ui,
    textures: &Option<PreviewTextures>,
    surface: SurfaceSize,
    loading_message: &Option<String>,
) -> PreviewAction {
    let mut action = PreviewAction::None;

    let Some(textures) = textures else {
        ui.centered_and_justified(|ui| {
            let text = loading_message
                .as_deref()
                .unwrap_or("Select an input folder to preview images");
            ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(180)));
        });
        return action;
    };

    // Scale both surfaces down together when the window is narrow
    let spacing = ui.spacing().item_spacing.x;
    let available = ui.available_size();
    let scale = ((available.x - spacing) / 2.0 / surface.width as f32)
        .min(available.y / surface.height as f32)
        .clamp(0.1, 1.0);
    let display = egui::vec2(surface.width as f32 * scale, surface.height as f32 * scale);

    ui.horizontal(|ui| {
        for texture in [&textures.original, &textures.processed] {
            let (rect, response) = ui.allocate_exact_size(display, egui::Sense::drag());

            ui.painter().rect_filled(rect, 0.0, egui::Color32::from_gray(40));
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if let Some(pos) = response.hover_pos() {
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let factor = if scroll > 0.0 { ZOOM_IN } else { ZOOM_OUT };
                    // Convert screen coordinates to surface coordinates
                    let cursor = Point::new(
                        ((pos.x - rect.min.x) / scale) as f64,
                        ((pos.y - rect.min.y) / scale) as f64,
                    );
                    action = PreviewAction::Zoom { factor, cursor };
                }
            }

            if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    action = PreviewAction::Pan(Point::new(
                        (delta.x / scale) as f64,
                        (delta.y / scale) as f64,
                    ));
                }
            }
        }
    });

    ui.label(
        egui::RichText::new("Use mouse wheel to zoom and click & drag to pan the preview images.")
            .italics(),
    );

    action
}
