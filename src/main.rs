// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! cutout - batch background removal
//!
//! A desktop application that removes the background from every image in a
//! folder and previews each result next to its source, with a shared zoom and
//! pan across both views.

mod app;
mod batch;
mod error;
mod io;
mod models;
mod pipeline;
mod preview;
#[cfg(test)]
mod test_support;
mod ui;
mod util;
mod worker;

use anyhow::Result;
use app::CutoutApp;
use io::removal::Remover;

#[cfg(feature = "onnx")]
fn create_remover() -> Box<dyn Remover> {
    Box::new(io::onnx::OnnxRemover::from_env())
}

#[cfg(not(feature = "onnx"))]
fn create_remover() -> Box<dyn Remover> {
    Box::new(io::removal::RembgCli::new())
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = io::serialization::config_path();
    let config = io::serialization::load_config(&config_path);
    log::info!("Using config {}", config_path.display());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 1120.0])
            .with_min_inner_size([900.0, 700.0])
            .with_title("Cutout - Batch Background Removal"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Cutout",
        options,
        Box::new(|_cc| Ok(Box::new(CutoutApp::new(create_remover(), config, config_path)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
