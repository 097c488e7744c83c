// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-process salient object segmentation with ONNX Runtime.
//!
//! Loads `<model_dir>/<model>.onnx`, predicts a foreground mask at the model's
//! native resolution and applies it to the source as the alpha channel.

use super::media::encode_png;
use super::removal::{RemovalSession, Remover};
use crate::error::{CutoutError, Result};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use ort::session::Session;
use ort::value::Tensor;
use std::path::PathBuf;

/// Per-channel `(mean, std)` used to normalize the input.
type Normalization = ([f32; 3], [f32; 3]);

const IMAGENET: Normalization = ([0.485, 0.456, 0.406], [0.229, 0.224, 0.225]);
const CENTERED: Normalization = ([0.5, 0.5, 0.5], [1.0, 1.0, 1.0]);

/// The isnet and bria models were trained on centered, unscaled inputs.
fn normalization(model: &str) -> Normalization {
    if model.starts_with("isnet") || model == "bria-rmbg" {
        CENTERED
    } else {
        IMAGENET
    }
}

fn model_err(e: impl std::fmt::Display) -> CutoutError {
    CutoutError::Model(e.to_string())
}

/// Square input resolution expected by a model, `None` if unsupported here.
fn input_size(model: &str) -> Option<u32> {
    if model == "sam" {
        None
    } else if model.starts_with("u2net") || model == "silueta" {
        Some(320)
    } else if model.starts_with("isnet")
        || model.starts_with("birefnet")
        || model == "bria-rmbg"
    {
        Some(1024)
    } else {
        None
    }
}

pub struct OnnxRemover {
    model_dir: PathBuf,
}

impl OnnxRemover {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Use `U2NET_HOME`, or `~/.u2net` when unset.
    pub fn from_env() -> Self {
        let dir = std::env::var_os("U2NET_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".u2net")
            });
        Self::new(dir)
    }
}

impl Remover for OnnxRemover {
    fn new_session(&self, model_name: &str) -> Result<Box<dyn RemovalSession>> {
        let size = input_size(model_name).ok_or_else(|| {
            CutoutError::Model(format!("model '{model_name}' is not supported in-process"))
        })?;
        let path = self.model_dir.join(format!("{model_name}.onnx"));
        if !path.exists() {
            return Err(CutoutError::Model(format!(
                "model weights not found at {}",
                path.display()
            )));
        }

        log::info!("Loading ONNX model {}", path.display());
        let builder = Session::builder().map_err(model_err)?;
        let session = builder.commit_from_file(&path).map_err(model_err)?;

        Ok(Box::new(OnnxSession {
            model: model_name.to_string(),
            size,
            normalization: normalization(model_name),
            session,
        }))
    }

    fn model_dir(&self) -> Option<PathBuf> {
        Some(self.model_dir.clone())
    }
}

struct OnnxSession {
    model: String,
    size: u32,
    normalization: Normalization,
    session: Session,
}

impl OnnxSession {
    fn predict_mask(&mut self, rgb: &image::RgbImage) -> Result<GrayImage> {
        let s = self.size;
        let side = s as usize;
        let resized = imageops::resize(rgb, s, s, FilterType::Lanczos3);
        let max = resized.pixels().flat_map(|p| p.0).max().unwrap_or(1).max(1) as f32;

        let (mean, std) = self.normalization;
        let mut data = vec![0f32; 3 * side * side];
        for (x, y, p) in resized.enumerate_pixels() {
            for c in 0..3 {
                data[c * side * side + y as usize * side + x as usize] =
                    (p[c] as f32 / max - mean[c]) / std[c];
            }
        }

        let tensor = Tensor::from_array(([1usize, 3, side, side], data)).map_err(model_err)?;
        let input_name = self.session.inputs[0].name.clone();
        let outputs = self
            .session
            .run(ort::inputs![input_name.as_str() => tensor])
            .map_err(model_err)?;
        let (shape, values) = outputs[0].try_extract_tensor::<f32>().map_err(model_err)?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        if dims.len() < 2 {
            return Err(CutoutError::Model(format!("unexpected mask shape {dims:?}")));
        }
        let mh = dims[dims.len() - 2] as u32;
        let mw = dims[dims.len() - 1] as u32;
        let plane = &values[..(mw * mh) as usize];

        let logits = self.model.starts_with("birefnet");
        let plane: Vec<f32> = plane
            .iter()
            .map(|&v| if logits { 1.0 / (1.0 + (-v).exp()) } else { v })
            .collect();
        let lo = plane.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = plane.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = (hi - lo).max(f32::EPSILON);

        let mask = GrayImage::from_fn(mw, mh, |x, y| {
            let v = (plane[(y * mw + x) as usize] - lo) / range;
            Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        });
        Ok(mask)
    }
}

impl RemovalSession for OnnxSession {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn remove(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let img = image::load_from_memory(input)?;
        let rgb = img.to_rgb8();
        let (w, h) = rgb.dimensions();

        let mask = self.predict_mask(&rgb)?;
        let mask = imageops::resize(&mask, w, h, FilterType::Lanczos3);

        let mut out = img.to_rgba8();
        for (pixel, m) in out.pixels_mut().zip(mask.pixels()) {
            pixel[3] = m[0];
        }
        encode_png(&out)
    }
}
