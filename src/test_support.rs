// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Test doubles shared by unit tests.

use crate::error::{CutoutError, Result};
use crate::io::media::encode_png;
use crate::io::removal::{RemovalSession, Remover};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Alpha pattern the fake model produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mask {
    /// Opaque in the middle half of each axis, transparent elsewhere.
    CenterHalf,
    /// Fully transparent.
    Empty,
}

/// A remover that masks the decoded input instead of running a model.
#[derive(Clone)]
pub struct FakeRemover {
    pub mask: Mask,
    pub sessions_opened: Arc<AtomicUsize>,
}

impl FakeRemover {
    pub fn new(mask: Mask) -> Self {
        Self {
            mask,
            sessions_opened: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }
}

impl Remover for FakeRemover {
    fn new_session(&self, model_name: &str) -> Result<Box<dyn RemovalSession>> {
        if model_name == "broken" {
            return Err(CutoutError::Model("corrupt weights".to_string()));
        }
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            model: model_name.to_string(),
            mask: self.mask,
        }))
    }
}

pub struct FakeSession {
    model: String,
    mask: Mask,
}

impl FakeSession {
    pub fn new(mask: Mask) -> Self {
        Self {
            model: "fake".to_string(),
            mask,
        }
    }
}

impl RemovalSession for FakeSession {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn remove(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut img = image::load_from_memory(input)
            .map_err(|e| CutoutError::Model(e.to_string()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        for (x, y, p) in img.enumerate_pixels_mut() {
            let inside = x >= w / 4 && x < w * 3 / 4 && y >= h / 4 && y < h * 3 / 4;
            p[3] = match self.mask {
                Mask::CenterHalf if inside => 255,
                _ => 0,
            };
        }
        encode_png(&img)
    }
}

/// Write a solid-color PNG.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
    img.save_with_format(dir.join(name), image::ImageFormat::Png)
        .unwrap();
}
