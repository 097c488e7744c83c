// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Builds the before/after pair for one input file.
//!
//! Nothing is written to disk here; the batch controller owns output files.

use crate::error::{CutoutError, Result};
use crate::io::media::decode_opaque;
use crate::io::removal::RemovalSession;
use crate::models::pair::ImagePair;
use image::{imageops, RgbaImage};
use std::path::Path;

/// Decode `path`, remove its background and optionally crop the result to its
/// visible pixels.
///
/// Fails with an I/O or decode error for unreadable input, and with a model
/// error when the session fails or returns something that is not an image.
pub fn build_pair(
    path: &Path,
    session: &mut dyn RemovalSession,
    crop_to_content: bool,
) -> Result<ImagePair> {
    let bytes = std::fs::read(path)?;
    let original = decode_opaque(&bytes)?;

    let output = session.remove(&bytes)?;
    let mut processed = image::load_from_memory(&output)
        .map_err(|e| CutoutError::Model(format!("unreadable model output: {e}")))?
        .to_rgba8();

    if crop_to_content {
        processed = crop_to_alpha(processed);
    }

    log::debug!(
        "Built pair for {}: original {:?}, processed {:?}",
        path.display(),
        original.dimensions(),
        processed.dimensions()
    );
    Ok(ImagePair {
        original,
        processed,
    })
}

/// Smallest `(x, y, width, height)` enclosing every pixel with non-zero alpha.
pub fn alpha_bbox(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;

    for (x, y, p) in img.enumerate_pixels() {
        if p[3] != 0 {
            any = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }

    any.then(|| (min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1))
}

/// Crop to the alpha bounding box; a fully transparent image is returned as is.
pub fn crop_to_alpha(img: RgbaImage) -> RgbaImage {
    match alpha_bbox(&img) {
        Some((x, y, w, h)) if (w, h) != img.dimensions() => {
            imageops::crop_imm(&img, x, y, w, h).to_image()
        }
        _ => img,
    }
}
