// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The before/after image pair shown in the preview.

use image::RgbaImage;

/// A source image and its background-removed counterpart.
///
/// The two may differ in size once the processed image is tight-cropped to
/// its alpha bounding box. Pairs are replaced wholesale, never edited.
#[derive(Debug, Clone)]
pub struct ImagePair {
    /// Source image with its alpha discarded (fully opaque).
    pub original: RgbaImage,
    pub processed: RgbaImage,
}

impl ImagePair {
    pub fn original_size(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    pub fn processed_size(&self) -> (u32, u32) {
        self.processed.dimensions()
    }
}
