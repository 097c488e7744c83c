// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file helpers.
//!
//! Decoding inputs, naming and writing outputs, and converting images into the
//! pixel buffers egui needs.

use crate::error::Result;
use image::{DynamicImage, ImageFormat, RgbaImage};
#[cfg(any(test, feature = "onnx"))]
use std::io::Cursor;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Extensions accepted from the input folder (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

const OUTPUT_SUFFIX: &str = "_no_bg.png";

/// Matches on the file name suffix, so a bare `.png` counts too.
pub fn is_supported_image(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| {
        name.len() > ext.len()
            && name.ends_with(*ext)
            && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

/// `photo.JPG` becomes `photo_no_bg.png`. Non-UTF-8 stems are kept as is.
pub fn output_file_name(input_name: &OsStr) -> OsString {
    let mut name = Path::new(input_name)
        .file_stem()
        .unwrap_or(input_name)
        .to_os_string();
    name.push(OUTPUT_SUFFIX);
    name
}

/// Decode an input image as fully opaque RGBA.
pub fn decode_opaque(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8())
}

/// Encode as PNG into memory.
#[cfg(any(test, feature = "onnx"))]
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Write as PNG, replacing any existing file.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Convert to an egui image for texture upload.
pub fn to_color_image(img: &RgbaImage) -> egui::ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}
