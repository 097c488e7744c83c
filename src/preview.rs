// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Renders the before/after previews for the current viewport.
//!
//! Each image is cropped with its own size and center, then resampled to the
//! surface size with a Lanczos filter. Parts of the surface the image does not
//! cover stay transparent.

use crate::models::pair::ImagePair;
use crate::models::viewport::{CropBox, Point, SurfaceSize, ViewportState};
use crate::util::geometry::compute_crop_box;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Render both images of `pair` at exactly `surface` size.
pub fn render(
    pair: &ImagePair,
    viewport: &ViewportState,
    surface: SurfaceSize,
) -> (RgbaImage, RgbaImage) {
    (
        render_one(&pair.original, viewport.center_original, viewport.zoom, surface),
        render_one(&pair.processed, viewport.center_processed, viewport.zoom, surface),
    )
}

/// Source and destination span of one axis.
#[derive(Debug, PartialEq)]
struct AxisSpan {
    src_start: u32,
    src_len: u32,
    dst_start: u32,
    dst_len: u32,
}

fn axis_span(start: f64, extent: f64, image_len: u32, surface_len: u32) -> AxisSpan {
    if extent <= image_len as f64 {
        let src_start = (start.round().max(0.0) as u32).min(image_len.saturating_sub(1));
        let src_len = (extent.round() as u32).clamp(1, image_len - src_start);
        AxisSpan {
            src_start,
            src_len,
            dst_start: 0,
            dst_len: surface_len,
        }
    } else {
        // Letterbox: the whole axis is visible, centered on the surface
        let scale = surface_len as f64 / extent;
        let dst_len = ((image_len as f64 * scale).round() as u32).clamp(1, surface_len);
        AxisSpan {
            src_start: 0,
            src_len: image_len,
            dst_start: (surface_len - dst_len) / 2,
            dst_len,
        }
    }
}

fn render_one(img: &RgbaImage, center: Point, zoom: f64, surface: SurfaceSize) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut canvas = RgbaImage::new(surface.width, surface.height);
    if w == 0 || h == 0 {
        return canvas;
    }

    let CropBox {
        left,
        top,
        width,
        height,
    } = compute_crop_box((w, h), center, zoom, surface);
    let xs = axis_span(left, width, w, surface.width);
    let ys = axis_span(top, height, h, surface.height);

    let crop =
        imageops::crop_imm(img, xs.src_start, ys.src_start, xs.src_len, ys.src_len).to_image();
    let resized = imageops::resize(&crop, xs.dst_len, ys.dst_len, FilterType::Lanczos3);

    if (xs.dst_len, ys.dst_len) == (surface.width, surface.height) {
        return resized;
    }
    imageops::replace(&mut canvas, &resized, xs.dst_start as i64, ys.dst_start as i64);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::viewport::ZoomLimits;
    use image::Rgba;

    const SURFACE: SurfaceSize = SurfaceSize {
        width: 60,
        height: 60,
    };

    fn pair(original: (u32, u32), processed: (u32, u32)) -> ImagePair {
        ImagePair {
            original: RgbaImage::from_pixel(original.0, original.1, Rgba([255, 0, 0, 255])),
            processed: RgbaImage::from_pixel(processed.0, processed.1, Rgba([0, 255, 0, 255])),
        }
    }

    #[test]
    fn test_output_is_surface_size() {
        let p = pair((400, 300), (120, 90));
        let mut vp = ViewportState::fit(p.original_size(), p.processed_size(), SURFACE, ZoomLimits::default());
        let (a, b) = render(&p, &vp, SURFACE);
        assert_eq!(a.dimensions(), (60, 60));
        assert_eq!(b.dimensions(), (60, 60));

        vp.zoom_at(1.1, Point::new(10.0, 50.0), SURFACE);
        vp.pan(Point::new(-5.0, 3.0));
        let (a, b) = render(&p, &vp, SURFACE);
        assert_eq!(a.dimensions(), (60, 60));
        assert_eq!(b.dimensions(), (60, 60));
    }

    #[test]
    fn test_fit_view_letterboxes_landscape() {
        let p = pair((400, 300), (400, 300));
        let vp = ViewportState::fit(p.original_size(), p.processed_size(), SURFACE, ZoomLimits::default());
        let (a, _) = render(&p, &vp, SURFACE);

        // 400x300 at zoom 0.15 covers 60x45, leaving 7 transparent rows on top
        assert_eq!(a.get_pixel(30, 0)[3], 0);
        assert_eq!(a.get_pixel(30, 30), &Rgba([255, 0, 0, 255]));
        assert_eq!(a.get_pixel(30, 59)[3], 0);
    }

    #[test]
    fn test_zoomed_view_fills_surface() {
        let p = pair((400, 300), (400, 300));
        let mut vp = ViewportState::fit(p.original_size(), p.processed_size(), SURFACE, ZoomLimits::default());
        vp.zoom = 1.0;
        let (a, b) = render(&p, &vp, SURFACE);
        assert!(a.pixels().all(|px| px[3] == 255));
        assert!(b.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn test_axis_span_clamps_inside() {
        assert_eq!(
            axis_span(10.0, 20.0, 100, 60),
            AxisSpan {
                src_start: 10,
                src_len: 20,
                dst_start: 0,
                dst_len: 60
            }
        );
        let s = axis_span(99.6, 0.5, 100, 60);
        assert_eq!((s.src_start, s.src_len), (99, 1));
    }

    #[test]
    fn test_axis_span_letterbox() {
        let s = axis_span(-50.0, 400.0, 300, 60);
        assert_eq!((s.src_start, s.src_len), (0, 300));
        assert_eq!((s.dst_start, s.dst_len), (7, 45));
    }
}
