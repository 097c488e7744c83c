// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport geometry.
//!
//! Pure functions mapping a (zoom, center) viewport onto a crop rectangle of a
//! source image, and translating scroll and drag input into center shifts.
//! Every function works in the pixel space of one image, so the same deltas can
//! be applied to two images of different size and stay visually in sync.

use crate::models::viewport::{CropBox, Point, SurfaceSize};

/// Compute the rectangle of the source image shown on the surface.
///
/// The box is `surface / zoom` in size. Along an axis where that fits inside
/// the image, it is clamped so it never leaves the image. Along an axis where
/// it is larger than the image, it is centered on the image and the caller
/// letterboxes the uncovered part.
pub fn compute_crop_box(
    image_size: (u32, u32),
    center: Point,
    zoom: f64,
    surface: SurfaceSize,
) -> CropBox {
    let crop_w = surface.width as f64 / zoom;
    let crop_h = surface.height as f64 / zoom;

    CropBox {
        left: place_axis(center.x, crop_w, image_size.0 as f64),
        top: place_axis(center.y, crop_h, image_size.1 as f64),
        width: crop_w,
        height: crop_h,
    }
}

fn place_axis(center: f64, extent: f64, image_extent: f64) -> f64 {
    if extent > image_extent {
        (image_extent - extent) / 2.0
    } else {
        (center - extent / 2.0).clamp(0.0, image_extent - extent)
    }
}

/// Zoom level at which the whole image fits on the surface.
pub fn fit_zoom(image_size: (u32, u32), surface: SurfaceSize) -> f64 {
    let zx = surface.width as f64 / image_size.0.max(1) as f64;
    let zy = surface.height as f64 / image_size.1.max(1) as f64;
    zx.min(zy)
}

/// Scale the zoom by `factor` about the cursor.
///
/// `cursor` is in surface pixels. Returns the new zoom (clamped to `bounds`)
/// and the center shift that keeps the image point under the cursor fixed.
pub fn apply_zoom(
    old_zoom: f64,
    factor: f64,
    cursor: Point,
    surface: SurfaceSize,
    bounds: (f64, f64),
) -> (f64, Point) {
    let new_zoom = (old_zoom * factor).clamp(bounds.0, bounds.1);

    let rx = cursor.x / surface.width as f64;
    let ry = cursor.y / surface.height as f64;

    let old_crop_w = surface.width as f64 / old_zoom;
    let old_crop_h = surface.height as f64 / old_zoom;
    let new_crop_w = surface.width as f64 / new_zoom;
    let new_crop_h = surface.height as f64 / new_zoom;

    let delta = Point::new(
        (old_crop_w - new_crop_w) * (rx - 0.5),
        (old_crop_h - new_crop_h) * (ry - 0.5),
    );
    (new_zoom, delta)
}

/// Center shift for a drag of `drag` surface pixels.
pub fn apply_pan(drag: Point, zoom: f64) -> Point {
    Point::new(-drag.x / zoom, -drag.y / zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SURFACE: SurfaceSize = SurfaceSize {
        width: 600,
        height: 600,
    };

    fn contained(b: &CropBox, w: u32, h: u32) -> bool {
        let eps = 1e-9;
        b.left >= -eps
            && b.top >= -eps
            && b.left + b.width <= w as f64 + eps
            && b.top + b.height <= h as f64 + eps
    }

    #[test]
    fn test_crop_box_centered() {
        let b = compute_crop_box((4000, 3000), Point::new(2000.0, 1500.0), 1.0, SURFACE);
        assert_eq!(b.left, 1700.0);
        assert_eq!(b.top, 1200.0);
        assert_eq!(b.width, 600.0);
        assert_eq!(b.height, 600.0);
    }

    #[test]
    fn test_crop_box_clamped_at_edges() {
        let b = compute_crop_box((4000, 3000), Point::new(-500.0, 5000.0), 2.0, SURFACE);
        assert_eq!(b.left, 0.0);
        assert_eq!(b.top, 2700.0);
        assert_eq!(b.width, 300.0);
        assert_eq!(b.height, 300.0);
    }

    #[test]
    fn test_crop_box_larger_than_image_is_centered() {
        // Fit zoom for a landscape image leaves vertical slack
        let b = compute_crop_box((4000, 3000), Point::new(2000.0, 1500.0), 0.15, SURFACE);
        assert_relative_eq!(b.width, 4000.0, epsilon = 1e-9);
        assert_relative_eq!(b.left, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.top, -500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_crop_box_stays_inside_for_zoom_sequences() {
        let (w, h) = (4000, 3000);
        let mut zoom = fit_zoom((w, h), SURFACE).max(0.2);
        let mut center = Point::new(2000.0, 1500.0);
        let cursors = [
            Point::new(0.0, 0.0),
            Point::new(600.0, 600.0),
            Point::new(120.0, 480.0),
            Point::new(599.0, 1.0),
        ];
        for step in 0..60 {
            let factor = if step % 5 == 4 { 0.9 } else { 1.1 };
            let (z, d) = apply_zoom(zoom, factor, cursors[step % cursors.len()], SURFACE, (0.2, 32.0));
            zoom = z;
            center = center + d;
            let b = compute_crop_box((w, h), center, zoom, SURFACE);
            assert!(contained(&b, w, h), "step {step}: {b:?}");
            assert_relative_eq!(b.width, 600.0 / zoom, epsilon = 1e-9);
            assert_relative_eq!(b.height, 600.0 / zoom, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let size = (4000, 3000);
        let cursor = Point::new(450.0, 150.0);
        let (rx, ry) = (cursor.x / 600.0, cursor.y / 600.0);
        let mut zoom = 1.0;
        let mut center = Point::new(2000.0, 1500.0);

        let b = compute_crop_box(size, center, zoom, SURFACE);
        let anchor = (b.left + rx * b.width, b.top + ry * b.height);

        for factor in [1.1, 1.1, 0.9] {
            let (z, d) = apply_zoom(zoom, factor, cursor, SURFACE, (0.01, 100.0));
            zoom = z;
            center = center + d;
            let b = compute_crop_box(size, center, zoom, SURFACE);
            assert_relative_eq!(b.left + rx * b.width, anchor.0, epsilon = 1e-6);
            assert_relative_eq!(b.top + ry * b.height, anchor.1, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_zoom_clamped_to_bounds() {
        let (z, d) = apply_zoom(4.0, 1.1, Point::new(600.0, 0.0), SURFACE, (0.5, 4.0));
        assert_eq!(z, 4.0);
        assert_eq!(d, Point::new(0.0, 0.0));

        let (z, _) = apply_zoom(0.55, 0.9, Point::new(300.0, 300.0), SURFACE, (0.5, 4.0));
        assert_eq!(z, 0.5);
    }

    #[test]
    fn test_pan_roundtrip() {
        let start = Point::new(1234.5, 987.25);
        let zoom = 0.37;
        let drag = Point::new(42.0, -17.0);
        let there = start + apply_pan(drag, zoom);
        let back = there + apply_pan(Point::new(-drag.x, -drag.y), zoom);
        assert_relative_eq!(back.x, start.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, start.y, epsilon = 1e-9);
    }

    #[test]
    fn test_pan_moves_against_drag() {
        let d = apply_pan(Point::new(30.0, -60.0), 0.5);
        assert_eq!(d, Point::new(-60.0, 120.0));
    }

    #[test]
    fn test_fit_zoom() {
        assert_relative_eq!(fit_zoom((4000, 3000), SURFACE), 0.15);
        assert_relative_eq!(fit_zoom((300, 1200), SURFACE), 0.5);
    }
}
