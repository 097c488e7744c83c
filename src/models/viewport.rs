// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared zoom/pan state for the before/after preview.
//!
//! One zoom level drives both previews. Each image keeps its own center in its
//! own pixel space, and every zoom or pan shift is applied to both centers.

use crate::util::geometry;
use std::ops::Add;

/// A 2D point or offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Logical size of one preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const PREVIEW: SurfaceSize = SurfaceSize {
        width: 600,
        height: 600,
    };
}

/// Crop rectangle in source-image pixels (before resizing to the surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Bounds on the zoom level.
///
/// The lower bound is relative to the fit-to-view zoom of the original image,
/// so zooming out never shows more than the whole picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min_fit_fraction: f64,
    pub max_zoom: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_fit_fraction: 1.0,
            max_zoom: 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub center_original: Point,
    pub center_processed: Point,
    /// Fit-to-view zoom recorded at the last reset.
    fit_zoom: f64,
    limits: ZoomLimits,
}

impl ViewportState {
    /// Fit the original image to the surface and center both images.
    pub fn fit(
        original_size: (u32, u32),
        processed_size: (u32, u32),
        surface: SurfaceSize,
        limits: ZoomLimits,
    ) -> Self {
        let fit_zoom = geometry::fit_zoom(original_size, surface);
        Self {
            zoom: fit_zoom,
            center_original: image_center(original_size),
            center_processed: image_center(processed_size),
            fit_zoom,
            limits,
        }
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        let min = self.fit_zoom * self.limits.min_fit_fraction;
        (min, self.limits.max_zoom.max(min))
    }

    /// Zoom by `factor` about `cursor` (surface pixels).
    pub fn zoom_at(&mut self, factor: f64, cursor: Point, surface: SurfaceSize) {
        let (zoom, delta) =
            geometry::apply_zoom(self.zoom, factor, cursor, surface, self.zoom_bounds());
        self.zoom = zoom;
        self.shift(delta);
    }

    /// Pan by a drag of `drag` surface pixels.
    pub fn pan(&mut self, drag: Point) {
        let delta = geometry::apply_pan(drag, self.zoom);
        self.shift(delta);
    }

    fn shift(&mut self, delta: Point) {
        self.center_original = self.center_original + delta;
        self.center_processed = self.center_processed + delta;
    }
}

fn image_center(size: (u32, u32)) -> Point {
    Point::new(size.0 as f64 / 2.0, size.1 as f64 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_fit_for_large_landscape() {
        let vp = ViewportState::fit(
            (4000, 3000),
            (4000, 3000),
            SurfaceSize::PREVIEW,
            ZoomLimits::default(),
        );
        assert_relative_eq!(vp.zoom, 0.15);
        assert_eq!(vp.center_original, Point::new(2000.0, 1500.0));
        assert_eq!(vp.center_processed, Point::new(2000.0, 1500.0));
    }

    #[test]
    fn test_centers_follow_own_image() {
        let vp = ViewportState::fit(
            (4000, 3000),
            (1200, 900),
            SurfaceSize::PREVIEW,
            ZoomLimits::default(),
        );
        assert_eq!(vp.center_processed, Point::new(600.0, 450.0));
    }

    #[test]
    fn test_zoom_and_pan_shift_both_centers_equally() {
        let mut vp = ViewportState::fit(
            (4000, 3000),
            (1200, 900),
            SurfaceSize::PREVIEW,
            ZoomLimits::default(),
        );
        let before = (vp.center_original, vp.center_processed);

        vp.zoom_at(1.1, Point::new(100.0, 500.0), SurfaceSize::PREVIEW);
        vp.zoom_at(1.1, Point::new(100.0, 500.0), SurfaceSize::PREVIEW);
        vp.pan(Point::new(25.0, -10.0));

        let d_orig = (
            vp.center_original.x - before.0.x,
            vp.center_original.y - before.0.y,
        );
        let d_proc = (
            vp.center_processed.x - before.1.x,
            vp.center_processed.y - before.1.y,
        );
        assert_relative_eq!(d_orig.0, d_proc.0, epsilon = 1e-9);
        assert_relative_eq!(d_orig.1, d_proc.1, epsilon = 1e-9);
        assert!(d_orig.0 != 0.0);
    }

    #[test]
    fn test_zoom_out_stops_at_fit() {
        let mut vp = ViewportState::fit(
            (4000, 3000),
            (4000, 3000),
            SurfaceSize::PREVIEW,
            ZoomLimits::default(),
        );
        vp.zoom_at(0.9, Point::new(300.0, 300.0), SurfaceSize::PREVIEW);
        assert_relative_eq!(vp.zoom, 0.15);
        assert_eq!(vp.center_original, Point::new(2000.0, 1500.0));
    }

    #[test]
    fn test_zoom_in_stops_at_max() {
        let limits = ZoomLimits {
            min_fit_fraction: 1.0,
            max_zoom: 0.2,
        };
        let mut vp = ViewportState::fit((4000, 3000), (4000, 3000), SurfaceSize::PREVIEW, limits);
        for _ in 0..10 {
            vp.zoom_at(1.1, Point::new(300.0, 300.0), SurfaceSize::PREVIEW);
        }
        assert_relative_eq!(vp.zoom, 0.2);
    }
}
