//! Pure conversions between percent, pixel and native-drop coordinates.

use serde::{Deserialize, Serialize};

use super::{PercentPoint, Point, Size, Viewport};

/// Host window facts needed to map native drop coordinates into content space.
///
/// Captured once per window session: the device scale factor does not follow the
/// in-app zoom, and the chrome height does not change while the window lives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowCalibration {
    /// Physical DPI multiplied by the OS text scale.
    pub scale_factor: f64,
    /// `inner.y - outer.y` of the host window, in native pixels.
    pub titlebar_height: f64,
}

impl WindowCalibration {
    pub fn new(scale_factor: f64, titlebar_height: f64) -> Self {
        Self {
            scale_factor: sanitize_factor(scale_factor),
            titlebar_height,
        }
    }

    /// Build a calibration from the window's outer and inner positions.
    pub fn from_positions(scale_factor: f64, outer: Point, inner: Point) -> Self {
        Self::new(scale_factor, inner.y - outer.y)
    }
}

impl Default for WindowCalibration {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Replace a non-finite or non-positive scale/zoom factor with `1.0`.
pub fn sanitize_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor > 0.0 {
        factor
    } else {
        1.0
    }
}

pub fn percent_to_pixel(percent: PercentPoint, viewport: Viewport) -> Point {
    Point::new(
        percent.x / 100.0 * viewport.width,
        percent.y / 100.0 * viewport.height,
    )
}

/// Inverse of [`percent_to_pixel`]. A zero-sized axis maps to `0`.
pub fn pixel_to_percent(pixel: Point, viewport: Viewport) -> PercentPoint {
    let axis = |value: f64, extent: f64| {
        if extent > 0.0 {
            value / extent * 100.0
        } else {
            0.0
        }
    };
    PercentPoint::new(axis(pixel.x, viewport.width), axis(pixel.y, viewport.height))
}

/// Constrain a card's top-left corner so at least `keep_visible` of it stays on screen.
///
/// The result always satisfies `0 <= x <= max(0, width - keep_visible.width)`, and the
/// same for `y`.
pub fn clamp_to_viewport(point: Point, viewport: Viewport, keep_visible: Size) -> Point {
    let max_x = (viewport.width - keep_visible.width).max(0.0);
    let max_y = (viewport.height - keep_visible.height).max(0.0);
    let clamp = |value: f64, max: f64| {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, max)
        }
    };
    Point::new(clamp(point.x, max_x), clamp(point.y, max_y))
}

/// Map a native drop position (window-relative, physical) into content space.
pub fn native_drop_to_content_space(
    native: Point,
    calibration: WindowCalibration,
    zoom_factor: f64,
) -> Point {
    let divisor = sanitize_factor(calibration.scale_factor) * sanitize_factor(zoom_factor);
    Point::new(
        native.x / divisor,
        (native.y - calibration.titlebar_height) / divisor,
    )
}
