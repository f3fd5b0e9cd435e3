//! Coordinate spaces used by file cards.
//!
//! - **Percent space**: what gets persisted, `0..=100` of the current viewport.
//! - **Pixel space**: CSS/content pixels inside the canvas, what a drag moves in.
//! - **Native space**: physical window-relative pixels reported by the host on drop.

mod normalizer;

pub use normalizer::{
    clamp_to_viewport, native_drop_to_content_space, percent_to_pixel, pixel_to_percent,
    sanitize_factor, WindowCalibration,
};

use serde::{Deserialize, Serialize};

/// A point in pixel (content) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A point in percent space, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The visible canvas area that percent coordinates are relative to.
pub type Viewport = Size;
