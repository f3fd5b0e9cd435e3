use crate::geometry::Point;

/// Facts about the native window hosting the canvas.
pub trait HostWindowPort: Send + Sync {
    /// Physical DPI times OS text scale. Independent of in-app zoom.
    fn scale_factor(&self) -> anyhow::Result<f64>;
    /// Top-left of the window including decorations.
    fn outer_position(&self) -> anyhow::Result<Point>;
    /// Top-left of the content area.
    fn inner_position(&self) -> anyhow::Result<Point>;
}
