//! Tunables of the preview core (pure data).
//!
//! Values come from the `[preview]`, `[drop]`, `[card]` and `[storage]` tables of
//! the config file. A missing key keeps its default; nothing is validated here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::{PercentPoint, Point, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Bytes fetched for a card face.
    pub quick_preview_bytes: u64,
    /// Lines loaded before the list learns the total count.
    pub first_screen_lines: usize,
    /// Extra lines fetched on each side of the visible range.
    pub buffer_lines: usize,
    /// Largest file a drop may import.
    pub max_content_bytes: u64,
    /// Subtracted from the drop position so the card centers under the cursor.
    pub card_offset: Point,
    /// How long transient notices stay up.
    pub notice_ttl_ms: u64,
    /// Give up waiting for the native drag signal after this long. `None` waits forever.
    pub hover_timeout_ms: Option<u64>,
    /// Part of a card that must stay on screen.
    pub min_visible: Size,
    /// Placement for cards added without a drop position.
    pub default_position: PercentPoint,
    /// Root directory for the card store. Empty means the platform default.
    pub data_dir: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            quick_preview_bytes: 8 * 1024,
            first_screen_lines: 100,
            buffer_lines: 200,
            max_content_bytes: 10 * 1024 * 1024,
            card_offset: Point::new(140.0, 20.0),
            notice_ttl_ms: 3000,
            hover_timeout_ms: None,
            min_visible: Size::new(100.0, 50.0),
            default_position: PercentPoint::new(10.0, 10.0),
            data_dir: PathBuf::new(),
        }
    }
}

impl PreviewConfig {
    /// Create a config from a parsed TOML document.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let uint = |table: &str, key: &str| {
            lookup(toml_value, table, key)
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
        };
        let float = |table: &str, key: &str| {
            lookup(toml_value, table, key)
                .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
        };

        Ok(Self {
            quick_preview_bytes: uint("preview", "quick_preview_bytes")
                .unwrap_or(defaults.quick_preview_bytes),
            first_screen_lines: uint("preview", "first_screen_lines")
                .map(|v| v as usize)
                .unwrap_or(defaults.first_screen_lines),
            buffer_lines: uint("preview", "buffer_lines")
                .map(|v| v as usize)
                .unwrap_or(defaults.buffer_lines),
            max_content_bytes: uint("drop", "max_content_bytes")
                .unwrap_or(defaults.max_content_bytes),
            card_offset: Point::new(
                float("drop", "card_offset_x").unwrap_or(defaults.card_offset.x),
                float("drop", "card_offset_y").unwrap_or(defaults.card_offset.y),
            ),
            notice_ttl_ms: uint("drop", "notice_ttl_ms").unwrap_or(defaults.notice_ttl_ms),
            hover_timeout_ms: uint("drop", "hover_timeout_ms"),
            min_visible: Size::new(
                float("card", "min_visible_width").unwrap_or(defaults.min_visible.width),
                float("card", "min_visible_height").unwrap_or(defaults.min_visible.height),
            ),
            default_position: PercentPoint::new(
                float("card", "default_x").unwrap_or(defaults.default_position.x),
                float("card", "default_y").unwrap_or(defaults.default_position.y),
            ),
            data_dir: PathBuf::from(
                lookup(toml_value, "storage", "data_dir")
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
        })
    }
}

fn lookup<'a>(toml_value: &'a toml::Value, table: &str, key: &str) -> Option<&'a toml::Value> {
    toml_value.get(table).and_then(|t| t.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn missing_tables_keep_defaults() {
        let toml_value: Value = toml::from_str("").unwrap();
        let config = PreviewConfig::from_toml(&toml_value).unwrap();
        assert_eq!(config, PreviewConfig::default());
    }

    #[test]
    fn values_are_read_from_their_tables() {
        let toml_str = r#"
            [preview]
            buffer_lines = 50
            first_screen_lines = 20

            [drop]
            max_content_bytes = 1048576
            card_offset_x = 100
            hover_timeout_ms = 5000

            [card]
            min_visible_width = 80.5

            [storage]
            data_dir = "/tmp/devora"
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();
        let config = PreviewConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.buffer_lines, 50);
        assert_eq!(config.first_screen_lines, 20);
        assert_eq!(config.max_content_bytes, 1024 * 1024);
        assert_eq!(config.card_offset, Point::new(100.0, 20.0));
        assert_eq!(config.hover_timeout_ms, Some(5000));
        assert_eq!(config.min_visible, Size::new(80.5, 50.0));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/devora"));
        assert_eq!(config.quick_preview_bytes, 8 * 1024);
    }

    #[test]
    fn negative_sizes_are_taken_as_zero() {
        // no validation: the fact is recorded as-is, clamped to the type's range
        let toml_value: Value = toml::from_str("[preview]\nbuffer_lines = -5").unwrap();
        let config = PreviewConfig::from_toml(&toml_value).unwrap();
        assert_eq!(config.buffer_lines, 0);
    }
}
