//! # Configuration Loader
//!
//! Reads the TOML config file and maps it onto [`PreviewConfig`].
//!
//! Pure data loading: values are accepted as they are in the file, missing keys
//! keep their defaults, and no validation happens here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use dv_core::PreviewConfig;

/// Default config location: `<config dir>/devora/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devora").join("config.toml"))
}

/// Load configuration from a TOML file.
///
/// An absent file is not an error; it yields the defaults.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<PreviewConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(PreviewConfig::default());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    PreviewConfig::from_toml(&toml_value)
}
