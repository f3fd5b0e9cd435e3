//! Devora
//!
//! Headless host for the file-preview card core: configuration, logging and
//! dependency wiring over the `dv-*` crates.

pub mod bootstrap;

pub use bootstrap::{load_config, wire_dependencies, PreviewRuntime};
