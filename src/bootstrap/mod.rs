pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config};
pub use tracing::init_tracing_subscriber;
pub use wiring::{resolve_data_dir, wire_dependencies, PreviewRuntime, WiringError};
