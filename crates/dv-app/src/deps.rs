//! # Application Dependencies
//!
//! Dependency grouping for constructing the preview use cases.
//!
//! **Note**: This is NOT a Builder pattern.
//! - No build steps
//! - No default values
//! - Just parameter grouping

use std::sync::Arc;

use dv_core::ports::*;
use dv_core::PreviewConfig;

/// All ports the use cases need, plus the loaded config.
///
/// Every field is required; bootstrap fills it once and hands out clones.
#[derive(Clone)]
pub struct AppDeps {
    // Content
    pub content: Arc<dyn ContentPort>,
    pub virtual_list: Arc<dyn VirtualListPort>,

    // Cards
    pub cards: Arc<dyn CardRepositoryPort>,

    // Host
    pub host_window: Arc<dyn HostWindowPort>,

    // System
    pub clock: Arc<dyn ClockPort>,
    pub timer: Arc<dyn TimerPort>,

    pub config: PreviewConfig,
}
