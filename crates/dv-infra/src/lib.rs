pub mod cards;
pub mod content;
pub mod fs;
pub mod headless;
pub mod time;

pub use cards::JsonCardStore;
pub use content::FsContentService;
pub use headless::{FixedHostWindow, TracingVirtualList};
pub use time::{SystemClock, Timer};
