//! Windowed access to large text files.
//!
//! A file is treated as an opaque sequence of lines. Only the slice around the
//! visible rows is ever fetched, and fetched lines stay cached for the lifetime
//! of the view.

mod line_cache;
mod range;
mod state;
mod window;

pub use line_cache::LineCache;
pub use range::{missing_ranges, LineRange};
pub use state::{filename_of, FileInfo, FileViewState, LineBatch, QuickPreviewState};
pub use window::LineWindow;
