//! Full-view sessions over the windowed line cache.

mod session;
mod viewer;

#[cfg(test)]
pub(crate) mod testing;

pub use session::FileViewSession;
pub use viewer::FileViewer;
