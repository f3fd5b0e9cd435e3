mod fs_content;

pub use fs_content::{FsContentService, ABSOLUTE_MAX_BYTES};
