//! User-facing failure taxonomy of the preview core.
//!
//! Every variant is scoped to one card or one view; none of them is fatal to the
//! surrounding application.

use serde::Serialize;
use thiserror::Error;

use crate::ports::ContentError;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PreviewError {
    #[error("file is too large ({size} bytes, max {max} bytes)")]
    OversizeContent { size: u64, max: u64 },

    #[error("binary files cannot be previewed")]
    BinaryContent,

    #[error("failed to read file: {0}")]
    ReadFailure(String),

    #[error("failed to read file info: {0}")]
    MetadataFailure(String),

    #[error("failed to load lines {start}..{start}+{count}: {reason}")]
    RangeLoadFailure {
        start: usize,
        count: usize,
        reason: String,
    },
}

impl PreviewError {
    /// Map a content error raised while reading bytes.
    pub fn from_read(err: ContentError) -> Self {
        match err {
            ContentError::TooLarge { size, max } => PreviewError::OversizeContent { size, max },
            other => PreviewError::ReadFailure(other.to_string()),
        }
    }

    /// Map a content error raised while resolving file info.
    pub fn from_metadata(err: ContentError) -> Self {
        PreviewError::MetadataFailure(err.to_string())
    }
}
