use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::file_view::{FileInfo, LineBatch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("file too large ({size} bytes). Max: {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("io error: {0}")]
    Io(String),
}

/// How much of a file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRequest {
    /// Whole-file reads fail with [`ContentError::TooLarge`] above this size.
    pub max_size: u64,
    /// Byte offset of a slice read.
    pub offset: Option<u64>,
    /// Byte length of a slice read.
    pub length: Option<u64>,
}

impl ByteRequest {
    /// Read the whole file, refusing anything larger than `max_size`.
    pub fn whole(max_size: u64) -> Self {
        Self {
            max_size,
            offset: None,
            length: None,
        }
    }

    /// Read at most `length` bytes starting at `offset`, whatever the file size.
    pub fn slice(offset: u64, length: u64) -> Self {
        Self {
            max_size: length,
            offset: Some(offset),
            length: Some(length),
        }
    }

    pub fn window(&self) -> Option<(u64, u64)> {
        self.offset.zip(self.length)
    }
}

/// Raw bytes read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteContent {
    pub filename: String,
    pub content: Vec<u8>,
    /// Size of the whole file, not of `content`.
    pub byte_size: u64,
}

impl ByteContent {
    /// Lossy UTF-8 view; a slice may end inside a multi-byte character.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// File access used by previews, full views and drops.
#[async_trait]
pub trait ContentPort: Send + Sync {
    async fn file_info(&self, path: &str) -> Result<FileInfo, ContentError>;

    /// Lines `[start_line, start_line + count)`. Past the end yields an empty batch.
    async fn read_lines(
        &self,
        path: &str,
        start_line: usize,
        count: usize,
    ) -> Result<LineBatch, ContentError>;

    async fn read_bytes(&self, path: &str, request: ByteRequest)
        -> Result<ByteContent, ContentError>;
}
