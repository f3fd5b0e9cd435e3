use std::io::{ErrorKind, SeekFrom};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};
use tracing::debug;

use dv_core::file_view::{filename_of, FileInfo, LineBatch};
use dv_core::ports::{ByteContent, ByteRequest, ContentError, ContentPort};

/// Files above this size are never indexed or streamed.
pub const ABSOLUTE_MAX_BYTES: u64 = 500 * 1024 * 1024;

const CHUNK_BYTES: usize = 64 * 1024;

/// Content service over the local filesystem.
///
/// Line counting and line reads stream through the file; only whole-file byte
/// reads hold the content in memory, and those are bounded by the caller's max.
pub struct FsContentService {
    absolute_max: u64,
}

impl FsContentService {
    pub fn new() -> Self {
        Self {
            absolute_max: ABSOLUTE_MAX_BYTES,
        }
    }

    pub fn with_absolute_max(absolute_max: u64) -> Self {
        Self { absolute_max }
    }

    /// Size of a regular file, refusing anything above the absolute max.
    async fn checked_size(&self, path: &str) -> Result<u64, ContentError> {
        let metadata = fs::metadata(path).await.map_err(|e| io_error(path, e))?;
        if !metadata.is_file() {
            return Err(ContentError::Io(format!("{path}: not a regular file")));
        }
        let size = metadata.len();
        if size > self.absolute_max {
            return Err(ContentError::TooLarge {
                size,
                max: self.absolute_max,
            });
        }
        Ok(size)
    }
}

impl Default for FsContentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentPort for FsContentService {
    async fn file_info(&self, path: &str) -> Result<FileInfo, ContentError> {
        let byte_size = self.checked_size(path).await?;
        let mut file = File::open(path).await.map_err(|e| io_error(path, e))?;

        let mut buf = vec![0u8; CHUNK_BYTES];
        let mut newlines = 0usize;
        let mut last = None;
        loop {
            let n = file.read(&mut buf).await.map_err(|e| io_error(path, e))?;
            if n == 0 {
                break;
            }
            newlines += buf[..n].iter().filter(|&&b| b == b'\n').count();
            last = Some(buf[n - 1]);
        }
        // a trailing newline does not start another line
        let line_count = match last {
            None => 0,
            Some(b'\n') => newlines,
            Some(_) => newlines + 1,
        };

        debug!(path, byte_size, line_count, "file info resolved");
        Ok(FileInfo {
            filename: filename_of(path),
            byte_size,
            line_count,
        })
    }

    async fn read_lines(
        &self,
        path: &str,
        start_line: usize,
        count: usize,
    ) -> Result<LineBatch, ContentError> {
        self.checked_size(path).await?;
        let file = File::open(path).await.map_err(|e| io_error(path, e))?;
        let mut reader = BufReader::new(file);

        let mut lines = Vec::with_capacity(count.min(4096));
        let mut buf = Vec::new();
        let mut index = 0usize;
        while lines.len() < count {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| io_error(path, e))?;
            if n == 0 {
                break;
            }
            if index >= start_line {
                lines.push(decode_line(&buf));
            }
            index += 1;
        }

        Ok(LineBatch { lines, start_line })
    }

    async fn read_bytes(
        &self,
        path: &str,
        request: ByteRequest,
    ) -> Result<ByteContent, ContentError> {
        let metadata = fs::metadata(path).await.map_err(|e| io_error(path, e))?;
        let byte_size = metadata.len();

        let content = match request.window() {
            Some((offset, length)) => {
                let mut file = File::open(path).await.map_err(|e| io_error(path, e))?;
                file.seek(SeekFrom::Start(offset))
                    .await
                    .map_err(|e| io_error(path, e))?;
                let mut content = Vec::with_capacity(length.min(byte_size) as usize);
                file.take(length)
                    .read_to_end(&mut content)
                    .await
                    .map_err(|e| io_error(path, e))?;
                content
            }
            None => {
                if byte_size > request.max_size {
                    return Err(ContentError::TooLarge {
                        size: byte_size,
                        max: request.max_size,
                    });
                }
                fs::read(path).await.map_err(|e| io_error(path, e))?
            }
        };

        Ok(ByteContent {
            filename: filename_of(path),
            content,
            byte_size,
        })
    }
}

fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

fn io_error(path: &str, err: std::io::Error) -> ContentError {
    match err.kind() {
        ErrorKind::NotFound => ContentError::NotFound(path.to_string()),
        ErrorKind::PermissionDenied => ContentError::PermissionDenied(path.to_string()),
        _ => ContentError::Io(format!("{path}: {err}")),
    }
}
