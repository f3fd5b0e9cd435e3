use std::sync::Arc;

use tracing::{debug, warn};

use dv_core::file_view::QuickPreviewState;
use dv_core::ports::{ByteRequest, ContentPort};
use dv_core::PreviewError;

/// Load the head of a file for a card face.
///
/// Reads at most `preview_bytes` once; no line indexing is involved. A failure
/// only ever lands in the returned state of this one card.
pub struct LoadQuickPreview {
    content: Arc<dyn ContentPort>,
    preview_bytes: u64,
}

impl LoadQuickPreview {
    pub fn new(content: Arc<dyn ContentPort>, preview_bytes: u64) -> Self {
        Self {
            content,
            preview_bytes,
        }
    }

    #[tracing::instrument(name = "usecase.quick_preview.execute", skip(self), fields(path = %path))]
    pub async fn execute(&self, path: &str) -> QuickPreviewState {
        let request = ByteRequest::slice(0, self.preview_bytes);
        match self.content.read_bytes(path, request).await {
            Ok(read) => {
                let truncated = read.byte_size > read.content.len() as u64;
                debug!(byte_size = read.byte_size, truncated, "Quick preview loaded");
                QuickPreviewState::Ready {
                    text: read.text(),
                    truncated,
                    byte_size: read.byte_size,
                }
            }
            Err(err) => {
                let err = PreviewError::from_read(err);
                warn!(error = %err, "Quick preview failed");
                QuickPreviewState::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
