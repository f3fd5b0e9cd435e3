use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use dv_core::file_view::{FileViewState, LineRange, LineWindow};
use dv_core::ports::{ContentPort, VirtualListPort};
use dv_core::{PreviewError, ViewSessionId};

/// One open full view of a file.
///
/// Owns the line cache of that view. Every async step checks the session's
/// cancellation token before touching the cache, and [`FileViewSession::close`]
/// drops the cache, so a late response from a closed view is discarded.
pub struct FileViewSession {
    id: ViewSessionId,
    path: String,
    content: Arc<dyn ContentPort>,
    list: Arc<dyn VirtualListPort>,
    first_screen_lines: usize,
    buffer_lines: usize,
    cancel: CancellationToken,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    state: FileViewState,
    window: Option<LineWindow>,
}

impl FileViewSession {
    pub fn new(
        path: impl Into<String>,
        content: Arc<dyn ContentPort>,
        list: Arc<dyn VirtualListPort>,
        first_screen_lines: usize,
        buffer_lines: usize,
    ) -> Self {
        Self {
            id: ViewSessionId::new(),
            path: path.into(),
            content,
            list,
            first_screen_lines,
            buffer_lines,
            cancel: CancellationToken::new(),
            inner: Mutex::new(SessionInner {
                state: FileViewState::Loading,
                window: None,
            }),
        }
    }

    pub fn id(&self) -> &ViewSessionId {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> FileViewState {
        self.lock().state.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Row text for the list's render callback; `""` while the line is not loaded.
    pub fn get(&self, index: usize) -> String {
        self.line(index).unwrap_or_default()
    }

    pub fn line(&self, index: usize) -> Option<String> {
        let inner = self.lock();
        inner
            .window
            .as_ref()
            .and_then(|w| w.get(index))
            .map(str::to_owned)
    }

    /// Number of cached lines.
    pub fn cached_lines(&self) -> usize {
        self.lock().window.as_ref().map_or(0, |w| w.cache().len())
    }

    /// Resolve metadata and load the first screen, then publish the total count.
    ///
    /// The list learns the row count only after the first screen is cached, so it
    /// never renders a screen full of placeholders on open.
    #[tracing::instrument(
        name = "usecase.file_view.open",
        skip(self),
        fields(session_id = %self.id, path = %self.path)
    )]
    pub async fn open(&self) -> FileViewState {
        let info = self.content.file_info(&self.path).await;
        if self.is_closed() {
            return FileViewState::Closed;
        }
        let info = match info {
            Ok(info) => info,
            Err(err) => {
                let err = PreviewError::from_metadata(err);
                error!(error = %err, "Failed to resolve file info");
                return self.set_state(FileViewState::Failed {
                    reason: err.to_string(),
                });
            }
        };

        if info.line_count == 0 {
            info!(byte_size = info.byte_size, "File is empty");
            return self.set_state(FileViewState::Empty {
                byte_size: info.byte_size,
            });
        }

        let first_screen = {
            let mut inner = self.lock();
            let window = inner
                .window
                .insert(LineWindow::new(info.line_count, self.buffer_lines));
            LineRange::first_screen(info.line_count, self.first_screen_lines)
                .map(|range| window.plan_range(range))
                .unwrap_or_default()
        };
        self.fetch_all(first_screen).await;
        if self.is_closed() {
            return FileViewState::Closed;
        }

        self.list
            .set_total_count(&self.id, info.line_count, self.buffer_lines);
        info!(
            total_lines = info.line_count,
            byte_size = info.byte_size,
            "File view ready"
        );
        self.set_state(FileViewState::Ready {
            total_lines: info.line_count,
            byte_size: info.byte_size,
        })
    }

    /// The list reported a new visible range. Loads whatever is missing around it.
    ///
    /// Returns the number of lines added to the cache.
    #[tracing::instrument(
        name = "usecase.file_view.range_changed",
        skip(self),
        fields(session_id = %self.id)
    )]
    pub async fn range_changed(&self, start_index: usize, end_index: usize) -> usize {
        if self.is_closed() {
            return 0;
        }
        let requests = {
            let mut inner = self.lock();
            match inner.window.as_mut() {
                Some(window) => window.plan(LineRange::new(start_index, end_index)),
                None => return 0,
            }
        };
        if requests.is_empty() {
            return 0;
        }
        debug!(requests = requests.len(), "Loading missing line ranges");

        let added = self.fetch_all(requests).await;
        if added > 0 && !self.is_closed() {
            if let Some(version) = self.lock().window.as_ref().map(LineWindow::version) {
                self.list.lines_changed(&self.id, version);
            }
        }
        added
    }

    /// Tear the session down: cancel pending loads and discard the cache.
    pub fn close(&self) {
        self.cancel.cancel();
        {
            let mut inner = self.lock();
            inner.window = None;
            inner.state = FileViewState::Closed;
        }
        self.list.released(&self.id);
        debug!(session_id = %self.id, "File view closed");
    }

    async fn fetch_all(&self, requests: Vec<LineRange>) -> usize {
        join_all(requests.into_iter().map(|r| self.fetch(r)))
            .await
            .into_iter()
            .sum()
    }

    async fn fetch(&self, request: LineRange) -> usize {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return 0,
            result = self.content.read_lines(&self.path, request.start, request.len()) => result,
        };
        if self.is_closed() {
            return 0;
        }

        let mut inner = self.lock();
        let Some(window) = inner.window.as_mut() else {
            return 0;
        };
        match result {
            Ok(batch) => window.complete(request, batch),
            Err(err) => {
                window.abandon(request);
                let err = PreviewError::RangeLoadFailure {
                    start: request.start,
                    count: request.len(),
                    reason: err.to_string(),
                };
                warn!(error = %err, "Line range stays uncached until the next range change");
                0
            }
        }
    }

    fn set_state(&self, state: FileViewState) -> FileViewState {
        let mut inner = self.lock();
        if inner.state != FileViewState::Closed {
            inner.state = state;
        }
        inner.state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FileViewSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
