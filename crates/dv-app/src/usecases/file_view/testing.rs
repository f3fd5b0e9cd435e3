//! In-memory content service and list recorder shared by the view tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use dv_core::file_view::{FileInfo, LineBatch, LineRange};
use dv_core::ports::{ByteContent, ByteRequest, ContentError, ContentPort, VirtualListPort};
use dv_core::ViewSessionId;

pub(crate) struct FakeContent {
    total: Option<usize>,
    requests: Mutex<Vec<LineRange>>,
    failures: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeContent {
    pub(crate) fn with_lines(total: usize) -> Self {
        Self {
            total: Some(total),
            requests: Mutex::new(Vec::new()),
            failures: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub(crate) fn missing() -> Self {
        Self {
            total: None,
            ..Self::with_lines(0)
        }
    }

    pub(crate) fn byte_size(&self) -> u64 {
        (0..self.total.unwrap_or(0))
            .map(|i| format!("line {i}\n").len() as u64)
            .sum()
    }

    pub(crate) fn requests(&self) -> Vec<LineRange> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn fail_next_reads(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Make every following read wait until the returned gate is notified.
    pub(crate) fn hold_reads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl ContentPort for FakeContent {
    async fn file_info(&self, path: &str) -> Result<FileInfo, ContentError> {
        let total = self
            .total
            .ok_or_else(|| ContentError::NotFound(path.to_string()))?;
        Ok(FileInfo {
            filename: "big.log".into(),
            byte_size: self.byte_size(),
            line_count: total,
        })
    }

    async fn read_lines(
        &self,
        _path: &str,
        start_line: usize,
        count: usize,
    ) -> Result<LineBatch, ContentError> {
        self.requests
            .lock()
            .unwrap()
            .push(LineRange::new(start_line, start_line + count - 1));
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ContentError::Io("disk hiccup".into()));
        }
        let end = (start_line + count).min(self.total.unwrap_or(0));
        Ok(LineBatch {
            lines: (start_line..end).map(|i| format!("line {i}")).collect(),
            start_line,
        })
    }

    async fn read_bytes(
        &self,
        _path: &str,
        _request: ByteRequest,
    ) -> Result<ByteContent, ContentError> {
        unimplemented!("not used by view tests")
    }
}

#[derive(Default)]
pub(crate) struct RecordingList {
    totals: Mutex<Vec<(usize, usize)>>,
    versions: Mutex<Vec<u64>>,
    released: Mutex<Vec<ViewSessionId>>,
}

impl RecordingList {
    pub(crate) fn totals(&self) -> Vec<(usize, usize)> {
        self.totals.lock().unwrap().clone()
    }

    pub(crate) fn versions(&self) -> Vec<u64> {
        self.versions.lock().unwrap().clone()
    }

    pub(crate) fn released_sessions(&self) -> Vec<ViewSessionId> {
        self.released.lock().unwrap().clone()
    }
}

impl VirtualListPort for RecordingList {
    fn set_total_count(&self, _session: &ViewSessionId, total: usize, overscan: usize) {
        self.totals.lock().unwrap().push((total, overscan));
    }

    fn lines_changed(&self, _session: &ViewSessionId, version: u64) {
        self.versions.lock().unwrap().push(version);
    }

    fn released(&self, session: &ViewSessionId) {
        self.released.lock().unwrap().push(session.clone());
    }
}
