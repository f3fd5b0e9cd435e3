//! Adapters for running the preview core without a window system.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use dv_core::geometry::Point;
use dv_core::ports::{HostWindowPort, VirtualListPort};
use dv_core::ViewSessionId;

/// Host window with fixed, configured geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHostWindow {
    pub scale_factor: f64,
    pub outer: Point,
    pub inner: Point,
}

impl FixedHostWindow {
    pub fn new(scale_factor: f64, titlebar_height: f64) -> Self {
        Self {
            scale_factor,
            outer: Point::new(0.0, 0.0),
            inner: Point::new(0.0, titlebar_height),
        }
    }
}

impl Default for FixedHostWindow {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl HostWindowPort for FixedHostWindow {
    fn scale_factor(&self) -> anyhow::Result<f64> {
        Ok(self.scale_factor)
    }

    fn outer_position(&self) -> anyhow::Result<Point> {
        Ok(self.outer)
    }

    fn inner_position(&self) -> anyhow::Result<Point> {
        Ok(self.inner)
    }
}

/// Virtual list that only records and logs what it is told.
#[derive(Default)]
pub struct TracingVirtualList {
    totals: Mutex<HashMap<ViewSessionId, usize>>,
}

impl TracingVirtualList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last total published for a session.
    pub fn total_count(&self, session: &ViewSessionId) -> Option<usize> {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .copied()
    }
}

impl VirtualListPort for TracingVirtualList {
    fn set_total_count(&self, session: &ViewSessionId, total: usize, overscan: usize) {
        debug!(session_id = %session, total, overscan, "list total published");
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.clone(), total);
    }

    fn lines_changed(&self, session: &ViewSessionId, version: u64) {
        debug!(session_id = %session, version, "list rows invalidated");
    }

    fn released(&self, session: &ViewSessionId) {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session);
    }
}
