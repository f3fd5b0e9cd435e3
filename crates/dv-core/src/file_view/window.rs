//! Fetch planning for one open view.

use super::{missing_ranges, LineBatch, LineCache, LineRange};

/// Line cache plus the bookkeeping that decides what to fetch next.
///
/// Owns the cache of exactly one view. Requests handed out by [`LineWindow::plan`]
/// stay reserved until [`LineWindow::complete`] or [`LineWindow::abandon`] is
/// called for them, so overlapping scroll updates never ask twice for the same lines.
#[derive(Debug)]
pub struct LineWindow {
    cache: LineCache,
    total_lines: usize,
    buffer_lines: usize,
    in_flight: Vec<LineRange>,
}

impl LineWindow {
    pub fn new(total_lines: usize, buffer_lines: usize) -> Self {
        Self {
            cache: LineCache::new(),
            total_lines,
            buffer_lines,
            in_flight: Vec::new(),
        }
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn cache(&self) -> &LineCache {
        &self.cache
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cache.get(index)
    }

    pub fn version(&self) -> u64 {
        self.cache.version()
    }

    pub fn in_flight(&self) -> &[LineRange] {
        &self.in_flight
    }

    fn is_covered(&self, index: usize) -> bool {
        self.cache.contains(index) || self.in_flight.iter().any(|r| r.contains(index))
    }

    /// Reserve the missing part of `desired` and return it as coalesced requests.
    pub fn plan_range(&mut self, desired: LineRange) -> Vec<LineRange> {
        let desired = match desired.expand(0, self.total_lines) {
            Some(r) => r,
            None => return Vec::new(),
        };
        let requests = missing_ranges(desired, |i| self.is_covered(i));
        self.in_flight.extend(requests.iter().copied());
        requests
    }

    /// Plan for a visible range reported by the list: expand by the buffer first.
    pub fn plan(&mut self, visible: LineRange) -> Vec<LineRange> {
        match visible.expand(self.buffer_lines, self.total_lines) {
            Some(desired) => self.plan_range(desired),
            None => Vec::new(),
        }
    }

    /// Store a response and release its reservation. Returns the number of new lines.
    pub fn complete(&mut self, request: LineRange, batch: LineBatch) -> usize {
        self.release(request);
        self.cache.insert_batch(batch.start_line, batch.lines)
    }

    /// Release a reservation without data, so a later plan can retry it.
    pub fn abandon(&mut self, request: LineRange) {
        self.release(request);
    }

    fn release(&mut self, request: LineRange) {
        if let Some(pos) = self.in_flight.iter().position(|r| *r == request) {
            self.in_flight.swap_remove(pos);
        }
    }
}
