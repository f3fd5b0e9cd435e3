use serde::{Deserialize, Serialize};

/// Inclusive range of zero-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Number of lines covered. An inclusive range is never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    /// `[0, min(size, total) - 1]`, or `None` for an empty file or a zero size.
    pub fn first_screen(total: usize, size: usize) -> Option<Self> {
        let len = size.min(total);
        (len > 0).then(|| Self::new(0, len - 1))
    }

    /// Grow by `buffer` on both sides and clamp to `[0, total - 1]`.
    ///
    /// Returns `None` when the file has no lines or the range lies entirely past the end.
    pub fn expand(&self, buffer: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let last = total - 1;
        let start = self.start.saturating_sub(buffer);
        if start > last {
            return None;
        }
        let end = self.end.saturating_add(buffer).min(last);
        Some(Self::new(start, end))
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Split `desired` into the fewest contiguous runs of indices not yet covered.
///
/// Covered indices are never part of the result, so a fully covered range yields
/// no requests at all.
pub fn missing_ranges(desired: LineRange, is_covered: impl Fn(usize) -> bool) -> Vec<LineRange> {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;

    for index in desired.iter() {
        match (is_covered(index), run_start) {
            (false, None) => run_start = Some(index),
            (true, Some(start)) => {
                runs.push(LineRange::new(start, index - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(LineRange::new(start, desired.end));
    }
    runs
}
