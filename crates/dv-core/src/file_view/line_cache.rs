use std::collections::HashMap;

/// Sparse line store scoped to one open view.
///
/// Entries are only ever added. The whole cache is dropped with its view.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: HashMap<usize, String>,
    version: u64,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(&index).map(String::as_str)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.lines.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bumped every time an insert adds at least one new line.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Write `lines` at `start_line + offset`. Already cached indices keep their text.
    ///
    /// Returns the number of newly cached lines.
    pub fn insert_batch(&mut self, start_line: usize, lines: Vec<String>) -> usize {
        let mut added = 0;
        for (offset, line) in lines.into_iter().enumerate() {
            let Some(index) = start_line.checked_add(offset) else {
                break;
            };
            if let std::collections::hash_map::Entry::Vacant(slot) = self.lines.entry(index) {
                slot.insert(line);
                added += 1;
            }
        }
        if added > 0 {
            self.version += 1;
        }
        added
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn insert_batch_places_lines_at_offset() {
        let mut cache = LineCache::new();
        let added = cache.insert_batch(10, lines(10..13));

        assert_eq!(added, 3);
        assert_eq!(cache.get(10), Some("line 10"));
        assert_eq!(cache.get(12), Some("line 12"));
        assert_eq!(cache.get(13), None);
        assert_eq!(cache.version(), 1);
    }

    #[test]
    fn repeated_insert_is_idempotent_and_keeps_version() {
        let mut cache = LineCache::new();
        cache.insert_batch(0, lines(0..5));
        let added = cache.insert_batch(0, vec!["changed".into(); 5]);

        assert_eq!(added, 0);
        assert_eq!(cache.get(0), Some("line 0"));
        assert_eq!(cache.version(), 1);
    }

    #[test]
    fn overlapping_insert_adds_only_new_lines() {
        let mut cache = LineCache::new();
        cache.insert_batch(0, lines(0..5));
        let added = cache.insert_batch(3, lines(3..8));

        assert_eq!(added, 3);
        assert_eq!(cache.len(), 8);
        assert_eq!(cache.version(), 2);
    }
}
