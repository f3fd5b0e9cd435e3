//! Binary vs. text sniffing for dropped files.

use serde::{Deserialize, Serialize};

/// Only this many leading bytes are inspected.
pub const BINARY_SAMPLE_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Binary,
}

/// Classify content by its first [`BINARY_SAMPLE_BYTES`] bytes.
///
/// Any NUL byte means binary. Otherwise control bytes below 32 (tab, LF and CR
/// excluded) above 10% of the sample mean binary.
pub fn classify(content: &[u8]) -> ContentKind {
    let sample = &content[..content.len().min(BINARY_SAMPLE_BYTES)];
    if sample.contains(&0) {
        return ContentKind::Binary;
    }
    let control = sample
        .iter()
        .filter(|&&b| b < 32 && !matches!(b, b'\t' | b'\n' | b'\r'))
        .count();
    if control * 10 > sample.len() {
        ContentKind::Binary
    } else {
        ContentKind::Text
    }
}
