use std::path::Path;

use serde::{Deserialize, Serialize};

/// Size facts about a file, resolved once per view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub byte_size: u64,
    pub line_count: usize,
}

/// Final path component, or `"unknown"` when the path has none.
pub fn filename_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// One response from the content service: `lines[i]` is line `start_line + i`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineBatch {
    pub lines: Vec<String>,
    pub start_line: usize,
}

/// What a full view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileViewState {
    /// Metadata or the first screen is still loading.
    Loading,
    /// The file has no lines. Terminal: no range request is ever issued.
    Empty { byte_size: u64 },
    /// Rows can be rendered; missing ones show a placeholder.
    Ready { total_lines: usize, byte_size: u64 },
    /// Metadata could not be resolved. Stays until the view is closed.
    Failed { reason: String },
    /// The view was closed.
    Closed,
}

impl FileViewState {
    pub fn total_lines(&self) -> Option<usize> {
        match self {
            FileViewState::Ready { total_lines, .. } => Some(*total_lines),
            FileViewState::Empty { .. } => Some(0),
            _ => None,
        }
    }
}

/// What a card face shows before it is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuickPreviewState {
    Ready {
        text: String,
        /// `true` when the file is larger than the preview window.
        truncated: bool,
        byte_size: u64,
    },
    Failed {
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_falls_back_to_unknown() {
        assert_eq!(filename_of("/var/log/syslog"), "syslog");
        assert_eq!(filename_of("notes.md"), "notes.md");
        assert_eq!(filename_of("/"), "unknown");
    }
}
