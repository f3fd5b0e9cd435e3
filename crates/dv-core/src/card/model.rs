use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::PercentPoint;
use crate::ids::{CardId, ProjectId};

/// Where a card's text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CardSource {
    /// A file on disk, read lazily through the content service.
    File { file_path: String },
    /// Text dropped from memory (no backing file).
    Inline { content: String },
}

impl CardSource {
    pub fn file_path(&self) -> Option<&str> {
        match self {
            CardSource::File { file_path } => Some(file_path),
            CardSource::Inline { .. } => None,
        }
    }
}

/// A persisted floating file card.
///
/// Only placement and visibility live here; file content is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub project_id: ProjectId,
    pub filename: String,
    #[serde(flatten)]
    pub source: CardSource,
    /// Percent of the viewport width, `0..=100`.
    pub position_x: f64,
    /// Percent of the viewport height, `0..=100`.
    pub position_y: f64,
    pub is_expanded: bool,
    pub is_minimized: bool,
    pub z_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn position(&self) -> PercentPoint {
        PercentPoint::new(self.position_x, self.position_y)
    }

    /// Apply a partial update in place. `updated_at` is set by the caller.
    pub fn apply(&mut self, patch: &CardPatch) {
        if let Some(filename) = &patch.filename {
            self.filename = filename.clone();
        }
        if let Some(position) = patch.position {
            self.position_x = position.x;
            self.position_y = position.y;
        }
        if let Some(expanded) = patch.is_expanded {
            self.is_expanded = expanded;
        }
        if let Some(minimized) = patch.is_minimized {
            self.is_minimized = minimized;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
    }
}

/// Creation request for a card. The store assigns id, z-index and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub project_id: ProjectId,
    pub filename: String,
    pub source: CardSource,
    /// `None` lets the store use its default placement.
    pub position: Option<PercentPoint>,
}

/// Partial update for a card; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    pub filename: Option<String>,
    pub position: Option<PercentPoint>,
    pub is_expanded: Option<bool>,
    pub is_minimized: Option<bool>,
    pub z_index: Option<i32>,
}

impl CardPatch {
    pub fn position(position: PercentPoint) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn z_index(z_index: i32) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    pub fn minimized(is_minimized: bool) -> Self {
        Self {
            is_minimized: Some(is_minimized),
            ..Self::default()
        }
    }

    pub fn expanded(is_expanded: bool) -> Self {
        Self {
            is_expanded: Some(is_expanded),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// The z-index that puts a card above every card in `cards`.
///
/// Starts at `0` for an empty project.
pub fn next_z_index<'a>(cards: impl IntoIterator<Item = &'a Card>) -> i32 {
    cards
        .into_iter()
        .map(|c| c.z_index)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}
