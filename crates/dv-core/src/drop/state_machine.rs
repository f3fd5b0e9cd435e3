//! Drop reconciliation state machine.
//!
//! Two independent sources feed one machine: the in-page drag signal (immediate,
//! no file paths) and the host's native drop signal (later, with real paths and
//! a precise position). Nothing is imported until the native side speaks.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Gesture state. Positions are already in content space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DropState {
    Idle,
    /// The page saw a file drag enter; waiting for the native side.
    Hovering { since_ms: i64 },
    /// The native side confirmed the drag; a drop may commit.
    Ready { position: Point },
}

impl DropState {
    pub fn indicator(&self) -> DropIndicator {
        match self {
            DropState::Idle => DropIndicator::None,
            DropState::Hovering { .. } => DropIndicator::Preparing,
            DropState::Ready { .. } => DropIndicator::ReleaseToDrop,
        }
    }
}

/// Overlay the canvas shows for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropIndicator {
    None,
    Preparing,
    ReleaseToDrop,
}

/// Inputs from both signal sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DropEvent {
    /// In-page `dragenter`.
    PageDragEnter { has_files: bool, at_ms: i64 },
    /// In-page `dragleave`; `left_window` when there is no related target.
    PageDragLeave { left_window: bool },
    /// In-page drop of in-memory text (no backing file).
    PageDropText {
        filename: String,
        text: String,
        position: Point,
    },
    /// Native drag-over with a converted position.
    NativeOver { position: Point },
    NativeLeave,
    /// Native drop with the offered paths and, when the host reports one, a
    /// converted position.
    NativeDrop {
        paths: Vec<String>,
        position: Option<Point>,
    },
    /// The native side did not confirm within the configured timeout.
    HoverTimedOut,
}

/// Why a gesture ended without an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropRejection {
    /// The native drag-over never arrived.
    NativeSignalMissing,
}

/// Side-effects produced by a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DropAction {
    ImportFile { path: String, position: Point },
    ImportText {
        filename: String,
        text: String,
        position: Point,
    },
    Reject { reason: DropRejection },
}

/// Pure drop state machine.
pub struct DropStateMachine;

impl DropStateMachine {
    pub fn transition(state: DropState, event: DropEvent) -> (DropState, Vec<DropAction>) {
        match (state, event) {
            (DropState::Idle, DropEvent::PageDragEnter { has_files: true, at_ms }) => {
                (DropState::Hovering { since_ms: at_ms }, Vec::new())
            }
            (DropState::Hovering { .. }, DropEvent::PageDragLeave { left_window: true }) => {
                (DropState::Idle, Vec::new())
            }
            // The native signal is authoritative even if the page never saw the enter.
            (
                DropState::Idle | DropState::Hovering { .. } | DropState::Ready { .. },
                DropEvent::NativeOver { position },
            ) => (DropState::Ready { position }, Vec::new()),
            (DropState::Hovering { .. } | DropState::Ready { .. }, DropEvent::NativeLeave) => {
                (DropState::Idle, Vec::new())
            }
            (DropState::Ready { position: cached }, DropEvent::NativeDrop { paths, position }) => {
                (DropState::Idle, import_first(paths, position.unwrap_or(cached)))
            }
            // A drop is only committed once the native drag-over has confirmed it.
            (DropState::Hovering { .. }, DropEvent::NativeDrop { paths, .. }) => {
                let actions = if paths.is_empty() {
                    Vec::new()
                } else {
                    vec![DropAction::Reject {
                        reason: DropRejection::NativeSignalMissing,
                    }]
                };
                (DropState::Idle, actions)
            }
            (DropState::Hovering { .. }, DropEvent::HoverTimedOut) => (
                DropState::Idle,
                vec![DropAction::Reject {
                    reason: DropRejection::NativeSignalMissing,
                }],
            ),
            (
                _,
                DropEvent::PageDropText {
                    filename,
                    text,
                    position,
                },
            ) => (
                DropState::Idle,
                vec![DropAction::ImportText {
                    filename,
                    text,
                    position,
                }],
            ),
            (state, _event) => (state, Vec::new()),
        }
    }
}

fn import_first(paths: Vec<String>, position: Point) -> Vec<DropAction> {
    paths
        .into_iter()
        .take(1)
        .map(|path| DropAction::ImportFile { path, position })
        .collect()
}
