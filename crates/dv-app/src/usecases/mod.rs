//! Preview use cases
//!
//! [drop gesture]
//         ↓
// DropReconciler → ImportDroppedContent → card store
//         ↓
// ---------------------------------
// LoadQuickPreview                    → card face
// FileViewer / FileViewSession        → expanded view, windowed lines
// CardDragController / BringCardToFront → placement and stacking

pub mod cards;
pub mod drop;
pub mod file_view;
pub mod quick_preview;

#[cfg(test)]
pub(crate) mod testing;

pub use cards::{
    AddFileCard, BringCardToFront, CardDragController, DeleteCard, ListCards, ToggleCardExpanded,
    ToggleCardMinimized,
};
pub use drop::{DropOutcome, DropPolicy, DropReconciler, ImportDroppedContent};
pub use file_view::{FileViewSession, FileViewer};
pub use quick_preview::LoadQuickPreview;
