//! File and text drops onto the canvas.

mod import;
mod reconciler;

pub use import::{DropOutcome, DropPolicy, ImportDroppedContent};
pub use reconciler::DropReconciler;
