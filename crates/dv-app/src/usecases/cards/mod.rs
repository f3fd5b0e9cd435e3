//! Card placement, stacking and lifecycle.

mod bring_to_front;
mod commands;
mod drag_controller;

pub use bring_to_front::BringCardToFront;
pub use commands::{AddFileCard, DeleteCard, ListCards, ToggleCardExpanded, ToggleCardMinimized};
pub use drag_controller::CardDragController;
