//! Pointer-drag engine for floating cards.

mod engine;

pub use engine::{DragEngine, DragSession, FrameRequest, PointerTarget};
