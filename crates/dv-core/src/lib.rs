//! # dv-core
//!
//! Core domain models and business logic for the Devora file-preview cards.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the windowed line cache, the coordinate normalizer, the card drag engine and the
//! drop reconciliation state machine. Everything that touches a file, a window or a
//! store goes through [`ports`].

// Public module exports
pub mod card;
pub mod config;
pub mod drag;
pub mod drop;
pub mod error;
pub mod file_view;
pub mod geometry;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use card::{Card, CardPatch, CardSource, NewCard};
pub use config::PreviewConfig;
pub use error::PreviewError;
pub use ids::{CardId, ProjectId, ViewSessionId};
