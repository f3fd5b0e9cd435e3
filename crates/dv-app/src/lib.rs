//! Devora Application Orchestration Layer
//!
//! This crate contains the preview use cases: file view sessions over the line
//! cache, quick previews, card dragging and commands, drop reconciliation and
//! transient notices.

pub mod deps;
pub mod notices;
pub mod usecases;

pub use deps::AppDeps;
pub use notices::{Notice, NoticeCenter, NoticeLevel};
