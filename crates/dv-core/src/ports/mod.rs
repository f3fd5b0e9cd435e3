//! Port interfaces for the application layer
//!
//! Ports define the contract between the preview use cases and the outside
//! world: the content service that reads files, the host window, the card store,
//! the virtualized list that renders rows, plus time and timers.

mod card_repository;
mod clock;
mod content;
mod host_window;
mod timer;
mod virtual_list;

pub use card_repository::CardRepositoryPort;
pub use clock::ClockPort;
pub use content::{ByteContent, ByteRequest, ContentError, ContentPort};
pub use host_window::HostWindowPort;
pub use timer::{TimerCallback, TimerPort};
pub use virtual_list::VirtualListPort;
