//! Drop handling: the reconciliation state machine and content classification.

mod classify;
mod state_machine;

pub use classify::{classify, ContentKind, BINARY_SAMPLE_BYTES};
pub use state_machine::{
    DropAction, DropEvent, DropIndicator, DropRejection, DropState, DropStateMachine,
};
