//! File card domain model.

mod model;

pub use model::{next_z_index, Card, CardPatch, CardSource, NewCard};
