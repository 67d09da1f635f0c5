//! The deployment grid and its slots.

pub mod grid;
pub mod slot;

pub use grid::Board;
pub use slot::{PositionClass, Slot, SlotPos};
