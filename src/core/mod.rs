//! Core types: identifiers, errors, RNG, resource pools.

pub mod error;
pub mod ids;
pub mod resources;
pub mod rng;

pub use error::EngineError;
pub use ids::{CardId, InstanceId};
pub use resources::{ResourceKind, ResourcePool, ResourceStore};
pub use rng::{derive_seed, GameRng};
