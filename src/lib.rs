//! # gridfall
//!
//! A deterministic rules engine for a grid-based card battler. Cards are
//! deployed onto a rectangular board, carry data-driven conditional
//! effects, and commit a full board attack each turn.
//!
//! ## Architecture
//!
//! - [`core`] - identifiers, errors, seeded RNG, resource pools
//! - [`cards`] - templates, live instances, tiered stat modifiers
//! - [`board`] - the deployment grid and its slots
//! - [`effects`] - conditions, targeting, effect primitives, trigger
//!   dispatch
//! - [`world`] - the mutable session state everything resolves against
//! - [`battle`] - the phase state machine and seeded reward rolls
//!
//! Everything is deterministic under a fixed seed: multi-slot queries
//! resolve in row-major board order and all randomness flows through the
//! session RNG.

pub mod battle;
pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod world;

pub use battle::{Battle, BattleConfig, BattlePhase, RewardGenerator};
pub use board::{Board, PositionClass, Slot, SlotPos};
pub use cards::{CardInstance, CardRegistry, CardTemplate, CardTrait, Lifetime, ModifierKind, ModifierStore, Rarity};
pub use crate::core::{CardId, EngineError, GameRng, InstanceId, ResourceKind, ResourceStore};
pub use effects::{
    ClusterPattern, ConditionKind, Conditional, Effect, EffectRecord, GainMode, GateCheck,
    ModifierScope, TargetFilter, TargetRange, TargetSpec, TriggerKind,
};
pub use world::{Notification, World};
