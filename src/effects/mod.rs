//! Conditional effect resolution: conditions, targets, primitives, and
//! trigger dispatch.

pub mod condition;
pub mod dispatcher;
pub mod effect;
pub mod target;

pub use condition::{ClusterPattern, ConditionKind, Conditional, GateCheck};
pub use dispatcher::TriggerKind;
pub use effect::{Effect, EffectRecord, GainMode, ModifierScope};
pub use target::{TargetFilter, TargetRange, TargetSpec};
