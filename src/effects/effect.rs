//! Effect primitives.
//!
//! Effects are the leaves of the resolution tree: each one mutates the
//! world and reports what it changed as an [`EffectRecord`]. Reverting
//! consumes that record, so only mutations that actually landed are undone.
//! That is what keeps WhileInPlay auras symmetric when a card leaves the
//! board: a consume that failed against a short pool is never refunded, and
//! a short-circuited sequence only unwinds the children that ran. Reverts
//! are best-effort inverses beyond that: destruction is not undone, and
//! resource reverts clamp like any other pool mutation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{Lifetime, ModifierKind};
use crate::core::{EngineError, InstanceId, ResourceKind};
use crate::effects::condition::{ConditionKind, Conditional};
use crate::effects::dispatcher::TriggerKind;
use crate::world::World;

/// When a destruction payout is granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainMode {
    /// Pay out once, immediately.
    Instant,
    /// Install a recurring end-of-turn payout on the source card.
    PerTurn,
}

/// Where a modifier lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierScope {
    /// The source card's own modifier store.
    SelfCard,
    /// The modifier stores of the slots surrounding the source. Slot
    /// modifiers persist across occupants.
    Adjacent,
}

/// Record of what a resolved effect actually changed.
///
/// Resolution can fail outright (a short pool) or stop partway (a
/// short-circuited sequence); the record pins down which mutations landed
/// so a later revert undoes exactly those and nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectRecord {
    /// Nothing took hold; revert is a no-op.
    Untouched,
    /// The effect fully took hold.
    Applied,
    /// Per-child records for the sequence children that ran, in execution
    /// order. Children after a failed one have no record.
    Sequence(Vec<EffectRecord>),
}

impl EffectRecord {
    /// Whether the resolution counts as a success.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        match self {
            EffectRecord::Untouched => false,
            EffectRecord::Applied => true,
            EffectRecord::Sequence(children) => children.iter().all(EffectRecord::succeeded),
        }
    }
}

/// A single resolvable effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Add to a resource pool. Always succeeds; clamped to the pool max.
    Produce { resource: ResourceKind, amount: i64 },
    /// Remove from a resource pool. Fails without mutating when the pool
    /// holds less than `amount`.
    Consume { resource: ResourceKind, amount: i64 },
    /// Add a stat modifier to the source card or its surrounding slots.
    ApplyModifier {
        kind: ModifierKind,
        amount: i64,
        tier: Lifetime,
        scope: ModifierScope,
    },
    /// Subtract a stat modifier. Absent entries are a no-op.
    RemoveModifier {
        kind: ModifierKind,
        amount: i64,
        tier: Lifetime,
        scope: ModifierScope,
    },
    /// Remove the source card from play, running its removal chain.
    DestroySelf,
    /// Resolve sub-effects in order, stopping at the first failure.
    /// Effects resolved before the failure keep their mutations.
    Sequence(Vec<Effect>),
    /// Destroy every card surrounding the source and pay out per kill.
    DestroySurroundingToGain {
        resource: ResourceKind,
        per_destroyed: i64,
        mode: GainMode,
    },
}

impl Effect {
    /// Apply the effect, returning the record of what landed.
    pub fn resolve(&self, world: &mut World, source: InstanceId) -> Result<EffectRecord, EngineError> {
        match self {
            Effect::Produce { resource, amount } => {
                world.modify_resource(*resource, *amount);
                Ok(EffectRecord::Applied)
            }
            Effect::Consume { resource, amount } => {
                if !world.resources.can_afford(*resource, *amount) {
                    debug!(%resource, amount, "consume failed, pool short");
                    return Ok(EffectRecord::Untouched);
                }
                world.modify_resource(*resource, -amount);
                Ok(EffectRecord::Applied)
            }
            Effect::ApplyModifier { kind, amount, tier, scope } => {
                self.each_store(world, source, *scope, |store| store.add(*kind, *amount, *tier));
                world.recompute_total_attack();
                Ok(EffectRecord::Applied)
            }
            Effect::RemoveModifier { kind, amount, tier, scope } => {
                self.each_store(world, source, *scope, |store| {
                    store.remove(*kind, *amount, *tier);
                });
                world.recompute_total_attack();
                Ok(EffectRecord::Applied)
            }
            Effect::DestroySelf => {
                world.destroy_card(source)?;
                Ok(EffectRecord::Applied)
            }
            Effect::Sequence(effects) => {
                let mut records = Vec::with_capacity(effects.len());
                for effect in effects {
                    let record = effect.resolve(world, source)?;
                    let succeeded = record.succeeded();
                    records.push(record);
                    if !succeeded {
                        break;
                    }
                }
                Ok(EffectRecord::Sequence(records))
            }
            Effect::DestroySurroundingToGain { resource, per_destroyed, mode } => {
                let Some(pos) = world.card(source).and_then(|card| card.slot()) else {
                    return Ok(EffectRecord::Untouched);
                };
                let victims: Vec<InstanceId> = world
                    .board
                    .neighbors(pos)
                    .into_iter()
                    .filter_map(|p| world.board.get(p).and_then(|slot| slot.occupant()))
                    .collect();

                let destroyed = victims.len() as i64;
                for victim in victims {
                    world.destroy_card(victim)?;
                }

                let payout = destroyed * per_destroyed;
                match mode {
                    GainMode::Instant => {
                        world.modify_resource(*resource, payout);
                    }
                    GainMode::PerTurn => {
                        if payout > 0 {
                            if let Some(card) = world.card_mut(source) {
                                card.push_trigger(
                                    TriggerKind::OnTurnEnd,
                                    Conditional::new(
                                        ConditionKind::Always,
                                        vec![Effect::Produce {
                                            resource: *resource,
                                            amount: payout,
                                        }],
                                    ),
                                );
                            }
                        }
                    }
                }
                Ok(EffectRecord::Applied)
            }
        }
    }

    /// Undo whatever `record` says this effect changed.
    ///
    /// Destruction effects revert as no-ops; the per-turn payout installed
    /// by a destroy-to-gain stays installed.
    pub fn revert(
        &self,
        world: &mut World,
        source: InstanceId,
        record: &EffectRecord,
    ) -> Result<(), EngineError> {
        match (self, record) {
            (_, EffectRecord::Untouched) => Ok(()),
            (Effect::Sequence(effects), EffectRecord::Sequence(records)) => {
                // Only the children that ran have records; unwind those in
                // reverse execution order
                for (effect, child) in effects.iter().zip(records.iter()).rev() {
                    effect.revert(world, source, child)?;
                }
                Ok(())
            }
            (Effect::Sequence(effects), _) => {
                for effect in effects.iter().rev() {
                    effect.revert(world, source, &EffectRecord::Applied)?;
                }
                Ok(())
            }
            (Effect::Produce { resource, amount }, _) => {
                world.modify_resource(*resource, -amount);
                Ok(())
            }
            (Effect::Consume { resource, amount }, _) => {
                world.modify_resource(*resource, *amount);
                Ok(())
            }
            (Effect::ApplyModifier { kind, amount, tier, scope }, _) => {
                self.each_store(world, source, *scope, |store| {
                    store.remove(*kind, *amount, *tier);
                });
                world.recompute_total_attack();
                Ok(())
            }
            (Effect::RemoveModifier { kind, amount, tier, scope }, _) => {
                self.each_store(world, source, *scope, |store| store.add(*kind, *amount, *tier));
                world.recompute_total_attack();
                Ok(())
            }
            (Effect::DestroySelf | Effect::DestroySurroundingToGain { .. }, _) => Ok(()),
        }
    }

    fn each_store(
        &self,
        world: &mut World,
        source: InstanceId,
        scope: ModifierScope,
        mut apply: impl FnMut(&mut crate::cards::ModifierStore),
    ) {
        match scope {
            ModifierScope::SelfCard => {
                if let Some(card) = world.card_mut(source) {
                    apply(&mut card.modifiers);
                }
            }
            ModifierScope::Adjacent => {
                let Some(pos) = world.card(source).and_then(|card| card.slot()) else {
                    return;
                };
                for neighbor in world.board.neighbors(pos) {
                    if let Some(slot) = world.board.get_mut(neighbor) {
                        apply(&mut slot.modifiers);
                    }
                }
            }
        }
    }
}
