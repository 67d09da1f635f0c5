//! Trigger dispatch.
//!
//! The dispatcher walks a card's conditional lists when game events fire.
//! Lists are moved out of the card, evaluated against the world, and
//! spliced back in, so effects can destroy cards or append new
//! conditionals mid-resolution without invalidating the walk.
//!
//! Evaluation order within a trigger is priority entries first, then the
//! rest, each group in registration order. WhileInPlay deactivation runs
//! in the exact reverse of activation order, which keeps paired mutations
//! on clamped resource pools symmetric.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{EngineError, InstanceId};
use crate::effects::condition::ConditionKind;
use crate::world::World;

/// The game events a card can react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// The card entered play from hand.
    OnPlay,
    /// The card was placed on a slot.
    OnDeploy,
    /// Fires before each card's attack step.
    BeforeAttack,
    /// Fires once per strike.
    OnAttack,
    /// Fires after each card's attack step.
    AfterAttack,
    /// Persistent aura, applied on entry and reverted on exit.
    WhileInPlay,
    /// Fires at the end of every turn the card is deployed.
    OnTurnEnd,
    /// The card is leaving play.
    OnRemove,
    /// The card changed slots.
    OnMove,
    /// The card was destroyed.
    OnDeath,
    /// The card was manually activated.
    OnActivate,
}

impl TriggerKind {
    /// Parse an authoring keyword into a trigger kind.
    pub fn from_keyword(keyword: &str) -> Result<Self, EngineError> {
        match keyword {
            "on_play" => Ok(TriggerKind::OnPlay),
            "on_deploy" => Ok(TriggerKind::OnDeploy),
            "before_attack" => Ok(TriggerKind::BeforeAttack),
            "on_attack" => Ok(TriggerKind::OnAttack),
            "after_attack" => Ok(TriggerKind::AfterAttack),
            "while_in_play" => Ok(TriggerKind::WhileInPlay),
            "on_turn_end" => Ok(TriggerKind::OnTurnEnd),
            "on_remove" => Ok(TriggerKind::OnRemove),
            "on_move" => Ok(TriggerKind::OnMove),
            "on_death" => Ok(TriggerKind::OnDeath),
            "on_activate" => Ok(TriggerKind::OnActivate),
            other => Err(EngineError::UnknownTriggerKeyword(other.to_string())),
        }
    }

    /// The authoring keyword for this trigger.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            TriggerKind::OnPlay => "on_play",
            TriggerKind::OnDeploy => "on_deploy",
            TriggerKind::BeforeAttack => "before_attack",
            TriggerKind::OnAttack => "on_attack",
            TriggerKind::AfterAttack => "after_attack",
            TriggerKind::WhileInPlay => "while_in_play",
            TriggerKind::OnTurnEnd => "on_turn_end",
            TriggerKind::OnRemove => "on_remove",
            TriggerKind::OnMove => "on_move",
            TriggerKind::OnDeath => "on_death",
            TriggerKind::OnActivate => "on_activate",
        }
    }
}

/// Evaluate every conditional a card has registered for `kind`.
///
/// Returns whether any conditional fired. If the card destroys itself
/// mid-resolution, remaining entries are skipped.
pub fn fire_trigger(
    world: &mut World,
    id: InstanceId,
    kind: TriggerKind,
) -> Result<bool, EngineError> {
    let Some(card) = world.card_mut(id) else {
        return Ok(false);
    };
    let mut list = card.take_trigger_list(kind);
    if list.is_empty() {
        return Ok(false);
    }
    trace!(card = %id, trigger = kind.keyword(), entries = list.len(), "firing trigger");

    let mut fired = false;
    let result: Result<(), EngineError> = (|| {
        for pass_priority in [true, false] {
            for conditional in list.iter_mut() {
                if conditional.is_priority() != pass_priority {
                    continue;
                }
                fired |= conditional.apply(world, id)?;
                if world.card(id).is_none() {
                    return Ok(());
                }
            }
        }
        Ok(())
    })();

    if let Some(card) = world.card_mut(id) {
        card.restore_trigger_list(kind, list);
    }
    result.map(|()| fired)
}

/// Apply a card's WhileInPlay conditionals: priority entries first, then
/// the rest in registration order.
pub fn activate_while_in_play(world: &mut World, id: InstanceId) -> Result<(), EngineError> {
    fire_trigger(world, id, TriggerKind::WhileInPlay).map(|_| ())
}

/// Revert a card's WhileInPlay conditionals in the exact reverse of
/// activation order. Propagates the cycle revert error.
pub fn deactivate_while_in_play(world: &mut World, id: InstanceId) -> Result<(), EngineError> {
    let Some(card) = world.card_mut(id) else {
        return Ok(());
    };
    let mut list = card.take_trigger_list(TriggerKind::WhileInPlay);

    let result: Result<(), EngineError> = (|| {
        for pass_priority in [false, true] {
            for conditional in list.iter_mut().rev() {
                if conditional.is_priority() != pass_priority {
                    continue;
                }
                conditional.revert(world, id)?;
            }
        }
        Ok(())
    })();

    if let Some(card) = world.card_mut(id) {
        card.restore_trigger_list(TriggerKind::WhileInPlay, list);
    }
    result
}

/// Full entry chain for a card coming into play on a slot.
pub fn resolve_on_play(world: &mut World, id: InstanceId) -> Result<(), EngineError> {
    fire_trigger(world, id, TriggerKind::OnPlay)?;
    if world.card(id).is_some() {
        fire_trigger(world, id, TriggerKind::OnDeploy)?;
    }
    if world.card(id).is_some() {
        activate_while_in_play(world, id)?;
    }
    Ok(())
}

/// Full exit chain for a card leaving play: OnRemove effects, then aura
/// reversion.
pub fn resolve_on_remove(world: &mut World, id: InstanceId) -> Result<(), EngineError> {
    fire_trigger(world, id, TriggerKind::OnRemove)?;
    deactivate_while_in_play(world, id)
}

/// Fire OnTurnEnd for every deployed card, in row-major board order.
pub fn resolve_end_turn(world: &mut World) -> Result<(), EngineError> {
    for id in world.board.occupants() {
        fire_trigger(world, id, TriggerKind::OnTurnEnd)?;
    }
    Ok(())
}

/// Re-evaluate cluster-gated WhileInPlay auras across the whole board.
///
/// Movement changes which patterns are satisfied without any per-card
/// trigger firing, so this runs after every placement, move, and removal:
/// newly satisfied patterns activate, newly broken ones revert.
pub fn refresh_cluster_effects(world: &mut World) -> Result<(), EngineError> {
    for id in world.board.occupants() {
        let Some(card) = world.card_mut(id) else {
            continue;
        };
        let mut list = card.take_trigger_list(TriggerKind::WhileInPlay);

        let result: Result<(), EngineError> = (|| {
            for conditional in list.iter_mut() {
                let ConditionKind::Cluster(pattern) = conditional.kind() else {
                    continue;
                };
                let satisfied = pattern.clone().is_satisfied(world, id);
                if satisfied && !conditional.is_active() {
                    conditional.apply(world, id)?;
                } else if !satisfied && conditional.is_active() {
                    conditional.revert(world, id)?;
                }
            }
            Ok(())
        })();

        if let Some(card) = world.card_mut(id) {
            card.restore_trigger_list(TriggerKind::WhileInPlay, list);
        }
        result?;
    }
    Ok(())
}

/// Fire a manually activated card's OnActivate trigger.
///
/// Returns false without firing when the card is not activatable.
pub fn resolve_activate(world: &mut World, id: InstanceId) -> Result<bool, EngineError> {
    let activatable = world
        .card(id)
        .and_then(|card| world.registry.get(card.card()))
        .is_some_and(|template| template.is_activatable());
    if !activatable {
        return Ok(false);
    }
    fire_trigger(world, id, TriggerKind::OnActivate)
}
