//! The mutable game world.
//!
//! `World` owns everything effect resolution touches: the board, the live
//! card instances, the resource pools, the template registry, and the
//! session RNG. Effects and conditions receive `&mut World` instead of
//! holding references to each other, which keeps the resolution tree free
//! of back-pointers.
//!
//! State changes the presentation layer cares about are appended to a
//! notification log the caller drains between actions.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::board::{Board, SlotPos};
use crate::cards::{CardInstance, CardRegistry, ModifierKind};
use crate::core::{CardId, EngineError, GameRng, InstanceId, ResourceKind, ResourceStore};
use crate::effects::dispatcher;

/// A state change worth surfacing to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// The summed attack of all deployed cards changed.
    TotalAttack(i64),
    /// A resource pool changed by the given delta.
    Resource(ResourceKind, i64),
    /// Player health changed to the given value.
    PlayerHealth(i64),
    /// Enemy health changed to the given value.
    EnemyHealth(i64),
    /// The battle entered a new phase.
    PhaseEntered(&'static str),
}

/// Snapshot of the board and card state, used for redeploys.
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    board: Board,
    cards: FxHashMap<InstanceId, CardInstance>,
}

/// The complete mutable state of a session.
#[derive(Debug)]
pub struct World {
    pub board: Board,
    pub resources: ResourceStore,
    pub registry: CardRegistry,
    pub rng: GameRng,
    cards: FxHashMap<InstanceId, CardInstance>,
    next_instance: u32,
    total_attack: i64,
    notifications: Vec<Notification>,
}

impl World {
    /// Create a world with an empty `width` x `height` board.
    #[must_use]
    pub fn new(width: u8, height: u8, seed: u64) -> Self {
        Self {
            board: Board::new(width, height),
            resources: ResourceStore::new(),
            registry: CardRegistry::new(),
            rng: GameRng::new(seed),
            cards: FxHashMap::default(),
            next_instance: 1,
            total_attack: 0,
            notifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    pub fn card_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// Instantiate a registered template. Returns `None` (with a logged
    /// warning) if the template is unknown.
    pub fn spawn(&mut self, card: CardId) -> Option<InstanceId> {
        let Some(template) = self.registry.get(card) else {
            warn!(%card, "spawn of unregistered card skipped");
            return None;
        };
        let id = InstanceId::new(self.next_instance);
        self.next_instance += 1;
        self.cards.insert(id, CardInstance::new(id, template));
        Some(id)
    }

    /// Place a spawned card on an empty slot and run its entry chain.
    ///
    /// Returns `Ok(false)` if the card is unknown, already deployed, or
    /// the slot is unavailable.
    pub fn deploy(&mut self, id: InstanceId, pos: SlotPos) -> Result<bool, EngineError> {
        let already_deployed = match self.card(id) {
            Some(card) => card.slot().is_some(),
            None => return Ok(false),
        };
        if already_deployed || !self.board.place(pos, id) {
            return Ok(false);
        }
        if let Some(card) = self.card_mut(id) {
            card.set_slot(Some(pos));
        }
        debug!(card = %id, %pos, "deployed");

        dispatcher::resolve_on_play(self, id)?;
        dispatcher::refresh_cluster_effects(self)?;
        self.recompute_total_attack();
        Ok(true)
    }

    /// Move a deployed card to an empty slot.
    ///
    /// Auras are reverted before the move and re-applied after it, so
    /// position-dependent WhileInPlay effects re-evaluate at the new slot.
    pub fn move_card(&mut self, id: InstanceId, to: SlotPos) -> Result<bool, EngineError> {
        let Some(from) = self.card(id).and_then(|card| card.slot()) else {
            return Ok(false);
        };
        if !self.board.get(to).is_some_and(|slot| slot.is_empty()) {
            return Ok(false);
        }

        dispatcher::deactivate_while_in_play(self, id)?;

        self.board.remove(from);
        self.board.place(to, id);
        if let Some(card) = self.card_mut(id) {
            card.set_slot(Some(to));
        }
        debug!(card = %id, %from, %to, "moved");

        dispatcher::activate_while_in_play(self, id)?;
        dispatcher::fire_trigger(self, id, crate::effects::TriggerKind::OnMove)?;
        dispatcher::refresh_cluster_effects(self)?;
        self.recompute_total_attack();
        Ok(true)
    }

    /// Remove a card from play: death and removal triggers fire, auras
    /// revert, then the instance is dropped. Unknown ids are a no-op.
    pub fn destroy_card(&mut self, id: InstanceId) -> Result<(), EngineError> {
        if self.card(id).is_none() {
            return Ok(());
        }
        debug!(card = %id, "destroying");

        dispatcher::fire_trigger(self, id, crate::effects::TriggerKind::OnDeath)?;
        dispatcher::resolve_on_remove(self, id)?;

        if let Some(card) = self.cards.remove(&id) {
            if let Some(pos) = card.slot() {
                self.board.remove(pos);
            }
        }

        dispatcher::refresh_cluster_effects(self)?;
        self.recompute_total_attack();
        Ok(())
    }

    /// Effective stat of a deployed card: template base, plus the card's
    /// own modifiers, plus the modifiers of the slot it stands on.
    #[must_use]
    pub fn effective_stat(&self, id: InstanceId, kind: ModifierKind) -> i64 {
        let Some(card) = self.card(id) else {
            return 0;
        };
        let base = self
            .registry
            .get(card.card())
            .map_or(0, |template| template.base_value(kind.stat_key(), 0));
        let slot_bonus = card
            .slot()
            .and_then(|pos| self.board.get(pos))
            .map_or(0, |slot| slot.modifiers.value(kind));
        base + card.modifiers.value(kind) + slot_bonus
    }

    /// The cached sum of effective attack across all deployed cards.
    #[must_use]
    pub fn total_attack(&self) -> i64 {
        self.total_attack
    }

    /// Re-derive the total attack cache, notifying on change.
    pub fn recompute_total_attack(&mut self) {
        let total: i64 = self
            .board
            .occupants()
            .into_iter()
            .map(|id| self.effective_stat(id, ModifierKind::Attack).max(0))
            .sum();
        if total != self.total_attack {
            self.total_attack = total;
            self.notifications.push(Notification::TotalAttack(total));
        }
    }

    /// Modify a resource pool and log the change.
    pub fn modify_resource(&mut self, kind: ResourceKind, delta: i64) {
        let before = self.resources.current(kind);
        let after = self.resources.modify(kind, delta);
        if after != before {
            self.notifications.push(Notification::Resource(kind, after - before));
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drain the pending notification log.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Capture the board and card state for a later redeploy.
    #[must_use]
    pub fn save_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            board: self.board.clone(),
            cards: self.cards.clone(),
        }
    }

    /// Restore a snapshot taken earlier in the same battle.
    ///
    /// Resource pools are not part of the snapshot: production and
    /// consumption that happened since stay spent.
    pub fn restore_snapshot(&mut self, snapshot: &WorldSnapshot) {
        self.board = snapshot.board.clone();
        self.cards = snapshot.cards.clone();
        self.recompute_total_attack();
    }

    /// Clear a modifier tier on every card and every slot.
    pub fn clear_modifier_tier(&mut self, tier: crate::cards::Lifetime) {
        for card in self.cards.values_mut() {
            card.modifiers.clear(tier);
        }
        let positions: Vec<SlotPos> = self.board.positions().collect();
        for pos in positions {
            if let Some(slot) = self.board.get_mut(pos) {
                slot.modifiers.clear(tier);
            }
        }
        self.recompute_total_attack();
    }
}
