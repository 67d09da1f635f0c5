//! Live card instances.
//!
//! An instance pairs a template id with the mutable state a card accrues in
//! play: its slot, its modifier store, and its own copy of the trigger
//! table. The copy matters because conditions carry per-instance counters
//! (countdown, cycle progress) and effects can append new conditionals to a
//! single instance at runtime.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::SlotPos;
use crate::cards::modifiers::{ModifierKind, ModifierStore};
use crate::cards::template::CardTemplate;
use crate::core::{CardId, InstanceId};
use crate::effects::{Conditional, TriggerKind};

/// A card in play (or in hand, with no slot yet).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardInstance {
    id: InstanceId,
    card: CardId,
    slot: Option<SlotPos>,
    pub modifiers: ModifierStore,
    pub triggers: FxHashMap<TriggerKind, Vec<Conditional>>,
}

impl CardInstance {
    /// Create an instance of `template` with the template's trigger table
    /// copied in.
    #[must_use]
    pub fn new(id: InstanceId, template: &CardTemplate) -> Self {
        Self {
            id,
            card: template.id(),
            slot: None,
            modifiers: ModifierStore::new(),
            triggers: template.triggers().clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[must_use]
    pub fn card(&self) -> CardId {
        self.card
    }

    /// The slot this instance occupies, if deployed.
    #[must_use]
    pub fn slot(&self) -> Option<SlotPos> {
        self.slot
    }

    pub fn set_slot(&mut self, slot: Option<SlotPos>) {
        self.slot = slot;
    }

    /// Effective stat: template base plus modifier sum across all tiers.
    #[must_use]
    pub fn effective(&self, template: &CardTemplate, kind: ModifierKind) -> i64 {
        template.base_value(kind.stat_key(), 0) + self.modifiers.value(kind)
    }

    /// Take the conditional list for `kind`, leaving an empty list behind.
    ///
    /// The dispatcher iterates the taken snapshot and splices it back,
    /// which lets effects append new conditionals mid-resolution without
    /// invalidating the iteration.
    pub fn take_trigger_list(&mut self, kind: TriggerKind) -> Vec<Conditional> {
        self.triggers.get_mut(&kind).map(std::mem::take).unwrap_or_default()
    }

    /// Splice a taken snapshot back in front of anything appended while it
    /// was out.
    pub fn restore_trigger_list(&mut self, kind: TriggerKind, mut snapshot: Vec<Conditional>) {
        let appended = self.triggers.remove(&kind).unwrap_or_default();
        snapshot.extend(appended);
        if !snapshot.is_empty() {
            self.triggers.insert(kind, snapshot);
        }
    }

    /// Append a conditional to a trigger list at runtime.
    pub fn push_trigger(&mut self, kind: TriggerKind, conditional: Conditional) {
        self.triggers.entry(kind).or_default().push(conditional);
    }
}
