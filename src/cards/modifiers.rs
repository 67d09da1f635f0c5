//! Additive stat modifiers with persistence tiers.
//!
//! Cards and slots both carry a `ModifierStore`: integer bonuses keyed by
//! `(Lifetime, ModifierKind)`. Reads sum across every tier - consumers never
//! distinguish where a bonus came from. Tiers exist only so the right
//! entries can be wiped at turn and battle boundaries.
//!
//! Backed by `im` persistent maps so that board snapshots (redeploy) share
//! structure instead of deep-copying every table.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

/// How long a modifier persists before it is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifetime {
    /// Cleared at the end of the current turn.
    Turn,
    /// Cleared when the battle ends.
    Battle,
    /// Never cleared automatically.
    Permanent,
}

/// The stats a modifier can affect.
///
/// Each kind maps onto a named base value on the card template; the
/// effective stat is `base + sum of modifiers` across all tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    Attack,
    Health,
    MultiStrike,
    Cooldown,
    Yield,
}

impl ModifierKind {
    /// The base-value key this modifier adds onto.
    #[must_use]
    pub const fn stat_key(self) -> &'static str {
        match self {
            ModifierKind::Attack => "attack",
            ModifierKind::Health => "health",
            ModifierKind::MultiStrike => "multistrike",
            ModifierKind::Cooldown => "cooldown",
            ModifierKind::Yield => "yield",
        }
    }
}

/// Per-entity modifier table: `(tier, kind) -> amount`.
///
/// Absence always reads as zero; no operation here errors. Callers are
/// responsible for re-deriving any cached totals after a mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierStore {
    tiers: ImHashMap<Lifetime, ImHashMap<ModifierKind, i64>>,
}

impl ModifierStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the `(tier, kind)` entry, creating it if absent.
    pub fn add(&mut self, kind: ModifierKind, amount: i64, tier: Lifetime) {
        let mut bucket = self.tiers.get(&tier).cloned().unwrap_or_default();
        let current = bucket.get(&kind).copied().unwrap_or(0);
        bucket.insert(kind, current + amount);
        self.tiers.insert(tier, bucket);
    }

    /// Subtract `amount` from the `(tier, kind)` entry.
    ///
    /// If the result is <= 0 the entry is deleted, and an emptied tier
    /// bucket is deleted with it. Missing entries are a no-op.
    pub fn remove(&mut self, kind: ModifierKind, amount: i64, tier: Lifetime) {
        let Some(mut bucket) = self.tiers.get(&tier).cloned() else {
            return;
        };
        let Some(current) = bucket.get(&kind).copied() else {
            return;
        };

        let remaining = current - amount;
        if remaining <= 0 {
            bucket.remove(&kind);
        } else {
            bucket.insert(kind, remaining);
        }

        if bucket.is_empty() {
            self.tiers.remove(&tier);
        } else {
            self.tiers.insert(tier, bucket);
        }
    }

    /// Sum of `kind` entries across all tiers. Absence reads as zero.
    #[must_use]
    pub fn value(&self, kind: ModifierKind) -> i64 {
        self.tiers
            .values()
            .filter_map(|bucket| bucket.get(&kind))
            .sum()
    }

    /// Wipe a whole persistence tier (turn/battle boundaries).
    pub fn clear(&mut self, tier: Lifetime) {
        self.tiers.remove(&tier);
    }

    /// Check whether the store holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_absent_reads_zero() {
        let store = ModifierStore::new();
        assert_eq!(store.value(ModifierKind::Attack), 0);
    }

    #[test]
    fn test_add_and_sum_across_tiers() {
        let mut store = ModifierStore::new();
        store.add(ModifierKind::Attack, 2, Lifetime::Turn);
        store.add(ModifierKind::Attack, 3, Lifetime::Battle);
        store.add(ModifierKind::Attack, 1, Lifetime::Permanent);
        store.add(ModifierKind::Health, 5, Lifetime::Battle);

        assert_eq!(store.value(ModifierKind::Attack), 6);
        assert_eq!(store.value(ModifierKind::Health), 5);
    }

    #[test]
    fn test_remove_to_zero_deletes_entry() {
        let mut store = ModifierStore::new();
        store.add(ModifierKind::Attack, 3, Lifetime::Turn);
        store.remove(ModifierKind::Attack, 3, Lifetime::Turn);

        assert_eq!(store.value(ModifierKind::Attack), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_overshoot_deletes_entry() {
        let mut store = ModifierStore::new();
        store.add(ModifierKind::Attack, 2, Lifetime::Turn);
        store.remove(ModifierKind::Attack, 10, Lifetime::Turn);

        // No negative residue: entry is gone, reads as zero
        assert_eq!(store.value(ModifierKind::Attack), 0);

        // A later add starts from zero again
        store.add(ModifierKind::Attack, 4, Lifetime::Turn);
        assert_eq!(store.value(ModifierKind::Attack), 4);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = ModifierStore::new();
        store.remove(ModifierKind::Yield, 5, Lifetime::Battle);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_tier_keeps_others() {
        let mut store = ModifierStore::new();
        store.add(ModifierKind::Attack, 2, Lifetime::Turn);
        store.add(ModifierKind::Attack, 3, Lifetime::Battle);

        store.clear(Lifetime::Turn);

        assert_eq!(store.value(ModifierKind::Attack), 3);
    }

    #[test]
    fn test_snapshot_restore_via_clone() {
        let mut store = ModifierStore::new();
        store.add(ModifierKind::Attack, 2, Lifetime::Battle);

        let snapshot = store.clone();
        store.add(ModifierKind::Attack, 10, Lifetime::Turn);
        assert_eq!(store.value(ModifierKind::Attack), 12);

        let restored = snapshot;
        assert_eq!(restored.value(ModifierKind::Attack), 2);
    }

    const KINDS: [ModifierKind; 5] = [
        ModifierKind::Attack,
        ModifierKind::Health,
        ModifierKind::MultiStrike,
        ModifierKind::Cooldown,
        ModifierKind::Yield,
    ];
    const TIERS: [Lifetime; 3] = [Lifetime::Turn, Lifetime::Battle, Lifetime::Permanent];

    proptest! {
        /// Any add/remove sequence keeps `value` equal to the running sum
        /// across tiers, with deleted-at-zero entries restarting from zero.
        #[test]
        fn prop_running_sum(
            ops in prop::collection::vec(
                (0usize..3, 0usize..5, 1i64..20, any::<bool>()),
                0..60,
            )
        ) {
            let mut store = ModifierStore::new();
            let mut model: std::collections::HashMap<(usize, usize), i64> =
                std::collections::HashMap::new();

            for (tier_idx, kind_idx, amount, is_add) in ops {
                let tier = TIERS[tier_idx];
                let kind = KINDS[kind_idx];
                if is_add {
                    store.add(kind, amount, tier);
                    *model.entry((tier_idx, kind_idx)).or_insert(0) += amount;
                } else {
                    store.remove(kind, amount, tier);
                    if let Some(entry) = model.get_mut(&(tier_idx, kind_idx)) {
                        *entry -= amount;
                        if *entry <= 0 {
                            model.remove(&(tier_idx, kind_idx));
                        }
                    }
                }
            }

            for (kind_idx, kind) in KINDS.iter().enumerate() {
                let expected: i64 = (0..3)
                    .filter_map(|tier_idx| model.get(&(tier_idx, kind_idx)))
                    .sum();
                prop_assert_eq!(store.value(*kind), expected);
            }
        }
    }
}
