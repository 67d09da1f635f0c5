//! Global resource pools.
//!
//! Resources are named numeric pools owned by the session (Energy, Food,
//! Morale, Pollution, Gold). Every pool is clamped to `[0, max]` on
//! mutation. Lifetime is the whole game session; effects produce into and
//! consume out of these pools.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The resource kinds the game tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Energy,
    Food,
    Morale,
    Pollution,
    Gold,
}

impl ResourceKind {
    /// All resource kinds, in a fixed order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Energy,
        ResourceKind::Food,
        ResourceKind::Morale,
        ResourceKind::Pollution,
        ResourceKind::Gold,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Energy => "Energy",
            ResourceKind::Food => "Food",
            ResourceKind::Morale => "Morale",
            ResourceKind::Pollution => "Pollution",
            ResourceKind::Gold => "Gold",
        };
        write!(f, "{name}")
    }
}

/// A single resource pool with a current value clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    current: i64,
    max: i64,
}

impl ResourcePool {
    /// Create a pool with the given starting and maximum values.
    ///
    /// The starting value is clamped into `[0, max]`.
    #[must_use]
    pub fn new(current: i64, max: i64) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// Current value.
    #[must_use]
    pub fn current(&self) -> i64 {
        self.current
    }

    /// Maximum value.
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Add `delta` (may be negative), clamping to `[0, max]`.
    ///
    /// Returns the new current value.
    pub fn modify(&mut self, delta: i64) -> i64 {
        self.current = (self.current + delta).clamp(0, self.max);
        self.current
    }

    /// Set the current value directly, clamped.
    pub fn set(&mut self, value: i64) {
        self.current = value.clamp(0, self.max);
    }
}

/// The session's resource pools.
///
/// Absent pools read as zero; mutating an absent pool first creates it with
/// the default maximum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceStore {
    pools: FxHashMap<ResourceKind, ResourcePool>,
    default_max: i64,
}

impl ResourceStore {
    /// Default pool maximum used when a pool is created lazily.
    pub const DEFAULT_MAX: i64 = 999;

    /// Create a store with every resource kind at zero.
    #[must_use]
    pub fn new() -> Self {
        let mut pools = FxHashMap::default();
        for kind in ResourceKind::ALL {
            pools.insert(kind, ResourcePool::new(0, Self::DEFAULT_MAX));
        }
        Self {
            pools,
            default_max: Self::DEFAULT_MAX,
        }
    }

    /// Set a pool's starting and maximum values (builder pattern).
    #[must_use]
    pub fn with_pool(mut self, kind: ResourceKind, current: i64, max: i64) -> Self {
        self.pools.insert(kind, ResourcePool::new(current, max));
        self
    }

    /// Current value of a pool. Absent pools read as zero.
    #[must_use]
    pub fn current(&self, kind: ResourceKind) -> i64 {
        self.pools.get(&kind).map_or(0, ResourcePool::current)
    }

    /// Add `delta` to a pool, clamped to `[0, max]`.
    ///
    /// Returns the new current value.
    pub fn modify(&mut self, kind: ResourceKind, delta: i64) -> i64 {
        let default_max = self.default_max;
        self.pools
            .entry(kind)
            .or_insert_with(|| ResourcePool::new(0, default_max))
            .modify(delta)
    }

    /// Check whether a pool holds at least `amount`.
    #[must_use]
    pub fn can_afford(&self, kind: ResourceKind, amount: i64) -> bool {
        self.current(kind) >= amount
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}
