//! Seeded reward generation.
//!
//! Rewards roll from a seed chain that is independent of battle
//! randomness: before every roll the generator derives the next seed in a
//! fixed sequence and reseeds its own RNG from it. Two generators built
//! from the same seed, pools, and weight table produce identical reward
//! sequences no matter what else the session rolled in between.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::cards::Rarity;
use crate::core::{derive_seed, CardId, GameRng};

const PRIME_A: u64 = 2_654_435_761;
const PRIME_B: u64 = 101_921;

/// Rarity weights per difficulty level, indexed `[Common, Rare, Epic,
/// Legendary]`. Higher levels shift weight toward rarer cards.
const DEFAULT_LEVEL_WEIGHTS: [[f32; 4]; 5] = [
    [0.80, 0.15, 0.04, 0.01],
    [0.65, 0.25, 0.08, 0.02],
    [0.50, 0.30, 0.15, 0.05],
    [0.35, 0.35, 0.20, 0.10],
    [0.20, 0.35, 0.30, 0.15],
];

/// Deterministic reward roller.
#[derive(Clone, Debug)]
pub struct RewardGenerator {
    seed: u64,
    rng: GameRng,
    level_weights: Vec<[f32; 4]>,
    pools: FxHashMap<Rarity, Vec<CardId>>,
}

impl RewardGenerator {
    /// Create a generator with the default level weight table and empty
    /// pools.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: GameRng::new(seed),
            level_weights: DEFAULT_LEVEL_WEIGHTS.to_vec(),
            pools: FxHashMap::default(),
        }
    }

    /// Set the reward pool for a rarity (builder pattern).
    #[must_use]
    pub fn with_pool(mut self, rarity: Rarity, cards: Vec<CardId>) -> Self {
        self.pools.insert(rarity, cards);
        self
    }

    /// Replace the level weight table (builder pattern). Empty tables are
    /// ignored.
    #[must_use]
    pub fn with_level_weights(mut self, weights: Vec<[f32; 4]>) -> Self {
        if !weights.is_empty() {
            self.level_weights = weights;
        }
        self
    }

    /// Roll one reward for a difficulty level.
    ///
    /// Out-of-range levels clamp to the nearest table row. A rarity whose
    /// pool is empty falls back to the Common pool; `None` only when that
    /// is empty too.
    pub fn roll(&mut self, level: usize) -> Option<CardId> {
        self.seed = derive_seed(self.seed, PRIME_A, PRIME_B);
        self.rng.reseed(self.seed);

        let max_level = self.level_weights.len() - 1;
        let row = if level > max_level {
            warn!(level, max_level, "reward level out of range, clamping");
            max_level
        } else {
            level
        };

        let rarity_index = self.rng.choose_weighted(&self.level_weights[row])?;
        let rarity = Rarity::ALL[rarity_index];

        match self.pick_from_pool(rarity) {
            Some(card) => Some(card),
            None => {
                warn!(%rarity, "reward pool exhausted, falling back to common");
                self.pick_from_pool(Rarity::Common)
            }
        }
    }

    /// Roll a batch of rewards for the same level.
    pub fn roll_many(&mut self, count: usize, level: usize) -> Vec<CardId> {
        (0..count).filter_map(|_| self.roll(level)).collect()
    }

    fn pick_from_pool(&mut self, rarity: Rarity) -> Option<CardId> {
        let pool = self.pools.get(&rarity)?;
        self.rng.choose(pool).copied()
    }
}
