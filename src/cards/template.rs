//! Card templates.
//!
//! A `CardTemplate` is the immutable authored definition of a card: named
//! base values, rarity, traits, and the trigger table mapping trigger kinds
//! to conditional effects. Instances copy the trigger table at spawn so the
//! engine can mutate per-instance condition state (countdown counters,
//! cycle progress) without touching the shared definition.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::CardId;
use crate::effects::{Conditional, TriggerKind};

/// Card rarity, used for reward weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All rarities, from most to least common.
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        write!(f, "{name}")
    }
}

/// Categorical tags a card can carry, matched by target filters.
///
/// `None` is the explicit no-trait sentinel: a filter requiring it matches
/// nothing, which authors use to disable a targeted effect in data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTrait {
    None,
    Mechanical,
    Organic,
    Structure,
    Commander,
}

/// Immutable card definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardTemplate {
    id: CardId,
    name: String,
    rarity: Rarity,
    base_values: FxHashMap<String, i64>,
    traits: Vec<CardTrait>,
    activatable: bool,
    triggers: FxHashMap<TriggerKind, Vec<Conditional>>,
}

impl CardTemplate {
    /// Create a template with no base values, traits, or triggers.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id,
            name: name.into(),
            rarity,
            base_values: FxHashMap::default(),
            traits: Vec::new(),
            activatable: false,
            triggers: FxHashMap::default(),
        }
    }

    /// Set a named base value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: i64) -> Self {
        self.base_values.insert(key.into(), value);
        self
    }

    /// Add a trait (builder pattern).
    #[must_use]
    pub fn with_trait(mut self, card_trait: CardTrait) -> Self {
        self.traits.push(card_trait);
        self
    }

    /// Mark the card as manually activatable (builder pattern).
    #[must_use]
    pub fn with_activatable(mut self) -> Self {
        self.activatable = true;
        self
    }

    /// Append a conditional effect to a trigger list (builder pattern).
    ///
    /// Registration order is preserved and is the order the dispatcher
    /// evaluates entries in, except where a conditional is flagged as
    /// priority.
    #[must_use]
    pub fn with_trigger(mut self, kind: TriggerKind, conditional: Conditional) -> Self {
        self.triggers.entry(kind).or_default().push(conditional);
        self
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Named base value, or `default` if the card does not define it.
    #[must_use]
    pub fn base_value(&self, key: &str, default: i64) -> i64 {
        self.base_values.get(key).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn has_trait(&self, card_trait: CardTrait) -> bool {
        self.traits.contains(&card_trait)
    }

    #[must_use]
    pub fn traits(&self) -> &[CardTrait] {
        &self.traits
    }

    #[must_use]
    pub fn is_activatable(&self) -> bool {
        self.activatable
    }

    /// The authored trigger table, cloned into each instance at spawn.
    #[must_use]
    pub fn triggers(&self) -> &FxHashMap<TriggerKind, Vec<Conditional>> {
        &self.triggers
    }
}
