//! Card template registry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cards::template::CardTemplate;
use crate::core::{CardId, EngineError};
use crate::effects::{Conditional, TriggerKind};

/// All known card templates, keyed by id.
///
/// Lookups on unknown ids log a warning and return `None` rather than
/// erroring; a missing template means an effect silently resolves against
/// defaults instead of tearing down the battle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardRegistry {
    templates: FxHashMap<CardId, CardTemplate>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any existing one with the same id.
    pub fn register(&mut self, template: CardTemplate) {
        self.templates.insert(template.id(), template);
    }

    /// Look up a template. Logs a warning on unknown ids.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardTemplate> {
        let template = self.templates.get(&id);
        if template.is_none() {
            warn!(card = %id, "lookup of unregistered card template");
        }
        template
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.templates.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Attach a conditional to a registered template via a trigger keyword.
    ///
    /// This is the authoring entry point for data-driven card definitions:
    /// the keyword string comes from card data, not code. Unknown keywords
    /// and unknown card ids are hard errors so data bugs surface at load
    /// time instead of desyncing mid-battle.
    pub fn register_trigger(
        &mut self,
        id: CardId,
        keyword: &str,
        conditional: Conditional,
    ) -> Result<(), EngineError> {
        let kind = TriggerKind::from_keyword(keyword)?;
        let template = self
            .templates
            .remove(&id)
            .ok_or(EngineError::UnknownCard(id.raw()))?;
        self.templates.insert(id, template.with_trigger(kind, conditional));
        Ok(())
    }
}
