//! Engine error taxonomy.
//!
//! Only two classes of failure are hard errors: reverting a cycle-gated
//! effect (partial cycle progress cannot be undone) and unrecognized
//! authoring keywords (a data bug that would desync game state if ignored).
//!
//! Everything else is either recovered with a logged diagnostic (missing
//! card id, exhausted rarity pool) or treated as a no-op (acting on a card
//! with no slot, removing an absent modifier).

use thiserror::Error;

/// Errors raised by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Reverting a Cycle-gated effect is unsupported: partial cycle
    /// progress cannot be meaningfully undone.
    #[error("reverting a cycle-gated effect is unsupported")]
    UnsupportedCycleRevert,

    /// Unknown trigger keyword encountered while building a card's
    /// trigger table.
    #[error("unknown trigger keyword `{0}`")]
    UnknownTriggerKeyword(String),

    /// A trigger was registered for a card id the registry does not know.
    #[error("cannot register trigger for unknown card {0}")]
    UnknownCard(u32),
}
