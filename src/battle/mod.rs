//! Battle flow: the phase state machine and reward rolls.

pub mod phase;
pub mod reward;

pub use phase::{Battle, BattleConfig, BattlePhase};
pub use reward::RewardGenerator;
