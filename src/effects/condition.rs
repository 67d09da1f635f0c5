//! Condition evaluators and the conditional effect wrapper.
//!
//! A `Conditional` gates a list of effects behind a condition. Conditions
//! are stateful: countdown and cycle gates mutate their own counters on
//! every evaluation, which is why each card instance owns its own copy of
//! the trigger table.
//!
//! Firing records what the conditional touched so a later revert can undo
//! exactly that. Cycle-gated conditionals refuse to revert: their partial
//! counter progress has no meaningful inverse.

use serde::{Deserialize, Serialize};

use crate::board::PositionClass;
use crate::core::{EngineError, InstanceId};
use crate::effects::effect::{Effect, EffectRecord};
use crate::effects::target::TargetSpec;
use crate::world::World;

/// How a target-with-property condition interprets its matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateCheck {
    /// Fire if at least one target matches.
    Exists,
    /// Fire if at least this many targets match.
    Minimum(u32),
    /// Always fire; apply the effects once per matched target.
    Count,
}

/// A set of slot offsets, relative to the source, that must all be
/// occupied. Offsets are (row delta, column delta).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterPattern {
    offsets: Vec<(i8, i8)>,
}

impl ClusterPattern {
    #[must_use]
    pub fn new(offsets: Vec<(i8, i8)>) -> Self {
        Self { offsets }
    }

    /// Whether every offset, taken from `source`'s slot, lands on an
    /// occupied slot. Offsets that fall off the board fail the pattern.
    #[must_use]
    pub fn is_satisfied(&self, world: &World, source: InstanceId) -> bool {
        let Some(pos) = world.card(source).and_then(|card| card.slot()) else {
            return false;
        };
        self.offsets.iter().all(|&(dr, dc)| {
            let row = i16::from(pos.row) + i16::from(dr);
            let col = i16::from(pos.col) + i16::from(dc);
            // Bounds-check in i16 before narrowing; a large positive
            // offset must not wrap into a low coordinate
            if row < 0
                || col < 0
                || row >= i16::from(world.board.height())
                || col >= i16::from(world.board.width())
            {
                return false;
            }
            world
                .board
                .get(crate::board::SlotPos::new(row as u8, col as u8))
                .is_some_and(|slot| !slot.is_empty())
        })
    }
}

/// The gating condition of a conditional effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Fires every evaluation.
    Always,
    /// Fires every `period`-th evaluation. The counter decrements on every
    /// evaluation and resets when it reaches zero.
    Countdown { period: u32, remaining: u32 },
    /// Fires while the source stands in the given board region.
    Position(PositionClass),
    /// Fires while the source's cluster pattern is fully occupied.
    Cluster(ClusterPattern),
    /// Fires based on what a target spec currently matches.
    TargetWithProperty { spec: TargetSpec, check: GateCheck },
    /// Fires every `period`-th evaluation. Unlike Countdown, a cycle gate
    /// cannot be reverted.
    Cycle { period: u32, progress: u32 },
}

impl ConditionKind {
    /// A countdown gate starting at its full period.
    #[must_use]
    pub fn countdown(period: u32) -> Self {
        ConditionKind::Countdown { period, remaining: period }
    }

    /// A cycle gate with no progress yet.
    #[must_use]
    pub fn cycle(period: u32) -> Self {
        ConditionKind::Cycle { period, progress: 0 }
    }
}

/// Outcome of evaluating a condition.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Gate {
    Fail,
    Pass,
    PerTarget(Vec<InstanceId>),
}

/// A condition-gated effect list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    kind: ConditionKind,
    effects: Vec<Effect>,
    priority: bool,
    active: bool,
    applied: Vec<(InstanceId, Vec<EffectRecord>)>,
}

impl Conditional {
    #[must_use]
    pub fn new(kind: ConditionKind, effects: Vec<Effect>) -> Self {
        Self {
            kind,
            effects,
            priority: false,
            active: false,
            applied: Vec::new(),
        }
    }

    /// Flag this conditional to be evaluated before non-priority entries
    /// of the same trigger (builder pattern).
    #[must_use]
    pub fn with_priority(mut self) -> Self {
        self.priority = true;
        self
    }

    #[must_use]
    pub fn is_priority(&self) -> bool {
        self.priority
    }

    /// Whether the last apply fired and has not been reverted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn kind(&self) -> &ConditionKind {
        &self.kind
    }

    fn validate(&mut self, world: &mut World, source: InstanceId) -> Gate {
        match &mut self.kind {
            ConditionKind::Always => Gate::Pass,
            ConditionKind::Countdown { period, remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    *remaining = *period;
                    Gate::Pass
                } else {
                    Gate::Fail
                }
            }
            ConditionKind::Position(class) => {
                let in_region = world
                    .card(source)
                    .and_then(|card| card.slot())
                    .is_some_and(|pos| {
                        class.matches(pos, world.board.width(), world.board.height())
                    });
                if in_region {
                    Gate::Pass
                } else {
                    Gate::Fail
                }
            }
            ConditionKind::Cluster(pattern) => {
                if pattern.is_satisfied(world, source) {
                    Gate::Pass
                } else {
                    Gate::Fail
                }
            }
            ConditionKind::TargetWithProperty { spec, check } => {
                let spec = spec.clone();
                let check = *check;
                let targets = spec.resolve(world, source);
                match check {
                    GateCheck::Exists if !targets.is_empty() => Gate::Pass,
                    GateCheck::Minimum(n) if targets.len() as u32 >= n => Gate::Pass,
                    GateCheck::Count => Gate::PerTarget(targets.into_vec()),
                    _ => Gate::Fail,
                }
            }
            ConditionKind::Cycle { period, progress } => {
                *progress += 1;
                if *progress >= *period {
                    *progress = 0;
                    Gate::Pass
                } else {
                    Gate::Fail
                }
            }
        }
    }

    /// Evaluate the condition and, if it fires, resolve the effect list.
    ///
    /// Returns whether the conditional fired. Stateful gates advance their
    /// counters whether or not they fire.
    pub fn apply(&mut self, world: &mut World, source: InstanceId) -> Result<bool, EngineError> {
        let subjects = match self.validate(world, source) {
            Gate::Fail => return Ok(false),
            Gate::Pass => vec![source],
            Gate::PerTarget(targets) => targets,
        };

        let mut applied = Vec::with_capacity(subjects.len());
        for &subject in &subjects {
            let mut records = Vec::with_capacity(self.effects.len());
            for effect in &self.effects {
                records.push(effect.resolve(world, subject)?);
            }
            applied.push((subject, records));
        }

        self.active = true;
        self.applied = applied;
        Ok(true)
    }

    /// Undo the last apply, in reverse effect order and reverse subject
    /// order, using the records of what actually landed. No-op if the
    /// conditional never fired.
    pub fn revert(&mut self, world: &mut World, _source: InstanceId) -> Result<(), EngineError> {
        if !self.active {
            return Ok(());
        }
        if matches!(self.kind, ConditionKind::Cycle { .. }) {
            return Err(EngineError::UnsupportedCycleRevert);
        }

        for (subject, records) in self.applied.iter().rev() {
            for (effect, record) in self.effects.iter().zip(records.iter()).rev() {
                effect.revert(world, *subject, record)?;
            }
        }

        self.active = false;
        self.applied.clear();
        Ok(())
    }
}
