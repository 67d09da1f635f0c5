//! The battle phase state machine.
//!
//! A battle loops Wait -> Control -> Wait until one side's health runs
//! out, then settles in Reward or GameOver. Entering Control snapshots the
//! board so the player can freely rearrange and redeploy back to the
//! turn's starting layout; committing an attack leaves Control for good.
//!
//! Phase entry clears the matching modifier tiers: turn modifiers at the
//! end of every turn, battle modifiers when the battle settles.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::SlotPos;
use crate::cards::{Lifetime, ModifierKind};
use crate::core::{EngineError, InstanceId};
use crate::effects::dispatcher;
use crate::effects::TriggerKind;
use crate::world::{Notification, World, WorldSnapshot};

/// The phases of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Between turns; no player actions accepted.
    Wait,
    /// The player's turn: moves, redeploys, then an attack commit.
    Control,
    /// The battle was won; rewards may be rolled.
    Reward,
    /// The player's health ran out.
    GameOver,
}

impl BattlePhase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BattlePhase::Wait => "wait",
            BattlePhase::Control => "control",
            BattlePhase::Reward => "reward",
            BattlePhase::GameOver => "game_over",
        }
    }

    /// Whether this phase ends the battle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Reward | BattlePhase::GameOver)
    }
}

/// Static parameters of a battle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Moves the player may make per Control phase.
    pub max_moves: u32,
    pub player_health: i64,
    pub enemy_health: i64,
    /// Damage the enemy deals back after a turn it survives.
    pub enemy_attack: i64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_moves: 3,
            player_health: 50,
            enemy_health: 100,
            enemy_attack: 5,
        }
    }
}

/// One battle's phase machine and combat totals.
#[derive(Debug)]
pub struct Battle {
    phase: BattlePhase,
    config: BattleConfig,
    player_health: i64,
    enemy_health: i64,
    moves_remaining: u32,
    snapshot: Option<WorldSnapshot>,
}

impl Battle {
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self {
            phase: BattlePhase::Wait,
            player_health: config.player_health,
            enemy_health: config.enemy_health,
            moves_remaining: 0,
            snapshot: None,
            config,
        }
    }

    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    #[must_use]
    pub fn player_health(&self) -> i64 {
        self.player_health
    }

    #[must_use]
    pub fn enemy_health(&self) -> i64 {
        self.enemy_health
    }

    #[must_use]
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    fn enter(&mut self, world: &mut World, phase: BattlePhase) {
        info!(from = self.phase.name(), to = phase.name(), "phase transition");
        self.phase = phase;
        world.notify(Notification::PhaseEntered(phase.name()));

        match phase {
            BattlePhase::Control => {
                self.moves_remaining = self.config.max_moves;
                self.snapshot = Some(world.save_snapshot());
            }
            BattlePhase::Reward | BattlePhase::GameOver => {
                self.snapshot = None;
                world.clear_modifier_tier(Lifetime::Battle);
            }
            BattlePhase::Wait => {}
        }
    }

    /// Begin the player's turn. Only valid from Wait.
    pub fn begin_turn(&mut self, world: &mut World) -> bool {
        if self.phase != BattlePhase::Wait {
            return false;
        }
        self.enter(world, BattlePhase::Control);
        true
    }

    /// Move a deployed card, spending one of the turn's moves.
    ///
    /// Refused outside Control or once the move budget is spent; a refused
    /// or failed move spends nothing.
    pub fn try_move(
        &mut self,
        world: &mut World,
        id: InstanceId,
        to: SlotPos,
    ) -> Result<bool, EngineError> {
        if self.phase != BattlePhase::Control || self.moves_remaining == 0 {
            return Ok(false);
        }
        let moved = world.move_card(id, to)?;
        if moved {
            self.moves_remaining -= 1;
            debug!(remaining = self.moves_remaining, "move spent");
        }
        Ok(moved)
    }

    /// Restore the board to the layout captured when Control began and
    /// refund the move budget.
    pub fn redeploy(&mut self, world: &mut World) -> bool {
        if self.phase != BattlePhase::Control {
            return false;
        }
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        world.restore_snapshot(snapshot);
        self.moves_remaining = self.config.max_moves;
        debug!("redeployed to turn start");
        true
    }

    /// Commit the turn: every deployed card attacks in board order, the
    /// enemy strikes back if it survives, and the battle settles into the
    /// next phase.
    pub fn attack(&mut self, world: &mut World) -> Result<BattlePhase, EngineError> {
        if self.phase != BattlePhase::Control {
            return Ok(self.phase);
        }

        for id in world.board.occupants() {
            dispatcher::fire_trigger(world, id, TriggerKind::BeforeAttack)?;
            if world.card(id).is_none() {
                continue;
            }

            let strikes = world.effective_stat(id, ModifierKind::MultiStrike).max(1);
            for _ in 0..strikes {
                dispatcher::fire_trigger(world, id, TriggerKind::OnAttack)?;
                if world.card(id).is_none() {
                    break;
                }
                let damage = world.effective_stat(id, ModifierKind::Attack).max(0);
                if damage > 0 {
                    self.enemy_health -= damage;
                    world.notify(Notification::EnemyHealth(self.enemy_health));
                }
            }

            if world.card(id).is_some() {
                dispatcher::fire_trigger(world, id, TriggerKind::AfterAttack)?;
            }
        }

        if self.enemy_health > 0 && self.config.enemy_attack > 0 {
            self.player_health -= self.config.enemy_attack;
            world.notify(Notification::PlayerHealth(self.player_health));
        }

        if self.player_health <= 0 {
            self.enter(world, BattlePhase::GameOver);
        } else if self.enemy_health <= 0 {
            self.enter(world, BattlePhase::Reward);
        } else {
            dispatcher::resolve_end_turn(world)?;
            world.clear_modifier_tier(Lifetime::Turn);
            self.enter(world, BattlePhase::Wait);
        }
        Ok(self.phase)
    }
}
