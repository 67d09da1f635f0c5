//! Full battle loop scenarios.

use gridfall::{
    Battle, BattleConfig, BattlePhase, CardId, CardTemplate, ConditionKind, Conditional, Effect,
    Lifetime, ModifierKind, ModifierScope, Rarity, ResourceKind, SlotPos, TriggerKind, World,
};

const SOLDIER: CardId = CardId::new(1);
const FLURRY: CardId = CardId::new(2);
const FARM: CardId = CardId::new(3);

fn world() -> World {
    let mut world = World::new(3, 3, 7);
    world.registry.register(
        CardTemplate::new(SOLDIER, "Soldier", Rarity::Common).with_value("attack", 5),
    );
    world.registry.register(
        CardTemplate::new(FLURRY, "Flurry Blade", Rarity::Rare)
            .with_value("attack", 2)
            .with_value("multistrike", 3),
    );
    world.registry.register(
        CardTemplate::new(FARM, "Farm", Rarity::Common).with_trigger(
            TriggerKind::OnTurnEnd,
            Conditional::new(
                ConditionKind::Always,
                vec![Effect::Produce { resource: ResourceKind::Food, amount: 2 }],
            ),
        ),
    );
    world
}

#[test]
fn lethal_turn_ends_in_reward() {
    let mut world = world();
    let a = world.spawn(SOLDIER).unwrap();
    let b = world.spawn(SOLDIER).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();
    world.deploy(b, SlotPos::new(0, 1)).unwrap();

    let config = BattleConfig { enemy_health: 10, ..BattleConfig::default() };
    let mut battle = Battle::new(config);

    assert!(battle.begin_turn(&mut world));
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Reward));
    assert!(battle.enemy_health() <= 0);
    // No counterattack from a dead enemy
    assert_eq!(battle.player_health(), config.player_health);
}

#[test]
fn overwhelming_enemy_ends_in_game_over() {
    let mut world = world();
    let a = world.spawn(SOLDIER).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();

    let config = BattleConfig {
        player_health: 5,
        enemy_health: 100,
        enemy_attack: 10,
        ..BattleConfig::default()
    };
    let mut battle = Battle::new(config);

    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::GameOver));
}

#[test]
fn multi_strike_multiplies_damage() {
    let mut world = world();
    let a = world.spawn(FLURRY).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();

    let mut battle = Battle::new(BattleConfig { enemy_health: 100, ..BattleConfig::default() });
    battle.begin_turn(&mut world);
    battle.attack(&mut world).unwrap();

    assert_eq!(battle.enemy_health(), 94);
}

#[test]
fn battle_loops_until_resolution() {
    let mut world = world();
    let a = world.spawn(SOLDIER).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();

    let config = BattleConfig {
        player_health: 50,
        enemy_health: 12,
        enemy_attack: 1,
        ..BattleConfig::default()
    };
    let mut battle = Battle::new(config);

    // Turn 1: 12 - 5 = 7, enemy hits back
    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Wait));
    assert_eq!(battle.enemy_health(), 7);
    assert_eq!(battle.player_health(), 49);

    // Turn 2: 7 - 5 = 2
    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Wait));

    // Turn 3: lethal
    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Reward));
}

#[test]
fn turn_end_production_accumulates_between_turns() {
    let mut world = world();
    let farm = world.spawn(FARM).unwrap();
    let soldier = world.spawn(SOLDIER).unwrap();
    world.deploy(farm, SlotPos::new(2, 2)).unwrap();
    world.deploy(soldier, SlotPos::new(0, 0)).unwrap();

    let mut battle = Battle::new(BattleConfig::default());
    for _ in 0..3 {
        battle.begin_turn(&mut world);
        battle.attack(&mut world).unwrap();
    }

    assert_eq!(world.resources.current(ResourceKind::Food), 6);
}

#[test]
fn redeploy_undoes_all_moves_for_the_turn() {
    let mut world = world();
    let a = world.spawn(SOLDIER).unwrap();
    let b = world.spawn(SOLDIER).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();
    world.deploy(b, SlotPos::new(1, 1)).unwrap();

    let mut battle = Battle::new(BattleConfig { max_moves: 3, ..BattleConfig::default() });
    battle.begin_turn(&mut world);

    battle.try_move(&mut world, a, SlotPos::new(2, 2)).unwrap();
    battle.try_move(&mut world, b, SlotPos::new(0, 1)).unwrap();
    assert_eq!(battle.moves_remaining(), 1);

    assert!(battle.redeploy(&mut world));
    assert_eq!(world.card(a).unwrap().slot(), Some(SlotPos::new(0, 0)));
    assert_eq!(world.card(b).unwrap().slot(), Some(SlotPos::new(1, 1)));
    assert_eq!(battle.moves_remaining(), 3);
}

#[test]
fn battle_tier_wiped_when_battle_settles() {
    let mut world = world();
    let a = world.spawn(SOLDIER).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();
    world
        .card_mut(a)
        .unwrap()
        .modifiers
        .add(ModifierKind::Attack, 20, Lifetime::Battle);
    world
        .card_mut(a)
        .unwrap()
        .modifiers
        .add(ModifierKind::Attack, 1, Lifetime::Permanent);

    let mut battle = Battle::new(BattleConfig { enemy_health: 10, ..BattleConfig::default() });
    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Reward));

    // Battle tier gone, permanent tier survives
    let modifiers = &world.card(a).unwrap().modifiers;
    assert_eq!(modifiers.value(ModifierKind::Attack), 1);
}

#[test]
fn before_attack_buff_lands_within_the_turn() {
    let mut world = world();
    world.registry.register(
        CardTemplate::new(CardId::new(9), "Berserker", Rarity::Epic)
            .with_value("attack", 1)
            .with_trigger(
                TriggerKind::BeforeAttack,
                Conditional::new(
                    ConditionKind::Always,
                    vec![Effect::ApplyModifier {
                        kind: ModifierKind::Attack,
                        amount: 4,
                        tier: Lifetime::Turn,
                        scope: ModifierScope::SelfCard,
                    }],
                ),
            ),
    );
    let a = world.spawn(CardId::new(9)).unwrap();
    world.deploy(a, SlotPos::new(0, 0)).unwrap();

    let mut battle = Battle::new(BattleConfig { enemy_health: 100, ..BattleConfig::default() });
    battle.begin_turn(&mut world);
    battle.attack(&mut world).unwrap();

    // Struck for 1 + 4; the turn tier was wiped afterwards
    assert_eq!(battle.enemy_health(), 95);
    assert_eq!(world.card(a).unwrap().modifiers.value(ModifierKind::Attack), 0);
}

#[test]
fn attacks_resolve_in_board_order() {
    let mut world = world();
    world.registry.register(
        CardTemplate::new(CardId::new(9), "Finisher", Rarity::Common).with_value("attack", 3),
    );
    // Soldier at the back row, finisher in front. Front row attacks first,
    // so the enemy dies to the soldier only if the finisher struck before.
    let finisher = world.spawn(CardId::new(9)).unwrap();
    let soldier = world.spawn(SOLDIER).unwrap();
    world.deploy(soldier, SlotPos::new(2, 0)).unwrap();
    world.deploy(finisher, SlotPos::new(0, 0)).unwrap();

    let mut battle = Battle::new(BattleConfig { enemy_health: 8, ..BattleConfig::default() });
    battle.begin_turn(&mut world);
    assert_eq!(battle.attack(&mut world), Ok(BattlePhase::Reward));
    assert_eq!(battle.enemy_health(), 0);
}
