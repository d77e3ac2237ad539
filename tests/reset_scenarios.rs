//! Integration tests for the reset policy driven through its hooks
//!
//! These walk bots through the situations the policy has to handle:
//! - immediate resets at the ceiling
//! - deferral by the time-played gate and pickup by the periodic scan
//! - skip bands and the Death Knight floor
//! - companions and real players staying untouched

use bot_level_reset::core::config::PolicyConfig;
use bot_level_reset::core::types::{CharacterId, ClassId};
use bot_level_reset::hooks::{WorldHooks, MODULE_ACTIVE_NOTICE};
use bot_level_reset::host::{CharacterApi, Controller, SimWorld};
use bot_level_reset::policy::{decide, BotObservation, Decision, FixedRoll, Trigger};
use bot_level_reset::ResetBotModule;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Level up one step at a time from the current level towards `target`,
/// firing the hook after each step. Stops early at the level cap.
fn level_to(world: &mut SimWorld, module: &mut ResetBotModule<FixedRoll>, id: CharacterId, target: u8) {
    let start = world.character(id).unwrap().level;
    for _ in start..target {
        let Some(previous) = world.level_up(id) else {
            break;
        };
        module.on_level_changed(&mut *world, id, previous);
    }
}

#[test]
fn test_bot_reaching_cap_is_reset_and_regeared() {
    let mut world = SimWorld::new();
    let bot = world.spawn("Thrall", ClassId::Shaman, 78, Controller::RandomBot);
    let mut module = ResetBotModule::new(PolicyConfig::default(), FixedRoll(99));

    level_to(&mut world, &mut module, bot, 80);

    let character = world.get(bot).unwrap();
    assert_eq!(character.state.level, 1);
    assert_eq!(character.gear_level, Some(1));
    assert_eq!(character.experience, 0);
    assert_eq!(module.stats().resets, 1);
    assert_eq!(module.stats().level_changes, 2);
}

#[test]
fn test_time_gate_defers_until_scan() {
    let policy = PolicyConfig {
        restrict_by_played_time: true,
        min_time_played_secs: 86_400,
        scan_interval_secs: 60,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let bot = world.spawn("Patient", ClassId::Mage, 79, Controller::RandomBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(0));

    level_to(&mut world, &mut module, bot, 80);
    assert_eq!(world.character(bot).unwrap().level, 80, "level change at cap is deferred");

    // One simulated day in one-minute ticks
    let mut reset_at = None;
    for minute in 1..=1_500u32 {
        world.advance_time(60);
        module.on_update(&mut world, 60_000);
        if world.character(bot).unwrap().level == 1 {
            reset_at = Some(minute);
            break;
        }
    }

    let minute = reset_at.expect("scan should reset the bot once the gate opens");
    assert!(minute >= 1_440, "reset happened after {} minutes, before the gate", minute);
    assert_eq!(module.stats().resets, 1);
}

#[test]
fn test_gated_scan_never_touches_players() {
    let policy = PolicyConfig {
        restrict_by_played_time: true,
        min_time_played_secs: 10,
        scan_interval_secs: 1,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let player = world.spawn("Human", ClassId::Warrior, 80, Controller::Player);
    let helper = world.spawn("Helper", ClassId::Priest, 80, Controller::CompanionBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(0));

    for _ in 0..100 {
        world.advance_time(1);
        module.on_update(&mut world, 1_000);
    }

    assert_eq!(world.character(player).unwrap().level, 80);
    assert_eq!(world.character(helper).unwrap().level, 80);
    assert_eq!(module.stats().resets, 0);
    assert_eq!(module.stats().scans, 100);
}

#[test]
fn test_death_knight_skip_lands_on_floor() {
    let policy = PolicyConfig {
        skip_from_level: 20,
        skip_to_level: 30,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let dk = world.spawn("Arthas", ClassId::DeathKnight, 19, Controller::RandomBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(99));

    level_to(&mut world, &mut module, dk, 20);

    assert_eq!(world.character(dk).unwrap().level, 55);
    assert_eq!(module.stats().skips, 1);
}

#[test]
fn test_death_knight_reset_never_below_start_level() {
    let mut world = SimWorld::new();
    let dk = world.spawn("Koltira", ClassId::DeathKnight, 79, Controller::RandomBot);
    let mut module = ResetBotModule::new(PolicyConfig::default(), FixedRoll(0));

    level_to(&mut world, &mut module, dk, 80);
    assert_eq!(world.character(dk).unwrap().level, 55);

    // Sitting on the start level is protected, even on login
    module.on_login(&mut world, dk);
    assert_eq!(world.character(dk).unwrap().level, 55);
}

#[test]
fn test_login_notice_and_overflow_correction() {
    let policy = PolicyConfig {
        max_level: 60,
        reset_to_level: 10,
        reset_chance_percent: 0,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let bot = world.spawn("Overgrown", ClassId::Druid, 72, Controller::RandomBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(99));

    module.on_login(&mut world, bot);

    let character = world.get(bot).unwrap();
    assert_eq!(character.state.level, 10);
    assert_eq!(character.inbox[0], MODULE_ACTIVE_NOTICE);
    assert_eq!(character.inbox.len(), 2);
}

#[test]
fn test_disabled_ceiling_only_skips() {
    let policy = PolicyConfig {
        max_level: 0,
        skip_from_level: 10,
        skip_to_level: 15,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let bot = world.spawn("Climber", ClassId::Rogue, 5, Controller::RandomBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(0));

    level_to(&mut world, &mut module, bot, 80);

    assert_eq!(world.character(bot).unwrap().level, 80);
    assert_eq!(module.stats().skips, 1);
    assert_eq!(module.stats().resets, 0);
}

#[test]
fn test_scaled_chance_resets_before_cap_with_seeded_rolls() {
    let policy = PolicyConfig {
        scaled_chance: true,
        reset_chance_percent: 100,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let bots: Vec<_> = (0..20)
        .map(|i| world.spawn(&format!("Bot{}", i), ClassId::Warrior, 2, Controller::RandomBot))
        .collect();
    let mut module = ResetBotModule::new(policy, ChaCha8Rng::seed_from_u64(42));

    for _ in 0..40 {
        for &id in &bots {
            if let Some(previous) = world.level_up(id) {
                module.on_level_changed(&mut world, id, previous);
            }
        }
    }

    // Rolls at every level make reaching 42 without a reset vanishingly rare
    assert!(module.stats().resets > 0);
    assert!(bots.iter().all(|&id| world.character(id).unwrap().level < 80));
}

#[test]
fn test_reset_is_idempotent_through_hooks() {
    let policy = PolicyConfig {
        max_level: 60,
        reset_to_level: 20,
        ..PolicyConfig::default()
    };
    let mut world = SimWorld::new();
    let bot = world.spawn("Twice", ClassId::Hunter, 61, Controller::RandomBot);
    let mut module = ResetBotModule::new(policy, FixedRoll(0));

    module.on_login(&mut world, bot);
    let first = world.character(bot).unwrap().level;
    world.get_mut(bot).unwrap().state.level = 61;
    module.on_login(&mut world, bot);

    assert_eq!(first, 20);
    assert_eq!(world.character(bot).unwrap().level, first);
}

proptest! {
    #[test]
    fn prop_floor_levels_never_act(
        class_idx in 0usize..10,
        roll in 0u32..100,
        max_level in 0u8..=80,
        skip_from in 0u8..=80,
        time in 0u32..200_000,
        scaled in any::<bool>(),
        restrict in any::<bool>(),
    ) {
        let class = ClassId::ALL[class_idx];
        let policy = PolicyConfig {
            max_level,
            skip_from_level: skip_from,
            scaled_chance: scaled,
            restrict_by_played_time: restrict,
            ..PolicyConfig::default()
        };
        let mut levels = vec![1u8];
        if class == ClassId::DeathKnight {
            levels.push(55);
        }
        for level in levels {
            let obs = BotObservation {
                level,
                class,
                time_played_at_level: time,
                is_bot: true,
                is_random_bot: true,
            };
            for trigger in [Trigger::LevelChanged, Trigger::Login, Trigger::PeriodicScan] {
                prop_assert_eq!(decide(&obs, &policy, &mut FixedRoll(roll), trigger), Decision::NoAction);
            }
        }
    }

    #[test]
    fn prop_overflow_always_resets(
        max_level in 2u8..80,
        over in 1u8..=40,
        roll in 0u32..100,
        chance in 0u32..=100,
    ) {
        let level = max_level.saturating_add(over).min(80);
        prop_assume!(level > max_level);
        let policy = PolicyConfig {
            max_level,
            reset_chance_percent: chance,
            ..PolicyConfig::default()
        };
        let obs = BotObservation {
            level,
            class: ClassId::Mage,
            time_played_at_level: 0,
            is_bot: true,
            is_random_bot: true,
        };
        prop_assert_eq!(
            decide(&obs, &policy, &mut FixedRoll(roll), Trigger::LevelChanged),
            Decision::Reset { target_level: 1 }
        );
    }
}
