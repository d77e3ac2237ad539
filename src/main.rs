//! Headless Reset Simulation
//!
//! Populates an in-memory world with bots, runs simulated play time through
//! the reset policy and prints what happened.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bot_level_reset::core::config::{load_policy_file, PolicyConfig};
use bot_level_reset::core::error::Result;
use bot_level_reset::core::types::{ClassId, MAX_PLAYER_LEVEL};
use bot_level_reset::hooks::WorldHooks;
use bot_level_reset::host::{Controller, SimWorld, WorldRoster};
use bot_level_reset::{ModuleStats, ResetBotModule};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Reset Simulation - run bots through the level reset policy
#[derive(Parser, Debug)]
#[command(name = "bot_reset_sim")]
#[command(about = "Simulate bots leveling under a reset policy and report the outcome")]
struct Args {
    /// Policy file (TOML with ResetBotLevel.* keys); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of random bots to spawn
    #[arg(long, default_value_t = 50)]
    bots: u32,

    /// Simulated hours to run
    #[arg(long, default_value_t = 24)]
    hours: u32,

    /// Milliseconds per world tick
    #[arg(long, default_value_t = 1000)]
    tick_ms: u32,

    /// Average seconds between level-ups for a bot
    #[arg(long, default_value_t = 900)]
    level_up_every: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct SimSummary {
    seed: u64,
    hours: u32,
    characters: usize,
    policy: PolicyConfig,
    stats: ModuleStats,
    /// Final level -> number of characters
    levels: BTreeMap<u8, usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("bot_level_reset=info,bot_reset_sim=info")
        .init();

    let args = Args::parse();

    let policy = match &args.config {
        Some(path) => {
            let (policy, issues) = load_policy_file(path)?;
            for issue in &issues {
                tracing::error!("Invalid reset policy value: {}", issue);
            }
            policy
        }
        None => PolicyConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rolls = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    let mut world = SimWorld::new();
    populate(&mut world, args.bots, &mut rng);

    let mut module = ResetBotModule::new(policy, rolls);
    WorldHooks::<SimWorld>::on_startup(&mut module);

    for id in world.connected_characters() {
        module.on_login(&mut world, id);
    }

    let tick_ms = args.tick_ms.max(1);
    let total_ms = u64::from(args.hours) * 3_600_000;
    let level_up_chance = (f64::from(tick_ms) / (f64::from(args.level_up_every.max(1)) * 1000.0)).min(1.0);

    let mut elapsed_ms = 0u64;
    let mut pending_ms = 0u32;
    while elapsed_ms < total_ms {
        elapsed_ms += u64::from(tick_ms);
        pending_ms += tick_ms;
        world.advance_time(pending_ms / 1000);
        pending_ms %= 1000;

        for id in world.connected_characters() {
            if !rng.gen_bool(level_up_chance) {
                continue;
            }
            if let Some(previous) = world.level_up(id) {
                module.on_level_changed(&mut world, id, previous);
            }
        }

        module.on_update(&mut world, tick_ms);
    }

    let mut levels = BTreeMap::new();
    for character in world.characters() {
        *levels.entry(character.state.level).or_insert(0) += 1;
    }

    let summary = SimSummary {
        seed,
        hours: args.hours,
        characters: world.character_count(),
        policy: module.policy().clone(),
        stats: module.stats(),
        levels,
    };

    if args.format == "text" {
        print_text(&summary);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
    }

    Ok(())
}

/// Spawn random bots plus a few players and their companions
fn populate(world: &mut SimWorld, bots: u32, rng: &mut ChaCha8Rng) {
    for i in 0..bots {
        let class = *ClassId::ALL.choose(rng).unwrap_or(&ClassId::Warrior);
        let level = class.clamp_target(rng.gen_range(1..=MAX_PLAYER_LEVEL));
        world.spawn(&format!("Bot{:03}", i), class, level, Controller::RandomBot);
    }

    for name in ["Alice", "Brann"] {
        world.spawn(name, ClassId::Paladin, 70, Controller::Player);
        world.spawn(&format!("{}'s helper", name), ClassId::Priest, 70, Controller::CompanionBot);
    }

    tracing::info!("Spawned {} characters ({} random bots)", world.character_count(), bots);
}

fn print_text(summary: &SimSummary) {
    println!("Reset Simulation");
    println!("================");
    println!("Seed: {}", summary.seed);
    println!("Simulated: {}h, {} characters", summary.hours, summary.characters);
    println!();
    println!("Logins:        {}", summary.stats.logins);
    println!("Level changes: {}", summary.stats.level_changes);
    println!("Scans:         {}", summary.stats.scans);
    println!("Resets:        {}", summary.stats.resets);
    println!("Skips:         {}", summary.stats.skips);
    println!("Failures:      {}", summary.stats.failures);
    println!();
    println!("--- Final Levels ---");
    for (level, count) in &summary.levels {
        println!("{:>3}: {}", level, count);
    }
}
