//! Four factions fight over a small board.
//!
//! Usage: `cargo run --example skirmish [turns] [config.json]`
//!
//! Turns are paced by the clock speed (`clock.*` in the config file).
//!
//! Set `RUST_LOG=architects=debug` to watch plans being made, or `trace` to
//! see every order.

use architects::config::SimConfig;
use architects::ecs::{LiveWorld, TurnClock, TurnSummary, build_sim_app, step};
use architects::scenario::Scenario;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let turns: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 40,
    };
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let world = Scenario::corners(10, 10).build();
    let mut app = build_sim_app(world, config)?;
    if app.world().resource::<TurnClock>().paused {
        app.world_mut().resource_mut::<TurnClock>().toggle_pause();
    }

    for _ in 0..turns {
        if !step(&mut app) {
            break;
        }
        let summary = app.world().resource::<TurnSummary>();
        let world = &app.world().resource::<LiveWorld>().0;
        let executed: usize = summary.reports.values().map(|r| r.executed).sum();
        println!(
            "turn {:>3}: {} orders, {} produced, {} defeats",
            summary.turn,
            executed,
            summary.produced.len(),
            summary.relations.defeats.len()
        );
        if world.live_factions().count() <= 1 {
            break;
        }
        let interval = app.world().resource::<TurnClock>().tick_interval();
        std::thread::sleep(interval);
    }

    let world = &app.world().resource::<LiveWorld>().0;
    println!();
    for faction in world.factions.values() {
        let status = if faction.defeated { "defeated" } else { "standing" };
        println!(
            "{:<6} {:<9} territory {:>3}  troops {:>4}  rivals {}",
            faction.name,
            status,
            world.territory(faction.id),
            world.troops(faction.id),
            faction.rivals.len()
        );
        for unit in world.units_of(faction.id) {
            println!(
                "       {} {:<7} {:>4} troops  facing {:>6.1}°",
                unit.id,
                unit.suit.as_str(),
                unit.troops,
                unit.facing.angle()
            );
        }
    }

    if let Some(err) = &app.world().resource::<architects::ecs::Halted>().0 {
        return Err(err.clone().into());
    }
    Ok(())
}
