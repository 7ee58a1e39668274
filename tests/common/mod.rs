#![allow(dead_code)]

use architects::ai::{PlanContext, PlanUnit, RankedAction, Registry, StatCache, WorldState};
use architects::ai::planner::rank_actions;
use architects::board::Distances;
use architects::config::{PlannerConfig, SimConfig};
use architects::ecs::{LiveWorld, build_sim_app, run_turns};
use architects::id::FactionId;
use architects::model::{STANDARD_PROFILE, World};
use bevy_app::App;

/// Plan one turn for `faction` against a fresh snapshot of `world`.
pub fn plan_for(world: &World, faction: FactionId) -> Vec<PlanUnit> {
    let registry = Registry::standard();
    let snapshot = WorldState::capture(world, registry.stats(), &mut StatCache::new());
    let mut distances = Distances::new();
    let config = PlannerConfig::default();
    let mut ctx = PlanContext {
        world,
        snapshot: &snapshot,
        registry: &registry,
        profile: registry.profile(STANDARD_PROFILE).unwrap(),
        distances: &mut distances,
        config: &config,
    };
    architects::ai::create_plan(faction, &mut ctx).unwrap()
}

/// The full ranking behind [`plan_for`].
pub fn ranking_for(world: &World, faction: FactionId) -> Vec<RankedAction> {
    let registry = Registry::standard();
    let snapshot = WorldState::capture(world, registry.stats(), &mut StatCache::new());
    let mut distances = Distances::new();
    let config = PlannerConfig::default();
    let mut ctx = PlanContext {
        world,
        snapshot: &snapshot,
        registry: &registry,
        profile: registry.profile(STANDARD_PROFILE).unwrap(),
        distances: &mut distances,
        config: &config,
    };
    rank_actions(faction, &mut ctx).unwrap()
}

/// Run `turns` turns of the pipeline with the given seed and return the app.
pub fn run_seeded(world: World, seed: u64, turns: u64) -> App {
    let mut app = build_sim_app(world, SimConfig::seeded(seed)).unwrap();
    let ran = run_turns(&mut app, turns).unwrap();
    assert_eq!(ran, turns);
    app
}

pub fn live(app: &App) -> &World {
    &app.world().resource::<LiveWorld>().0
}
