use bevy_app::App;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::clock::TurnClock;
use super::conditions::running;
use super::resources::{Architects, Halted, LiveWorld, Rules, SimRng, TurnCaches, TurnSummary};
use super::schedule::{TurnPhase, TurnTick, configure_turn_schedule};
use super::systems::{advance_production, invalidate_caches, process_notices, run_architects};
use crate::ai::Registry;
use crate::config::SimConfig;
use crate::error::{AiError, ConfigError};
use crate::model::World;

/// Build a headless Bevy app running `world` under the standard registry.
///
/// Manual tick control:
/// ```no_run
/// # use architects::config::SimConfig;
/// # use architects::ecs::{build_sim_app, run_turns};
/// # use architects::scenario::Scenario;
/// let world = Scenario::corners(8, 8).build();
/// let mut app = build_sim_app(world, SimConfig::default()).unwrap();
/// run_turns(&mut app, 50).unwrap();
/// ```
pub fn build_sim_app(world: World, config: SimConfig) -> Result<App, ConfigError> {
    build_sim_app_with_registry(world, config, Registry::standard())
}

/// Build a headless Bevy app with a custom registry (extra profiles or a
/// reduced action set). Fails if `config` does not validate.
///
/// The schedule always uses the single-threaded executor: every turn
/// consumes the one RNG in a fixed order, so runs are reproducible.
pub fn build_sim_app_with_registry(
    world: World,
    config: SimConfig,
    registry: Registry,
) -> Result<App, ConfigError> {
    config.validate()?;
    let mut app = App::empty();

    app.insert_resource(TurnClock::new(&config.clock));
    app.insert_resource(SimRng {
        rng: SmallRng::seed_from_u64(config.seed),
        seed: config.seed,
    });
    app.insert_resource(LiveWorld(world));
    app.insert_resource(Rules { registry, config });
    app.init_resource::<TurnCaches>();
    app.init_resource::<Architects>();
    app.init_resource::<Halted>();
    app.init_resource::<TurnSummary>();

    let mut schedule = configure_turn_schedule(ExecutorKind::SingleThreaded);
    schedule.add_systems(invalidate_caches.in_set(TurnPhase::Advance));
    schedule.add_systems(advance_production.in_set(TurnPhase::Production));
    schedule.add_systems(run_architects.run_if(running).in_set(TurnPhase::Architects));
    schedule.add_systems(process_notices.in_set(TurnPhase::Relations));
    app.add_schedule(schedule);
    Ok(app)
}

/// Run one turn unless the clock is paused or the simulation halted.
/// Returns whether a turn ran.
pub fn step(app: &mut App) -> bool {
    let world = app.world();
    if world.resource::<TurnClock>().paused || world.resource::<Halted>().is_halted() {
        return false;
    }
    app.world_mut().run_schedule(TurnTick);
    true
}

/// Run up to `turns` turns. Returns how many ran, or the error that halted
/// the simulation.
pub fn run_turns(app: &mut App, turns: u64) -> Result<u64, AiError> {
    let mut ran = 0;
    for _ in 0..turns {
        if !step(app) {
            break;
        }
        ran += 1;
    }
    match &app.world().resource::<Halted>().0 {
        Some(err) => Err(err.clone()),
        None => Ok(ran),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy_ecs::schedule::IntoScheduleConfigs;

    use super::*;
    use crate::board::Movement;

    fn empty_world() -> World {
        World::new(4, 4, false, Movement::Orthogonal)
    }

    #[test]
    fn app_builds_without_panic() {
        let _app = build_sim_app(empty_world(), SimConfig::default()).unwrap();
    }

    #[test]
    fn invalid_config_is_rejected_before_any_turn() {
        let mut config = SimConfig::default();
        config.production.variance = 1.5;
        assert!(matches!(
            build_sim_app(empty_world(), config),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = SimConfig::default();
        config.clock.min_speed = 6.0;
        assert!(build_sim_app(empty_world(), config).is_err());
    }

    #[test]
    fn each_step_advances_one_turn() {
        let mut app = build_sim_app(empty_world(), SimConfig::default()).unwrap();
        assert_eq!(run_turns(&mut app, 3), Ok(3));
        assert_eq!(app.world().resource::<TurnClock>().turn, 3);
    }

    #[test]
    fn paused_clock_blocks_steps() {
        let mut config = SimConfig::default();
        config.clock.start_paused = true;
        let mut app = build_sim_app(empty_world(), config).unwrap();
        assert!(!step(&mut app));
        assert_eq!(run_turns(&mut app, 5), Ok(0));
        app.world_mut().resource_mut::<TurnClock>().toggle_pause();
        assert!(step(&mut app));
    }

    #[test]
    fn summary_records_the_turn_it_describes() {
        let mut app = build_sim_app(empty_world(), SimConfig::default()).unwrap();
        run_turns(&mut app, 2).unwrap();
        assert_eq!(app.world().resource::<TurnSummary>().turn, 1);
    }

    #[test]
    fn phase_ordering_respected() {
        let log = Arc::new(Mutex::new(Vec::<&'static str>::new()));
        let mut app = build_sim_app(empty_world(), SimConfig::default()).unwrap();

        for (phase, name) in [
            (TurnPhase::Late, "late"),
            (TurnPhase::Relations, "relations"),
            (TurnPhase::Architects, "architects"),
            (TurnPhase::Production, "production"),
            (TurnPhase::Advance, "advance"),
        ] {
            let log = log.clone();
            app.add_systems(
                TurnTick,
                (move || {
                    log.lock().unwrap().push(name);
                })
                .in_set(phase),
            );
        }

        app.world_mut().run_schedule(TurnTick);
        let entries = log.lock().unwrap();
        assert_eq!(
            *entries,
            vec!["advance", "production", "architects", "relations", "late"]
        );
    }
}
