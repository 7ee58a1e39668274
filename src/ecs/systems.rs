//! Turn pipeline systems, one per phase.

use bevy_ecs::system::{Res, ResMut};

use super::clock::TurnClock;
use super::resources::{Architects, Halted, LiveWorld, Rules, SimRng, TurnCaches, TurnSummary};
use crate::ai::Architect;
use crate::id::FactionId;

/// Drop every per-turn cache so this turn reads fresh live data.
pub fn invalidate_caches(
    clock: Res<TurnClock>,
    mut caches: ResMut<TurnCaches>,
    mut summary: ResMut<TurnSummary>,
) {
    caches.invalidate();
    *summary = TurnSummary {
        turn: clock.turn,
        ..TurnSummary::default()
    };
}

pub fn advance_production(
    mut live: ResMut<LiveWorld>,
    rules: Res<Rules>,
    mut summary: ResMut<TurnSummary>,
) {
    summary.produced = live.0.advance_production(&rules.config.production);
}

/// Every faction, in id order, plans against the turn's shared snapshot and
/// executes its plan. The first fatal error halts the simulation.
pub fn run_architects(
    mut live: ResMut<LiveWorld>,
    rules: Res<Rules>,
    mut caches: ResMut<TurnCaches>,
    mut architects: ResMut<Architects>,
    mut rng: ResMut<SimRng>,
    mut halted: ResMut<Halted>,
    mut summary: ResMut<TurnSummary>,
) {
    let world = &mut live.0;
    let caches = &mut *caches;
    let snapshot = caches
        .snapshot
        .current(world, rules.registry.stats(), &mut caches.stats);

    let factions: Vec<FactionId> = world.factions.keys().copied().collect();
    for faction in factions {
        let architect = architects
            .0
            .entry(faction)
            .or_insert_with(|| Architect::new(faction));
        let result = architect.take_turn(
            world,
            snapshot,
            &rules.registry,
            &mut caches.distances,
            &mut rng.rng,
            &rules.config,
        );
        match result {
            Ok(Some(report)) => {
                summary.reports.insert(faction, report);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(%faction, error = %err, "planning failed, halting simulation");
                halted.0 = Some(err);
                return;
            }
        }
    }
}

/// Apply queued attack and defeat notices; defeated factions lose their plans.
pub fn process_notices(
    mut live: ResMut<LiveWorld>,
    mut architects: ResMut<Architects>,
    mut summary: ResMut<TurnSummary>,
) {
    let report = live.0.apply_notices();
    for (loser, _) in &report.defeats {
        if let Some(architect) = architects.0.get_mut(loser) {
            architect.plan.clear();
        }
    }
    summary.relations = report;
}
