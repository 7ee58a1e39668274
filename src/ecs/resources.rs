use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;
use rand::rngs::SmallRng;

use crate::ai::{Architect, Registry, SnapshotCache, StatCache, TurnReport};
use crate::board::Distances;
use crate::config::SimConfig;
use crate::error::AiError;
use crate::id::{FactionId, LocationId};
use crate::model::{Produced, RelationsReport, World};

/// Deterministic RNG for the simulation.
#[derive(Resource)]
pub struct SimRng {
    pub rng: SmallRng,
    pub seed: u64,
}

/// The live game world.
#[derive(Resource, Debug)]
pub struct LiveWorld(pub World);

/// Fixed rules for the run: the registry and the configuration.
#[derive(Resource, Debug)]
pub struct Rules {
    pub registry: Registry,
    pub config: SimConfig,
}

/// Everything cached for the duration of one turn.
#[derive(Resource, Debug, Default)]
pub struct TurnCaches {
    pub stats: StatCache,
    pub snapshot: SnapshotCache,
    pub distances: Distances,
}

impl TurnCaches {
    pub fn invalidate(&mut self) {
        self.stats.clear();
        self.snapshot.invalidate();
        self.distances.clear();
    }
}

/// One architect per faction, created on the faction's first turn.
#[derive(Resource, Debug, Default)]
pub struct Architects(pub BTreeMap<FactionId, Architect>);

/// Set once a fatal planning error stops the simulation.
#[derive(Resource, Debug, Default)]
pub struct Halted(pub Option<AiError>);

impl Halted {
    pub fn is_halted(&self) -> bool {
        self.0.is_some()
    }
}

/// What happened during the most recent turn.
#[derive(Resource, Debug, Default)]
pub struct TurnSummary {
    pub turn: u64,
    pub produced: Vec<(LocationId, Produced)>,
    pub reports: BTreeMap<FactionId, TurnReport>,
    pub relations: RelationsReport,
}
