//! The per-faction turn algorithm.
//!
//! Once per turn each architect ranks every registered action twice: first
//! abstractly, by projecting the action onto clones of the turn's snapshot
//! and scoring the result, then concretely, by finding the best-scoring
//! subject/target pairing for it. The combined ranking is walked greedily so
//! that no unit receives more than one order per turn.

use std::collections::BTreeSet;

use rand::rngs::SmallRng;

use super::action::{Action, ActionInfo};
use super::order::{ExecContext, Order, admits};
use super::profile::Profile;
use super::registry::Registry;
use super::world_state::WorldState;
use crate::board::Distances;
use crate::config::{PlannerConfig, SimConfig};
use crate::error::AiError;
use crate::id::{FactionId, UnitId};
use crate::model::{Actionable, World};

/// One committed binding of a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanUnit {
    pub action: Action,
    pub order: Order,
    pub subject: Actionable,
    pub target: Actionable,
    /// The action's final ranking score.
    pub score: f64,
}

/// An action's place in the turn's ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedAction {
    pub action: Action,
    /// Best aggregate utility over all projected rivals.
    pub abstract_score: f64,
    /// Best concrete pairing, if any pairing was viable.
    pub pairing: Option<Pairing>,
    /// `abstract_score + pairing utility`, or `-infinity` without a pairing.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pairing {
    pub order: Order,
    pub subject: Actionable,
    pub target: Actionable,
    pub utility: f64,
}

/// Read-only inputs shared by every step of plan creation.
pub struct PlanContext<'a> {
    pub world: &'a World,
    pub snapshot: &'a WorldState,
    pub registry: &'a Registry,
    pub profile: &'a Profile,
    pub distances: &'a mut Distances,
    pub config: &'a PlannerConfig,
}

/// The decision-maker for one faction.
#[derive(Debug, Clone, PartialEq)]
pub struct Architect {
    pub faction: FactionId,
    pub plan: Vec<PlanUnit>,
}

/// What one faction did in one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub planned: usize,
    pub executed: usize,
}

impl Architect {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            plan: Vec::new(),
        }
    }

    /// Plan if needed, then follow the plan. Defeated factions and factions
    /// without territory sit the turn out.
    pub fn take_turn(
        &mut self,
        world: &mut World,
        snapshot: &WorldState,
        registry: &Registry,
        distances: &mut Distances,
        rng: &mut SmallRng,
        config: &SimConfig,
    ) -> Result<Option<TurnReport>, AiError> {
        let Some(faction) = world.factions.get(&self.faction) else {
            return Ok(None);
        };
        if faction.defeated || world.territory(self.faction) == 0 {
            return Ok(None);
        }
        if self.plan.is_empty() {
            let profile = registry.profile(&faction.profile)?;
            let mut ctx = PlanContext {
                world: &*world,
                snapshot,
                registry,
                profile,
                distances: &mut *distances,
                config: &config.planner,
            };
            self.plan = create_plan(self.faction, &mut ctx)?;
        }
        let planned = self.plan.len();
        let mut exec = ExecContext {
            world,
            distances,
            rng,
            production: &config.production,
        };
        let executed = self.follow_plan(&mut exec);
        Ok(Some(TurnReport { planned, executed }))
    }

    /// Execute every pending entry against the live world, then clear the plan.
    pub fn follow_plan(&mut self, exec: &mut ExecContext<'_>) -> usize {
        let mut executed = 0;
        for unit in self.plan.drain(..) {
            if unit.order.execute(unit.subject, unit.target, exec) {
                executed += 1;
                tracing::trace!(faction = %self.faction, order = %unit.order, subject = %unit.subject, target = %unit.target, "order executed");
            } else {
                tracing::trace!(faction = %self.faction, order = %unit.order, subject = %unit.subject, target = %unit.target, "order had no effect");
            }
        }
        executed
    }
}

/// Build a faction's plan for this turn.
pub fn create_plan(faction: FactionId, ctx: &mut PlanContext<'_>) -> Result<Vec<PlanUnit>, AiError> {
    let ranking = rank_actions(faction, ctx)?;
    let plan = assign(&ranking);
    tracing::debug!(
        %faction,
        entries = plan.len(),
        best = ?ranking.first().map(|r| r.action.as_str()),
        "plan created"
    );
    Ok(plan)
}

/// Score every registered action and sort them, best first. The sort is
/// stable, so equal scores keep registry order.
pub fn rank_actions(
    faction: FactionId,
    ctx: &mut PlanContext<'_>,
) -> Result<Vec<RankedAction>, AiError> {
    let subjects = candidate_subjects(faction, ctx.world);
    let targets = candidate_targets(faction, ctx);

    let mut ranking = Vec::with_capacity(ctx.registry.actions().len());
    for &action in ctx.registry.actions() {
        let abstract_score = abstract_score(faction, action, ctx)?;
        let pairing = best_pairing(faction, action, &subjects, &targets, ctx)?;
        let score = match pairing {
            Some(p) => abstract_score + p.utility,
            None => f64::NEG_INFINITY,
        };
        ranking.push(RankedAction {
            action,
            abstract_score,
            pairing,
            score,
        });
    }
    ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranking)
}

/// Best aggregate utility of projecting `action` against each other live
/// faction. Explored once with no target faction when no rival is left.
fn abstract_score(faction: FactionId, action: Action, ctx: &PlanContext<'_>) -> Result<f64, AiError> {
    let mut targets: Vec<Option<FactionId>> = ctx
        .world
        .live_factions()
        .filter(|&f| f != faction)
        .map(Some)
        .collect();
    if targets.is_empty() {
        targets.push(None);
    }

    let mut best = f64::NEG_INFINITY;
    for target in targets {
        let mut projected = ctx.snapshot.clone();
        let info = ActionInfo::abstract_against(faction, target);
        action.apply_consequences(&info, &mut projected, ctx.world)?;
        let utility = ctx.profile.utility_of_state(&projected, ctx.registry.stats())?;
        if utility > best {
            best = utility;
        }
    }
    Ok(best)
}

/// The faction's own units and locations.
fn candidate_subjects(faction: FactionId, world: &World) -> BTreeSet<Actionable> {
    world
        .units_of(faction)
        .map(|u| Actionable::Unit(u.id))
        .chain(world.owned_locations(faction).map(Actionable::Location))
        .collect()
}

/// Unowned locations bordering the faction's snapshot territory, every unit
/// of a rival, and the nearest enemy units to each of the faction's units.
fn candidate_targets(faction: FactionId, ctx: &PlanContext<'_>) -> BTreeSet<Actionable> {
    let world = ctx.world;
    let mut targets = BTreeSet::new();

    if let Some(owned) = ctx.snapshot.faction_claims.get(&faction) {
        for &location in owned {
            for neighbor in world.board.neighbors_of(location).into_iter().flatten() {
                if ctx.snapshot.owner_of(neighbor) != Some(faction) {
                    targets.insert(Actionable::Location(neighbor));
                }
            }
        }
    }

    if let Some(f) = world.factions.get(&faction) {
        for &rival in &f.rivals {
            targets.extend(world.units_of(rival).map(|u| Actionable::Unit(u.id)));
        }
    }

    for unit in world.units_of(faction) {
        let nearest = world.nearest_units(
            unit.location,
            |other| other.faction != faction,
            ctx.config.nearest_enemies,
        );
        targets.extend(nearest.into_iter().flatten().map(Actionable::Unit));
    }
    targets
}

/// Highest-utility viable (subject, target) pairing for `action`. The first
/// strictly better pairing wins ties; `-infinity` pairings are never viable.
fn best_pairing(
    faction: FactionId,
    action: Action,
    subjects: &BTreeSet<Actionable>,
    targets: &BTreeSet<Actionable>,
    ctx: &mut PlanContext<'_>,
) -> Result<Option<Pairing>, AiError> {
    let mut best: Option<Pairing> = None;
    let mut best_utility = f64::NEG_INFINITY;

    for &subject in subjects {
        if !admits(action.required_subject(), Some(subject)) {
            continue;
        }
        for &target in targets {
            if !admits(action.required_target(), Some(target)) {
                continue;
            }
            let info = ActionInfo {
                subject_faction: faction,
                target_faction: target.faction(ctx.world),
                subject: Some(subject),
                target: Some(target),
            };
            let order = action.order_for(&info, ctx.world)?;
            if !admits(order.required_target(), Some(target)) {
                continue;
            }
            let utility = ctx.profile.utility_of_order(
                subject,
                order,
                target,
                ctx.snapshot,
                ctx.world,
                ctx.distances,
            )?;
            if utility > best_utility {
                best_utility = utility;
                best = Some(Pairing {
                    order,
                    subject,
                    target,
                    utility,
                });
            }
        }
    }
    Ok(best)
}

/// Walk the ranking, committing each viable action unless its subject unit
/// already has an order. Locations may take several entries.
pub fn assign(ranking: &[RankedAction]) -> Vec<PlanUnit> {
    let mut assigned: BTreeSet<UnitId> = BTreeSet::new();
    let mut plan = Vec::new();
    for ranked in ranking {
        let Some(pairing) = ranked.pairing else {
            continue;
        };
        if let Some(unit) = pairing.subject.as_unit()
            && !assigned.insert(unit)
        {
            continue;
        }
        plan.push(PlanUnit {
            action: ranked.action,
            order: pairing.order,
            subject: pairing.subject,
            target: pairing.target,
            score: ranked.score,
        });
    }
    plan
}
