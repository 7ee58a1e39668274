//! Orders: what actually executes against the live world.

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::board::Distances;
use crate::config::ProductionConfig;
use crate::model::{Actionable, ActionableKind, Suit, World};

/// A concrete command for one subject/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Order {
    /// Take one step toward the target, merging into a friendly unit or
    /// attacking a hostile one standing on the chosen cell.
    MoveToward,
    /// Take the location under the subject.
    Claim,
    /// Strike an adjacent unit.
    Attack,
    /// Schedule production of a unit at the subject location.
    Build(Suit),
}

/// Whether a kind filter admits a participant. Absent participants and
/// absent filters both admit.
pub fn admits(filter: Option<ActionableKind>, participant: Option<Actionable>) -> bool {
    match (filter, participant) {
        (Some(kind), Some(participant)) => participant.kind() == kind,
        _ => true,
    }
}

/// Everything an order needs to mutate the live world.
pub struct ExecContext<'a> {
    pub world: &'a mut World,
    pub distances: &'a mut Distances,
    pub rng: &'a mut SmallRng,
    pub production: &'a ProductionConfig,
}

impl Order {
    pub const ALL: [Order; 7] = [
        Order::MoveToward,
        Order::Claim,
        Order::Attack,
        Order::Build(Suit::Spade),
        Order::Build(Suit::Heart),
        Order::Build(Suit::Club),
        Order::Build(Suit::Diamond),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Order::MoveToward => "move_toward",
            Order::Claim => "claim",
            Order::Attack => "attack",
            Order::Build(Suit::Spade) => "build_spade",
            Order::Build(Suit::Heart) => "build_heart",
            Order::Build(Suit::Club) => "build_club",
            Order::Build(Suit::Diamond) => "build_diamond",
        }
    }

    pub fn required_subject(self) -> Option<ActionableKind> {
        match self {
            Order::MoveToward | Order::Claim | Order::Attack => Some(ActionableKind::Unit),
            Order::Build(_) => Some(ActionableKind::Location),
        }
    }

    pub fn required_target(self) -> Option<ActionableKind> {
        match self {
            Order::Attack => Some(ActionableKind::Unit),
            Order::MoveToward | Order::Claim | Order::Build(_) => None,
        }
    }

    pub fn applies_to(self, subject: Option<Actionable>, target: Option<Actionable>) -> bool {
        admits(self.required_subject(), subject) && admits(self.required_target(), target)
    }

    /// Carry out the order. Mismatched kinds and vanished participants make
    /// this a no-op; the return value says whether the world changed.
    pub fn execute(self, subject: Actionable, target: Actionable, ctx: &mut ExecContext<'_>) -> bool {
        if !self.applies_to(Some(subject), Some(target)) {
            return false;
        }
        if !subject.exists(ctx.world) {
            tracing::warn!(order = %self, %subject, "order dropped, subject no longer exists");
            return false;
        }
        match self {
            Order::MoveToward => move_toward(subject, target, ctx),
            Order::Claim => subject.as_unit().is_some_and(|unit| ctx.world.claim(unit)),
            Order::Attack => attack(subject, target, ctx.world),
            Order::Build(suit) => build(subject, suit, ctx),
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Order> for String {
    fn from(order: Order) -> Self {
        order.as_str().to_string()
    }
}

impl TryFrom<String> for Order {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Order::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| format!("unknown Order: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

fn move_toward(subject: Actionable, target: Actionable, ctx: &mut ExecContext<'_>) -> bool {
    let Some(unit) = subject.as_unit().and_then(|id| ctx.world.units.get(&id)).cloned() else {
        return false;
    };
    let Some(goal) = target.location(ctx.world) else {
        return false;
    };
    let board = &ctx.world.board;
    let here = ctx.distances.between(board, unit.location, goal).unwrap_or(u32::MAX);

    let mut best: Option<(crate::board::Direction, u32)> = None;
    for &direction in board.movement().allowed_directions() {
        let Some(next) = board.neighbor(unit.location, direction) else {
            continue;
        };
        let hostile = ctx
            .world
            .occupant_of(next)
            .and_then(|id| ctx.world.units.get(&id))
            .is_some_and(|other| other.faction != unit.faction);
        if hostile && next != goal {
            continue;
        }
        let distance = ctx.distances.between(board, next, goal).unwrap_or(u32::MAX);
        if best.is_none_or(|(_, shortest)| distance < shortest) {
            best = Some((direction, distance));
        }
    }

    let Some((direction, distance)) = best else {
        return false;
    };
    if distance >= here {
        return false;
    }
    let occupant = board
        .neighbor(unit.location, direction)
        .and_then(|next| ctx.world.occupant_of(next))
        .and_then(|id| ctx.world.units.get(&id))
        .map(|other| other.faction == unit.faction);
    match occupant {
        Some(true) => ctx.world.merge(unit.id, direction),
        Some(false) => ctx.world.attack(unit.id, direction).is_some(),
        None => ctx.world.move_unit(unit.id, direction),
    }
}

fn attack(subject: Actionable, target: Actionable, world: &mut World) -> bool {
    if !subject.is_adjacent_to(target, world) {
        return false;
    }
    let (Some(from), Some(to), Some(unit)) =
        (subject.location(world), target.location(world), subject.as_unit())
    else {
        return false;
    };
    let Some(direction) = world.board.direction_between(from, to) else {
        return false;
    };
    world.attack(unit, direction).is_some()
}

fn build(subject: Actionable, suit: Suit, ctx: &mut ExecContext<'_>) -> bool {
    let Some(location) = subject.as_location() else {
        return false;
    };
    let Some(owner) = ctx.world.owner_of(location) else {
        return false;
    };
    if ctx.world.territory(owner) <= ctx.world.troops(owner) {
        return false;
    }
    ctx.world
        .schedule_production(location, suit, ctx.rng, ctx.production)
        .is_some()
}
