//! Actions: planning-time intents pairing a projected consequence with the
//! order that realizes them.

use serde::{Deserialize, Serialize};

use super::combat;
use super::order::{Order, admits};
use super::stat::Stat;
use super::world_state::WorldState;
use crate::error::AiError;
use crate::id::FactionId;
use crate::model::{Actionable, ActionableKind, Suit, Unit, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Take a location, walking there first if needed.
    Claim,
    /// Fight a unit presumed to be of the given suit.
    Attack(Suit),
    /// Produce a unit of the given suit.
    Build(Suit),
}

/// Participants of one action evaluation. Absent participants mean the
/// action is being explored abstractly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInfo {
    pub subject_faction: FactionId,
    pub target_faction: Option<FactionId>,
    pub subject: Option<Actionable>,
    pub target: Option<Actionable>,
}

impl ActionInfo {
    /// An abstract evaluation against a whole faction.
    pub fn abstract_against(subject_faction: FactionId, target_faction: Option<FactionId>) -> Self {
        Self {
            subject_faction,
            target_faction,
            subject: None,
            target: None,
        }
    }
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Claim,
        Action::Attack(Suit::Spade),
        Action::Attack(Suit::Heart),
        Action::Attack(Suit::Club),
        Action::Attack(Suit::Diamond),
        Action::Build(Suit::Spade),
        Action::Build(Suit::Heart),
        Action::Build(Suit::Club),
        Action::Build(Suit::Diamond),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Claim => "claim",
            Action::Attack(Suit::Spade) => "attack_spade",
            Action::Attack(Suit::Heart) => "attack_heart",
            Action::Attack(Suit::Club) => "attack_club",
            Action::Attack(Suit::Diamond) => "attack_diamond",
            Action::Build(Suit::Spade) => "build_spade",
            Action::Build(Suit::Heart) => "build_heart",
            Action::Build(Suit::Club) => "build_club",
            Action::Build(Suit::Diamond) => "build_diamond",
        }
    }

    pub fn required_subject(self) -> Option<ActionableKind> {
        match self {
            Action::Claim | Action::Attack(_) => Some(ActionableKind::Unit),
            Action::Build(_) => Some(ActionableKind::Location),
        }
    }

    pub fn required_target(self) -> Option<ActionableKind> {
        match self {
            Action::Claim => Some(ActionableKind::Location),
            Action::Attack(_) => Some(ActionableKind::Unit),
            Action::Build(_) => None,
        }
    }

    pub fn applies_to(self, info: &ActionInfo) -> bool {
        admits(self.required_subject(), info.subject) && admits(self.required_target(), info.target)
    }

    /// Write the projected effect of this action into `state`. A no-op when
    /// the participants' kinds do not fit.
    pub fn apply_consequences(
        self,
        info: &ActionInfo,
        state: &mut WorldState,
        world: &World,
    ) -> Result<(), AiError> {
        if !self.applies_to(info) {
            return Ok(());
        }
        match self {
            Action::Claim => project_claim(info, state),
            Action::Attack(suit) => project_attack(info, suit, state, world),
            Action::Build(suit) => {
                state.adjust(info.subject_faction, Stat::Troops, 1)?;
                state.adjust(info.subject_faction, Stat::SuitTroops(suit), 1)
            }
        }
    }

    /// The order that carries this action out for a concrete pairing.
    ///
    /// Callers must only ask for pairings whose kinds fit; anything else is
    /// reported as [`AiError::KindMismatch`].
    pub fn order_for(self, info: &ActionInfo, world: &World) -> Result<Order, AiError> {
        if !self.applies_to(info) {
            return Err(AiError::KindMismatch {
                action: self.as_str(),
                subject: info.subject,
                target: info.target,
            });
        }
        let order = match self {
            Action::Claim => match (info.subject, info.target) {
                (Some(subject), Some(target))
                    if subject.location(world) != target.location(world) =>
                {
                    Order::MoveToward
                }
                _ => Order::Claim,
            },
            Action::Attack(_) => match (info.subject, info.target) {
                (Some(subject), Some(target)) if !subject.is_adjacent_to(target, world) => {
                    Order::MoveToward
                }
                _ => Order::Attack,
            },
            Action::Build(suit) => Order::Build(suit),
        };
        Ok(order)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn project_claim(info: &ActionInfo, state: &mut WorldState) -> Result<(), AiError> {
    let claimer = info.subject_faction;
    let Some(location) = info.target.and_then(Actionable::as_location) else {
        // Nothing known about the target: assume a fresh location is won.
        return state.adjust(claimer, Stat::Territory, 1);
    };

    if !state.location_claims.contains_key(&location) {
        return Err(AiError::UnknownLocation(location));
    }
    let previous = state.owner_of(location);
    if previous != Some(claimer) {
        if let Some(previous) = previous {
            state.adjust(previous, Stat::Territory, -1)?;
        }
        state.adjust(claimer, Stat::Territory, 1)?;
    }
    state.record_claim(location, claimer);
    if let Some(unit) = info.subject.and_then(Actionable::as_unit) {
        state.unit_positions.insert(unit, location);
    }
    Ok(())
}

fn project_attack(
    info: &ActionInfo,
    suit: Suit,
    state: &mut WorldState,
    world: &World,
) -> Result<(), AiError> {
    let attacker_suit = live_unit(info.subject, world)?.map(|u| u.suit);
    let target_unit = live_unit(info.target, world)?;
    let defender_suit = target_unit.map_or(suit, |u| u.suit);

    let losses = combat::resolve(attacker_suit, defender_suit);
    let attacker_losses = -i64::from(losses.attacker);
    let defender_losses = -i64::from(losses.defender);

    state.adjust(info.subject_faction, Stat::Troops, attacker_losses)?;
    if let Some(attacker_suit) = attacker_suit {
        state.adjust(info.subject_faction, Stat::SuitTroops(attacker_suit), attacker_losses)?;
    }
    if let Some(defender) = info.target_faction {
        state.adjust(defender, Stat::Troops, defender_losses)?;
        state.adjust(defender, Stat::SuitTroops(defender_suit), defender_losses)?;
    }

    if let (Some(unit), Some(target)) = (info.subject.and_then(Actionable::as_unit), target_unit) {
        state.unit_positions.insert(unit, target.location);
    }
    Ok(())
}

/// The unit behind a participant, if it is one. A unit participant missing
/// from the world means the pairing was built against stale data.
fn live_unit(participant: Option<Actionable>, world: &World) -> Result<Option<&Unit>, AiError> {
    participant
        .and_then(Actionable::as_unit)
        .map(|id| world.units.get(&id).ok_or(AiError::UnknownUnit(id)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::stat::StatCache;
    use crate::board::{Coord, Movement};
    use crate::id::LocationId;

    struct Fixture {
        world: World,
        red: FactionId,
        blue: FactionId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new(5, 5, false, Movement::Orthogonal);
            let red = world.add_faction("red");
            let blue = world.add_faction("blue");
            Self { world, red, blue }
        }

        fn at(&self, x: i32, y: i32) -> LocationId {
            self.world.board.location_at(Coord::new(x, y)).unwrap()
        }

        fn state(&self) -> WorldState {
            WorldState::capture(&self.world, &Stat::ALL, &mut StatCache::new())
        }
    }

    #[test]
    fn consequences_touch_only_the_clone() {
        let mut fx = Fixture::new();
        let home = fx.at(0, 0);
        fx.world.set_owner(home, Some(fx.red));
        fx.world.spawn_unit(fx.blue, fx.at(4, 4), Suit::Heart, 4);
        let original = fx.state();

        for action in Action::ALL {
            let mut clone = original.clone();
            let info = ActionInfo::abstract_against(fx.red, Some(fx.blue));
            action.apply_consequences(&info, &mut clone, &fx.world).unwrap();
            assert_ne!(clone, original, "{action} projected nothing");
        }
        assert_eq!(original, fx.state());
    }

    #[test]
    fn abstract_attack_assumes_the_defender_loses_two() {
        let mut fx = Fixture::new();
        fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Spade, 3);
        fx.world.spawn_unit(fx.blue, fx.at(4, 4), Suit::Club, 5);
        let mut state = fx.state();
        let info = ActionInfo::abstract_against(fx.red, Some(fx.blue));
        Action::Attack(Suit::Club)
            .apply_consequences(&info, &mut state, &fx.world)
            .unwrap();
        assert_eq!(state.stat(fx.red, Stat::Troops), Ok(2));
        assert_eq!(state.stat(fx.red, Stat::SuitTroops(Suit::Spade)), Ok(3));
        assert_eq!(state.stat(fx.blue, Stat::Troops), Ok(3));
        assert_eq!(state.stat(fx.blue, Stat::SuitTroops(Suit::Club)), Ok(3));
    }

    #[test]
    fn concrete_attack_follows_the_combat_table_and_floors_at_zero() {
        let mut fx = Fixture::new();
        let a = fx.world.spawn_unit(fx.red, fx.at(1, 1), Suit::Heart, 1).unwrap();
        let b = fx.world.spawn_unit(fx.blue, fx.at(2, 1), Suit::Spade, 1).unwrap();
        let mut state = fx.state();
        let info = ActionInfo {
            subject_faction: fx.red,
            target_faction: Some(fx.blue),
            subject: Some(a.into()),
            target: Some(b.into()),
        };
        Action::Attack(Suit::Spade)
            .apply_consequences(&info, &mut state, &fx.world)
            .unwrap();
        assert_eq!(state.stat(fx.red, Stat::Troops), Ok(0));
        assert_eq!(state.stat(fx.red, Stat::SuitTroops(Suit::Heart)), Ok(0));
        assert_eq!(state.stat(fx.blue, Stat::Troops), Ok(0));
        assert_eq!(state.unit_positions[&a], fx.at(2, 1));
    }

    #[test]
    fn claim_moves_territory_between_factions() {
        let mut fx = Fixture::new();
        let contested = fx.at(2, 2);
        fx.world.set_owner(contested, Some(fx.blue));
        fx.world.set_owner(fx.at(3, 3), Some(fx.blue));
        let u = fx.world.spawn_unit(fx.red, fx.at(2, 1), Suit::Club, 2).unwrap();
        let mut state = fx.state();
        let info = ActionInfo {
            subject_faction: fx.red,
            target_faction: Some(fx.blue),
            subject: Some(u.into()),
            target: Some(contested.into()),
        };
        Action::Claim.apply_consequences(&info, &mut state, &fx.world).unwrap();
        assert_eq!(state.stat(fx.red, Stat::Territory), Ok(1));
        assert_eq!(state.stat(fx.blue, Stat::Territory), Ok(1));
        assert_eq!(state.owner_of(contested), Some(fx.red));
        assert_eq!(state.unit_positions[&u], contested);
    }

    #[test]
    fn each_build_grows_its_own_suit() {
        let fx = Fixture::new();
        for suit in Suit::ALL {
            let mut state = fx.state();
            let info = ActionInfo::abstract_against(fx.red, None);
            Action::Build(suit).apply_consequences(&info, &mut state, &fx.world).unwrap();
            assert_eq!(state.stat(fx.red, Stat::Troops), Ok(1));
            for other in Suit::ALL {
                let expected = i64::from(other == suit);
                assert_eq!(state.stat(fx.red, Stat::SuitTroops(other)), Ok(expected));
            }
        }
    }

    #[test]
    fn mismatched_consequences_are_ignored() {
        let mut fx = Fixture::new();
        let cell = fx.at(0, 0);
        let u = fx.world.spawn_unit(fx.red, cell, Suit::Club, 2).unwrap();
        let original = fx.state();
        let mut state = original.clone();
        let info = ActionInfo {
            subject_faction: fx.red,
            target_faction: None,
            subject: Some(u.into()),
            target: Some(cell.into()),
        };
        Action::Build(Suit::Spade)
            .apply_consequences(&info, &mut state, &fx.world)
            .unwrap();
        assert_eq!(state, original);
    }

    #[test]
    fn claim_picks_move_or_claim_by_position() {
        let mut fx = Fixture::new();
        let here = fx.at(1, 1);
        let there = fx.at(1, 2);
        let u = fx.world.spawn_unit(fx.red, here, Suit::Club, 2).unwrap();
        let info = |target: LocationId| ActionInfo {
            subject_faction: fx.red,
            target_faction: None,
            subject: Some(u.into()),
            target: Some(target.into()),
        };
        assert_eq!(Action::Claim.order_for(&info(here), &fx.world), Ok(Order::Claim));
        assert_eq!(Action::Claim.order_for(&info(there), &fx.world), Ok(Order::MoveToward));
    }

    #[test]
    fn attack_picks_attack_only_when_adjacent() {
        let mut fx = Fixture::new();
        let u = fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Club, 2).unwrap();
        let near = fx.world.spawn_unit(fx.blue, fx.at(1, 0), Suit::Club, 2).unwrap();
        let far = fx.world.spawn_unit(fx.blue, fx.at(3, 3), Suit::Club, 2).unwrap();
        let info = |target: crate::id::UnitId| ActionInfo {
            subject_faction: fx.red,
            target_faction: Some(fx.blue),
            subject: Some(u.into()),
            target: Some(target.into()),
        };
        let action = Action::Attack(Suit::Club);
        assert_eq!(action.order_for(&info(near), &fx.world), Ok(Order::Attack));
        assert_eq!(action.order_for(&info(far), &fx.world), Ok(Order::MoveToward));
    }

    #[test]
    fn order_for_a_mismatched_pairing_is_an_error() {
        let mut fx = Fixture::new();
        let cell = fx.at(0, 0);
        let u = fx.world.spawn_unit(fx.red, cell, Suit::Club, 2).unwrap();
        let info = ActionInfo {
            subject_faction: fx.red,
            target_faction: None,
            subject: Some(cell.into()),
            target: Some(u.into()),
        };
        let err = Action::Claim.order_for(&info, &fx.world).unwrap_err();
        assert!(matches!(err, AiError::KindMismatch { action: "claim", .. }));
    }

    #[test]
    fn projecting_onto_a_vanished_unit_is_an_error() {
        let mut fx = Fixture::new();
        let a = fx.world.spawn_unit(fx.red, fx.at(1, 1), Suit::Heart, 3).unwrap();
        let b = fx.world.spawn_unit(fx.blue, fx.at(2, 1), Suit::Spade, 3).unwrap();
        let mut state = fx.state();
        fx.world.destroy_unit(b);
        let info = ActionInfo {
            subject_faction: fx.red,
            target_faction: Some(fx.blue),
            subject: Some(a.into()),
            target: Some(b.into()),
        };
        assert_eq!(
            Action::Attack(Suit::Spade).apply_consequences(&info, &mut state, &fx.world),
            Err(AiError::UnknownUnit(b))
        );
    }
}
