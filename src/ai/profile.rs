//! Profiles: the utility ("convenience") functions that define a faction's
//! decision-making style.
//!
//! A profile is plain data so alternative styles can be loaded from JSON.
//! Stat utilities are linear weightings of one measured stat across the
//! factions of a snapshot; order utilities pick one of a fixed set of scoring
//! rules with tunable constants.

use serde::{Deserialize, Serialize};

use super::order::Order;
use super::stat::Stat;
use super::world_state::WorldState;
use crate::board::Distances;
use crate::error::{AiError, ConfigError};
use crate::id::FactionId;
use crate::model::{Actionable, STANDARD_PROFILE, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub stats: Vec<StatRule>,
    pub orders: Vec<OrderRule>,
}

/// Utility of `stat` for a faction: `own × measure(self) + rivals ×
/// measure(other)` summed over every faction of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRule {
    pub stat: Stat,
    /// The stat actually read. Usually `stat` itself.
    pub measure: Stat,
    pub own: f64,
    pub rivals: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderRule {
    pub order: Order,
    pub utility: OrderUtility,
}

/// Scoring rules for orders. Every rule except `Build` scores
/// `-infinity` while the subject's faction has no troops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum OrderUtility {
    /// Zero on the target, `per_step × distance` elsewhere.
    Approach { per_step: f64 },
    /// `favorable` when the target unit is weak against the subject's suit,
    /// `unfavorable` otherwise.
    Strike { favorable: f64, unfavorable: f64 },
    /// `-infinity` for a target the faction already owns; zero on the target
    /// or while the faction has no territory; `per_step × distance` otherwise.
    Claim { per_step: f64 },
    /// Zero while the faction is under its troop cap and the site is free,
    /// `-infinity` otherwise.
    Build,
}

impl Profile {
    /// The default policy: territory is strongly good for oneself and mildly
    /// bad in rival hands, troops cost a little at home and a lot abroad, and
    /// each suit's troops are penalized through the suit weak against it.
    pub fn standard() -> Self {
        let mut stats = vec![
            StatRule {
                stat: Stat::Territory,
                measure: Stat::Territory,
                own: 5.0,
                rivals: -1.0,
            },
            StatRule {
                stat: Stat::Troops,
                measure: Stat::Troops,
                own: -1.0,
                rivals: -8.0,
            },
        ];
        for stat in Stat::ALL {
            if let Stat::SuitTroops(suit) = stat {
                stats.push(StatRule {
                    stat,
                    measure: Stat::SuitTroops(suit.beats()),
                    own: 0.0,
                    rivals: -1.0,
                });
            }
        }

        let mut orders = vec![
            OrderRule {
                order: Order::MoveToward,
                utility: OrderUtility::Approach { per_step: -10.0 },
            },
            OrderRule {
                order: Order::Attack,
                utility: OrderUtility::Strike {
                    favorable: 0.0,
                    unfavorable: -2.0,
                },
            },
            OrderRule {
                order: Order::Claim,
                utility: OrderUtility::Claim { per_step: -2.0 },
            },
        ];
        for order in Order::ALL {
            if let Order::Build(_) = order {
                orders.push(OrderRule {
                    order,
                    utility: OrderUtility::Build,
                });
            }
        }

        Self {
            name: STANDARD_PROFILE.to_string(),
            stats,
            orders,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn stat_rule(&self, stat: Stat) -> Result<&StatRule, AiError> {
        self.stats
            .iter()
            .find(|r| r.stat == stat)
            .ok_or(AiError::MissingStatUtility(stat))
    }

    pub fn order_rule(&self, order: Order) -> Result<&OrderRule, AiError> {
        self.orders
            .iter()
            .find(|r| r.order == order)
            .ok_or(AiError::MissingOrderUtility(order))
    }

    /// How good `stat`'s current values in `state` are for `faction`.
    pub fn utility_of_stat(
        &self,
        faction: FactionId,
        stat: Stat,
        state: &WorldState,
    ) -> Result<f64, AiError> {
        let rule = self.stat_rule(stat)?;
        let mut total = 0.0;
        for other in state.factions() {
            let weight = if other == faction { rule.own } else { rule.rivals };
            if weight != 0.0 {
                total += weight * state.stat(other, rule.measure)? as f64;
            }
        }
        Ok(total)
    }

    /// Aggregate score of a snapshot: every stat's utility for every faction
    /// it contains, summed.
    pub fn utility_of_state(&self, state: &WorldState, stats: &[Stat]) -> Result<f64, AiError> {
        let mut total = 0.0;
        for faction in state.factions() {
            for &stat in stats {
                total += self.utility_of_stat(faction, stat, state)?;
            }
        }
        Ok(total)
    }

    /// How good issuing `order` for this pairing is right now.
    pub fn utility_of_order(
        &self,
        subject: Actionable,
        order: Order,
        target: Actionable,
        state: &WorldState,
        world: &World,
        distances: &mut Distances,
    ) -> Result<f64, AiError> {
        let rule = self.order_rule(order)?;
        let Some(faction) = subject.faction(world) else {
            return Ok(f64::NEG_INFINITY);
        };
        let troops = state.stat(faction, Stat::Troops)?;

        let utility = match rule.utility {
            OrderUtility::Approach { per_step } => {
                if troops <= 0 {
                    return Ok(f64::NEG_INFINITY);
                }
                match subject.distance_to(target, world, distances) {
                    None => f64::NEG_INFINITY,
                    Some(0) => 0.0,
                    Some(steps) => per_step * f64::from(steps),
                }
            }
            OrderUtility::Strike {
                favorable,
                unfavorable,
            } => {
                if troops <= 0 {
                    return Ok(f64::NEG_INFINITY);
                }
                let suit_of = |a: Actionable| {
                    a.as_unit()
                        .and_then(|id| world.units.get(&id))
                        .map(|u| u.suit)
                };
                match (suit_of(subject), suit_of(target)) {
                    (Some(ours), Some(theirs)) if theirs.is_weak_against(ours) => favorable,
                    (Some(_), Some(_)) => unfavorable,
                    _ => f64::NEG_INFINITY,
                }
            }
            OrderUtility::Claim { per_step } => {
                if troops <= 0 || target.faction(world) == Some(faction) {
                    return Ok(f64::NEG_INFINITY);
                }
                let territory = state.stat(faction, Stat::Territory)?;
                match subject.distance_to(target, world, distances) {
                    Some(0) => 0.0,
                    _ if territory == 0 => 0.0,
                    None => f64::NEG_INFINITY,
                    Some(steps) => per_step * f64::from(steps),
                }
            }
            OrderUtility::Build => {
                let territory = state.stat(faction, Stat::Territory)?;
                let occupied = subject
                    .as_location()
                    .is_some_and(|l| world.occupant_of(l).is_some());
                if troops < territory && !occupied {
                    0.0
                } else {
                    f64::NEG_INFINITY
                }
            }
        };
        Ok(utility)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::stat::StatCache;
    use crate::board::{Coord, Movement};
    use crate::id::LocationId;
    use crate::model::Suit;

    struct Fixture {
        world: World,
        red: FactionId,
        blue: FactionId,
        distances: Distances,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new(6, 6, false, Movement::Orthogonal);
            let red = world.add_faction("red");
            let blue = world.add_faction("blue");
            Self {
                world,
                red,
                blue,
                distances: Distances::new(),
            }
        }

        fn at(&self, x: i32, y: i32) -> LocationId {
            self.world.board.location_at(Coord::new(x, y)).unwrap()
        }

        fn state(&self) -> WorldState {
            WorldState::capture(&self.world, &Stat::ALL, &mut StatCache::new())
        }

        fn score(&mut self, subject: impl Into<Actionable>, order: Order, target: impl Into<Actionable>) -> f64 {
            let state = self.state();
            Profile::standard()
                .utility_of_order(
                    subject.into(),
                    order,
                    target.into(),
                    &state,
                    &self.world,
                    &mut self.distances,
                )
                .unwrap()
        }
    }

    #[test]
    fn standard_profile_covers_every_stat_and_order() {
        let profile = Profile::standard();
        for stat in Stat::ALL {
            assert!(profile.stat_rule(stat).is_ok(), "{stat}");
        }
        for order in Order::ALL {
            assert!(profile.order_rule(order).is_ok(), "{order}");
        }
    }

    #[test]
    fn missing_rules_are_errors() {
        let profile = Profile {
            name: "empty".to_string(),
            stats: Vec::new(),
            orders: Vec::new(),
        };
        let fx = Fixture::new();
        let state = fx.state();
        assert_eq!(
            profile.utility_of_stat(fx.red, Stat::Troops, &state),
            Err(AiError::MissingStatUtility(Stat::Troops))
        );
        assert_eq!(
            profile.order_rule(Order::Claim).map(|_| ()),
            Err(AiError::MissingOrderUtility(Order::Claim))
        );
    }

    #[test]
    fn stat_utilities_weigh_self_against_rivals() {
        let mut fx = Fixture::new();
        fx.world.set_owner(fx.at(0, 0), Some(fx.red));
        fx.world.set_owner(fx.at(0, 1), Some(fx.red));
        fx.world.set_owner(fx.at(5, 5), Some(fx.blue));
        fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Spade, 2);
        fx.world.spawn_unit(fx.blue, fx.at(5, 5), Suit::Heart, 3);
        let state = fx.state();
        let profile = Profile::standard();

        assert_eq!(profile.utility_of_stat(fx.red, Stat::Territory, &state), Ok(10.0 - 1.0));
        assert_eq!(profile.utility_of_stat(fx.red, Stat::Troops, &state), Ok(-2.0 - 24.0));
        // Spade troops are judged through the rivals' hearts.
        assert_eq!(
            profile.utility_of_stat(fx.red, Stat::SuitTroops(Suit::Spade), &state),
            Ok(-3.0)
        );
        assert_eq!(
            profile.utility_of_stat(fx.red, Stat::SuitTroops(Suit::Heart), &state),
            Ok(0.0)
        );
    }

    #[test]
    fn state_utility_sums_every_faction_and_stat() {
        let mut fx = Fixture::new();
        fx.world.set_owner(fx.at(0, 0), Some(fx.red));
        let state = fx.state();
        let profile = Profile::standard();
        // Red sees +5 for its location, blue sees -1 for red's.
        assert_eq!(profile.utility_of_state(&state, &Stat::ALL), Ok(4.0));
    }

    #[test]
    fn approach_degrades_with_distance() {
        let mut fx = Fixture::new();
        let u = fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Spade, 2).unwrap();
        let near = fx.at(0, 0);
        let far = fx.at(3, 0);
        assert_eq!(fx.score(u, Order::MoveToward, near), 0.0);
        assert_eq!(fx.score(u, Order::MoveToward, far), -30.0);
    }

    #[test]
    fn unit_orders_are_infeasible_without_troops() {
        let mut fx = Fixture::new();
        let u = fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Spade, 0).unwrap();
        let enemy = fx.world.spawn_unit(fx.blue, fx.at(1, 0), Suit::Heart, 3).unwrap();
        let cell = fx.at(0, 0);
        assert_eq!(fx.score(u, Order::MoveToward, cell), f64::NEG_INFINITY);
        assert_eq!(fx.score(u, Order::Claim, cell), f64::NEG_INFINITY);
        assert_eq!(fx.score(u, Order::Attack, enemy), f64::NEG_INFINITY);
    }

    #[test]
    fn strike_prefers_weak_targets() {
        let mut fx = Fixture::new();
        let u = fx.world.spawn_unit(fx.red, fx.at(0, 0), Suit::Spade, 2).unwrap();
        let heart = fx.world.spawn_unit(fx.blue, fx.at(1, 0), Suit::Heart, 3).unwrap();
        let club = fx.world.spawn_unit(fx.blue, fx.at(0, 1), Suit::Club, 3).unwrap();
        assert_eq!(fx.score(u, Order::Attack, heart), 0.0);
        assert_eq!(fx.score(u, Order::Attack, club), -2.0);
    }

    #[test]
    fn claim_utility() {
        let mut fx = Fixture::new();
        let home = fx.at(0, 0);
        fx.world.set_owner(home, Some(fx.red));
        let u = fx.world.spawn_unit(fx.red, home, Suit::Spade, 2).unwrap();
        let far = fx.at(0, 4);
        assert_eq!(fx.score(u, Order::Claim, home), f64::NEG_INFINITY);
        assert_eq!(fx.score(u, Order::Claim, far), -8.0);

        fx.world.set_owner(home, None);
        assert_eq!(fx.score(u, Order::Claim, far), 0.0);
    }

    #[test]
    fn build_stops_at_the_troop_cap_and_on_occupied_sites() {
        let mut fx = Fixture::new();
        let a = fx.at(0, 0);
        let b = fx.at(0, 1);
        fx.world.set_owner(a, Some(fx.red));
        fx.world.set_owner(b, Some(fx.red));
        let target = fx.at(0, 2);
        assert_eq!(fx.score(a, Order::Build(Suit::Club), target), 0.0);

        fx.world.spawn_unit(fx.red, a, Suit::Club, 1).unwrap();
        assert_eq!(fx.score(a, Order::Build(Suit::Club), target), f64::NEG_INFINITY);
        assert_eq!(fx.score(b, Order::Build(Suit::Diamond), target), 0.0);

        fx.world.spawn_unit(fx.red, fx.at(5, 5), Suit::Club, 1).unwrap();
        assert_eq!(fx.score(b, Order::Build(Suit::Diamond), target), f64::NEG_INFINITY);
    }

    #[test]
    fn profiles_load_from_json() {
        let text = serde_json::to_string(&Profile::standard()).unwrap();
        let loaded = Profile::from_json(&text).unwrap();
        assert_eq!(loaded, Profile::standard());

        let custom = Profile::from_json(
            r#"{
                "name": "turtle",
                "stats": [{ "stat": "territory", "measure": "territory", "own": 1.0, "rivals": 0.0 }],
                "orders": [{ "order": "build_club", "utility": { "rule": "build" } }]
            }"#,
        )
        .unwrap();
        assert_eq!(custom.name, "turtle");
        assert_eq!(custom.orders[0].order, Order::Build(Suit::Club));
    }
}
