mod common;

use std::collections::BTreeSet;

use architects::ai::{Action, Architect, Order, Registry, StatCache, WorldState};
use architects::board::Distances;
use architects::config::SimConfig;
use architects::model::{Actionable, ActionableKind, FactionNotice, Suit};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use architects::scenario::Scenario;

use common::{live, plan_for, ranking_for, run_seeded};

#[test]
fn unit_on_unclaimed_cell_claims_it() {
    let mut s = Scenario::new(3, 3);
    let f = s.add_faction("Red");
    s.claim(f, 0, 0);
    let cell = s.location(1, 0);
    let unit = s.add_unit(f, 1, 0, Suit::Spade);
    let world = s.build();

    let plan = plan_for(&world, f);
    assert_eq!(plan.len(), 1);
    let entry = plan[0];
    assert_eq!(entry.action, Action::Claim);
    assert_eq!(entry.order, Order::Claim);
    assert_eq!(entry.subject, Actionable::Unit(unit));
    assert_eq!(entry.target, Actionable::Location(cell));

    let app = run_seeded(world, 1, 1);
    let world = live(&app);
    assert_eq!(world.owner_of(cell), Some(f));
    assert_eq!(world.territory(f), 2);
}

#[test]
fn unit_walks_to_adjacent_cell_then_claims() {
    let mut s = Scenario::new(3, 1);
    let f = s.add_faction("Red");
    let home = s.claim(f, 0, 0);
    let next = s.location(1, 0);
    let unit = s.add_unit(f, 0, 0, Suit::Heart);
    let world = s.build();

    let plan = plan_for(&world, f);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].action, Action::Claim);
    assert_eq!(plan[0].order, Order::MoveToward);
    assert_eq!(plan[0].target, Actionable::Location(next));

    let app = run_seeded(world.clone(), 1, 1);
    let after_one = live(&app);
    assert_eq!(after_one.units[&unit].location, next);
    assert_eq!(after_one.owner_of(next), None);

    let app = run_seeded(world, 1, 2);
    let after_two = live(&app);
    assert_eq!(after_two.owner_of(home), Some(f));
    assert_eq!(after_two.owner_of(next), Some(f));
}

#[test]
fn troopless_faction_plans_only_builds() {
    let mut s = Scenario::new(4, 4);
    let f = s.add_faction("Red");
    s.claim_rect(f, (0, 0), (1, 1));
    s.add_unit_with(f, 0, 0, Suit::Club, |u| u.troops = 0);
    let world = s.build();

    for ranked in ranking_for(&world, f) {
        if ranked.action.required_subject() == Some(ActionableKind::Unit) {
            assert_eq!(ranked.score, f64::NEG_INFINITY, "{}", ranked.action);
            assert!(ranked.pairing.is_none());
        } else {
            assert!(ranked.score.is_finite(), "{}", ranked.action);
        }
    }

    let plan = plan_for(&world, f);
    assert_eq!(plan.len(), 4);
    for entry in &plan {
        assert!(matches!(entry.action, Action::Build(_)));
        assert!(matches!(entry.subject, Actionable::Location(_)));
    }
}

#[test]
fn no_unit_receives_two_orders() {
    let mut s = Scenario::corners(8, 8);
    let world = s.world_mut();
    let factions: Vec<_> = world.factions.keys().copied().collect();
    let extra = world.board.location_at((1, 1).into()).unwrap();
    world.spawn_unit(factions[3], extra, Suit::Club, 4).unwrap();
    let world = s.build();

    for faction in world.factions.keys() {
        let plan = plan_for(&world, *faction);
        let units: Vec<_> = plan.iter().filter_map(|p| p.subject.as_unit()).collect();
        let unique: BTreeSet<_> = units.iter().copied().collect();
        assert_eq!(units.len(), unique.len());
        assert!(!plan.is_empty());
    }
}

#[test]
fn plans_follow_ranking_order() {
    let world = Scenario::corners(8, 8).build();
    for faction in world.factions.keys() {
        let plan = plan_for(&world, *faction);
        for pair in plan.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn architect_strikes_an_adjacent_weak_unit() {
    let mut s = Scenario::new(6, 6);
    let red = s.add_faction("Red");
    let blue = s.add_faction("Blue");
    s.claim_rect(red, (0, 1), (1, 1));
    s.claim(blue, 5, 5);
    let ours = s.add_unit_with(red, 1, 1, Suit::Spade, |u| u.troops = 5);
    let theirs = s.add_unit_with(blue, 2, 1, Suit::Heart, |u| u.troops = 5);
    let mut world = s.build();

    let registry = Registry::standard();
    let snapshot = WorldState::capture(&world, registry.stats(), &mut StatCache::new());
    let mut distances = Distances::new();
    let mut rng = SmallRng::seed_from_u64(9);
    let mut architect = Architect::new(red);
    let report = architect
        .take_turn(
            &mut world,
            &snapshot,
            &registry,
            &mut distances,
            &mut rng,
            &SimConfig::default(),
        )
        .unwrap()
        .unwrap();

    assert_eq!((report.planned, report.executed), (1, 1));
    assert_eq!(world.units[&ours].troops, 4);
    assert_eq!(world.units[&theirs].troops, 3);
    assert_eq!(
        world.notices,
        vec![FactionNotice::AttackedBy {
            victim: blue,
            attacker: red,
        }]
    );
}

