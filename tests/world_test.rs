//! Simulation loop validation
//!
//! Drives `SimWorld` tick by tick and checks that lights, congestion, routing
//! and movement stay consistent.

use std::collections::HashMap;

use smart_traffic::simulation::{
    build_demo_world, build_grid_world, spawn_random_trips, IntersectionId, OccupancyFeed,
    RandomCongestionFeed, SignalState, SimConfig, SimWorld, StaticFeed, TrafficError, VehicleId,
};

fn id(name: &str) -> IntersectionId {
    IntersectionId::from(name)
}

fn no_observations() -> HashMap<IntersectionId, u64> {
    HashMap::new()
}

fn free_flow_config() -> SimConfig {
    SimConfig {
        respect_signals: false,
        ..SimConfig::default()
    }
}

/// S->X->T is cheap, S->Y->T is the detour
fn detour_world(config: SimConfig) -> SimWorld {
    let mut world = SimWorld::new(config);
    for name in ["S", "X", "Y", "T"] {
        world.add_intersection(name);
    }
    world.add_road(&id("S"), &id("X"), 1).unwrap();
    world.add_road(&id("X"), &id("T"), 1).unwrap();
    world.add_road(&id("S"), &id("Y"), 5).unwrap();
    world.add_road(&id("Y"), &id("T"), 5).unwrap();
    world
}

#[test]
fn test_demo_vehicle_gets_cheapest_route() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();
    let vehicle_id = world.spawn_vehicle(&id("A"), &id("C")).unwrap();

    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.route(), &[id("A"), id("B"), id("C")]);
    assert!(!vehicle.is_stale());
}

#[test]
fn test_vehicle_waits_for_green() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();
    let vehicle_id = world.spawn_vehicle(&id("A"), &id("C")).unwrap();

    for tick in 1..=9 {
        let report = world.tick(&no_observations());
        assert_eq!(report.tick, tick);
        assert_eq!(report.held, vec![vehicle_id]);
        assert_eq!(world.signal_state(&id("A")), Some(SignalState::Red));
    }
    assert_eq!(world.vehicle(vehicle_id).unwrap().current, id("A"));

    // Lights turn green before vehicles move in the same tick
    let report = world.tick(&no_observations());
    assert_eq!(report.signal_transitions, 3);
    assert!(report.held.is_empty());
    assert_eq!(world.signal_state(&id("A")), Some(SignalState::Green));
    assert_eq!(world.vehicle(vehicle_id).unwrap().current, id("B"));

    let report = world.tick(&no_observations());
    assert_eq!(report.arrived, vec![vehicle_id]);
    assert!(world.vehicle(vehicle_id).is_none());
    assert_eq!(world.stats().vehicles_arrived, 1);
}

#[test]
fn test_vehicle_moves_one_hop_per_tick_without_signals() {
    let mut world = build_demo_world(free_flow_config()).unwrap();
    let vehicle_id = world.spawn_vehicle(&id("A"), &id("C")).unwrap();

    world.tick(&no_observations());
    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.current, id("B"));
    assert_eq!(vehicle.route(), &[id("B"), id("C")]);
    assert_eq!(vehicle.hops, 1);

    let report = world.tick(&no_observations());
    assert_eq!(report.arrived, vec![vehicle_id]);
    assert_eq!(world.vehicle_count(), 0);
}

#[test]
fn test_every_light_advances_once_per_tick() {
    let mut world = build_grid_world(3, 1, SimConfig::default()).unwrap();

    for _ in 0..25 {
        world.tick(&no_observations());
    }

    for (_, light) in world.lights() {
        assert_eq!(light.state(), SignalState::Red);
        assert_eq!(light.counter(), 0);
    }
    assert_eq!(world.lights().count(), 9);
    assert_eq!(world.stats().signal_transitions, 9 * 3);
}

#[test]
fn test_congestion_threshold_triggers_reroute() {
    let config = SimConfig {
        respect_signals: false,
        congestion_penalty: 1,
        ..SimConfig::default()
    };
    let mut world = detour_world(config);
    let vehicle_id = world.spawn_vehicle(&id("S"), &id("T")).unwrap();
    assert_eq!(
        world.vehicle(vehicle_id).unwrap().route(),
        &[id("S"), id("X"), id("T")]
    );

    let mut feed = StaticFeed::new().at(1, "X", 10);
    let reports = world.run(1, &mut feed);

    assert_eq!(reports[0].rerouted, vec![vehicle_id]);
    assert_eq!(reports[0].most_congested[0], (id("X"), 10));
    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.current, id("Y"));
    assert_eq!(vehicle.route(), &[id("Y"), id("T")]);
}

#[test]
fn test_congestion_blind_routing_keeps_route() {
    let mut world = detour_world(free_flow_config());
    let vehicle_id = world.spawn_vehicle(&id("S"), &id("T")).unwrap();

    let mut feed = StaticFeed::new().at(1, "X", 10);
    let reports = world.run(1, &mut feed);

    // Re-routed because of the threshold, but the cheapest route is unchanged
    assert_eq!(reports[0].rerouted, vec![vehicle_id]);
    assert_eq!(world.vehicle(vehicle_id).unwrap().current, id("X"));
}

#[test]
fn test_staying_above_threshold_does_not_reroute_again() {
    // Lights stay red for the first ticks, so X remains ahead of the vehicle
    let mut world = detour_world(SimConfig::default());
    let vehicle_id = world.spawn_vehicle(&id("S"), &id("T")).unwrap();

    let mut feed = StaticFeed::new()
        .at(1, "X", 9)
        .at(2, "X", 10)
        .at(3, "X", 2)
        .at(4, "X", 9);
    let reports = world.run(4, &mut feed);

    assert_eq!(reports[0].rerouted, vec![vehicle_id]);
    assert!(reports[1].rerouted.is_empty());
    assert!(reports[2].rerouted.is_empty());
    // Dropping below and rising again is a new crossing
    assert_eq!(reports[3].rerouted, vec![vehicle_id]);

    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.current, id("S"));
    assert_eq!(vehicle.route(), &[id("S"), id("X"), id("T")]);
}

#[test]
fn test_unreachable_vehicle_does_not_stop_others() {
    let mut world = SimWorld::new(free_flow_config());
    for name in ["A", "B", "C"] {
        world.add_intersection(name);
    }
    world.add_road(&id("A"), &id("B"), 1).unwrap();

    let reachable = world.spawn_vehicle(&id("A"), &id("B")).unwrap();
    let stranded = world.spawn_vehicle(&id("A"), &id("C")).unwrap();
    assert!(world.vehicle(stranded).unwrap().route().is_empty());

    let report = world.tick(&no_observations());

    assert_eq!(report.unreachable, vec![stranded]);
    assert_eq!(report.arrived, vec![reachable]);
    let vehicle = world.vehicle(stranded).unwrap();
    assert_eq!(vehicle.current, id("A"));
    assert!(vehicle.route().is_empty());
    assert!(vehicle.is_stale());
}

#[test]
fn test_new_destination_is_routed_next_tick() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();
    let vehicle_id = world.spawn_vehicle(&id("A"), &id("B")).unwrap();

    world.set_destination(vehicle_id, &id("C")).unwrap();
    assert!(world.vehicle(vehicle_id).unwrap().is_stale());

    let report = world.tick(&no_observations());

    assert_eq!(report.rerouted, vec![vehicle_id]);
    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.destination, id("C"));
    assert_eq!(vehicle.route(), &[id("A"), id("B"), id("C")]);
}

#[test]
fn test_trip_errors() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();

    assert_eq!(
        world.spawn_vehicle(&id("A"), &id("Q")),
        Err(TrafficError::UnknownIntersection(id("Q")))
    );
    assert_eq!(
        world.set_destination(VehicleId(99), &id("C")),
        Err(TrafficError::UnknownVehicle(VehicleId(99)))
    );

    let vehicle_id = world.spawn_vehicle(&id("A"), &id("C")).unwrap();
    assert_eq!(
        world.set_destination(vehicle_id, &id("Q")),
        Err(TrafficError::UnknownIntersection(id("Q")))
    );
    assert_eq!(world.stats().vehicles_spawned, 1);
}

#[test]
fn test_observations_are_capped_and_unknown_ids_ignored() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();

    let observations: HashMap<IntersectionId, u64> =
        [(id("A"), 500), (id("B"), 4), (id("ghost"), 50)].into_iter().collect();
    let report = world.tick(&observations);

    assert_eq!(report.most_congested, vec![(id("A"), 10), (id("B"), 4)]);
    assert_eq!(world.congestion().level(&id("ghost")), 0);
    assert_eq!(world.congestion().len(), 2);
}

#[test]
fn test_occupancy_feed_counts_vehicles() {
    let mut world = build_demo_world(SimConfig::default()).unwrap();
    world.spawn_vehicle(&id("A"), &id("C")).unwrap();
    world.spawn_vehicle(&id("A"), &id("B")).unwrap();

    world.run(1, &mut OccupancyFeed);

    assert_eq!(world.most_congested(1), vec![(id("A"), 2)]);
    assert_eq!(world.congestion().level(&id("B")), 0);
}

#[test]
fn test_grid_simulation_is_reproducible() {
    let run = |seed: u64| {
        let mut world = build_grid_world(4, seed, SimConfig::default()).unwrap();
        spawn_random_trips(&mut world, 6, seed).unwrap();
        let mut feed = RandomCongestionFeed::new_with_seed(10, seed);
        let reports = world.run(60, &mut feed);
        (reports, world.stats().clone())
    };

    let (first_reports, first_stats) = run(3);
    let (second_reports, second_stats) = run(3);

    assert_eq!(first_reports, second_reports);
    assert_eq!(first_stats, second_stats);
    assert_eq!(first_stats.vehicles_spawned, 6);
}

#[test]
fn test_grid_trips_eventually_arrive() {
    let config = SimConfig {
        respect_signals: false,
        reroute_threshold: 0,
        ..SimConfig::default()
    };
    let mut world = build_grid_world(4, 11, config).unwrap();
    spawn_random_trips(&mut world, 10, 11).unwrap();

    // A 4x4 grid route has at most 15 hops
    for _ in 0..15 {
        world.tick(&no_observations());
    }

    assert_eq!(world.vehicle_count(), 0);
    assert_eq!(world.stats().vehicles_arrived, 10);
    assert_eq!(world.stats().reroutes, 0);
}
