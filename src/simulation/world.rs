//! Main simulation world that ties everything together
//!
//! The world owns the road network, one light per intersection, the
//! congestion tracker and the active vehicles. `tick` runs the four steps of a
//! simulated tick in a fixed order: lights, congestion, routing, movement.

use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::config::SimConfig;
use super::congestion::CongestionTracker;
use super::error::{TrafficError, TrafficResult};
use super::feed::CongestionFeed;
use super::intersection::SimIntersection;
use super::road_network::SimRoadNetwork;
use super::router::{shortest_path, BaseCost, CongestionAwareCost, Route};
use super::signal::{SignalState, TrafficLight};
use super::types::{IntersectionId, RoadId, VehicleId};
use super::vehicle::{SimVehicle, VehicleUpdateResult};

/// Running totals across the whole simulation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub vehicles_spawned: usize,
    pub vehicles_arrived: usize,
    pub reroutes: usize,
    pub routing_failures: usize,
    pub signal_transitions: usize,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub signal_transitions: usize,
    pub rerouted: Vec<VehicleId>,
    pub unreachable: Vec<VehicleId>,
    pub held: Vec<VehicleId>,
    pub arrived: Vec<VehicleId>,
    pub most_congested: Vec<(IntersectionId, u64)>,
}

/// The main simulation world
#[derive(Debug, Clone)]
pub struct SimWorld {
    /// Road network for pathfinding
    road_network: SimRoadNetwork,

    /// All intersections with their lights
    intersections: BTreeMap<IntersectionId, SimIntersection>,

    /// Vehicles still travelling
    vehicles: BTreeMap<VehicleId, SimVehicle>,

    congestion: CongestionTracker,

    config: SimConfig,

    /// Next ID to assign
    next_id: usize,

    /// Number of completed ticks
    tick: u64,

    stats: SimulationStats,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Compute a route with the pricing policy selected by the config
fn route_with_policy(
    network: &SimRoadNetwork,
    congestion: &CongestionTracker,
    config: &SimConfig,
    start: &IntersectionId,
    destination: &IntersectionId,
) -> TrafficResult<Route> {
    if config.congestion_penalty == 0 {
        shortest_path(network, start, destination, &BaseCost)
    } else {
        let policy = CongestionAwareCost::new(congestion, config.congestion_penalty);
        shortest_path(network, start, destination, &policy)
    }
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Self {
        Self {
            road_network: SimRoadNetwork::new(),
            intersections: BTreeMap::new(),
            vehicles: BTreeMap::new(),
            congestion: CongestionTracker::new(),
            config,
            next_id: 0,
            tick: 0,
            stats: SimulationStats::default(),
        }
    }

    /// Add an intersection (and its light) to the world
    pub fn add_intersection(&mut self, id: impl Into<IntersectionId>) -> IntersectionId {
        let id = id.into();
        let timing = self.config.signal_timing;
        self.road_network.add_intersection(id.clone());
        self.intersections
            .entry(id.clone())
            .or_insert_with(|| SimIntersection::new(id.clone(), timing));
        id
    }

    /// Add a one-way road between two intersections
    pub fn add_road(
        &mut self,
        from: &IntersectionId,
        to: &IntersectionId,
        weight: i64,
    ) -> TrafficResult<RoadId> {
        self.road_network.add_road(from, to, weight)
    }

    /// Add a two-way road between intersections (creates two logical roads)
    pub fn add_two_way_road(
        &mut self,
        a: &IntersectionId,
        b: &IntersectionId,
        weight: i64,
    ) -> TrafficResult<(RoadId, RoadId)> {
        self.road_network.add_two_way_road(a, b, weight)
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Start a trip between two intersections
    ///
    /// An unreachable destination is not an error: the vehicle is created
    /// with an empty route and routing is retried every tick.
    pub fn spawn_vehicle(
        &mut self,
        from: &IntersectionId,
        to: &IntersectionId,
    ) -> TrafficResult<VehicleId> {
        for id in [from, to] {
            if !self.road_network.contains(id) {
                return Err(TrafficError::UnknownIntersection(id.clone()));
            }
        }

        let id = self.next_vehicle_id();
        let mut vehicle = SimVehicle::new(id, from.clone(), to.clone());

        match route_with_policy(&self.road_network, &self.congestion, &self.config, from, to) {
            Ok(route) => vehicle.assign_route(route.path),
            Err(err @ TrafficError::Unreachable { .. }) => {
                warn!("Vehicle {} spawned without a route: {}", id, err);
                self.stats.routing_failures += 1;
            }
            Err(err) => return Err(err),
        }

        debug!("Spawned vehicle {} from {} to {}", id, from, to);
        self.vehicles.insert(id, vehicle);
        self.stats.vehicles_spawned += 1;
        Ok(id)
    }

    /// Send a vehicle somewhere else, its route is recomputed on the next tick
    pub fn set_destination(
        &mut self,
        vehicle_id: VehicleId,
        destination: &IntersectionId,
    ) -> TrafficResult<()> {
        if !self.road_network.contains(destination) {
            return Err(TrafficError::UnknownIntersection(destination.clone()));
        }
        let vehicle = self
            .vehicles
            .get_mut(&vehicle_id)
            .ok_or(TrafficError::UnknownVehicle(vehicle_id))?;
        vehicle.set_destination(destination.clone());
        Ok(())
    }

    /// Step 1: every light advances exactly once
    fn update_signals(&mut self) -> usize {
        let mut transitions = 0;
        for intersection in self.intersections.values_mut() {
            if intersection.advance_signal() {
                transitions += 1;
            }
        }
        transitions
    }

    /// Step 2: store the new observations
    /// Returns the intersections whose level crossed the re-route threshold
    fn ingest_congestion(
        &mut self,
        observations: &HashMap<IntersectionId, u64>,
    ) -> BTreeSet<IntersectionId> {
        let mut crossed = BTreeSet::new();

        let ordered: BTreeMap<&IntersectionId, u64> =
            observations.iter().map(|(id, raw)| (id, *raw)).collect();

        for (id, raw) in ordered {
            if !self.road_network.contains(id) {
                warn!("Ignoring congestion observation for unknown intersection {}", id);
                continue;
            }

            let level = self.config.normalize_level(raw);
            let previous = self.congestion.report(id, level).unwrap_or(0);
            if self.config.crosses_reroute_threshold(previous, level) {
                debug!("Intersection {} crossed congestion threshold ({} -> {})", id, previous, level);
                crossed.insert(id.clone());
            }
        }

        crossed
    }

    /// Step 3: recompute routes that went stale
    /// Returns (rerouted, unreachable)
    fn refresh_routes(
        &mut self,
        crossed: &BTreeSet<IntersectionId>,
    ) -> (Vec<VehicleId>, Vec<VehicleId>) {
        let mut rerouted = Vec::new();
        let mut unreachable = Vec::new();

        for vehicle in self.vehicles.values_mut() {
            if !vehicle.is_stale() && vehicle.upcoming().iter().any(|id| crossed.contains(id)) {
                vehicle.mark_stale();
            }

            if !vehicle.is_stale() {
                continue;
            }

            match route_with_policy(
                &self.road_network,
                &self.congestion,
                &self.config,
                &vehicle.current,
                &vehicle.destination,
            ) {
                Ok(route) => {
                    debug!(
                        "Vehicle {} re-routed over {} intersections at cost {}",
                        vehicle.id,
                        route.path.len(),
                        route.total_cost
                    );
                    vehicle.assign_route(route.path);
                    rerouted.push(vehicle.id);
                }
                Err(err) => {
                    // Failures stay with this vehicle, the tick goes on
                    warn!("Vehicle {} has no route: {}", vehicle.id, err);
                    vehicle.clear_route();
                    unreachable.push(vehicle.id);
                }
            }
        }

        (rerouted, unreachable)
    }

    /// Step 4: every vehicle consumes at most one hop
    /// Returns (held, arrived)
    fn update_vehicles(&mut self) -> (Vec<VehicleId>, Vec<VehicleId>) {
        let mut held = Vec::new();
        let mut arrived = Vec::new();

        for vehicle in self.vehicles.values_mut() {
            match vehicle.update(&self.intersections, self.config.respect_signals) {
                VehicleUpdateResult::Continue | VehicleUpdateResult::NoRoute => {}
                VehicleUpdateResult::Held => held.push(vehicle.id),
                VehicleUpdateResult::ArrivedAtDestination(destination) => {
                    debug!("Vehicle {} arrived at {}", vehicle.id, destination);
                    arrived.push(vehicle.id);
                }
            }
        }

        for id in &arrived {
            self.vehicles.remove(id);
        }

        (held, arrived)
    }

    /// Main simulation tick
    pub fn tick(&mut self, observations: &HashMap<IntersectionId, u64>) -> TickReport {
        self.tick += 1;

        let signal_transitions = self.update_signals();
        let crossed = self.ingest_congestion(observations);
        let (rerouted, unreachable) = self.refresh_routes(&crossed);
        let (held, arrived) = self.update_vehicles();

        self.stats.signal_transitions += signal_transitions;
        self.stats.reroutes += rerouted.len();
        self.stats.routing_failures += unreachable.len();
        self.stats.vehicles_arrived += arrived.len();

        TickReport {
            tick: self.tick,
            signal_transitions,
            rerouted,
            unreachable,
            held,
            arrived,
            most_congested: self.congestion.most_congested(self.config.report_top),
        }
    }

    /// Run `ticks` ticks, pulling observations from `feed` before each one
    pub fn run(&mut self, ticks: u64, feed: &mut dyn CongestionFeed) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            let observations = feed.observe(self.tick + 1, self);
            reports.push(self.tick(&observations));
        }
        reports
    }

    pub fn road_network(&self) -> &SimRoadNetwork {
        &self.road_network
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn congestion(&self) -> &CongestionTracker {
        &self.congestion
    }

    pub fn most_congested(&self, k: usize) -> Vec<(IntersectionId, u64)> {
        self.congestion.most_congested(k)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn signal_state(&self, id: &IntersectionId) -> Option<SignalState> {
        self.intersections.get(id).map(SimIntersection::signal_state)
    }

    pub fn light(&self, id: &IntersectionId) -> Option<&TrafficLight> {
        self.intersections.get(id).map(|intersection| &intersection.light)
    }

    /// All lights, ordered by intersection
    pub fn lights(&self) -> impl Iterator<Item = (&IntersectionId, &TrafficLight)> {
        self.intersections
            .iter()
            .map(|(id, intersection)| (id, &intersection.light))
    }

    /// Active vehicles, ordered by id
    pub fn vehicles(&self) -> impl Iterator<Item = &SimVehicle> {
        self.vehicles.values()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Log a summary of the world state
    pub fn log_summary(&self) {
        info!("=== Traffic Simulation Summary ===");
        info!("Tick: {}", self.tick);
        info!(
            "Intersections: {}, Roads: {}",
            self.road_network.intersection_count(),
            self.road_network.road_count()
        );
        info!("Active vehicles: {}", self.vehicles.len());

        info!("--- Signals ---");
        for (id, light) in self.lights() {
            info!(
                "  {}: {} ({} ticks remaining)",
                id,
                light.state(),
                light.ticks_remaining()
            );
        }

        if !self.vehicles.is_empty() {
            info!("--- Active Vehicles ---");
            for vehicle in self.vehicles.values() {
                let route: Vec<&str> = vehicle.route().iter().map(IntersectionId::as_str).collect();
                info!(
                    "  Vehicle {}: at {} heading to {}, route=[{}]",
                    vehicle.id,
                    vehicle.current,
                    vehicle.destination,
                    route.join(", ")
                );
            }
        }

        let hottest = self.congestion.most_congested(self.config.report_top);
        if !hottest.is_empty() {
            info!("--- Most Congested ---");
            for (id, level) in hottest {
                info!("  {}: {}", id, level);
            }
        }
    }
}
