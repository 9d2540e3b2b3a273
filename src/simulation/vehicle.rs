//! Vehicle trip state and hop-by-hop movement

use std::collections::BTreeMap;

use super::intersection::SimIntersection;
use super::types::{IntersectionId, VehicleId};

/// Result of a vehicle update indicating what action should be taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Continue,                       // Vehicle moved one hop
    Held,                           // Red light at the current intersection
    NoRoute,                        // Waiting for a route to be found
    ArrivedAtDestination(IntersectionId),
}

/// A vehicle making one trip
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub current: IntersectionId,
    pub destination: IntersectionId,
    /// Remaining route, starting at `current`; empty while no route is known
    route: Vec<IntersectionId>,
    /// The route must be recomputed before the vehicle moves again
    stale: bool,
    /// Number of hops driven so far
    pub hops: usize,
}

impl SimVehicle {
    pub fn new(id: VehicleId, current: IntersectionId, destination: IntersectionId) -> Self {
        Self {
            id,
            current,
            destination,
            route: Vec::new(),
            stale: true,
            hops: 0,
        }
    }

    pub fn route(&self) -> &[IntersectionId] {
        &self.route
    }

    /// Intersections still ahead of the vehicle
    pub fn upcoming(&self) -> &[IntersectionId] {
        self.route.get(1..).unwrap_or(&[])
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Install a freshly computed route
    /// The route has to start at the vehicle's current intersection
    pub fn assign_route(&mut self, route: Vec<IntersectionId>) {
        debug_assert_eq!(route.first(), Some(&self.current));
        self.route = route;
        self.stale = false;
    }

    /// Drop the route after a routing failure, the vehicle stays stale
    pub fn clear_route(&mut self) {
        self.route.clear();
        self.stale = true;
    }

    pub fn set_destination(&mut self, destination: IntersectionId) {
        if destination != self.destination {
            self.destination = destination;
            self.stale = true;
        }
    }

    pub fn has_arrived(&self) -> bool {
        self.current == self.destination
    }

    /// Consume the next hop of the route
    pub fn update(
        &mut self,
        intersections: &BTreeMap<IntersectionId, SimIntersection>,
        respect_signals: bool,
    ) -> VehicleUpdateResult {
        if self.has_arrived() {
            return VehicleUpdateResult::ArrivedAtDestination(self.current.clone());
        }

        if self.stale || self.route.len() < 2 {
            return VehicleUpdateResult::NoRoute;
        }

        if respect_signals {
            let departure_allowed = intersections
                .get(&self.current)
                .map_or(true, SimIntersection::allows_departure);
            if !departure_allowed {
                return VehicleUpdateResult::Held;
            }
        }

        self.route.remove(0);
        self.current = self.route[0].clone();
        self.hops += 1;

        if self.has_arrived() {
            VehicleUpdateResult::ArrivedAtDestination(self.current.clone())
        } else {
            VehicleUpdateResult::Continue
        }
    }
}
