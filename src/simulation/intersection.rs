//! Intersection state owned by the simulation world

use super::signal::{SignalState, SignalTiming, TrafficLight};
use super::types::IntersectionId;

/// An intersection in the traffic simulation
#[derive(Debug, Clone)]
pub struct SimIntersection {
    pub id: IntersectionId,
    /// The light controlling departures from this intersection
    pub light: TrafficLight,
}

impl SimIntersection {
    pub fn new(id: IntersectionId, timing: SignalTiming) -> Self {
        Self {
            id,
            light: TrafficLight::new(timing),
        }
    }

    /// Advance the light by one tick
    /// Returns true when the light changed state
    pub fn advance_signal(&mut self) -> bool {
        self.light.advance()
    }

    pub fn signal_state(&self) -> SignalState {
        self.light.state()
    }

    /// Vehicles may leave on green or yellow
    pub fn allows_departure(&self) -> bool {
        self.light.state() != SignalState::Red
    }
}
