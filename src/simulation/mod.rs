//! Traffic simulation core
//!
//! Road network, shortest-path routing, congestion ranking and per-intersection
//! signal state machines, driven tick by tick by [`SimWorld`].

mod config;
mod congestion;
mod error;
mod feed;
mod intersection;
mod road_network;
mod router;
mod scenario;
mod signal;
mod types;
mod vehicle;
mod world;

pub use config::{
    SimConfig, DEFAULT_MAX_CONGESTION_LEVEL, DEFAULT_REPORT_TOP, DEFAULT_REROUTE_THRESHOLD,
};
pub use congestion::CongestionTracker;
pub use error::{TrafficError, TrafficResult};
pub use feed::{CongestionFeed, OccupancyFeed, RandomCongestionFeed, StaticFeed};
pub use intersection::SimIntersection;
pub use road_network::SimRoadNetwork;
pub use router::{shortest_path, BaseCost, CongestionAwareCost, EdgeCost, Route};
pub use scenario::{
    build_demo_world, build_grid_world, grid_id, spawn_random_trips, GRID_MAX_WEIGHT,
    GRID_MIN_WEIGHT,
};
pub use signal::{
    Phase, SignalState, SignalTiming, TrafficLight, DEFAULT_GREEN_TICKS, DEFAULT_RED_TICKS,
    DEFAULT_YELLOW_TICKS,
};
pub use types::{IntersectionId, RoadId, SimRoad, VehicleId};
pub use vehicle::{SimVehicle, VehicleUpdateResult};
pub use world::{SimWorld, SimulationStats, TickReport};
