//! Congestion observation sources
//!
//! A feed is asked for one set of raw counts per tick. The world normalizes
//! and stores them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use super::types::IntersectionId;
use super::world::SimWorld;

pub trait CongestionFeed {
    /// Raw congestion counts for `tick`, keyed by intersection
    fn observe(&mut self, tick: u64, world: &SimWorld) -> HashMap<IntersectionId, u64>;
}

/// Random counts for every intersection
pub struct RandomCongestionFeed {
    rng: StdRng,
    max_count: u64,
}

impl RandomCongestionFeed {
    /// Create a feed with a seeded RNG for reproducible simulations
    pub fn new_with_seed(max_count: u64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_count,
        }
    }
}

impl CongestionFeed for RandomCongestionFeed {
    fn observe(&mut self, _tick: u64, world: &SimWorld) -> HashMap<IntersectionId, u64> {
        world
            .road_network()
            .intersections()
            .map(|id| (id.clone(), self.rng.random_range(0..=self.max_count)))
            .collect()
    }
}

/// Counts the vehicles currently waiting at each intersection
#[derive(Debug, Default, Clone, Copy)]
pub struct OccupancyFeed;

impl CongestionFeed for OccupancyFeed {
    fn observe(&mut self, _tick: u64, world: &SimWorld) -> HashMap<IntersectionId, u64> {
        // Every intersection is reported so emptied ones drop back to 0
        let mut counts: HashMap<IntersectionId, u64> = world
            .road_network()
            .intersections()
            .map(|id| (id.clone(), 0))
            .collect();
        for vehicle in world.vehicles() {
            *counts.entry(vehicle.current.clone()).or_default() += 1;
        }
        counts
    }
}

/// Replays scripted observations, keyed by tick
#[derive(Debug, Default, Clone)]
pub struct StaticFeed {
    script: HashMap<u64, HashMap<IntersectionId, u64>>,
}

impl StaticFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `level` for `id` on `tick`
    pub fn at(mut self, tick: u64, id: impl Into<IntersectionId>, level: u64) -> Self {
        self.script.entry(tick).or_default().insert(id.into(), level);
        self
    }
}

impl CongestionFeed for StaticFeed {
    fn observe(&mut self, tick: u64, _world: &SimWorld) -> HashMap<IntersectionId, u64> {
        self.script.remove(&tick).unwrap_or_default()
    }
}
