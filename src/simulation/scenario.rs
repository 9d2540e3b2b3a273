//! Built-in networks for the headless driver and tests

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::config::SimConfig;
use super::types::{IntersectionId, VehicleId};
use super::world::SimWorld;

/// Cheapest road in a generated grid
pub const GRID_MIN_WEIGHT: i64 = 1;
/// Most expensive road in a generated grid
pub const GRID_MAX_WEIGHT: i64 = 20;

/// Three intersections where the two-hop route beats the direct road
///
/// A->B (5), B->C (10), A->C (20)
pub fn build_demo_world(config: SimConfig) -> Result<SimWorld> {
    let mut world = SimWorld::new(config);
    let a = world.add_intersection("A");
    let b = world.add_intersection("B");
    let c = world.add_intersection("C");

    world.add_road(&a, &b, 5).context("Failed to add road A->B")?;
    world.add_road(&b, &c, 10).context("Failed to add road B->C")?;
    world.add_road(&a, &c, 20).context("Failed to add road A->C")?;

    Ok(world)
}

/// Name of the intersection at a grid position
pub fn grid_id(row: usize, col: usize) -> IntersectionId {
    IntersectionId(format!("r{}c{}", row, col))
}

/// A size x size grid of intersections joined by two-way roads with random weights
pub fn build_grid_world(size: usize, seed: u64, config: SimConfig) -> Result<SimWorld> {
    anyhow::ensure!(size > 0, "Grid size must be at least 1");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = SimWorld::new(config);

    for row in 0..size {
        for col in 0..size {
            world.add_intersection(grid_id(row, col));
        }
    }

    // Connect grid horizontally
    for row in 0..size {
        for col in 0..size - 1 {
            let weight = rng.random_range(GRID_MIN_WEIGHT..=GRID_MAX_WEIGHT);
            world
                .add_two_way_road(&grid_id(row, col), &grid_id(row, col + 1), weight)
                .with_context(|| format!("Failed to connect r{}c{} eastwards", row, col))?;
        }
    }

    // Connect grid vertically
    for row in 0..size - 1 {
        for col in 0..size {
            let weight = rng.random_range(GRID_MIN_WEIGHT..=GRID_MAX_WEIGHT);
            world
                .add_two_way_road(&grid_id(row, col), &grid_id(row + 1, col), weight)
                .with_context(|| format!("Failed to connect r{}c{} southwards", row, col))?;
        }
    }

    Ok(world)
}

/// Spawn `count` vehicles between random pairs of distinct intersections
pub fn spawn_random_trips(world: &mut SimWorld, count: usize, seed: u64) -> Result<Vec<VehicleId>> {
    let intersections: Vec<IntersectionId> =
        world.road_network().intersections().cloned().collect();
    anyhow::ensure!(
        intersections.len() >= 2,
        "Need at least two intersections to spawn trips"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut spawned = Vec::with_capacity(count);

    while spawned.len() < count {
        let from = intersections.choose(&mut rng).context("No intersections")?;
        let to = intersections.choose(&mut rng).context("No intersections")?;
        if from == to {
            continue;
        }

        let id = world
            .spawn_vehicle(from, to)
            .with_context(|| format!("Failed to spawn trip {} -> {}", from, to))?;
        spawned.push(id);
    }

    Ok(spawned)
}
