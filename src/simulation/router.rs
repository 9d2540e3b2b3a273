//! Shortest-path routing over the road network
//!
//! Dijkstra with a min-priority frontier. The cost of each road is supplied by
//! an [`EdgeCost`] policy, so congestion-blind and congestion-aware routing go
//! through the same entry point.

use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::congestion::CongestionTracker;
use super::error::{TrafficError, TrafficResult};
use super::road_network::SimRoadNetwork;
use super::types::{IntersectionId, SimRoad};

/// Policy that prices a single road for routing
pub trait EdgeCost {
    /// Returns `None` when the cost does not fit in a `u64`
    fn cost(&self, road: &SimRoad) -> Option<u64>;
}

impl<F> EdgeCost for F
where
    F: Fn(&SimRoad) -> Option<u64>,
{
    fn cost(&self, road: &SimRoad) -> Option<u64> {
        self(road)
    }
}

/// Congestion-blind pricing: a road costs its weight
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCost;

impl EdgeCost for BaseCost {
    fn cost(&self, road: &SimRoad) -> Option<u64> {
        Some(road.weight)
    }
}

/// Adds `penalty_per_level` for every congestion level at the road's destination
#[derive(Debug, Clone, Copy)]
pub struct CongestionAwareCost<'a> {
    pub tracker: &'a CongestionTracker,
    pub penalty_per_level: u64,
}

impl<'a> CongestionAwareCost<'a> {
    pub fn new(tracker: &'a CongestionTracker, penalty_per_level: u64) -> Self {
        Self {
            tracker,
            penalty_per_level,
        }
    }
}

impl EdgeCost for CongestionAwareCost<'_> {
    fn cost(&self, road: &SimRoad) -> Option<u64> {
        let penalty = self
            .tracker
            .level(&road.to)
            .checked_mul(self.penalty_per_level)?;
        road.weight.checked_add(penalty)
    }
}

/// A computed route, first element is the start, last is the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<IntersectionId>,
    pub total_cost: u64,
}

/// Finds a minimum-cost path between two intersections
pub fn shortest_path<C>(
    network: &SimRoadNetwork,
    start: &IntersectionId,
    destination: &IntersectionId,
    cost: &C,
) -> TrafficResult<Route>
where
    C: EdgeCost + ?Sized,
{
    let start_node = network.node_of(start)?;
    let goal_node = network.node_of(destination)?;

    let graph = network.graph();
    let node_count = graph.node_count();

    // None is an infinite tentative distance
    let mut distances: Vec<Option<u64>> = vec![None; node_count];
    let mut previous: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut frontier = BinaryHeap::new();
    let mut overflowed_at: Option<NodeIndex> = None;

    distances[start_node.index()] = Some(0);
    frontier.push(Reverse((0u64, start_node)));

    while let Some(Reverse((distance, node))) = frontier.pop() {
        // Stale frontier entry, a shorter distance was already settled
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == goal_node {
            break;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            if settled[next.index()] {
                continue;
            }

            // Overflowing roads are skipped, only reported if the goal is never reached
            let Some(candidate) = cost
                .cost(edge.weight())
                .and_then(|step| distance.checked_add(step))
            else {
                overflowed_at.get_or_insert(node);
                continue;
            };

            let improves = distances[next.index()].map_or(true, |known| candidate < known);
            if improves {
                distances[next.index()] = Some(candidate);
                previous[next.index()] = Some(node);
                frontier.push(Reverse((candidate, next)));
            }
        }
    }

    let unreachable = || TrafficError::Unreachable {
        start: start.clone(),
        destination: destination.clone(),
    };

    let total_cost = match distances[goal_node.index()] {
        Some(total) if settled[goal_node.index()] => total,
        _ => {
            return Err(match overflowed_at {
                Some(node) => TrafficError::CostOverflow(graph[node].clone()),
                None => unreachable(),
            })
        }
    };

    let mut node_path = vec![goal_node];
    let mut current = goal_node;
    while current != start_node {
        current = previous[current.index()].ok_or_else(unreachable)?;
        node_path.push(current);
    }
    node_path.reverse();

    let path: Vec<IntersectionId> = node_path.iter().map(|node| graph[*node].clone()).collect();

    debug!(
        "Routed {} -> {} over {} hops at cost {}",
        start,
        destination,
        path.len() - 1,
        total_cost
    );

    Ok(Route { path, total_cost })
}
