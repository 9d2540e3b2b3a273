//! Road network graph for pathfinding
//!
//! Intersections are graph nodes, roads are directed weighted edges. The
//! network is built before the simulation starts and is only read while
//! routes are computed.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::error::{TrafficError, TrafficResult};
use super::types::{IntersectionId, RoadId, SimRoad};

/// Directed road network
#[derive(Debug, Default, Clone)]
pub struct SimRoadNetwork {
    /// The underlying petgraph directed graph (one-way roads)
    graph: DiGraph<IntersectionId, SimRoad>,

    /// Maps intersection IDs to their node indices in the graph
    intersection_to_node: HashMap<IntersectionId, NodeIndex>,
}

impl SimRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from a finite sequence of intersection and road records
    pub fn from_records<I, R>(intersections: I, roads: R) -> TrafficResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<IntersectionId>,
        R: IntoIterator<Item = (IntersectionId, IntersectionId, i64)>,
    {
        let mut network = Self::new();
        for id in intersections {
            network.add_intersection(id);
        }
        for (from, to, weight) in roads {
            network.add_road(&from, &to, weight)?;
        }
        Ok(network)
    }

    /// Adds an intersection to the network graph
    /// Adding an already registered intersection is a no-op
    pub fn add_intersection(&mut self, id: impl Into<IntersectionId>) {
        let id = id.into();
        if self.intersection_to_node.contains_key(&id) {
            return;
        }

        let node_index = self.graph.add_node(id.clone());
        self.intersection_to_node.insert(id, node_index);
    }

    /// Adds a one-way road between two registered intersections
    pub fn add_road(
        &mut self,
        from: &IntersectionId,
        to: &IntersectionId,
        weight: i64,
    ) -> TrafficResult<RoadId> {
        let start_node = self.node_of(from)?;
        let end_node = self.node_of(to)?;

        let weight = u64::try_from(weight).map_err(|_| TrafficError::InvalidWeight {
            from: from.clone(),
            to: to.clone(),
            weight,
        })?;

        let id = RoadId(self.graph.edge_count());
        let road = SimRoad::new(id, from.clone(), to.clone(), weight);
        self.graph.add_edge(start_node, end_node, road);
        Ok(id)
    }

    /// Adds a road in each direction with the same weight
    pub fn add_two_way_road(
        &mut self,
        a: &IntersectionId,
        b: &IntersectionId,
        weight: i64,
    ) -> TrafficResult<(RoadId, RoadId)> {
        let forward = self.add_road(a, b, weight)?;
        let backward = self.add_road(b, a, weight)?;
        Ok((forward, backward))
    }

    /// Outgoing roads of an intersection, in the order they were added
    /// An unregistered intersection has no roads
    pub fn edges_from(&self, id: &IntersectionId) -> Vec<&SimRoad> {
        let Some(node) = self.intersection_to_node.get(id) else {
            return Vec::new();
        };

        let mut roads: Vec<&SimRoad> = self.graph.edges(*node).map(|edge| edge.weight()).collect();
        roads.sort_by_key(|road| road.id);
        roads
    }

    /// Finds the cheapest road connecting two intersections
    pub fn find_road_between(&self, from: &IntersectionId, to: &IntersectionId) -> Option<&SimRoad> {
        self.edges_from(from)
            .into_iter()
            .filter(|road| &road.to == to)
            .min_by_key(|road| road.weight)
    }

    pub fn contains(&self, id: &IntersectionId) -> bool {
        self.intersection_to_node.contains_key(id)
    }

    /// All intersections, in registration order
    pub fn intersections(&self) -> impl Iterator<Item = &IntersectionId> {
        self.graph.node_weights()
    }

    /// Get number of intersections
    pub fn intersection_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of roads
    pub fn road_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn node_of(&self, id: &IntersectionId) -> TrafficResult<NodeIndex> {
        self.intersection_to_node
            .get(id)
            .copied()
            .ok_or_else(|| TrafficError::UnknownIntersection(id.clone()))
    }

    pub(crate) fn graph(&self) -> &DiGraph<IntersectionId, SimRoad> {
        &self.graph
    }
}
