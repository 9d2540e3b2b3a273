//! Core types for the traffic simulation

use std::fmt;

/// An intersection identifier
/// Intersections are named by opaque strings ("A", "5th_and_main", "r0c1", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub String);

impl IntersectionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IntersectionId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for IntersectionId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wrapper type for road IDs
/// Roads are numbered in the order they were added to the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// A directed road between two intersections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRoad {
    pub id: RoadId,
    pub from: IntersectionId,
    pub to: IntersectionId,
    /// Travel cost, never negative
    pub weight: u64,
}

impl SimRoad {
    pub fn new(id: RoadId, from: IntersectionId, to: IntersectionId, weight: u64) -> Self {
        Self { id, from, to, weight }
    }
}
