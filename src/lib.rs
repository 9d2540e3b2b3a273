//! Smart City Traffic Library
//!
//! Routes vehicles over a weighted road network, ranks intersections by
//! congestion and cycles a traffic light at every intersection, one discrete
//! tick at a time.

pub mod simulation;
