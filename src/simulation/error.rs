//! Error taxonomy for network, routing and trip operations

use super::types::{IntersectionId, VehicleId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrafficError {
    #[error("Unknown intersection: {0}")]
    UnknownIntersection(IntersectionId),
    #[error("Invalid road weight {weight} on {from} -> {to}")]
    InvalidWeight {
        from: IntersectionId,
        to: IntersectionId,
        weight: i64,
    },
    #[error("No route from {start} to {destination}")]
    Unreachable {
        start: IntersectionId,
        destination: IntersectionId,
    },
    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),
    #[error("Route cost overflowed while leaving {0}")]
    CostOverflow(IntersectionId),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
