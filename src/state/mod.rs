//! Solver state: routing of every demand and the resulting link loads.
//!
//! [`RoutingState`] owns the waypoint sequences and resolved paths;
//! [`UtilizationTracker`] aggregates their traffic per edge. The solver keeps
//! the two consistent by feeding every [`PathDelta`] returned by the former
//! into the latter.

mod routing;
mod tracker;

pub use routing::{PathDelta, RoutingState};
pub use tracker::{utilization_of, UtilizationTracker};
