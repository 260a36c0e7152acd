//! Topology store: nodes, directed edges and traffic demands.
//!
//! An [`Instance`] is filled incrementally and then frozen into a
//! [`Topology`], which is immutable and can be shared by several solvers.

mod graph;
mod instance;
mod types;

pub use graph::Topology;
pub use instance::Instance;
pub use types::{Demand, DemandId, Edge, EdgeId, NodeId};
