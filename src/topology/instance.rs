//! Mutable problem builder.

use std::fmt;

use super::types::{Demand, DemandId, Edge, EdgeId, NodeId};
use crate::error::{Result, SrteError};

/// Collects edges and demands before a [`Topology`](super::Topology) is
/// built from them.
///
/// Ids are assigned in insertion order, starting at zero.
///
/// # Examples
///
/// ```
/// use u_srte::topology::Instance;
///
/// let mut inst = Instance::new();
/// let e = inst.add_edge(0, 1, 1, 10);
/// let d = inst.add_demand(0, 1, 12).unwrap();
/// assert_eq!((e, d), (0, 0));
/// assert!(inst.add_demand(1, 1, 5).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Instance {
    edges: Vec<Edge>,
    demands: Vec<Demand>,
}

impl Instance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directed edge and returns its id.
    pub fn add_edge(&mut self, src: NodeId, dest: NodeId, weight: u64, capacity: u64) -> EdgeId {
        self.edges.push(Edge {
            src,
            dest,
            weight,
            capacity,
        });
        self.edges.len() - 1
    }

    /// Adds a demand and returns its id.
    ///
    /// Fails with [`SrteError::InvalidDemand`] when `traffic == 0` or
    /// `src == dest`. Endpoint existence is checked later, when the
    /// topology is built, since edges may still be added.
    pub fn add_demand(&mut self, src: NodeId, dest: NodeId, traffic: u64) -> Result<DemandId> {
        if traffic == 0 {
            return Err(SrteError::InvalidDemand(format!(
                "demand {src}->{dest} has zero traffic"
            )));
        }
        if src == dest {
            return Err(SrteError::InvalidDemand(format!(
                "demand source and destination are both node {src}"
            )));
        }
        self.demands.push(Demand { src, dest, traffic });
        Ok(self.demands.len() - 1)
    }

    /// Edges in id order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Demands in id order.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub(crate) fn into_parts(self) -> (Vec<Edge>, Vec<Demand>) {
        (self.edges, self.demands)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nEdges: {}, nDemands: {}",
            self.edges.len(),
            self.demands.len()
        )
    }
}
