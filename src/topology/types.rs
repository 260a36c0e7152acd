//! Edge and demand records.

/// Node identifier. Valid ids are `0..n_nodes`, derived from edge endpoints.
pub type NodeId = usize;

/// Edge identifier: the insertion index of the edge.
pub type EdgeId = usize;

/// Demand identifier: the insertion index of the demand.
pub type DemandId = usize;

/// A directed link.
///
/// `weight` is the routing cost (IGP metric) used by shortest paths and
/// `capacity` is the load the link sustains at utilization `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Tail node.
    pub src: NodeId,
    /// Head node.
    pub dest: NodeId,
    /// Routing cost.
    pub weight: u64,
    /// Link capacity. Zero is allowed (see [`crate::state::utilization_of`]).
    pub capacity: u64,
}

/// A point-to-point traffic demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    /// Ingress node.
    pub src: NodeId,
    /// Egress node.
    pub dest: NodeId,
    /// Traffic volume, strictly positive.
    pub traffic: u64,
}
