//! Immutable network + traffic matrix.

use tracing::info;

use super::instance::Instance;
use super::types::{Demand, DemandId, Edge, EdgeId, NodeId};
use crate::error::{Result, SrteError};
use crate::paths::ShortestPaths;

/// The read-only problem a solver works on: edges, demands, adjacency and
/// precomputed shortest paths.
///
/// Building a topology is the expensive step (one Dijkstra per node); share
/// it between solvers with an [`Arc`](std::sync::Arc).
///
/// # Examples
///
/// ```
/// use u_srte::topology::{Instance, Topology};
///
/// let mut inst = Instance::new();
/// inst.add_edge(0, 1, 1, 10);
/// inst.add_edge(1, 2, 1, 10);
/// inst.add_demand(0, 2, 4).unwrap();
///
/// let topo = Topology::new(inst).unwrap();
/// assert_eq!(topo.node_count(), 3);
/// assert_eq!(topo.shortest_path(0, 2).unwrap(), vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Topology {
    edges: Vec<Edge>,
    demands: Vec<Demand>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    neighbors: Vec<Vec<NodeId>>,
    paths: ShortestPaths,
}

impl Topology {
    /// Validates the instance and precomputes adjacency and shortest paths.
    ///
    /// # Errors
    /// - [`SrteError::OutOfRange`] if a demand endpoint is not an edge endpoint.
    /// - [`SrteError::Unreachable`] if a demand's destination cannot be
    ///   reached from its source.
    pub fn new(instance: Instance) -> Result<Self> {
        let (edges, demands) = instance.into_parts();

        let node_count = edges
            .iter()
            .map(|e| e.src.max(e.dest) + 1)
            .max()
            .unwrap_or(0);

        for d in &demands {
            for node in [d.src, d.dest] {
                if node >= node_count {
                    return Err(SrteError::out_of_range("node", node, node_count));
                }
            }
        }

        let mut out_edges = vec![Vec::new(); node_count];
        let mut in_edges = vec![Vec::new(); node_count];
        let mut neighbors = vec![Vec::new(); node_count];
        for (id, e) in edges.iter().enumerate() {
            out_edges[e.src].push(id);
            in_edges[e.dest].push(id);
            if e.src != e.dest {
                neighbors[e.src].push(e.dest);
                neighbors[e.dest].push(e.src);
            }
        }
        for adj in &mut neighbors {
            adj.sort_unstable();
            adj.dedup();
        }

        let paths = ShortestPaths::build(&edges, &out_edges, &in_edges);

        for d in &demands {
            if paths.distance(d.src, d.dest).is_none() {
                return Err(SrteError::Unreachable {
                    src: d.src,
                    dest: d.dest,
                });
            }
        }

        info!(
            nodes = node_count,
            edges = edges.len(),
            demands = demands.len(),
            "topology built"
        );

        Ok(Self {
            edges,
            demands,
            out_edges,
            in_edges,
            neighbors,
            paths,
        })
    }

    /// Number of nodes (one past the largest edge endpoint).
    pub fn node_count(&self) -> usize {
        self.out_edges.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of demands.
    pub fn demand_count(&self) -> usize {
        self.demands.len()
    }

    /// All edges in id order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All demands in id order.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges
            .get(id)
            .ok_or_else(|| SrteError::out_of_range("edge", id, self.edges.len()))
    }

    /// Looks up a demand.
    pub fn demand(&self, id: DemandId) -> Result<&Demand> {
        self.demands
            .get(id)
            .ok_or_else(|| SrteError::out_of_range("demand", id, self.demands.len()))
    }

    /// Edges leaving `node`, ascending.
    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.out_edges[node]
    }

    /// Edges entering `node`, ascending.
    pub fn in_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.in_edges[node]
    }

    /// Nodes sharing an edge with `node` in either direction, ascending.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.neighbors[node]
    }

    /// The shortest-path engine.
    pub fn paths(&self) -> &ShortestPaths {
        &self.paths
    }

    /// Shortest path `src -> dest`.
    pub fn shortest_path(&self, src: NodeId, dest: NodeId) -> Result<Vec<EdgeId>> {
        self.paths.shortest_path(src, dest, &self.edges)
    }

    /// Path through the given waypoints.
    pub fn resolve_waypoints(
        &self,
        src: NodeId,
        dest: NodeId,
        waypoints: &[NodeId],
    ) -> Result<Vec<EdgeId>> {
        self.paths.resolve_waypoints(src, dest, waypoints, &self.edges)
    }

    /// Sum of the weights of `path`.
    pub fn path_cost(&self, path: &[EdgeId]) -> u64 {
        path.iter().map(|&e| self.edges[e].weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Instance {
        let mut inst = Instance::new();
        inst.add_edge(0, 1, 1, 10);
        inst.add_edge(1, 3, 1, 10);
        inst.add_edge(0, 2, 2, 10);
        inst.add_edge(2, 3, 2, 10);
        inst
    }

    #[test]
    fn test_node_count_from_endpoints() {
        let topo = Topology::new(diamond()).unwrap();
        assert_eq!(topo.node_count(), 4);
        assert_eq!(topo.edge_count(), 4);
        assert_eq!(topo.out_edges(0), &[0, 2]);
        assert_eq!(topo.in_edges(3), &[1, 3]);
        assert_eq!(topo.neighbors(0), &[1, 2]);
        assert_eq!(topo.neighbors(3), &[1, 2]);
    }

    #[test]
    fn test_empty_instance() {
        let topo = Topology::new(Instance::new()).unwrap();
        assert_eq!(topo.node_count(), 0);
        assert_eq!(topo.edge_count(), 0);
    }

    #[test]
    fn test_demand_on_unknown_node() {
        let mut inst = diamond();
        inst.add_demand(0, 7, 1).unwrap();
        assert!(matches!(
            Topology::new(inst),
            Err(SrteError::OutOfRange { kind: "node", id: 7, .. })
        ));
    }

    #[test]
    fn test_unreachable_demand() {
        let mut inst = diamond();
        inst.add_demand(3, 0, 1).unwrap();
        assert_eq!(
            Topology::new(inst).unwrap_err(),
            SrteError::Unreachable { src: 3, dest: 0 }
        );
    }

    #[test]
    fn test_lookups_and_cost() {
        let mut inst = diamond();
        inst.add_demand(0, 3, 5).unwrap();
        let topo = Topology::new(inst).unwrap();

        assert_eq!(topo.demand(0).unwrap().traffic, 5);
        assert!(topo.demand(1).is_err());
        assert!(topo.edge(4).is_err());

        let path = topo.resolve_waypoints(0, 3, &[2]).unwrap();
        assert_eq!(path, vec![2, 3]);
        assert_eq!(topo.path_cost(&path), 4);
        assert_eq!(topo.path_cost(&topo.shortest_path(0, 3).unwrap()), 2);
    }
}
