//! Per-demand waypoint sequences and their resolved paths.

use crate::error::{Result, SrteError};
use crate::topology::{DemandId, Edge, EdgeId, NodeId, Topology};

/// Multiset difference between a demand's old and new path.
///
/// An edge appears in at most one of the two lists, once per traversal
/// gained or lost. Both lists are sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathDelta {
    /// Traversals the demand no longer makes.
    pub removed: Vec<EdgeId>,
    /// Traversals the demand now makes.
    pub added: Vec<EdgeId>,
}

impl PathDelta {
    /// Computes the difference `new - old` as multisets of edges.
    pub fn between(old: &[EdgeId], new: &[EdgeId]) -> Self {
        let mut old = old.to_vec();
        let mut new = new.to_vec();
        old.sort_unstable();
        new.sort_unstable();

        let mut delta = PathDelta::default();
        let (mut i, mut j) = (0, 0);
        while i < old.len() && j < new.len() {
            match old[i].cmp(&new[j]) {
                std::cmp::Ordering::Less => {
                    delta.removed.push(old[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    delta.added.push(new[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        delta.removed.extend_from_slice(&old[i..]);
        delta.added.extend_from_slice(&new[j..]);
        delta
    }

    /// `true` if both paths traverse the same edges.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    /// Weight added minus weight removed, saturating at the `i64` bounds.
    pub fn cost_delta(&self, edges: &[Edge]) -> i64 {
        let weight = |ids: &[EdgeId]| -> i128 {
            ids.iter().map(|&e| i128::from(edges[e].weight)).sum()
        };
        let delta = weight(&self.added) - weight(&self.removed);
        i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
    }

    /// Per-edge signed load changes for a demand of the given traffic,
    /// sorted by edge id with one entry per edge.
    pub fn load_changes(&self, traffic: u64) -> Vec<(EdgeId, i64)> {
        let traffic = traffic as i64;
        let mut changes: Vec<(EdgeId, i64)> = Vec::with_capacity(self.removed.len() + self.added.len());
        for (&e, sign) in self
            .removed
            .iter()
            .map(|e| (e, -1))
            .chain(self.added.iter().map(|e| (e, 1)))
        {
            changes.push((e, sign * traffic));
        }
        changes.sort_unstable_by_key(|&(e, _)| e);
        changes.dedup_by(|next, acc| {
            if next.0 == acc.0 {
                acc.1 += next.1;
                true
            } else {
                false
            }
        });
        changes
    }
}

#[derive(Debug, Clone)]
struct Route {
    waypoints: Vec<NodeId>,
    path: Vec<EdgeId>,
    /// `offsets[k]` is the index in `path` where stop `k` is reached,
    /// stops being `[src, waypoints.., dest]`.
    offsets: Vec<usize>,
}

/// The mutable solution: one waypoint sequence and resolved path per demand.
#[derive(Debug, Clone)]
pub struct RoutingState {
    routes: Vec<Route>,
    max_nodes: usize,
}

impl RoutingState {
    /// Routes every demand on its plain shortest path.
    pub fn new(topology: &Topology, max_nodes: usize) -> Result<Self> {
        let routes = topology
            .demands()
            .iter()
            .map(|d| {
                let mut path = Vec::new();
                let mut offsets = Vec::with_capacity(2);
                topology.paths().resolve_stops(
                    [d.src, d.dest],
                    topology.edges(),
                    &mut path,
                    Some(&mut offsets),
                )?;
                Ok(Route {
                    waypoints: Vec::new(),
                    path,
                    offsets,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { routes, max_nodes })
    }

    /// Bound on waypoint sequence length.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Number of demands.
    pub fn demand_count(&self) -> usize {
        self.routes.len()
    }

    /// Current waypoints of `demand`.
    ///
    /// # Panics
    /// Panics if `demand` is out of range.
    pub fn waypoints(&self, demand: DemandId) -> &[NodeId] {
        &self.routes[demand].waypoints
    }

    /// Current resolved path of `demand`.
    ///
    /// # Panics
    /// Panics if `demand` is out of range.
    pub fn path(&self, demand: DemandId) -> &[EdgeId] {
        &self.routes[demand].path
    }

    /// Edges between stop `from` and stop `to` of `demand`'s path, stops
    /// being indexed as `[src, waypoints.., dest]`.
    pub fn segment(&self, demand: DemandId, from: usize, to: usize) -> &[EdgeId] {
        let route = &self.routes[demand];
        &route.path[route.offsets[from]..route.offsets[to]]
    }

    /// Replaces `demand`'s waypoints, re-resolves its path and returns the
    /// edges it leaves and enters.
    ///
    /// On error the state is unchanged.
    pub fn set_waypoints(
        &mut self,
        topology: &Topology,
        demand: DemandId,
        waypoints: Vec<NodeId>,
    ) -> Result<PathDelta> {
        let d = topology.demand(demand)?;
        if waypoints.len() > self.max_nodes {
            return Err(SrteError::LengthExceeded {
                len: waypoints.len(),
                max_nodes: self.max_nodes,
            });
        }

        let mut path = Vec::new();
        let mut offsets = Vec::with_capacity(waypoints.len() + 2);
        topology.paths().resolve_stops(
            std::iter::once(d.src)
                .chain(waypoints.iter().copied())
                .chain(std::iter::once(d.dest)),
            topology.edges(),
            &mut path,
            Some(&mut offsets),
        )?;

        let route = &mut self.routes[demand];
        let delta = PathDelta::between(&route.path, &path);
        *route = Route {
            waypoints,
            path,
            offsets,
        };
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Instance;

    /// 0 -> 1 direct (w=1), detour 0 -> 2 -> 1 (w=1 each), and 1 -> 3.
    fn topology() -> Topology {
        let mut inst = Instance::new();
        inst.add_edge(0, 1, 1, 10);
        inst.add_edge(0, 2, 1, 10);
        inst.add_edge(2, 1, 1, 10);
        inst.add_edge(1, 3, 1, 10);
        inst.add_demand(0, 3, 4).unwrap();
        Topology::new(inst).unwrap()
    }

    #[test]
    fn test_initial_shortest_paths() {
        let topo = topology();
        let state = RoutingState::new(&topo, 2).unwrap();
        assert!(state.waypoints(0).is_empty());
        assert_eq!(state.path(0), &[0, 3]);
        assert_eq!(state.segment(0, 0, 1), &[0, 3]);
    }

    #[test]
    fn test_set_waypoints_returns_delta() {
        let topo = topology();
        let mut state = RoutingState::new(&topo, 2).unwrap();

        let delta = state.set_waypoints(&topo, 0, vec![2]).unwrap();
        assert_eq!(state.path(0), &[1, 2, 3]);
        assert_eq!(state.segment(0, 0, 1), &[1]);
        assert_eq!(state.segment(0, 1, 2), &[2, 3]);
        assert_eq!(delta.removed, vec![0]);
        assert_eq!(delta.added, vec![1, 2]);
        assert_eq!(delta.cost_delta(topo.edges()), 1);
    }

    #[test]
    fn test_length_exceeded_leaves_state() {
        let topo = topology();
        let mut state = RoutingState::new(&topo, 1).unwrap();

        let err = state.set_waypoints(&topo, 0, vec![2, 1]).unwrap_err();
        assert_eq!(
            err,
            SrteError::LengthExceeded {
                len: 2,
                max_nodes: 1
            }
        );
        assert_eq!(state.path(0), &[0, 3]);
    }

    #[test]
    fn test_unreachable_leaves_state() {
        let topo = topology();
        let mut state = RoutingState::new(&topo, 2).unwrap();

        // nothing leaves node 3
        let err = state.set_waypoints(&topo, 0, vec![3, 1]).unwrap_err();
        assert_eq!(err, SrteError::Unreachable { src: 3, dest: 1 });
        assert!(state.waypoints(0).is_empty());
        assert_eq!(state.path(0), &[0, 3]);
    }

    #[test]
    fn test_delta_is_multiset_difference() {
        let delta = PathDelta::between(&[1, 2, 2, 5], &[2, 3, 5, 5]);
        assert_eq!(delta.removed, vec![1, 2]);
        assert_eq!(delta.added, vec![3, 5]);
        assert!(PathDelta::between(&[4, 1], &[1, 4]).is_empty());
    }

    #[test]
    fn test_cost_delta_saturates() {
        let edges = vec![
            Edge { src: 0, dest: 1, weight: u64::MAX, capacity: 1 },
            Edge { src: 1, dest: 2, weight: u64::MAX, capacity: 1 },
            Edge { src: 0, dest: 2, weight: 1, capacity: 1 },
        ];
        let delta = PathDelta::between(&[2], &[0, 1]);
        assert_eq!(delta.cost_delta(&edges), i64::MAX);
        let delta = PathDelta::between(&[0, 1], &[2]);
        assert_eq!(delta.cost_delta(&edges), i64::MIN);
    }

    #[test]
    fn test_load_changes_merge() {
        let delta = PathDelta {
            removed: vec![1, 4],
            added: vec![2, 2],
        };
        assert_eq!(delta.load_changes(3), vec![(1, -3), (2, 6), (4, -3)]);
    }
}
