//! Per-destination forwarding tables.
//!
//! A table is built by a reverse Dijkstra run from its destination over
//! incoming edges. The next hop of a node is then the smallest-id out-edge
//! that is tight (`cost[v] + w == cost[u]`) and whose head was settled
//! before the node itself. Settle order is a total order, so next hops
//! never form a cycle, even in the presence of zero-weight edges.
//!
//! # Complexity
//! O((n + m) log n) per table.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::topology::{Edge, EdgeId, NodeId};

const UNREACHED: u64 = u64::MAX;

/// Shortest-path next hops towards a single destination.
#[derive(Debug, Clone)]
pub struct ForwardingTable {
    dest: NodeId,
    cost: Vec<u64>,
    hops: Vec<u32>,
    next: Vec<Option<EdgeId>>,
}

impl ForwardingTable {
    /// Builds the table for `dest`.
    ///
    /// `out_edges[u]` and `in_edges[u]` list edge ids incident to `u` in
    /// ascending order.
    pub fn build(
        dest: NodeId,
        edges: &[Edge],
        out_edges: &[Vec<EdgeId>],
        in_edges: &[Vec<EdgeId>],
    ) -> Self {
        let n = out_edges.len();
        let mut cost = vec![UNREACHED; n];
        let mut rank = vec![usize::MAX; n];
        let mut settled = Vec::with_capacity(n);

        let mut heap = BinaryHeap::new();
        cost[dest] = 0;
        heap.push(Reverse((0u64, dest)));

        while let Some(Reverse((c, v))) = heap.pop() {
            if rank[v] != usize::MAX {
                continue;
            }
            rank[v] = settled.len();
            settled.push(v);
            for &e in &in_edges[v] {
                let u = edges[e].src;
                if rank[u] != usize::MAX {
                    continue;
                }
                let candidate = c.saturating_add(edges[e].weight);
                if candidate < cost[u] {
                    cost[u] = candidate;
                    heap.push(Reverse((candidate, u)));
                }
            }
        }

        let mut next = vec![None; n];
        let mut hops = vec![u32::MAX; n];
        hops[dest] = 0;
        // Heads of next hops are settled earlier, so their hop counts are known.
        for &u in settled.iter().skip(1) {
            // out_edges[u] is ascending, so the first tight edge has the smallest id.
            let e = out_edges[u].iter().copied().find(|&e| {
                let v = edges[e].dest;
                rank[v] < rank[u] && cost[v].saturating_add(edges[e].weight) == cost[u]
            });
            if let Some(e) = e {
                next[u] = Some(e);
                hops[u] = hops[edges[e].dest] + 1;
            }
        }

        Self {
            dest,
            cost,
            hops,
            next,
        }
    }

    /// Destination of this table.
    pub fn dest(&self) -> NodeId {
        self.dest
    }

    /// Least cost from `src` to the destination, or `None` if unreachable.
    pub fn cost(&self, src: NodeId) -> Option<u64> {
        match self.cost[src] {
            UNREACHED => None,
            c => Some(c),
        }
    }

    /// Number of edges on the chosen path from `src`, or `None` if unreachable.
    pub fn hops(&self, src: NodeId) -> Option<u32> {
        self.cost(src).map(|_| self.hops[src])
    }

    /// Next hop edge from `u`. `None` at the destination or if unreachable.
    pub fn next_hop(&self, u: NodeId) -> Option<EdgeId> {
        self.next[u]
    }

    /// Appends the chosen path from `src` to `out`.
    ///
    /// Returns `false` (leaving `out` untouched) if the destination is
    /// unreachable from `src`.
    pub fn append_path(&self, src: NodeId, edges: &[Edge], out: &mut Vec<EdgeId>) -> bool {
        if self.cost[src] == UNREACHED {
            return false;
        }
        let mut u = src;
        while u != self.dest {
            match self.next[u] {
                Some(e) => {
                    out.push(e);
                    u = edges[e].dest;
                }
                None => unreachable!("reachable node {u} has no next hop towards {}", self.dest),
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(n: usize, edges: &[Edge]) -> (Vec<Vec<EdgeId>>, Vec<Vec<EdgeId>>) {
        let mut out = vec![Vec::new(); n];
        let mut inc = vec![Vec::new(); n];
        for (i, e) in edges.iter().enumerate() {
            out[e.src].push(i);
            inc[e.dest].push(i);
        }
        (out, inc)
    }

    fn edge(src: NodeId, dest: NodeId, weight: u64) -> Edge {
        Edge {
            src,
            dest,
            weight,
            capacity: 1,
        }
    }

    #[test]
    fn test_prefers_lower_cost() {
        // 0->1->2 costs 2, 0->2 costs 5
        let edges = vec![edge(0, 1, 1), edge(1, 2, 1), edge(0, 2, 5)];
        let (out, inc) = adjacency(3, &edges);
        let t = ForwardingTable::build(2, &edges, &out, &inc);

        assert_eq!(t.cost(0), Some(2));
        let mut path = Vec::new();
        assert!(t.append_path(0, &edges, &mut path));
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn test_equal_cost_prefers_smallest_next_edge() {
        // 0->1->2 and 0->2 both cost 2; edge 0 (0->1) has the smaller id.
        let edges = vec![edge(0, 1, 1), edge(1, 2, 1), edge(0, 2, 2)];
        let (out, inc) = adjacency(3, &edges);
        let t = ForwardingTable::build(2, &edges, &out, &inc);

        let mut path = Vec::new();
        assert!(t.append_path(0, &edges, &mut path));
        assert_eq!(path, vec![0, 1]);
        assert_eq!(t.hops(0), Some(2));
    }

    #[test]
    fn test_equal_cost_smallest_edge_wins_over_fewer_hops() {
        // The direct edge 0->2 comes first, so it wins over the two-hop path.
        let edges = vec![edge(0, 2, 2), edge(0, 1, 1), edge(1, 2, 1)];
        let (out, inc) = adjacency(3, &edges);
        let t = ForwardingTable::build(2, &edges, &out, &inc);

        assert_eq!(t.next_hop(0), Some(0));
        assert_eq!(t.hops(0), Some(1));
    }

    #[test]
    fn test_equal_cost_equal_hops_prefers_smallest_edge() {
        // Two 2-hop paths 0->1->3 and 0->2->3; edge 0 (0->2) has the smaller id.
        let edges = vec![edge(0, 2, 1), edge(0, 1, 1), edge(1, 3, 1), edge(2, 3, 1)];
        let (out, inc) = adjacency(4, &edges);
        let t = ForwardingTable::build(3, &edges, &out, &inc);

        let mut path = Vec::new();
        assert!(t.append_path(0, &edges, &mut path));
        assert_eq!(path, vec![0, 3]);
    }

    #[test]
    fn test_zero_weight_cycle_terminates() {
        let edges = vec![edge(0, 1, 0), edge(1, 0, 0), edge(1, 2, 0)];
        let (out, inc) = adjacency(3, &edges);
        let t = ForwardingTable::build(2, &edges, &out, &inc);

        let mut path = Vec::new();
        assert!(t.append_path(0, &edges, &mut path));
        assert_eq!(path, vec![0, 2]);
    }

    #[test]
    fn test_unreachable() {
        let edges = vec![edge(0, 1, 1)];
        let (out, inc) = adjacency(3, &edges);
        let t = ForwardingTable::build(1, &edges, &out, &inc);

        let mut path = vec![9];
        assert!(!t.append_path(2, &edges, &mut path));
        assert_eq!(path, vec![9]);
        assert_eq!(t.cost(2), None);
        assert_eq!(t.next_hop(1), None);
    }
}
