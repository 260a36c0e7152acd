//! All-destinations shortest-path engine and waypoint resolution.

use super::table::ForwardingTable;
use crate::error::{Result, SrteError};
use crate::topology::{Edge, EdgeId, NodeId};

/// Shortest paths between every pair of nodes, precomputed as one
/// [`ForwardingTable`] per destination.
///
/// Ties among least-cost paths are broken by the smallest next edge id at
/// every node, so paths are reproducible and any sub-path of a chosen path
/// is itself the chosen path.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    tables: Vec<ForwardingTable>,
}

impl ShortestPaths {
    /// Builds forwarding tables towards every node.
    ///
    /// With the `parallel` feature the tables are built concurrently.
    pub fn build(edges: &[Edge], out_edges: &[Vec<EdgeId>], in_edges: &[Vec<EdgeId>]) -> Self {
        let n = out_edges.len();

        #[cfg(feature = "parallel")]
        let tables = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|dest| ForwardingTable::build(dest, edges, out_edges, in_edges))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let tables = (0..n)
            .map(|dest| ForwardingTable::build(dest, edges, out_edges, in_edges))
            .collect();

        Self { tables }
    }

    /// Number of nodes covered.
    pub fn node_count(&self) -> usize {
        self.tables.len()
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node < self.tables.len() {
            Ok(())
        } else {
            Err(SrteError::out_of_range("node", node, self.tables.len()))
        }
    }

    /// Least path cost from `src` to `dest`, `None` if unreachable or
    /// either node is unknown.
    pub fn distance(&self, src: NodeId, dest: NodeId) -> Option<u64> {
        if src >= self.tables.len() || dest >= self.tables.len() {
            return None;
        }
        self.tables[dest].cost(src)
    }

    /// Appends the shortest path `src -> dest` to `out`.
    ///
    /// `src == dest` appends nothing. On error `out` is left unchanged.
    pub fn append_path(
        &self,
        src: NodeId,
        dest: NodeId,
        edges: &[Edge],
        out: &mut Vec<EdgeId>,
    ) -> Result<()> {
        self.check_node(src)?;
        self.check_node(dest)?;
        if self.tables[dest].append_path(src, edges, out) {
            Ok(())
        } else {
            Err(SrteError::Unreachable { src, dest })
        }
    }

    /// Shortest path from `src` to `dest` as edge ids.
    pub fn shortest_path(&self, src: NodeId, dest: NodeId, edges: &[Edge]) -> Result<Vec<EdgeId>> {
        let mut path = Vec::new();
        self.append_path(src, dest, edges, &mut path)?;
        Ok(path)
    }

    /// Resolves `src -> waypoints... -> dest` into one edge sequence by
    /// concatenating the shortest path between consecutive stops.
    pub fn resolve_waypoints(
        &self,
        src: NodeId,
        dest: NodeId,
        waypoints: &[NodeId],
        edges: &[Edge],
    ) -> Result<Vec<EdgeId>> {
        let mut path = Vec::new();
        self.resolve_stops(
            std::iter::once(src)
                .chain(waypoints.iter().copied())
                .chain(std::iter::once(dest)),
            edges,
            &mut path,
            None,
        )?;
        Ok(path)
    }

    /// Resolves consecutive pairs of `stops`, appending to `path`.
    ///
    /// When `offsets` is given, the position in `path` at which each stop
    /// is reached is pushed to it (including the first stop).
    /// On error `path` and `offsets` are truncated back to their input length.
    pub(crate) fn resolve_stops<I>(
        &self,
        stops: I,
        edges: &[Edge],
        path: &mut Vec<EdgeId>,
        mut offsets: Option<&mut Vec<usize>>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let path_len = path.len();
        let offsets_len = offsets.as_ref().map_or(0, |o| o.len());

        let mut prev: Option<NodeId> = None;
        for stop in stops {
            if let Some(p) = prev {
                if let Err(err) = self.append_path(p, stop, edges, path) {
                    path.truncate(path_len);
                    if let Some(o) = offsets.as_deref_mut() {
                        o.truncate(offsets_len);
                    }
                    return Err(err);
                }
            }
            if let Some(o) = offsets.as_deref_mut() {
                o.push(path.len());
            }
            prev = Some(stop);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ring 0->1->2->3->0 plus a chord 0->2 of weight 3.
    fn ring() -> (Vec<Edge>, ShortestPaths) {
        let edges = vec![
            Edge { src: 0, dest: 1, weight: 1, capacity: 10 },
            Edge { src: 1, dest: 2, weight: 1, capacity: 10 },
            Edge { src: 2, dest: 3, weight: 1, capacity: 10 },
            Edge { src: 3, dest: 0, weight: 1, capacity: 10 },
            Edge { src: 0, dest: 2, weight: 3, capacity: 10 },
        ];
        let mut out = vec![Vec::new(); 4];
        let mut inc = vec![Vec::new(); 4];
        for (i, e) in edges.iter().enumerate() {
            out[e.src].push(i);
            inc[e.dest].push(i);
        }
        let sp = ShortestPaths::build(&edges, &out, &inc);
        (edges, sp)
    }

    #[test]
    fn test_shortest_path() {
        let (edges, sp) = ring();
        assert_eq!(sp.shortest_path(0, 2, &edges).unwrap(), vec![0, 1]);
        assert_eq!(sp.shortest_path(3, 2, &edges).unwrap(), vec![3, 0, 1]);
        assert_eq!(sp.distance(3, 2), Some(3));
        assert!(sp.shortest_path(1, 1, &edges).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_node() {
        let (edges, sp) = ring();
        assert!(matches!(
            sp.shortest_path(0, 9, &edges),
            Err(SrteError::OutOfRange { kind: "node", id: 9, .. })
        ));
        assert_eq!(sp.distance(9, 0), None);
    }

    #[test]
    fn test_resolve_waypoints_concatenates() {
        let (edges, sp) = ring();
        // 0 -> 3 via waypoint 1: (0->1) + (1->2->3)
        let path = sp.resolve_waypoints(0, 3, &[1], &edges).unwrap();
        assert_eq!(path, vec![0, 1, 2]);
        // empty waypoints is the plain shortest path
        assert_eq!(
            sp.resolve_waypoints(0, 3, &[], &edges).unwrap(),
            sp.shortest_path(0, 3, &edges).unwrap()
        );
    }

    #[test]
    fn test_resolve_waypoint_equal_to_src() {
        let (edges, sp) = ring();
        let path = sp.resolve_waypoints(0, 2, &[0], &edges).unwrap();
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn test_resolve_stops_offsets_and_rollback() {
        let (edges, sp) = ring();
        let mut path = Vec::new();
        let mut offsets = Vec::new();
        sp.resolve_stops([0, 2, 0], &edges, &mut path, Some(&mut offsets))
            .unwrap();
        assert_eq!(path, vec![0, 1, 2, 3]);
        assert_eq!(offsets, vec![0, 2, 4]);

        let mut path = vec![7];
        let mut offsets = vec![0];
        let err = sp
            .resolve_stops([0, 1, 9], &edges, &mut path, Some(&mut offsets))
            .unwrap_err();
        assert!(matches!(err, SrteError::OutOfRange { .. }));
        assert_eq!(path, vec![7]);
        assert_eq!(offsets, vec![0]);
    }
}
