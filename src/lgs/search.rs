//! Link-guided move search.
//!
//! Given a congested edge and a demand routed over it, every single edit of
//! the demand's waypoint sequence is simulated and scored:
//!
//! ```text
//! score = alpha * (max_before - max_after) - beta * max(0, cost_delta)
//! ```
//!
//! Only the sub-path between the stops surrounding the edit is re-resolved;
//! the rest of the path cannot change because sub-paths of shortest paths
//! are resolved independently.
//!
//! Candidate waypoints are the nodes adjacent to either endpoint of the
//! edge, which keeps the neighborhood small while still offering every
//! one-hop detour around it.

use std::iter::once;

use tracing::trace;

use super::config::LgsConfig;
use super::types::Move;
use crate::error::Result;
use crate::state::{PathDelta, RoutingState, UtilizationTracker};
use crate::topology::{DemandId, EdgeId, NodeId, Topology};

/// Simulated effect of a move, as computed by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Max link utilization after the move.
    pub max_utilization: f64,
    /// Path weight added minus path weight removed.
    pub cost_delta: i64,
    /// Score of the move; only positive scores are improving.
    pub score: f64,
}

/// Read-only view of the solver used to search moves.
pub(crate) struct MoveSearch<'a> {
    pub topology: &'a Topology,
    pub routing: &'a RoutingState,
    pub tracker: &'a UtilizationTracker,
    pub config: &'a LgsConfig,
}

impl MoveSearch<'_> {
    /// Best improving move for `demand` around `edge`, if any beats `ceiling`.
    ///
    /// Ids must be valid.
    pub fn search(&self, edge: EdgeId, demand: DemandId, ceiling: f64) -> Option<(Move, Evaluation)> {
        if self.tracker.contribution(edge, demand) == 0 {
            trace!(edge, demand, "demand does not use edge");
            return None;
        }

        let mut best: Option<(Move, Evaluation)> = None;
        for mv in self.neighborhood(edge, demand) {
            let Ok(eval) = self.evaluate(demand, mv) else {
                continue;
            };
            if eval.score.is_nan() || eval.score <= 0.0 || eval.max_utilization >= ceiling {
                continue;
            }
            if best.map_or(true, |(_, b)| eval.score > b.score) {
                best = Some((mv, eval));
            }
        }

        trace!(edge, demand, found = ?best.map(|(m, _)| m), "move search done");
        best
    }

    /// Every structurally valid edit, in tie-break order.
    fn neighborhood(&self, edge: EdgeId, demand: DemandId) -> Vec<Move> {
        let waypoints = self.routing.waypoints(demand);
        let len = waypoints.len();
        let candidates = self.candidate_nodes(edge, demand);

        let mut moves = Vec::new();
        if len > 0 {
            moves.push(Move::Clear);
        }
        moves.extend((0..len).map(|position| Move::Remove { position }));
        for (position, &current) in waypoints.iter().enumerate() {
            moves.extend(
                candidates
                    .iter()
                    .filter(|&&node| node != current)
                    .map(|&node| Move::Update { position, node }),
            );
        }
        if len < self.config.max_nodes {
            for position in 0..=len {
                moves.extend(
                    candidates
                        .iter()
                        .map(|&node| Move::Insert { position, node }),
                );
            }
        }
        moves
    }

    /// Nodes adjacent to the endpoints of `edge`, ascending, excluding the
    /// endpoints themselves and the demand's own endpoints.
    fn candidate_nodes(&self, edge: EdgeId, demand: DemandId) -> Vec<NodeId> {
        let e = &self.topology.edges()[edge];
        let d = &self.topology.demands()[demand];

        let mut nodes: Vec<NodeId> = self
            .topology
            .neighbors(e.src)
            .iter()
            .chain(self.topology.neighbors(e.dest))
            .copied()
            .filter(|&n| n != e.src && n != e.dest && n != d.src && n != d.dest)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Simulates `mv` on `demand` without touching any state.
    pub fn evaluate(&self, demand: DemandId, mv: Move) -> Result<Evaluation> {
        let traffic = self.topology.demand(demand)?.traffic;
        let delta = self.simulate(demand, mv)?;

        let changes = delta.load_changes(traffic);
        let max_utilization = self.tracker.hypothetical_max(&changes);
        let cost_delta = delta.cost_delta(self.topology.edges());

        let score = self.config.alpha * (self.tracker.max_utilization() - max_utilization)
            - self.config.beta * cost_delta.max(0) as f64;

        Ok(Evaluation {
            max_utilization,
            cost_delta,
            score,
        })
    }

    /// Path delta of `mv`, re-resolving only the stops around the edit.
    fn simulate(&self, demand: DemandId, mv: Move) -> Result<PathDelta> {
        let d = self.topology.demand(demand)?;
        let waypoints = self.routing.waypoints(demand);
        let len = waypoints.len();
        mv.validate(len, self.config.max_nodes, self.topology.node_count())?;

        // Stops are [src, waypoints.., dest].
        let stop = |k: usize| -> NodeId {
            match k {
                0 => d.src,
                k if k <= len => waypoints[k - 1],
                _ => d.dest,
            }
        };

        let (from, to, inner) = match mv {
            Move::Clear => (0, len + 1, None),
            Move::Remove { position } => (position, position + 2, None),
            Move::Update { position, node } => (position, position + 2, Some(node)),
            Move::Insert { position, node } => (position, position + 1, Some(node)),
        };

        let mut sub_path = Vec::new();
        self.topology.paths().resolve_stops(
            once(stop(from)).chain(inner).chain(once(stop(to))),
            self.topology.edges(),
            &mut sub_path,
            None,
        )?;

        Ok(PathDelta::between(
            self.routing.segment(demand, from, to),
            &sub_path,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Instance;

    struct Fixture {
        topology: Topology,
        routing: RoutingState,
        tracker: UtilizationTracker,
        config: LgsConfig,
    }

    impl Fixture {
        fn new(instance: Instance, config: LgsConfig) -> Self {
            let topology = Topology::new(instance).unwrap();
            let routing = RoutingState::new(&topology, config.max_nodes).unwrap();
            let mut tracker = UtilizationTracker::new(topology.edges().iter().map(|e| e.capacity));
            for (d, demand) in topology.demands().iter().enumerate() {
                for &e in routing.path(d) {
                    tracker.apply_delta(e, d, demand.traffic as i64);
                }
            }
            Self {
                topology,
                routing,
                tracker,
                config,
            }
        }

        fn search(&self) -> MoveSearch<'_> {
            MoveSearch {
                topology: &self.topology,
                routing: &self.routing,
                tracker: &self.tracker,
                config: &self.config,
            }
        }
    }

    /// Direct edge 0->1 (cap 10) and a detour 0->2->1 (cap 100).
    fn detour() -> Instance {
        let mut inst = Instance::new();
        inst.add_edge(0, 1, 1, 10);
        inst.add_edge(0, 2, 1, 100);
        inst.add_edge(2, 1, 1, 100);
        inst.add_demand(0, 1, 12).unwrap();
        inst
    }

    #[test]
    fn test_insert_detour_found() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(1));
        let (mv, eval) = f.search().search(0, 0, f.tracker.max_utilization()).unwrap();

        assert_eq!(mv, Move::Insert { position: 0, node: 2 });
        assert!((eval.max_utilization - 0.12).abs() < 1e-12);
        assert_eq!(eval.cost_delta, 1);
        assert!(eval.score > 0.0);
    }

    #[test]
    fn test_no_move_without_waypoint_budget() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(0));
        assert!(f.search().neighborhood(0, 0).is_empty());
        assert!(f.search().search(0, 0, f.tracker.max_utilization()).is_none());
    }

    #[test]
    fn test_ceiling_blocks_moves() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(1));
        assert!(f.search().search(0, 0, 0.12).is_none());
        assert!(f.search().search(0, 0, 0.1201).is_some());
    }

    #[test]
    fn test_heavy_cost_penalty_blocks_moves() {
        let f = Fixture::new(
            detour(),
            LgsConfig::default().with_max_nodes(1).with_alpha(1.0).with_beta(10.0),
        );
        assert!(f.search().search(0, 0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_edge_not_on_path() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(1));
        assert!(f.search().search(1, 0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_neighborhood_order() {
        let mut inst = detour();
        inst.add_edge(3, 0, 1, 10);
        let f = Fixture::new(inst, LgsConfig::default().with_max_nodes(1));

        // candidates around edge 0 (0->1): 2 and 3; demand endpoints excluded
        assert_eq!(f.search().candidate_nodes(0, 0), vec![2, 3]);
        assert_eq!(
            f.search().neighborhood(0, 0),
            vec![
                Move::Insert { position: 0, node: 2 },
                Move::Insert { position: 0, node: 3 },
            ]
        );
    }

    #[test]
    fn test_evaluate_does_not_mutate() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(1));
        let before = f.tracker.load(0);
        let eval = f
            .search()
            .evaluate(0, Move::Insert { position: 0, node: 2 })
            .unwrap();
        assert!(eval.score > 0.0);
        assert_eq!(f.tracker.load(0), before);
        assert!(f.routing.waypoints(0).is_empty());
    }

    #[test]
    fn test_evaluate_rejects_invalid() {
        let f = Fixture::new(detour(), LgsConfig::default().with_max_nodes(1));
        assert!(f.search().evaluate(0, Move::Clear).is_err());
        assert!(f.search().evaluate(0, Move::Remove { position: 0 }).is_err());
    }
}
