//! The link-guided local-search solver.

use std::sync::Arc;

use tracing::{debug, info};

use super::config::LgsConfig;
use super::search::{Evaluation, MoveSearch};
use super::select;
use super::types::Move;
use crate::error::{Result, SrteError};
use crate::state::{utilization_of, RoutingState, UtilizationTracker};
use crate::topology::{DemandId, EdgeId, Instance, NodeId, Topology};

/// Local-search solver over a shared [`Topology`].
///
/// Holds the routing of every demand and the resulting link loads, and keeps
/// both consistent across [`apply_move`](Self::apply_move) calls. Cloning a
/// solver yields an independent copy that shares the topology.
///
/// # Examples
///
/// ```
/// use u_srte::lgs::{LgsConfig, LinkGuidedSolver, Move};
/// use u_srte::topology::Instance;
///
/// let mut inst = Instance::new();
/// inst.add_edge(0, 1, 1, 10);
/// inst.add_edge(0, 2, 1, 100);
/// inst.add_edge(2, 1, 1, 100);
/// inst.add_demand(0, 1, 12).unwrap();
///
/// let mut solver =
///     LinkGuidedSolver::from_instance(inst, LgsConfig::default().with_max_nodes(1)).unwrap();
/// assert!((solver.max_utilization() - 1.2).abs() < 1e-12);
///
/// let edge = solver.most_utilized_edge().unwrap();
/// let demand = solver.select_demand(edge, 0.5).unwrap().unwrap();
/// let mv = solver.search(edge, demand, solver.max_utilization()).unwrap().unwrap();
/// assert_eq!(mv, Move::Insert { position: 0, node: 2 });
/// assert!(solver.apply_move(demand, mv));
/// assert!(solver.max_utilization() < 1.2);
/// ```
#[derive(Debug, Clone)]
pub struct LinkGuidedSolver {
    topology: Arc<Topology>,
    config: LgsConfig,
    routing: RoutingState,
    tracker: UtilizationTracker,
}

impl LinkGuidedSolver {
    /// Creates a solver routing every demand on its shortest path.
    ///
    /// # Errors
    /// [`SrteError::InvalidConfig`] if `config` fails validation.
    pub fn new(topology: Arc<Topology>, config: LgsConfig) -> Result<Self> {
        config.validate().map_err(SrteError::InvalidConfig)?;

        let routing = RoutingState::new(&topology, config.max_nodes)?;
        let mut tracker = UtilizationTracker::new(topology.edges().iter().map(|e| e.capacity));
        for (d, demand) in topology.demands().iter().enumerate() {
            for &e in routing.path(d) {
                tracker.apply_delta(e, d, demand.traffic as i64);
            }
        }

        info!(
            edges = topology.edge_count(),
            demands = topology.demand_count(),
            max_nodes = config.max_nodes,
            max_utilization = tracker.max_utilization(),
            "solver initialized"
        );

        Ok(Self {
            topology,
            config,
            routing,
            tracker,
        })
    }

    /// Builds the topology from `instance` and creates a solver on it.
    pub fn from_instance(instance: Instance, config: LgsConfig) -> Result<Self> {
        Self::new(Arc::new(Topology::new(instance)?), config)
    }

    /// The shared topology.
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// The solver configuration.
    pub fn config(&self) -> &LgsConfig {
        &self.config
    }

    fn check_edge(&self, edge: EdgeId) -> Result<()> {
        self.topology.edge(edge).map(|_| ())
    }

    fn check_demand(&self, demand: DemandId) -> Result<()> {
        self.topology.demand(demand).map(|_| ())
    }

    // ---- Queries ----

    /// Largest link utilization.
    pub fn max_utilization(&self) -> f64 {
        self.tracker.max_utilization()
    }

    /// Most utilized edge, smallest id among ties. `None` without edges.
    pub fn most_utilized_edge(&self) -> Option<EdgeId> {
        self.tracker.most_utilized_edge()
    }

    /// Load carried by `edge`.
    pub fn edge_load(&self, edge: EdgeId) -> Result<u64> {
        self.check_edge(edge)?;
        Ok(self.tracker.load(edge))
    }

    /// Utilization of `edge`.
    pub fn edge_utilization(&self, edge: EdgeId) -> Result<f64> {
        self.check_edge(edge)?;
        Ok(self.tracker.utilization(edge))
    }

    /// Current waypoint sequence of `demand`.
    pub fn waypoints(&self, demand: DemandId) -> Result<&[NodeId]> {
        self.check_demand(demand)?;
        Ok(self.routing.waypoints(demand))
    }

    /// Current resolved path of `demand`.
    pub fn path(&self, demand: DemandId) -> Result<&[EdgeId]> {
        self.check_demand(demand)?;
        Ok(self.routing.path(demand))
    }

    /// Total weight of `demand`'s current path.
    pub fn path_cost(&self, demand: DemandId) -> Result<u64> {
        Ok(self.topology.path_cost(self.path(demand)?))
    }

    // ---- Selection ----

    /// Draws an edge proportionally to utilization from the uniform draw `r`.
    ///
    /// # Errors
    /// [`SrteError::Empty`] if no edge is loaded.
    pub fn select_edge(&self, r: f64) -> Result<EdgeId> {
        select::select_edge(&self.tracker, r)
    }

    /// Draws a demand routed over `edge` proportionally to its traffic.
    /// `Ok(None)` if the edge carries nothing.
    pub fn select_demand(&self, edge: EdgeId, r: f64) -> Result<Option<DemandId>> {
        self.check_edge(edge)?;
        Ok(select::select_demand(
            &self.tracker,
            self.topology.demands(),
            edge,
            r,
        ))
    }

    // ---- Search / apply ----

    fn move_search(&self) -> MoveSearch<'_> {
        MoveSearch {
            topology: &self.topology,
            routing: &self.routing,
            tracker: &self.tracker,
            config: &self.config,
        }
    }

    /// Best improving single edit of `demand`'s waypoints that relieves
    /// `edge` and keeps the max utilization below `ceiling`.
    ///
    /// `Ok(None)` when the demand does not use the edge or nothing improves.
    pub fn search(&self, edge: EdgeId, demand: DemandId, ceiling: f64) -> Result<Option<Move>> {
        self.check_edge(edge)?;
        self.check_demand(demand)?;
        Ok(self
            .move_search()
            .search(edge, demand, ceiling)
            .map(|(mv, _)| mv))
    }

    /// Simulates `mv` on `demand` and reports its effect without applying it.
    pub fn evaluate_move(&self, demand: DemandId, mv: Move) -> Result<Evaluation> {
        self.check_demand(demand)?;
        self.move_search().evaluate(demand, mv)
    }

    /// Applies `mv` to `demand`, reporting why it was rejected.
    ///
    /// On error nothing changes.
    pub fn try_apply_move(&mut self, demand: DemandId, mv: Move) -> Result<()> {
        let traffic = self.topology.demand(demand)?.traffic;
        let waypoints = mv.apply_to(
            self.routing.waypoints(demand),
            self.config.max_nodes,
            self.topology.node_count(),
        )?;

        let delta = self
            .routing
            .set_waypoints(&self.topology, demand, waypoints)?;
        for (edge, change) in delta.load_changes(traffic) {
            self.tracker.apply_delta(edge, demand, change);
        }

        debug!(
            demand,
            %mv,
            max_utilization = self.tracker.max_utilization(),
            "move applied"
        );
        Ok(())
    }

    /// Applies `mv` to `demand`. Returns `false`, without changing anything,
    /// if the move is invalid for the demand's current waypoints or its
    /// path cannot be resolved.
    pub fn apply_move(&mut self, demand: DemandId, mv: Move) -> bool {
        match self.try_apply_move(demand, mv) {
            Ok(()) => true,
            Err(err) => {
                debug!(demand, %mv, %err, "move rejected");
                false
            }
        }
    }

    /// Recomputes every load from the resolved paths and compares it with
    /// the incrementally tracked values.
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        let edges = self.topology.edges();
        let mut load = vec![0u64; edges.len()];
        for (d, demand) in self.topology.demands().iter().enumerate() {
            for &e in self.routing.path(d) {
                load[e] += demand.traffic;
            }
        }

        let mut max = 0.0f64;
        for (e, edge) in edges.iter().enumerate() {
            if self.tracker.load(e) != load[e] {
                return Err(format!(
                    "edge {e}: tracked load {} but paths give {}",
                    self.tracker.load(e),
                    load[e]
                ));
            }
            let util = utilization_of(load[e], edge.capacity);
            if self.tracker.utilization(e) != util {
                return Err(format!("edge {e}: stale utilization"));
            }
            max = max.max(util);
        }

        if self.tracker.max_utilization() != max {
            return Err(format!(
                "tracked max utilization {} but edges give {max}",
                self.tracker.max_utilization()
            ));
        }
        if let Some(top) = self.tracker.most_utilized_edge() {
            let first = (0..edges.len()).find(|&e| self.tracker.utilization(e) == max);
            if first != Some(top) {
                return Err(format!("most utilized edge {top} but expected {first:?}"));
            }
        }
        Ok(())
    }
}
