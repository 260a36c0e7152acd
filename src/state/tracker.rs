//! Incremental per-edge load and utilization.
//!
//! Loads change only through [`UtilizationTracker::apply_delta`]. An ordered
//! set keyed by `(utilization, Reverse(edge))` keeps the most utilized edge
//! at its end, so the max queries cost O(log m) and a delta touching `k`
//! edges costs O(k log m).

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};

use crate::topology::{DemandId, EdgeId};

/// Utilization of a link carrying `load` with the given `capacity`.
///
/// A zero-capacity link has utilization `0.0` while unloaded and
/// `f64::INFINITY` as soon as it carries anything.
pub fn utilization_of(load: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        if load == 0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        load as f64 / capacity as f64
    }
}

/// Totally ordered utilization value.
#[derive(Debug, Clone, Copy)]
struct UtilKey(f64);

impl PartialEq for UtilKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for UtilKey {}

impl PartialOrd for UtilKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UtilKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Per-edge load, utilization and demand contributions.
#[derive(Debug, Clone)]
pub struct UtilizationTracker {
    capacity: Vec<u64>,
    load: Vec<u64>,
    util: Vec<f64>,
    order: BTreeSet<(UtilKey, Reverse<EdgeId>)>,
    /// Load each demand puts on each edge.
    carriers: Vec<BTreeMap<DemandId, u64>>,
}

impl UtilizationTracker {
    /// Creates a tracker with zero load on every edge.
    pub fn new<I>(capacities: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let capacity: Vec<u64> = capacities.into_iter().collect();
        let m = capacity.len();
        Self {
            order: (0..m).map(|e| (UtilKey(0.0), Reverse(e))).collect(),
            load: vec![0; m],
            util: vec![0.0; m],
            carriers: vec![BTreeMap::new(); m],
            capacity,
        }
    }

    /// Number of tracked edges.
    pub fn edge_count(&self) -> usize {
        self.capacity.len()
    }

    /// Current load of `edge`.
    pub fn load(&self, edge: EdgeId) -> u64 {
        self.load[edge]
    }

    /// Current utilization of `edge`.
    pub fn utilization(&self, edge: EdgeId) -> f64 {
        self.util[edge]
    }

    /// Capacity of `edge`.
    pub fn capacity(&self, edge: EdgeId) -> u64 {
        self.capacity[edge]
    }

    /// Largest utilization over all edges, `0.0` without edges.
    pub fn max_utilization(&self) -> f64 {
        self.order.last().map_or(0.0, |(k, _)| k.0)
    }

    /// Edge with the largest utilization, smallest id among ties.
    pub fn most_utilized_edge(&self) -> Option<EdgeId> {
        self.order.last().map(|&(_, Reverse(e))| e)
    }

    /// Demands with load on `edge` and their contribution, ascending by id.
    pub fn carriers(&self, edge: EdgeId) -> impl Iterator<Item = (DemandId, u64)> + Clone + '_ {
        self.carriers[edge].iter().map(|(&d, &l)| (d, l))
    }

    /// Load `demand` places on `edge`.
    pub fn contribution(&self, edge: EdgeId, demand: DemandId) -> u64 {
        self.carriers[edge].get(&demand).copied().unwrap_or(0)
    }

    /// Adds `load_change` (negative to remove) to `edge` on behalf of `demand`.
    ///
    /// # Panics
    /// Panics if the edge or the demand's contribution would go negative;
    /// that means the incremental bookkeeping is out of sync with the paths.
    pub fn apply_delta(&mut self, edge: EdgeId, demand: DemandId, load_change: i64) {
        if load_change == 0 {
            return;
        }

        let contribution = self.carriers[edge].entry(demand).or_insert(0);
        *contribution = contribution.checked_add_signed(load_change).unwrap_or_else(|| {
            panic!("demand {demand} contribution on edge {edge} would go negative")
        });
        if *contribution == 0 {
            self.carriers[edge].remove(&demand);
        }

        let load = self.load[edge]
            .checked_add_signed(load_change)
            .unwrap_or_else(|| panic!("load on edge {edge} would go negative"));
        self.set_load(edge, load);
    }

    fn set_load(&mut self, edge: EdgeId, load: u64) {
        let removed = self.order.remove(&(UtilKey(self.util[edge]), Reverse(edge)));
        debug_assert!(removed, "edge {edge} missing from utilization order");

        self.load[edge] = load;
        self.util[edge] = utilization_of(load, self.capacity[edge]);
        self.order.insert((UtilKey(self.util[edge]), Reverse(edge)));
    }

    /// Max utilization if `changes` were applied, without applying them.
    ///
    /// `changes` must be sorted by edge id with one entry per edge, as
    /// produced by [`PathDelta::load_changes`](super::PathDelta::load_changes).
    pub fn hypothetical_max(&self, changes: &[(EdgeId, i64)]) -> f64 {
        let touched = changes
            .iter()
            .map(|&(e, change)| {
                let load = self.load[e]
                    .checked_add_signed(change)
                    .unwrap_or_else(|| panic!("simulated load on edge {e} would go negative"));
                utilization_of(load, self.capacity[e])
            })
            .fold(0.0, f64::max);

        // Walk down from the top until an edge outside `changes` shows up.
        let untouched = self
            .order
            .iter()
            .rev()
            .find(|(_, Reverse(e))| changes.binary_search_by_key(e, |&(c, _)| c).is_err())
            .map_or(0.0, |(k, _)| k.0);

        touched.max(untouched)
    }
}
