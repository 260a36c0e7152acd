//! Weighted selection driven by caller-supplied uniform draws.
//!
//! Nothing here owns a random number generator: the same draw on the same
//! state always yields the same choice, so a whole search trajectory is
//! reproducible from the caller's seed.

use crate::error::{Result, SrteError};
use crate::state::UtilizationTracker;
use crate::topology::{Demand, DemandId, EdgeId};

/// Roulette wheel over `(id, weight)` pairs in the given order.
///
/// Returns the id whose cumulative interval contains `r * total`, or `None`
/// when the total weight is zero. `r` is clamped to `[0, 1]`.
fn roulette<I>(items: I, r: f64) -> Option<usize>
where
    I: Iterator<Item = (usize, f64)> + Clone,
{
    let total: f64 = items.clone().map(|(_, w)| w).sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    let r = if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) };
    let threshold = r * total;
    let mut cumulative = 0.0;
    let mut last = None;
    for (id, w) in items {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        if cumulative > threshold {
            return Some(id);
        }
        last = Some(id);
    }

    last // floating-point fallback
}

/// Draws an edge with probability proportional to its utilization.
///
/// Loaded zero-capacity edges have infinite weight; if any exist the draw
/// picks uniformly among them instead.
///
/// # Errors
/// [`SrteError::Empty`] if no edge carries load.
pub fn select_edge(tracker: &UtilizationTracker, r: f64) -> Result<EdgeId> {
    let m = tracker.edge_count();

    let saturated: Vec<EdgeId> = (0..m)
        .filter(|&e| tracker.utilization(e).is_infinite())
        .collect();
    if !saturated.is_empty() {
        let r = if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) };
        let i = ((r * saturated.len() as f64) as usize).min(saturated.len() - 1);
        return Ok(saturated[i]);
    }

    roulette((0..m).map(|e| (e, tracker.utilization(e))), r).ok_or(SrteError::Empty)
}

/// Draws a demand carried by `edge`, with probability proportional to its
/// traffic. A demand crossing the edge several times counts once. `None` if
/// the edge carries nothing.
pub fn select_demand(
    tracker: &UtilizationTracker,
    demands: &[Demand],
    edge: EdgeId,
    r: f64,
) -> Option<DemandId> {
    roulette(
        tracker
            .carriers(edge)
            .map(|(d, _)| (d, demands[d].traffic as f64)),
        r,
    )
}
