//! Shortest-path engine.
//!
//! Paths are read from per-destination forwarding tables computed with
//! Dijkstra's algorithm over non-negative edge weights, the way a link-state
//! IGP resolves each segment of a segment-routed path.
//!
//! # References
//!
//! - Dijkstra, E. W. (1959). "A note on two problems in connexion with graphs",
//!   *Numerische Mathematik* 1, 269-271.
//! - Filsfils, C. et al. (2015). "The Segment Routing Architecture",
//!   *IEEE GLOBECOM*.

mod engine;
mod table;

pub use engine::ShortestPaths;
pub use table::ForwardingTable;
