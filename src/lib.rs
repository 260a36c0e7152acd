//! Segment-routing traffic engineering by local search.
//!
//! Given a directed network with link capacities and a set of traffic
//! demands, the solver re-routes demands through short sequences of
//! waypoint nodes to minimize the worst link utilization.
//!
//! - **Topology**: edges, demands and node adjacency, immutable once built.
//! - **Paths**: per-destination shortest-path forwarding tables and
//!   waypoint resolution.
//! - **State**: per-demand routing and incrementally maintained link loads.
//! - **LGS**: link-guided move search, weighted selection driven by
//!   caller-supplied draws, and a seeded driver loop.
//!
//! # Architecture
//!
//! The crate sits next to `u-metaheur` at Layer 2 (Algorithms) in the
//! U-Engine ecosystem. It is single-threaded by design: a
//! [`topology::Topology`] can be shared by many solvers through an `Arc`,
//! while each [`lgs::LinkGuidedSolver`] owns its mutable state.
//!
//! # Example
//!
//! ```
//! use u_srte::lgs::{LgsConfig, LgsRunner, LinkGuidedSolver, RunConfig};
//! use u_srte::topology::Instance;
//!
//! let mut inst = Instance::new();
//! inst.add_edge(0, 1, 1, 10);
//! inst.add_edge(0, 2, 1, 100);
//! inst.add_edge(2, 1, 1, 100);
//! inst.add_demand(0, 1, 12).unwrap();
//!
//! let mut solver =
//!     LinkGuidedSolver::from_instance(inst, LgsConfig::default().with_max_nodes(1)).unwrap();
//! let result = LgsRunner::run(&mut solver, &RunConfig::default().with_iterations(10));
//! assert!(result.final_max_utilization < result.initial_max_utilization);
//! ```

pub mod error;
pub mod lgs;
pub mod paths;
pub mod state;
pub mod topology;

pub use error::{Result, SrteError};
