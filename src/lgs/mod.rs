//! Link-Guided Search (LGS) for segment-routing traffic engineering.
//!
//! A local search that repeatedly picks a congested link, picks a demand
//! routed over it and edits that demand's waypoint sequence (at most
//! `max_nodes` intermediate segments) so that the worst link utilization
//! drops while path length grows as little as possible.
//!
//! The solver exposes each step separately so that callers can drive the
//! loop with their own random draws; [`LgsRunner`] bundles the standard
//! loop with a seeded generator.
//!
//! # References
//!
//! - Gay, S., Hartert, R. & Vissicchio, S. (2017). "Expect the unexpected:
//!   Sub-second optimization for segment routing", *IEEE INFOCOM*.
//! - Bhatia, R. et al. (2015). "Optimized network traffic engineering using
//!   segment routing", *IEEE INFOCOM*.

mod config;
mod runner;
mod search;
mod select;
mod solver;
mod types;

pub use config::{LgsConfig, RunConfig};
pub use runner::{LgsResult, LgsRunner};
pub use search::Evaluation;
pub use solver::LinkGuidedSolver;
pub use types::{Move, MoveType};
