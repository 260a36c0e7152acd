//! Seeded driver loop for the link-guided solver.
//!
//! # Algorithm
//!
//! 1. For the first `greedy_iterations` iterations take the most utilized
//!    edge; afterwards draw an edge proportionally to utilization
//! 2. Draw a demand routed over that edge, proportionally to its traffic
//! 3. Search the best move for that demand with the current max utilization
//!    as ceiling
//! 4. Apply it if one exists
//!
//! Every accepted move strictly lowers the max utilization, so the recorded
//! history is non-increasing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::config::RunConfig;
use super::solver::LinkGuidedSolver;
use super::types::{Move, MoveType};

/// Result of an [`LgsRunner`] run.
#[derive(Debug, Clone)]
pub struct LgsResult {
    /// Max utilization before the first iteration.
    pub initial_max_utilization: f64,

    /// Max utilization after the last iteration.
    pub final_max_utilization: f64,

    /// Iterations executed.
    pub iterations: usize,

    /// Moves applied.
    pub applied_moves: usize,

    /// Applied moves per [`MoveType`], indexed by [`MoveType::index`].
    pub moves_by_type: [usize; 4],

    /// Iterations that found no edge, no demand or no improving move.
    pub skipped: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Max utilization sampled every `history_interval` iterations, starting
    /// with the initial value.
    pub utilization_history: Vec<f64>,
}

/// Executes the local-search loop on a solver.
pub struct LgsRunner;

impl LgsRunner {
    /// Runs the loop to completion.
    ///
    /// # Panics
    /// Panics if `config` fails validation.
    pub fn run(solver: &mut LinkGuidedSolver, config: &RunConfig) -> LgsResult {
        Self::run_with_cancel(solver, config, None)
    }

    /// Runs the loop with an optional cancellation token, checked before
    /// each iteration.
    pub fn run_with_cancel(
        solver: &mut LinkGuidedSolver,
        config: &RunConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> LgsResult {
        config.validate().expect("invalid RunConfig");

        let mut rng = StdRng::seed_from_u64(config.seed);

        let initial_max_utilization = solver.max_utilization();
        let mut utilization_history = vec![initial_max_utilization];
        let mut moves_by_type = [0usize; 4];
        let mut applied_moves = 0usize;
        let mut skipped = 0usize;
        let mut iterations = 0usize;
        let mut cancelled = false;

        for iteration in 0..config.iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            match Self::step(solver, iteration < config.greedy_iterations, &mut rng) {
                Some(mv) => {
                    applied_moves += 1;
                    moves_by_type[mv.move_type().index()] += 1;
                }
                None => skipped += 1,
            }
            iterations += 1;

            if iterations.is_multiple_of(config.history_interval) {
                utilization_history.push(solver.max_utilization());
                debug!(
                    iteration = iterations,
                    max_utilization = solver.max_utilization(),
                    "local search progress"
                );
            }
        }

        let final_max_utilization = solver.max_utilization();
        info!(
            iterations,
            applied_moves,
            initial_max = initial_max_utilization,
            final_max = final_max_utilization,
            cancelled,
            "local search finished"
        );

        LgsResult {
            initial_max_utilization,
            final_max_utilization,
            iterations,
            applied_moves,
            moves_by_type,
            skipped,
            cancelled,
            utilization_history,
        }
    }

    /// One select-search-apply iteration. Returns the applied move.
    fn step<R: Rng>(solver: &mut LinkGuidedSolver, greedy: bool, rng: &mut R) -> Option<Move> {
        let edge = if greedy {
            solver.most_utilized_edge()?
        } else {
            solver.select_edge(rng.random::<f64>()).ok()?
        };

        let demand = solver.select_demand(edge, rng.random::<f64>()).ok()??;
        let mv = solver
            .search(edge, demand, solver.max_utilization())
            .ok()??;

        solver.apply_move(demand, mv).then_some(mv)
    }
}

impl LgsResult {
    /// Applied moves of the given type.
    pub fn moves_of(&self, move_type: MoveType) -> usize {
        self.moves_by_type[move_type.index()]
    }
}
