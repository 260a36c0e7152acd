//! Solver and runner configuration.

/// Configuration of the link-guided solver.
///
/// Moves are scored as
/// `alpha * (max_before - max_after) - beta * max(0, cost_delta)`,
/// so `alpha` rewards lowering the worst link utilization and `beta`
/// penalizes longer paths.
///
/// # Examples
///
/// ```
/// use u_srte::lgs::LgsConfig;
///
/// let config = LgsConfig::default()
///     .with_alpha(10.0)
///     .with_beta(1.0)
///     .with_max_nodes(3);
/// assert_eq!(config.max_nodes, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LgsConfig {
    /// Weight of the utilization improvement.
    pub alpha: f64,
    /// Weight of the path-cost growth.
    pub beta: f64,
    /// Maximum number of waypoints per demand.
    pub max_nodes: usize,
}

impl Default for LgsConfig {
    fn default() -> Self {
        Self {
            alpha: 8.0,
            beta: 4.0,
            max_nodes: 2,
        }
    }
}

impl LgsConfig {
    /// Sets the utilization weight.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the path-cost weight.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the waypoint bound.
    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(format!("alpha must be positive and finite, got {}", self.alpha));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(format!("beta must be non-negative and finite, got {}", self.beta));
        }
        Ok(())
    }
}

/// Configuration of the [`LgsRunner`](super::LgsRunner) loop.
///
/// The first `greedy_iterations` iterations always work on the most
/// utilized edge; later ones draw the edge with
/// [`LinkGuidedSolver::select_edge`](super::LinkGuidedSolver::select_edge).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Total number of iterations.
    pub iterations: usize,
    /// Iterations that target the most utilized edge.
    pub greedy_iterations: usize,
    /// Seed of the uniform draws.
    pub seed: u64,
    /// Max utilization is sampled into the history every this many iterations.
    pub history_interval: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            greedy_iterations: 1_000,
            seed: 42,
            history_interval: 100,
        }
    }
}

impl RunConfig {
    /// Sets the total number of iterations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the number of greedy iterations.
    pub fn with_greedy_iterations(mut self, n: usize) -> Self {
        self.greedy_iterations = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the history sampling interval.
    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.history_interval == 0 {
            return Err("history_interval must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LgsConfig::default();
        assert!((config.alpha - 8.0).abs() < 1e-12);
        assert!((config.beta - 4.0).abs() < 1e-12);
        assert_eq!(config.max_nodes, 2);

        let run = RunConfig::default();
        assert_eq!(run.iterations, 10_000);
        assert_eq!(run.greedy_iterations, 1_000);
        assert_eq!(run.seed, 42);
    }

    #[test]
    fn test_validate_bad_alpha() {
        assert!(LgsConfig::default().with_alpha(0.0).validate().is_err());
        assert!(LgsConfig::default().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_bad_beta() {
        assert!(LgsConfig::default().with_beta(-1.0).validate().is_err());
        assert!(LgsConfig::default().with_beta(0.0).validate().is_ok());
    }

    #[test]
    fn test_run_config_builder() {
        let run = RunConfig::default()
            .with_iterations(50)
            .with_greedy_iterations(5)
            .with_seed(7)
            .with_history_interval(10);
        assert_eq!(run.iterations, 50);
        assert_eq!(run.greedy_iterations, 5);
        assert_eq!(run.seed, 7);
        assert!(run.validate().is_ok());
        assert!(run.with_history_interval(0).validate().is_err());
    }
}
