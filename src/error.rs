//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors produced by topology construction, routing and the solver API.
///
/// During a search loop, [`SrteError::InvalidMove`],
/// [`SrteError::LengthExceeded`] and [`SrteError::Empty`] are expected
/// outcomes that a driver skips over. The remaining kinds usually point at
/// bad construction inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SrteError {
    /// An edge, demand or node id does not exist.
    #[error("{kind} {id} out of range (count {count})")]
    OutOfRange {
        /// Which kind of entity was addressed ("edge", "demand", "node").
        kind: &'static str,
        /// The offending id.
        id: usize,
        /// Number of entities of that kind.
        count: usize,
    },

    /// A waypoint sequence would be longer than `max_nodes`.
    #[error("waypoint sequence of length {len} exceeds max_nodes {max_nodes}")]
    LengthExceeded {
        /// Requested length.
        len: usize,
        /// Configured bound.
        max_nodes: usize,
    },

    /// The move does not fit the demand's current waypoint sequence.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// No path exists between two nodes that must be connected.
    #[error("node {dest} is unreachable from node {src}")]
    Unreachable {
        /// Start of the failed sub-path.
        src: usize,
        /// End of the failed sub-path.
        dest: usize,
    },

    /// Weighted selection over a distribution whose total weight is zero.
    #[error("weighted selection over zero total weight")]
    Empty,

    /// A demand violates `traffic > 0` or `src != dest`.
    #[error("invalid demand: {0}")]
    InvalidDemand(String),

    /// A configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SrteError>;

impl SrteError {
    pub(crate) fn out_of_range(kind: &'static str, id: usize, count: usize) -> Self {
        SrteError::OutOfRange { kind, id, count }
    }
}
