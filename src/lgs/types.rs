//! Moves on a demand's waypoint sequence.

use std::fmt;

use crate::error::{Result, SrteError};
use crate::topology::NodeId;

/// Kind of a [`Move`], with the ordinals used for tie-breaking and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MoveType {
    /// Drop every waypoint.
    Clear = 1,
    /// Drop one waypoint.
    Remove = 2,
    /// Replace one waypoint.
    Update = 3,
    /// Add one waypoint.
    Insert = 4,
}

impl MoveType {
    /// All move types in ordinal order.
    pub const ALL: [MoveType; 4] = [
        MoveType::Clear,
        MoveType::Remove,
        MoveType::Update,
        MoveType::Insert,
    ];

    /// Zero-based index into [`MoveType::ALL`].
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

/// A single edit to one demand's waypoint sequence.
///
/// The derived ordering (type ordinal, then position, then node) is the
/// tie-break order of the move search.
///
/// # Examples
///
/// ```
/// use u_srte::lgs::Move;
///
/// let seq = Move::Insert { position: 0, node: 4 }.apply_to(&[7], 2, 10).unwrap();
/// assert_eq!(seq, vec![4, 7]);
///
/// assert!(Move::Clear.apply_to(&[], 2, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    /// Reset the sequence to empty (plain shortest path).
    Clear,
    /// Remove the waypoint at `position`.
    Remove {
        /// Index of the waypoint to drop.
        position: usize,
    },
    /// Replace the waypoint at `position` with `node`.
    Update {
        /// Index of the waypoint to replace.
        position: usize,
        /// New waypoint.
        node: NodeId,
    },
    /// Insert `node` before index `position` (`position == len` appends).
    Insert {
        /// Insertion index in `0..=len`.
        position: usize,
        /// New waypoint.
        node: NodeId,
    },
}

impl Move {
    /// The kind of this move.
    pub fn move_type(&self) -> MoveType {
        match self {
            Move::Clear => MoveType::Clear,
            Move::Remove { .. } => MoveType::Remove,
            Move::Update { .. } => MoveType::Update,
            Move::Insert { .. } => MoveType::Insert,
        }
    }

    /// Position the move addresses (`0` for [`Move::Clear`]).
    pub fn position(&self) -> usize {
        match *self {
            Move::Clear => 0,
            Move::Remove { position }
            | Move::Update { position, .. }
            | Move::Insert { position, .. } => position,
        }
    }

    /// Node the move introduces, if any.
    pub fn node(&self) -> Option<NodeId> {
        match *self {
            Move::Update { node, .. } | Move::Insert { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Checks the move against a sequence of length `len`.
    ///
    /// # Errors
    /// - [`SrteError::InvalidMove`] for a position or node out of bounds,
    ///   or [`Move::Clear`] on an empty sequence.
    /// - [`SrteError::LengthExceeded`] if an insert would exceed `max_nodes`.
    pub fn validate(&self, len: usize, max_nodes: usize, node_count: usize) -> Result<()> {
        match *self {
            Move::Clear if len == 0 => Err(SrteError::InvalidMove(
                "clear on an empty waypoint sequence".into(),
            )),
            Move::Clear => Ok(()),
            Move::Remove { position } if position >= len => Err(SrteError::InvalidMove(
                format!("remove at {position} on a sequence of length {len}"),
            )),
            Move::Remove { .. } => Ok(()),
            Move::Update { position, node } => {
                if position >= len {
                    Err(SrteError::InvalidMove(format!(
                        "update at {position} on a sequence of length {len}"
                    )))
                } else if node >= node_count {
                    Err(SrteError::InvalidMove(format!("unknown node {node}")))
                } else {
                    Ok(())
                }
            }
            Move::Insert { position, node } => {
                if position > len {
                    Err(SrteError::InvalidMove(format!(
                        "insert at {position} on a sequence of length {len}"
                    )))
                } else if node >= node_count {
                    Err(SrteError::InvalidMove(format!("unknown node {node}")))
                } else if len + 1 > max_nodes {
                    Err(SrteError::LengthExceeded {
                        len: len + 1,
                        max_nodes,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns the sequence obtained by applying this move to `waypoints`.
    pub fn apply_to(
        &self,
        waypoints: &[NodeId],
        max_nodes: usize,
        node_count: usize,
    ) -> Result<Vec<NodeId>> {
        self.validate(waypoints.len(), max_nodes, node_count)?;

        let mut seq = waypoints.to_vec();
        match *self {
            Move::Clear => seq.clear(),
            Move::Remove { position } => {
                seq.remove(position);
            }
            Move::Update { position, node } => seq[position] = node,
            Move::Insert { position, node } => seq.insert(position, node),
        }
        Ok(seq)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Clear => write!(f, "clear"),
            Move::Remove { position } => write!(f, "remove({position})"),
            Move::Update { position, node } => write!(f, "update({position}, {node})"),
            Move::Insert { position, node } => write!(f, "insert({position}, {node})"),
        }
    }
}
