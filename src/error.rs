//! Error types for the rules engine.
//!
//! Contract violations (playing off the board, undoing an empty log) are
//! panics. These types cover the outcomes callers are expected to handle.

use thiserror::Error;

/// Why a point move is rejected by [`crate::rules::check_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Point lies outside the board
    #[error("illegal move: point is off the board")]
    OffBoard,
    /// Point is not empty
    #[error("illegal move: point not empty")]
    Occupied,
    /// Move retakes a ko immediately
    #[error("illegal move: retakes ko")]
    Ko,
    /// Move would leave its own string without liberties
    #[error("illegal move: suicide")]
    Suicide,
}

/// Errors from board construction, text parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unsupported board size {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    #[error("invalid vertex `{0}`")]
    InvalidVertex(String),

    #[error("cannot place {requested} fixed handicap stones on {width}x{height} (2 to {max} allowed)")]
    InvalidHandicap {
        requested: usize,
        max: usize,
        width: usize,
        height: usize,
    },

    #[error("string table inconsistent at {vertex}: {reason}")]
    Inconsistent { vertex: String, reason: String },
}
