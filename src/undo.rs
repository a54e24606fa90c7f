//! Undo-log entries.
//!
//! Each executed operation pushes exactly one [`Undo`] entry onto the board's
//! move stack; undo pops the tail and inverts it. Raw grid writes made by
//! position edits go to a separate stack of [`GridChange`] records.

use crate::grid::{Cell, Color, Point};

/// How a neighbour of a placed stone was classified when the move executed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NeighborClass {
    /// Empty, off-board, or a string already classified via another side
    #[default]
    None,
    /// First contact with a same-colored string
    Ally,
    /// Opposing string that lost a liberty but survived
    Opponent,
    /// Opposing string whose last liberty was filled
    Capture,
}

/// Ko state: the color that just took a ko, and the point it captured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KoState {
    pub master: Option<Color>,
    pub position: Option<Point>,
}

impl KoState {
    pub const NONE: KoState = KoState {
        master: None,
        position: None,
    };

    /// Whether `color` is barred from playing at `pt` by this ko.
    pub fn forbids(&self, color: Color, pt: Point) -> bool {
        self.master == Some(color.other()) && self.position == Some(pt)
    }
}

/// One entry of the move stack.
#[derive(Clone, Debug, PartialEq)]
pub enum Undo {
    /// A stone placement, possibly over an existing stone.
    Normal {
        color: Color,
        pos: Point,
        /// Cell content before the move
        previous: Cell,
        /// Classification of the N, E, S, W neighbours
        neighbors: [NeighborClass; 4],
        /// Liberty count of the surviving ally string before the join
        previous_liberties: i32,
        /// The placed string was removed as self-capture
        suicide: bool,
        ko: KoState,
        prisoners: [u32; 2],
        move_number: u32,
    },
    Pass {
        color: Color,
        ko: KoState,
        move_number: u32,
    },
    /// A bulk edit of the grid applied outside normal play.
    PositionChange {
        /// Number of raw grid writes to unwind
        num_changes: usize,
        ko: KoState,
        move_number: u32,
    },
    /// Zero-effect marker keeping move numbers aligned.
    Dummy { move_number: u32 },
}

impl Undo {
    /// Move number recorded before this entry was applied.
    pub fn move_number(&self) -> u32 {
        match self {
            Undo::Normal { move_number, .. }
            | Undo::Pass { move_number, .. }
            | Undo::PositionChange { move_number, .. }
            | Undo::Dummy { move_number } => *move_number,
        }
    }
}

/// A raw grid write, undone by restoring `previous`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridChange {
    pub pos: Point,
    pub previous: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ko_forbids_only_opponent_at_point() {
        let ko = KoState {
            master: Some(Color::White),
            position: Some(42),
        };
        assert!(ko.forbids(Color::Black, 42));
        assert!(!ko.forbids(Color::White, 42));
        assert!(!ko.forbids(Color::Black, 43));
        assert!(!KoState::NONE.forbids(Color::Black, 42));
    }
}
