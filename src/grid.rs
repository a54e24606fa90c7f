//! Stone colors, cell values and the sentinel-bordered grid.
//!
//! A [`Point`] is an index into the fixed backing array described in
//! [`crate::constants`]. Stepping to a neighbour is a single addition of a
//! [`DELTA`] offset; off-board cells hold [`Cell::Off`] forever.

use std::fmt;
use std::ops::Index;

use crate::constants::{DELTA, GRID_SIZE, GRID_WIDTH, MAX_HEIGHT, MAX_WIDTH, MIN_BOARD_SIZE};
use crate::error::BoardError;

/// A point on the board, represented as an index into the backing array.
pub type Point = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The opposing color.
    #[inline]
    pub fn other(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Index into per-color arrays (Black = 0, White = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Content of one backing-array cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
    /// Off-board sentinel
    Off,
}

impl Cell {
    /// Stone color held by this cell, if any.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            Cell::Empty | Cell::Off => None,
        }
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        matches!(self, Cell::Black | Cell::White)
    }
}

impl From<Color> for Cell {
    #[inline]
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// A move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Play(Point),
    Pass,
}

/// Backing index of board coordinate `(x, y)`, with `(0, 0)` the top-left.
#[inline]
pub const fn position(x: usize, y: usize) -> Point {
    (y + 1) * GRID_WIDTH + x + 1
}

/// Inverse of [`position`] for points inside the maximal board.
#[inline]
pub const fn coords(pt: Point) -> (usize, usize) {
    (pt % GRID_WIDTH - 1, pt / GRID_WIDTH - 1)
}

/// Get the 4 orthogonal neighbours (N, E, S, W) of a point.
#[inline]
pub fn neighbors(pt: Point) -> [Point; 4] {
    [
        (pt as isize + DELTA[0]) as usize,
        (pt as isize + DELTA[1]) as usize,
        (pt as isize + DELTA[2]) as usize,
        (pt as isize + DELTA[3]) as usize,
    ]
}

/// Get the 4 diagonal neighbours (NE, SE, SW, NW) of a point.
#[inline]
pub fn diagonal_neighbors(pt: Point) -> [Point; 4] {
    [
        (pt as isize + DELTA[4]) as usize,
        (pt as isize + DELTA[5]) as usize,
        (pt as isize + DELTA[6]) as usize,
        (pt as isize + DELTA[7]) as usize,
    ]
}

/// Get all 8 neighbours (4 orthogonal + 4 diagonal) of a point.
#[inline]
pub fn all_neighbors(pt: Point) -> [Point; 8] {
    std::array::from_fn(|i| (pt as isize + DELTA[i]) as usize)
}

/// A rectangular board embedded in the fixed backing array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty `width` x `height` grid.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_WIDTH).contains(&width)
            || !(MIN_BOARD_SIZE..=MAX_HEIGHT).contains(&height)
        {
            return Err(BoardError::InvalidSize { width, height });
        }

        let mut cells = vec![Cell::Off; GRID_SIZE];
        for y in 0..height {
            for x in 0..width {
                cells[position(x, y)] = Cell::Empty;
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Backing index of `(x, y)`, or `None` when outside this board.
    pub fn try_position(&self, x: usize, y: usize) -> Option<Point> {
        (x < self.width && y < self.height).then(|| position(x, y))
    }

    #[inline]
    pub fn on_board(&self, pt: Point) -> bool {
        pt < GRID_SIZE && self.cells[pt] != Cell::Off
    }

    #[inline]
    pub fn get(&self, pt: Point) -> Cell {
        self.cells[pt]
    }

    /// Write an on-board cell. Off-board cells are never written.
    #[inline]
    pub(crate) fn set(&mut self, pt: Point, cell: Cell) {
        debug_assert!(self.on_board(pt), "write to off-board point {pt}");
        debug_assert!(cell != Cell::Off);
        self.cells[pt] = cell;
    }

    /// Iterate over every on-board point in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| position(x, y)))
    }

    /// Raw backing array, sentinels included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of on-board cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.points().filter(|&pt| self.cells[pt] == cell).count()
    }
}

impl Index<Point> for Grid {
    type Output = Cell;

    #[inline]
    fn index(&self, pt: Point) -> &Cell {
        &self.cells[pt]
    }
}
