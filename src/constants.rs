//! Board geometry and engine-wide constants.
//!
//! Every board, whatever its size, is embedded in one fixed backing array.
//! Rows are separated by a single shared off-board column and the array has a
//! full off-board row above and below the largest supported board, so every
//! on-board point can step to any of its 8 neighbours without a bounds check.
//!
//! ```text
//!  index 0          : corner sentinel
//!  row -1           : off-board
//!  row y, column 0  : shared separator (off-board)
//!  row y, 1..=25    : x = 0..25 (on-board only when x < width)
//!  row 25           : off-board
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board dimension.
pub const MIN_BOARD_SIZE: usize = 1;

/// Largest supported board width.
pub const MAX_WIDTH: usize = 25;

/// Largest supported board height.
pub const MAX_HEIGHT: usize = 25;

/// Maximum number of on-board points.
pub const MAX_POSITIONS: usize = MAX_WIDTH * MAX_HEIGHT;

/// Width of one backing row (board columns plus the shared separator).
pub const GRID_WIDTH: usize = MAX_WIDTH + 1;

/// Number of backing rows (board rows plus one padding row on each side).
pub const GRID_HEIGHT: usize = MAX_HEIGHT + 2;

/// Total backing array length, including the leading corner sentinel.
pub const GRID_SIZE: usize = GRID_WIDTH * GRID_HEIGHT + 1;

// =============================================================================
// Neighbour Offsets
// =============================================================================

/// Offsets to neighbouring points in the backing array.
/// Order: North, East, South, West, NE, SE, SW, NW
pub const DELTA: [isize; 8] = [
    -(GRID_WIDTH as isize),     // North (up one row)
    1,                          // East
    GRID_WIDTH as isize,        // South (down one row)
    -1,                         // West
    -(GRID_WIDTH as isize) + 1, // NE
    GRID_WIDTH as isize + 1,    // SE
    GRID_WIDTH as isize - 1,    // SW
    -(GRID_WIDTH as isize) - 1, // NW
];

// =============================================================================
// String Tracking
// =============================================================================

/// Size of the string id ring. Always larger than the number of strings that
/// can coexist on a board, so allocation always finds a free id.
pub const STRING_RING_SIZE: usize = MAX_POSITIONS + MAX_WIDTH + MAX_HEIGHT;

/// Liberty count stored for string ids with no member stones.
pub const FREE_STRING: i32 = -1;

/// String number stored in cells that belong to no string.
pub const NO_STRING: usize = usize::MAX;

// =============================================================================
// Scoring
// =============================================================================

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 7.5;

/// Diagonal score at which a one-point territory is treated as a false eye.
pub const FALSE_EYE_THRESHOLD: u32 = 4;
