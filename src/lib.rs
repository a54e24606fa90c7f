//! Quarry-Go: an incremental Go rules engine.
//!
//! Tracks stone strings and their liberties through placement, capture,
//! suicide and ko, and keeps an undo log able to reverse any executed move or
//! position edit exactly.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and engine constants
//! - [`grid`] - Colors, cells and the sentinel-bordered grid
//! - [`vertex`] - GTP-style vertex text
//! - [`strings`] - String ids and liberty counts
//! - [`undo`] - Undo-log entries
//! - [`board`] - Move execution, undo and position edits
//! - [`rules`] - Legality checks and game-end detection
//! - [`score`] - Territory and scoring
//! - [`setup`] - Default setup and fixed handicap
//!
//! ## Example
//!
//! ```
//! use quarry_go::board::Board;
//! use quarry_go::grid::{Color, Move};
//! use quarry_go::rules::{RuleSet, is_legal_move};
//! use quarry_go::vertex::parse_vertex;
//!
//! let mut board = Board::new(9, 9).unwrap();
//! let mv = parse_vertex("E5", 9, 9).unwrap();
//! assert!(is_legal_move(&board, RuleSet::Default, Color::Black, mv));
//! board.play_move(Color::Black, mv);
//! board.undo();
//! assert_eq!(board.move_number(), 0);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod grid;
pub mod rules;
pub mod score;
pub mod setup;
pub mod strings;
pub mod undo;
pub mod vertex;
