//! Move legality and game-end detection.
//!
//! Nothing here mutates the board: every check reads the grid and the
//! incrementally maintained liberty counts.

use crate::board::Board;
use crate::error::MoveError;
use crate::grid::{Cell, Color, Move, Point, neighbors};
use crate::undo::Undo;

/// Which moves [`is_legal_move`] accepts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RuleSet {
    /// Empty point, no immediate ko retake, no suicide
    #[default]
    Default,
    /// Anything on the board goes; used when replaying files, which may be
    /// irregular on purpose
    Sgf,
}

/// Whether placing `color` on the empty point `pos` would be suicide.
///
/// A move is not suicide iff it has a direct liberty, joins a string with
/// another liberty, or fills the last liberty of an opposing string.
pub fn is_suicide(board: &Board, color: Color, pos: Point) -> bool {
    let own = Cell::from(color);
    for n in neighbors(pos) {
        match board.cell(n) {
            Cell::Empty => return false,
            Cell::Off => {}
            c => {
                let single = board.strings().liberties(n) == 1;
                if (c == own) != single {
                    return false;
                }
            }
        }
    }
    true
}

/// Check `mv` for `color`, returning the rule that forbids it, if any.
pub fn check_move(
    board: &Board,
    rule_set: RuleSet,
    color: Color,
    mv: Move,
) -> Result<(), MoveError> {
    let pos = match mv {
        Move::Pass => return Ok(()),
        Move::Play(pos) => pos,
    };
    if !board.grid().on_board(pos) {
        return Err(MoveError::OffBoard);
    }
    if rule_set == RuleSet::Sgf {
        return Ok(());
    }

    if board.cell(pos) != Cell::Empty {
        return Err(MoveError::Occupied);
    }
    if board.ko().forbids(color, pos) {
        return Err(MoveError::Ko);
    }
    if is_suicide(board, color, pos) {
        return Err(MoveError::Suicide);
    }
    Ok(())
}

/// Whether `color` may play `mv` under `rule_set`.
pub fn is_legal_move(board: &Board, rule_set: RuleSet, color: Color, mv: Move) -> bool {
    check_move(board, rule_set, color, mv).is_ok()
}

/// Every point where `color` may legally place a stone.
pub fn legal_points(board: &Board, rule_set: RuleSet, color: Color) -> Vec<Point> {
    board
        .grid()
        .points()
        .filter(|&pt| is_legal_move(board, rule_set, color, Move::Play(pt)))
        .collect()
}

/// The game is over once the two latest non-dummy entries are passes by
/// alternating colors.
pub fn is_game_over(board: &Board) -> bool {
    let mut recent = board
        .history()
        .iter()
        .rev()
        .filter(|entry| !matches!(entry, Undo::Dummy { .. }));

    match (recent.next(), recent.next()) {
        (Some(Undo::Pass { color: last, .. }), Some(Undo::Pass { color: before, .. })) => {
            last != before
        }
        _ => false,
    }
}

/// Go never forces a pass, so the requested color always keeps the move.
pub fn adjust_color_to_play(_board: &Board, color: Color) -> Color {
    color
}
