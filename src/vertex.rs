//! Vertex text in the GTP convention (`"D4"`, `"pass"`).
//!
//! Columns are letters A-Z skipping `I`; rows count from 1 at the bottom edge.
//! Both directions need the board height, since point indices count rows from
//! the top.

use crate::error::BoardError;
use crate::grid::{Move, Point, coords, position};

/// Column letters, skipping 'I' to avoid confusion with 'J'.
const COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Parse a vertex such as `"D4"` or `"pass"` for a `width` x `height` board.
pub fn parse_vertex(s: &str, width: usize, height: usize) -> Result<Move, BoardError> {
    let invalid = || BoardError::InvalidVertex(s.to_string());
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(Move::Pass);
    }

    let mut chars = s.chars();
    let col_char = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
    let x = COLUMNS
        .iter()
        .position(|&c| c as char == col_char)
        .ok_or_else(invalid)?;
    let row: usize = chars.as_str().parse().map_err(|_| invalid())?;

    if x >= width || row == 0 || row > height {
        return Err(invalid());
    }
    Ok(Move::Play(position(x, height - row)))
}

/// Format a point as a vertex for a board of the given height.
pub fn point_to_vertex(pt: Point, height: usize) -> String {
    let (x, y) = coords(pt);
    format!("{}{}", COLUMNS[x] as char, height - y)
}

/// Format a move as a vertex; passes become `"pass"`.
pub fn move_to_vertex(mv: Move, height: usize) -> String {
    match mv {
        Move::Pass => "pass".into(),
        Move::Play(pt) => point_to_vertex(pt, height),
    }
}

/// Column label used by board dumps.
pub fn column_label(x: usize) -> char {
    COLUMNS[x] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corners() {
        assert_eq!(parse_vertex("A1", 9, 9), Ok(Move::Play(position(0, 8))));
        assert_eq!(parse_vertex("J9", 9, 9), Ok(Move::Play(position(8, 0))));
        assert_eq!(parse_vertex("a9", 9, 9), Ok(Move::Play(position(0, 0))));
        assert_eq!(parse_vertex("Z25", 25, 25), Ok(Move::Play(position(24, 0))));
    }

    #[test]
    fn test_parse_pass() {
        assert_eq!(parse_vertex("pass", 9, 9), Ok(Move::Pass));
        assert_eq!(parse_vertex("PASS", 19, 19), Ok(Move::Pass));
    }

    #[test]
    fn test_skips_i() {
        let h5 = parse_vertex("H5", 9, 9).unwrap();
        let j5 = parse_vertex("J5", 9, 9).unwrap();
        match (h5, j5) {
            (Move::Play(h), Move::Play(j)) => assert_eq!(j - h, 1),
            _ => panic!("expected points"),
        }
        assert!(parse_vertex("I5", 9, 9).is_err());
    }

    #[test]
    fn test_rejects_off_board() {
        assert!(parse_vertex("K1", 9, 9).is_err());
        assert!(parse_vertex("A10", 9, 9).is_err());
        assert!(parse_vertex("A0", 9, 9).is_err());
        assert!(parse_vertex("", 9, 9).is_err());
        assert!(parse_vertex("D", 9, 9).is_err());
    }

    #[test]
    fn test_format_roundtrip() {
        for vertex in ["A1", "D4", "G7", "H5", "J5", "J9", "pass"] {
            let mv = parse_vertex(vertex, 9, 9).unwrap();
            assert_eq!(move_to_vertex(mv, 9), vertex);
        }
    }
}
