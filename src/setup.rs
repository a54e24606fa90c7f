//! Starting positions: the empty default setup and fixed handicap placement.

use crate::error::BoardError;
use crate::grid::{Point, position};

/// Initial (black, white) stones for a new game. Go starts empty.
pub fn get_default_setup(_width: usize, _height: usize) -> (Vec<Point>, Vec<Point>) {
    (Vec::new(), Vec::new())
}

/// Largest fixed handicap for a board: none below 7x7, corners only when a
/// dimension is even or 7, otherwise the full nine points.
pub fn max_fixed_handicap(width: usize, height: usize) -> usize {
    if width < 7 || height < 7 {
        0
    } else if width % 2 == 0 || height % 2 == 0 || width == 7 || height == 7 {
        4
    } else {
        9
    }
}

/// Distance from the edge of the handicap corner points.
fn edge_distance(size: usize) -> usize {
    if size >= 13 { 3 } else { 2 }
}

/// Fixed handicap stones in the GTP placement order.
///
/// Zero stones is an empty list; otherwise between 2 and
/// [`max_fixed_handicap`] stones are allowed.
pub fn fixed_handicap_stones(
    width: usize,
    height: usize,
    stones: usize,
) -> Result<Vec<Point>, BoardError> {
    if stones == 0 {
        return Ok(Vec::new());
    }
    let max = max_fixed_handicap(width, height);
    if stones < 2 || stones > max {
        return Err(BoardError::InvalidHandicap {
            requested: stones,
            max,
            width,
            height,
        });
    }

    let dx = edge_distance(width);
    let dy = edge_distance(height);
    let (left, right) = (dx, width - 1 - dx);
    let (top, bottom) = (dy, height - 1 - dy);
    let (mid_x, mid_y) = (width / 2, height / 2);

    let mut points = vec![
        position(left, bottom),
        position(right, top),
        position(left, top),
        position(right, bottom),
    ];
    if stones >= 6 {
        points.push(position(left, mid_y));
        points.push(position(right, mid_y));
    }
    if stones >= 8 {
        points.push(position(mid_x, bottom));
        points.push(position(mid_x, top));
    }
    if stones == 3 {
        points.truncate(3);
    } else {
        points.truncate(stones - stones % 2);
        if stones % 2 == 1 {
            points.push(position(mid_x, mid_y));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::point_to_vertex;

    fn vertices(points: &[Point], height: usize) -> Vec<String> {
        points.iter().map(|&pt| point_to_vertex(pt, height)).collect()
    }

    #[test]
    fn test_default_setup_is_empty() {
        let (black, white) = get_default_setup(19, 19);
        assert!(black.is_empty() && white.is_empty());
    }

    #[test]
    fn test_max_handicap() {
        assert_eq!(max_fixed_handicap(5, 5), 0);
        assert_eq!(max_fixed_handicap(7, 7), 4);
        assert_eq!(max_fixed_handicap(10, 19), 4);
        assert_eq!(max_fixed_handicap(9, 9), 9);
        assert_eq!(max_fixed_handicap(19, 19), 9);
    }

    #[test]
    fn test_gtp_placement_19x19() {
        let nine = fixed_handicap_stones(19, 19, 9).unwrap();
        assert_eq!(
            vertices(&nine, 19),
            ["D4", "Q16", "D16", "Q4", "D10", "Q10", "K4", "K16", "K10"]
        );
        let three = fixed_handicap_stones(19, 19, 3).unwrap();
        assert_eq!(vertices(&three, 19), ["D4", "Q16", "D16"]);
        let five = fixed_handicap_stones(19, 19, 5).unwrap();
        assert_eq!(vertices(&five, 19), ["D4", "Q16", "D16", "Q4", "K10"]);
        let seven = fixed_handicap_stones(19, 19, 7).unwrap();
        assert_eq!(
            vertices(&seven, 19),
            ["D4", "Q16", "D16", "Q4", "D10", "Q10", "K10"]
        );
    }

    #[test]
    fn test_gtp_placement_9x9() {
        let two = fixed_handicap_stones(9, 9, 2).unwrap();
        assert_eq!(vertices(&two, 9), ["C3", "G7"]);
    }

    #[test]
    fn test_invalid_handicap() {
        assert!(fixed_handicap_stones(19, 19, 1).is_err());
        assert!(fixed_handicap_stones(19, 19, 10).is_err());
        assert!(fixed_handicap_stones(8, 8, 5).is_err());
        assert_eq!(fixed_handicap_stones(5, 5, 0), Ok(Vec::new()));
    }
}
