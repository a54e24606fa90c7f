//! End-of-game territory and score.
//!
//! Regions of empty points and dead stones are flood-filled; a region belongs
//! to a color when every living stone around it has that color. One-point
//! regions that look like false eyes are then dropped unless their strings
//! connect them to a genuine eye. This is an approximation: it does not
//! recognise seki.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::board::Board;
use crate::constants::{FALSE_EYE_THRESHOLD, GRID_SIZE, STRING_RING_SIZE};
use crate::grid::{Cell, Color, Grid, Point, diagonal_neighbors, neighbors};
use crate::vertex::point_to_vertex;

const NO_REGION: usize = usize::MAX;

/// Outcome of a scored game.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameResult {
    BlackWins(f64),
    WhiteWins(f64),
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::BlackWins(margin) => write!(f, "B+{margin}"),
            GameResult::WhiteWins(margin) => write!(f, "W+{margin}"),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Score breakdown for both colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    /// Territory points of Black and White
    pub territory: [u32; 2],
    /// Board prisoners plus dead stones of the opponent
    pub prisoners: [u32; 2],
    pub komi: f64,
    pub result: GameResult,
    /// Owner of every grid point counted as territory
    owners: Vec<Option<Color>>,
}

impl Score {
    /// Total for `color`, komi included for White.
    pub fn total(&self, color: Color) -> f64 {
        let i = color.index();
        let base = f64::from(self.territory[i] + self.prisoners[i]);
        match color {
            Color::Black => base,
            Color::White => base + self.komi,
        }
    }

    /// Territory owner of `pt`, if it is counted for either color.
    pub fn owner(&self, pt: Point) -> Option<Color> {
        self.owners[pt]
    }
}

struct Region {
    points: Vec<Point>,
    owner: Option<Color>,
}

/// Classify every empty or dead point as territory of a color, or neither.
///
/// Returns the owner per grid index; living stones map to `None`.
pub fn find_territory(board: &Board, dead_stones: &[Point]) -> Vec<Option<Color>> {
    let grid = board.grid();
    let is_dead = dead_mask(grid, dead_stones);
    let (region_of, regions) = flood_regions(grid, &is_dead);
    let claimed = drop_false_eyes(board, &is_dead, &region_of, &regions);

    let mut owners = vec![None; GRID_SIZE];
    for (r, region) in regions.iter().enumerate() {
        if claimed[r] {
            for &pt in &region.points {
                owners[pt] = region.owner;
            }
        }
    }
    owners
}

/// Score the position with the given dead stones and komi.
pub fn score_game(board: &Board, dead_stones: &[Point], komi: f64) -> Score {
    let grid = board.grid();
    let owners = find_territory(board, dead_stones);

    let mut territory = [0u32; 2];
    for pt in grid.points() {
        if let Some(color) = owners[pt] {
            territory[color.index()] += 1;
        }
    }

    let mut prisoners = [board.prisoners(Color::Black), board.prisoners(Color::White)];
    for pt in dead_mask_points(grid, dead_stones) {
        if let Some(color) = grid[pt].color() {
            prisoners[color.other().index()] += 1;
        }
    }

    let black = f64::from(territory[0] + prisoners[0]);
    let white = f64::from(territory[1] + prisoners[1]) + komi;
    let result = if black == white {
        GameResult::Draw
    } else if black > white {
        GameResult::BlackWins(black - white)
    } else {
        GameResult::WhiteWins(white - black)
    };

    Score {
        territory,
        prisoners,
        komi,
        result,
        owners,
    }
}

fn dead_mask(grid: &Grid, dead_stones: &[Point]) -> Vec<bool> {
    let mut is_dead = vec![false; GRID_SIZE];
    for pt in dead_mask_points(grid, dead_stones) {
        is_dead[pt] = true;
    }
    is_dead
}

/// Dead-stone points that actually hold a stone, without duplicates.
fn dead_mask_points(grid: &Grid, dead_stones: &[Point]) -> Vec<Point> {
    let mut points: Vec<Point> = dead_stones
        .iter()
        .copied()
        .filter(|&pt| grid.on_board(pt) && grid[pt].is_stone())
        .collect();
    points.sort_unstable();
    points.dedup();
    points
}

fn flood_regions(grid: &Grid, is_dead: &[bool]) -> (Vec<usize>, Vec<Region>) {
    let open = |pt: Point| grid[pt] == Cell::Empty || is_dead[pt];
    let mut region_of = vec![NO_REGION; GRID_SIZE];
    let mut regions = Vec::new();

    for start in grid.points() {
        if !open(start) || region_of[start] != NO_REGION {
            continue;
        }
        let r = regions.len();
        let mut points = Vec::new();
        let mut borders = [false; 2];
        let mut stack = vec![start];
        region_of[start] = r;

        while let Some(pt) = stack.pop() {
            points.push(pt);
            for n in neighbors(pt) {
                if open(n) {
                    if region_of[n] == NO_REGION {
                        region_of[n] = r;
                        stack.push(n);
                    }
                } else if let Some(color) = grid[n].color() {
                    borders[color.index()] = true;
                }
            }
        }

        let owner = match borders {
            [true, false] => Some(Color::Black),
            [false, true] => Some(Color::White),
            _ => None,
        };
        regions.push(Region { points, owner });
    }
    (region_of, regions)
}

/// Diagonal score of a one-point region owned by `owner`: 2 per living
/// opposing stone, 1 per off-board point.
fn false_eye_score(grid: &Grid, is_dead: &[bool], pt: Point, owner: Color) -> u32 {
    let enemy = Cell::from(owner.other());
    diagonal_neighbors(pt)
        .into_iter()
        .map(|d| match grid[d] {
            Cell::Off => 1,
            c if c == enemy && !is_dead[d] => 2,
            _ => 0,
        })
        .sum()
}

/// Returns, per region, whether it is still claimed as territory.
///
/// Claimed regions that are not false-eye candidates are genuine. A candidate
/// survives only when a chain of living owner strings and surviving
/// candidates links it to a genuine region; two false eyes cannot keep each
/// other alive.
fn drop_false_eyes(
    board: &Board,
    is_dead: &[bool],
    region_of: &[usize],
    regions: &[Region],
) -> Vec<bool> {
    let grid = board.grid();
    let strings = board.strings();
    let mut claimed: Vec<bool> = regions.iter().map(|r| r.owner.is_some()).collect();

    let is_candidate: Vec<bool> = regions
        .iter()
        .map(|region| {
            region.points.len() == 1
                && region.owner.is_some_and(|owner| {
                    false_eye_score(grid, is_dead, region.points[0], owner) >= FALSE_EYE_THRESHOLD
                })
        })
        .collect();
    if !is_candidate.contains(&true) {
        return claimed;
    }

    // Regions bordered by each living string, and the reverse.
    let mut string_regions: Vec<Vec<usize>> = vec![Vec::new(); STRING_RING_SIZE];
    let mut region_strings: Vec<Vec<usize>> = vec![Vec::new(); regions.len()];
    for pt in grid.points() {
        if !grid[pt].is_stone() || is_dead[pt] {
            continue;
        }
        let s = strings.string_id(pt);
        for n in neighbors(pt) {
            let r = region_of[n];
            if r == NO_REGION || string_regions[s].contains(&r) {
                continue;
            }
            string_regions[s].push(r);
            region_strings[r].push(s);
        }
    }

    // Spread support outwards from the genuine regions: a candidate is
    // reached once one of its strings borders a region already reached.
    let mut supported: Vec<bool> = (0..regions.len())
        .map(|r| claimed[r] && !is_candidate[r])
        .collect();
    let mut worklist: VecDeque<usize> = (0..regions.len()).filter(|&r| supported[r]).collect();
    while let Some(r) = worklist.pop_front() {
        for &s in &region_strings[r] {
            for &q in &string_regions[s] {
                if is_candidate[q] && !supported[q] {
                    supported[q] = true;
                    worklist.push_back(q);
                }
            }
        }
    }

    for (r, region) in regions.iter().enumerate() {
        if is_candidate[r] && !supported[r] {
            claimed[r] = false;
            debug!(
                vertex = %point_to_vertex(region.points[0], grid.height()),
                "dropped false eye"
            );
        }
    }
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PositionChanges;
    use crate::grid::{Move, position};

    fn board_with(
        width: usize,
        height: usize,
        black: &[(usize, usize)],
        white: &[(usize, usize)],
    ) -> Board {
        let mut board = Board::new(width, height).unwrap();
        for &(x, y) in black {
            board.play_move(Color::Black, Move::Play(position(x, y)));
        }
        for &(x, y) in white {
            board.play_move(Color::White, Move::Play(position(x, y)));
        }
        board
    }

    /// Place stones directly, without capture or suicide checks.
    fn board_from_setup(
        width: usize,
        height: usize,
        black: &[(usize, usize)],
        white: &[(usize, usize)],
    ) -> Board {
        let points = |list: &[(usize, usize)]| -> Vec<Point> {
            list.iter().map(|&(x, y)| position(x, y)).collect()
        };
        let mut board = Board::new(width, height).unwrap();
        board.apply_changes(&PositionChanges {
            black: points(black),
            white: points(white),
            empty: Vec::new(),
        });
        board
    }

    #[test]
    fn test_empty_board_is_dame() {
        let board = Board::new(9, 9).unwrap();
        let score = score_game(&board, &[], 7.5);
        assert_eq!(score.territory, [0, 0]);
        assert_eq!(score.result, GameResult::WhiteWins(7.5));
        assert_eq!(score_game(&board, &[], 0.0).result, GameResult::Draw);
    }

    #[test]
    fn test_walls_split_board() {
        let column = |x| (0..5).map(move |y| (x, y)).collect::<Vec<_>>();
        let board = board_with(5, 5, &column(1), &column(3));
        let score = score_game(&board, &[], 0.0);
        assert_eq!(score.territory, [5, 5], "column 2 is dame");
        assert_eq!(score.result, GameResult::Draw);
        assert_eq!(score.owner(position(0, 0)), Some(Color::Black));
        assert_eq!(score.owner(position(2, 2)), None);
        assert_eq!(score.owner(position(4, 4)), Some(Color::White));

        let score = score_game(&board, &[], 0.5);
        assert_eq!(score.result, GameResult::WhiteWins(0.5));
        assert_eq!(score.result.to_string(), "W+0.5");
    }

    #[test]
    fn test_dead_stones_become_prisoners_and_territory() {
        let column = |x| (0..5).map(move |y| (x, y)).collect::<Vec<_>>();
        let board = board_with(5, 5, &column(1), &[(3, 3)]);
        let score = score_game(&board, &[position(3, 3)], 0.0);
        // Everything right of the wall belongs to Black, dead stone included.
        assert_eq!(score.territory, [20, 0]);
        assert_eq!(score.prisoners, [1, 0]);
        assert_eq!(score.total(Color::Black), 21.0);
        assert_eq!(score.result, GameResult::BlackWins(21.0));
    }

    #[test]
    fn test_lone_false_eye_is_dropped() {
        // Corner point enclosed by two unconnected black stones with a
        // white stone on its only board diagonal.
        let board = board_with(5, 5, &[(1, 0), (0, 1)], &[(1, 1)]);
        let owners = find_territory(&board, &[]);
        assert_eq!(owners[position(0, 0)], None);
    }

    #[test]
    fn test_corner_eye_without_enemy_diagonal_is_kept() {
        let board = board_with(5, 5, &[(1, 0), (0, 1), (1, 1)], &[(4, 4)]);
        let owners = find_territory(&board, &[]);
        assert_eq!(owners[position(0, 0)], Some(Color::Black));
    }

    #[test]
    fn test_false_eye_supported_by_real_eye() {
        //   A B C D E
        // 5 . X . . .
        // 4 X O . . .
        // 3 X X X X X
        // 2 . X . . .
        // 1 . X . . .
        let black = [(1, 0), (0, 1), (0, 2), (1, 2), (2, 2), (3, 2), (4, 2), (1, 3), (1, 4)];
        let board = board_with(5, 5, &black, &[(1, 1)]);
        let score = score_game(&board, &[], 0.0);
        assert_eq!(score.owner(position(0, 0)), Some(Color::Black));
        assert_eq!(score.owner(position(0, 3)), Some(Color::Black));
        assert_eq!(score.owner(position(3, 0)), None, "region touches White");
        assert_eq!(score.territory, [9, 0]);
    }

    #[test]
    fn test_false_eyes_do_not_support_each_other() {
        //   A B C D E
        // 2 O X O X O
        // 1 X . X . X
        let board = board_from_setup(
            5,
            2,
            &[(1, 0), (3, 0), (0, 1), (2, 1), (4, 1)],
            &[(0, 0), (2, 0), (4, 0)],
        );
        let score = score_game(&board, &[], 0.0);
        assert_eq!(score.owner(position(1, 1)), None);
        assert_eq!(score.owner(position(3, 1)), None);
        assert_eq!(score.territory, [0, 0]);
    }

    #[test]
    fn test_false_eye_chain_reaches_real_eye() {
        //   A B C D E F G
        // 2 O X O X X . .
        // 1 X . X . X . .
        //
        // B1 leans on D1 through C1, D1 on the open area through D2 E2 E1.
        let black = [(1, 0), (3, 0), (4, 0), (0, 1), (2, 1), (4, 1)];
        let board = board_from_setup(7, 2, &black, &[(0, 0), (2, 0)]);
        let score = score_game(&board, &[], 0.0);
        assert_eq!(score.owner(position(1, 1)), Some(Color::Black));
        assert_eq!(score.owner(position(3, 1)), Some(Color::Black));
        assert_eq!(score.territory, [6, 0]);
    }

    #[test]
    fn test_dropping_false_eye_cascades() {
        // Same shape, but a white stone at G2 turns the open area into dame:
        // D1 loses its only genuine support and B1, which leaned on D1, goes
        // with it.
        let black = [(1, 0), (3, 0), (4, 0), (0, 1), (2, 1), (4, 1)];
        let board = board_from_setup(7, 2, &black, &[(0, 0), (2, 0), (6, 0)]);
        let score = score_game(&board, &[], 0.0);
        assert_eq!(score.owner(position(5, 1)), None, "open area touches White");
        assert_eq!(score.owner(position(3, 1)), None);
        assert_eq!(score.owner(position(1, 1)), None);
        assert_eq!(score.territory, [0, 0]);
    }

    #[test]
    fn test_result_display() {
        assert_eq!(GameResult::BlackWins(3.5).to_string(), "B+3.5");
        assert_eq!(GameResult::WhiteWins(2.0).to_string(), "W+2");
        assert_eq!(GameResult::Draw.to_string(), "Draw");
    }
}
