//! The Go board: grid, strings, ko, prisoners and the undo log.
//!
//! [`Board::play_move`] assumes the move was already checked with
//! [`crate::rules::is_legal_move`]; it executes whatever it is given and
//! pushes one [`Undo`] entry. [`Board::undo`] pops and inverts that entry.
//! Position edits ([`Board::apply_changes`]) write the grid directly, record
//! each write on a separate change stack and rebuild every string.

use std::fmt;

use tracing::{debug, trace};

use crate::constants::{FREE_STRING, GRID_SIZE};
use crate::error::BoardError;
use crate::grid::{Cell, Color, Grid, Move, Point, neighbors, position};
use crate::strings::StringTable;
use crate::undo::{GridChange, KoState, NeighborClass, Undo};
use crate::vertex::{column_label, point_to_vertex};

/// Points to set, grouped by the value they receive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionChanges {
    pub black: Vec<Point>,
    pub white: Vec<Point>,
    pub empty: Vec<Point>,
}

impl PositionChanges {
    /// Each target value with its list of points.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &[Point])> {
        [
            (Cell::Black, self.black.as_slice()),
            (Cell::White, self.white.as_slice()),
            (Cell::Empty, self.empty.as_slice()),
        ]
        .into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty() && self.empty.is_empty()
    }
}

/// A Go position with its full undo history.
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    strings: StringTable,
    ko: KoState,
    /// Stones captured by Black and by White
    prisoners: [u32; 2],
    move_number: u32,
    move_stack: Vec<Undo>,
    change_stack: Vec<GridChange>,
}

impl Board {
    /// Create an empty `width` x `height` board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            strings: StringTable::new(),
            ko: KoState::NONE,
            prisoners: [0; 2],
            move_number: 0,
            move_stack: Vec::new(),
            change_stack: Vec::new(),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub(crate) fn strings(&self) -> &StringTable {
        &self.strings
    }

    #[inline]
    pub fn cell(&self, pt: Point) -> Cell {
        self.grid[pt]
    }

    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[inline]
    pub fn ko(&self) -> KoState {
        self.ko
    }

    /// Stones captured so far by `color`.
    #[inline]
    pub fn prisoners(&self, color: Color) -> u32 {
        self.prisoners[color.index()]
    }

    /// String id of the stone at `pt`, or `None` for an empty point.
    pub fn string_id(&self, pt: Point) -> Option<usize> {
        self.grid[pt].is_stone().then(|| self.strings.string_id(pt))
    }

    /// Liberty count of the string at `pt`, or `None` for an empty point.
    pub fn liberties(&self, pt: Point) -> Option<i32> {
        self.grid[pt]
            .is_stone()
            .then(|| self.strings.liberties(pt))
    }

    /// Every stone of the string containing `pt`.
    pub fn string_stones(&self, pt: Point) -> Vec<Point> {
        self.strings.string_stones(&self.grid, pt)
    }

    /// Entries on the move stack, oldest first.
    pub fn history(&self) -> &[Undo] {
        &self.move_stack
    }

    // =========================================================================
    // Move execution
    // =========================================================================

    /// Execute `mv` for `color` and push one undo entry.
    ///
    /// Legality is the caller's business. Occupied points are accepted (files
    /// played under the permissive rule set may contain such moves): a stone
    /// on its own color changes nothing on the grid, a stone on the opposing
    /// color replaces it.
    pub fn play_move(&mut self, color: Color, mv: Move) {
        match mv {
            Move::Pass => self.pass(color),
            Move::Play(pos) => {
                assert!(self.grid.on_board(pos), "move at off-board point {pos}");
                let previous = self.grid[pos];
                if previous == Cell::Empty {
                    self.do_play_move(color, pos, previous);
                } else if previous == Cell::from(color) {
                    self.play_on_own_stone(color, pos);
                } else {
                    debug!(vertex = %self.vertex(pos), %color, "overwriting stone");
                    self.strings.lift_stone(&mut self.grid, pos);
                    self.do_play_move(color, pos, previous);
                }
            }
        }
        self.check_consistency();
    }

    fn pass(&mut self, color: Color) {
        self.push(Undo::Pass {
            color,
            ko: self.ko,
            move_number: self.move_number,
        });
        self.ko = KoState::NONE;
        self.move_number += 1;
    }

    fn play_on_own_stone(&mut self, color: Color, pos: Point) {
        self.push(Undo::Normal {
            color,
            pos,
            previous: Cell::from(color),
            neighbors: [NeighborClass::None; 4],
            previous_liberties: FREE_STRING,
            suicide: false,
            ko: self.ko,
            prisoners: self.prisoners,
            move_number: self.move_number,
        });
        self.ko = KoState::NONE;
        self.move_number += 1;
    }

    /// Place a `color` stone on the empty point `pos`.
    fn do_play_move(&mut self, color: Color, pos: Point, previous: Cell) {
        let ko = self.ko;
        let prisoners = self.prisoners;
        let cell = Cell::from(color);

        let mut classes = [NeighborClass::None; 4];
        let mut direct_liberties = 0;
        let mut allies: Vec<Point> = Vec::with_capacity(4);
        let mut captures: Vec<Point> = Vec::with_capacity(4);
        let mut safe_ally = false;

        self.strings.start_string_pass();
        for (dir, n) in neighbors(pos).into_iter().enumerate() {
            let c = self.grid[n];
            match c {
                Cell::Empty => direct_liberties += 1,
                Cell::Off => {}
                _ => {
                    let s = self.strings.string_id(n);
                    if !self.strings.mark_string(s) {
                        continue;
                    }
                    let libs = self.strings.string_liberties(s);
                    if c == cell {
                        classes[dir] = NeighborClass::Ally;
                        allies.push(n);
                        safe_ally |= libs > 1;
                    } else if libs == 1 {
                        classes[dir] = NeighborClass::Capture;
                        captures.push(n);
                    } else {
                        classes[dir] = NeighborClass::Opponent;
                        self.strings.add_liberties(s, -1);
                    }
                }
            }
        }

        self.grid.set(pos, cell);
        let previous_liberties =
            self.strings
                .join_strings(&self.grid, color, pos, direct_liberties, &allies);

        let mut captured = 0;
        for &c in &captures {
            captured += self.strings.remove_string(&mut self.grid, c);
        }
        self.prisoners[color.index()] += captured as u32;

        let suicide = direct_liberties == 0 && !safe_ally && captures.is_empty();
        if suicide {
            let removed = self.strings.remove_string(&mut self.grid, pos);
            self.prisoners[color.other().index()] += removed as u32;
            debug!(vertex = %self.vertex(pos), %color, removed, "suicide");
        }

        self.ko = if captured == 1 && direct_liberties == 0 && allies.is_empty() {
            debug!(vertex = %self.vertex(captures[0]), master = %color, "ko");
            KoState {
                master: Some(color),
                position: Some(captures[0]),
            }
        } else {
            KoState::NONE
        };
        if captured > 0 {
            debug!(vertex = %self.vertex(pos), %color, captured, "capture");
        }

        self.push(Undo::Normal {
            color,
            pos,
            previous,
            neighbors: classes,
            previous_liberties,
            suicide,
            ko,
            prisoners,
            move_number: self.move_number,
        });
        self.move_number += 1;
    }

    /// Push an entry that does nothing but advance the move number.
    pub fn add_dummy_move_entry(&mut self) {
        self.push(Undo::Dummy {
            move_number: self.move_number,
        });
        self.move_number += 1;
    }

    /// Apply a bulk position edit as a single undoable entry.
    ///
    /// Strings are rebuilt from scratch afterwards since the edit may break
    /// any incremental invariant. Ko is cleared; the move number is kept.
    pub fn apply_changes(&mut self, changes: &PositionChanges) {
        let mut num_changes = 0;
        for (cell, points) in changes.iter() {
            for &pt in points {
                assert!(self.grid.on_board(pt), "change at off-board point {pt}");
                let previous = self.grid[pt];
                if previous != cell {
                    self.change_stack.push(GridChange { pos: pt, previous });
                    self.grid.set(pt, cell);
                    num_changes += 1;
                }
            }
        }
        debug!(num_changes, "applied position change");

        self.strings.rebuild(&self.grid);
        self.push(Undo::PositionChange {
            num_changes,
            ko: self.ko,
            move_number: self.move_number,
        });
        self.ko = KoState::NONE;
        self.check_consistency();
    }

    fn push(&mut self, entry: Undo) {
        trace!(?entry, "push");
        self.move_stack.push(entry);
    }

    // =========================================================================
    // Undo
    // =========================================================================

    /// Pop the most recent entry and invert it, returning the entry.
    ///
    /// # Panics
    /// If the move stack is empty.
    pub fn undo(&mut self) -> Undo {
        let Some(entry) = self.move_stack.pop() else {
            panic!("undo called with an empty move stack");
        };
        trace!(?entry, "undo");

        match entry {
            Undo::Normal {
                color,
                pos,
                previous,
                neighbors: classes,
                previous_liberties,
                suicide,
                ko,
                prisoners,
                move_number,
            } => {
                if previous != Cell::from(color) {
                    self.undo_placement(color, pos, &classes, previous_liberties, suicide);
                    if let Some(old) = previous.color() {
                        self.strings.restore_stone(&mut self.grid, old, pos);
                    }
                }
                self.ko = ko;
                self.prisoners = prisoners;
                self.move_number = move_number;
            }
            Undo::Pass {
                ko, move_number, ..
            } => {
                self.ko = ko;
                self.move_number = move_number;
            }
            Undo::PositionChange {
                num_changes,
                ko,
                move_number,
            } => {
                self.undo_grid_changes(num_changes);
                self.strings.rebuild(&self.grid);
                self.ko = ko;
                self.move_number = move_number;
            }
            Undo::Dummy { move_number } => {
                self.move_number = move_number;
            }
        }
        self.check_consistency();
        entry
    }

    /// Invert a stone placement on a point that was empty before it.
    fn undo_placement(
        &mut self,
        color: Color,
        pos: Point,
        classes: &[NeighborClass; 4],
        previous_liberties: i32,
        suicide: bool,
    ) {
        let adjacent = neighbors(pos);

        if suicide {
            self.strings.reconstruct_string(&mut self.grid, color, pos, 0);
        } else {
            // The placed stone still seals each captured region while it is
            // refilled; it becomes that string's single liberty once lifted.
            for (dir, &n) in adjacent.iter().enumerate() {
                if classes[dir] == NeighborClass::Capture {
                    self.strings
                        .reconstruct_string(&mut self.grid, color.other(), n, 1);
                }
            }
        }

        let id = self.strings.string_id(pos);
        self.grid.set(pos, Cell::Empty);

        let mut allies = Vec::with_capacity(4);
        for (dir, &n) in adjacent.iter().enumerate() {
            match classes[dir] {
                NeighborClass::Opponent => {
                    let s = self.strings.string_id(n);
                    self.strings.add_liberties(s, 1);
                }
                NeighborClass::Ally => allies.push(n),
                NeighborClass::None | NeighborClass::Capture => {}
            }
        }

        match allies.split_first() {
            None => self.strings.free_string(id),
            Some((_, rest)) => {
                self.strings.set_liberties(id, previous_liberties);
                for &ally in rest {
                    let new_id = self.strings.allocate_string();
                    self.strings.start_position_pass();
                    let libs = self
                        .strings
                        .change_string_number(&self.grid, ally, new_id);
                    self.strings.set_liberties(new_id, libs);
                }
            }
        }
    }

    /// Restore the cells touched by the last `count` raw grid writes.
    fn undo_grid_changes(&mut self, count: usize) {
        for _ in 0..count {
            let Some(change) = self.change_stack.pop() else {
                panic!("grid change stack shorter than its undo entry");
            };
            self.grid.set(change.pos, change.previous);
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn vertex(&self, pt: Point) -> String {
        point_to_vertex(pt, self.height())
    }

    /// Print the board to stderr.
    pub fn dump(&self) {
        eprintln!("{self}");
    }

    /// Recompute every string and liberty count from the grid and compare
    /// with the incrementally maintained table.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut visited = vec![false; GRID_SIZE];
        let mut seen_ids: Vec<usize> = Vec::new();

        for start in self.grid.points() {
            let cell = self.grid[start];
            if !cell.is_stone() || visited[start] {
                continue;
            }
            let id = self.strings.string_id(start);
            let fail = |pt: Point, reason: String| BoardError::Inconsistent {
                vertex: self.vertex(pt),
                reason,
            };
            if seen_ids.contains(&id) {
                return Err(fail(start, format!("string id {id} shared by two strings")));
            }
            seen_ids.push(id);

            let mut liberty_seen = vec![false; GRID_SIZE];
            let mut libs = 0;
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(pt) = stack.pop() {
                if self.strings.string_id(pt) != id {
                    return Err(fail(pt, format!("stone not numbered {id}")));
                }
                for n in neighbors(pt) {
                    let c = self.grid[n];
                    if c == cell && !visited[n] {
                        visited[n] = true;
                        stack.push(n);
                    } else if c == Cell::Empty && !liberty_seen[n] {
                        liberty_seen[n] = true;
                        libs += 1;
                    }
                }
            }

            let stored = self.strings.string_liberties(id);
            if stored != libs {
                return Err(fail(
                    start,
                    format!("string {id} stores {stored} liberties, has {libs}"),
                ));
            }
        }

        if let Some(id) = self.strings.live_ids().find(|id| !seen_ids.contains(id)) {
            return Err(BoardError::Inconsistent {
                vertex: "-".into(),
                reason: format!("string id {id} allocated without stones"),
            });
        }
        Ok(())
    }

    #[cfg(feature = "paranoid")]
    fn check_consistency(&self) {
        if let Err(e) = self.validate() {
            panic!("{e}\n{self}");
        }
    }

    #[cfg(not(feature = "paranoid"))]
    #[inline]
    fn check_consistency(&self) {}
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: String = (0..self.width())
            .map(|x| format!(" {}", column_label(x)))
            .collect();
        writeln!(f, "  {header}")?;
        for y in 0..self.height() {
            let row = self.height() - y;
            write!(f, "{row:2}")?;
            for x in 0..self.width() {
                let ch = match self.grid[position(x, y)] {
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    Cell::Empty => '.',
                    Cell::Off => ' ',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f, " {row}")?;
        }
        writeln!(f, "  {header}")?;
        write!(
            f,
            "move {}, captured by black: {}, by white: {}",
            self.move_number, self.prisoners[0], self.prisoners[1]
        )?;
        if let Some(pt) = self.ko.position {
            write!(f, ", ko at {}", self.vertex(pt))?;
        }
        Ok(())
    }
}
