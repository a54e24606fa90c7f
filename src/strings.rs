//! String (group) and liberty bookkeeping.
//!
//! Every stone stores the id of its string; every id maps to a liberty count.
//! Ids come from a ring larger than the number of strings that can ever
//! coexist, and an id whose liberty count is [`FREE_STRING`] is unused.
//!
//! Flood fills use lazy marks: a point (or string) is visited in the current
//! pass iff its stored mark equals the current counter, so starting a pass is
//! a counter increment instead of clearing an array. The arrays are cleared
//! only when a counter is about to wrap.

use tracing::debug;

use crate::constants::{FREE_STRING, GRID_SIZE, NO_STRING, STRING_RING_SIZE};
use crate::grid::{Cell, Color, Grid, Point, neighbors};

/// Incrementally maintained string ids and liberty counts for one board.
#[derive(Clone, Debug)]
pub struct StringTable {
    /// String id of every stone (stale for empty cells)
    string_number: Vec<usize>,
    /// Liberty count per string id, `FREE_STRING` when unused
    liberties: Vec<i32>,
    /// Ring cursor: allocation scans from just after this id
    last_allocated: usize,
    position_marks: Vec<u32>,
    position_mark: u32,
    string_marks: Vec<u32>,
    string_mark: u32,
    /// Reusable flood-fill worklist
    queue: Vec<Point>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            string_number: vec![NO_STRING; GRID_SIZE],
            liberties: vec![FREE_STRING; STRING_RING_SIZE],
            last_allocated: STRING_RING_SIZE - 1,
            position_marks: vec![0; GRID_SIZE],
            position_mark: 0,
            string_marks: vec![0; STRING_RING_SIZE],
            string_mark: 0,
            queue: Vec::with_capacity(GRID_SIZE),
        }
    }

    /// String id of the stone at `pt`. Meaningless for empty points.
    #[inline]
    pub fn string_id(&self, pt: Point) -> usize {
        self.string_number[pt]
    }

    /// Liberty count of the string with the given id.
    #[inline]
    pub fn string_liberties(&self, id: usize) -> i32 {
        self.liberties[id]
    }

    /// Liberty count of the string containing the stone at `pt`.
    #[inline]
    pub fn liberties(&self, pt: Point) -> i32 {
        self.liberties[self.string_number[pt]]
    }

    #[inline]
    pub fn is_free(&self, id: usize) -> bool {
        self.liberties[id] == FREE_STRING
    }

    /// Ids currently in use, in ring order.
    pub fn live_ids(&self) -> impl Iterator<Item = usize> + '_ {
        (0..STRING_RING_SIZE).filter(|&id| !self.is_free(id))
    }

    #[inline]
    pub(crate) fn set_liberties(&mut self, id: usize, count: i32) {
        self.liberties[id] = count;
    }

    #[inline]
    pub(crate) fn add_liberties(&mut self, id: usize, delta: i32) {
        debug_assert!(!self.is_free(id), "liberty update on free string {id}");
        self.liberties[id] += delta;
    }

    #[inline]
    pub(crate) fn free_string(&mut self, id: usize) {
        self.liberties[id] = FREE_STRING;
    }

    // =========================================================================
    // Lazy marks
    // =========================================================================

    /// Begin a new point-marking pass.
    pub(crate) fn start_position_pass(&mut self) {
        if self.position_mark == u32::MAX {
            debug!("position mark counter wrapped, clearing marks");
            self.position_marks.fill(0);
            self.position_mark = 0;
        }
        self.position_mark += 1;
    }

    /// Begin a new string-marking pass.
    pub(crate) fn start_string_pass(&mut self) {
        if self.string_mark == u32::MAX {
            debug!("string mark counter wrapped, clearing marks");
            self.string_marks.fill(0);
            self.string_mark = 0;
        }
        self.string_mark += 1;
    }

    /// Mark `pt` in the current pass. Returns false if it already was.
    #[inline]
    fn mark_position(&mut self, pt: Point) -> bool {
        if self.position_marks[pt] == self.position_mark {
            return false;
        }
        self.position_marks[pt] = self.position_mark;
        true
    }

    /// Mark string `id` in the current pass. Returns false if it already was.
    #[inline]
    pub(crate) fn mark_string(&mut self, id: usize) -> bool {
        if self.string_marks[id] == self.string_mark {
            return false;
        }
        self.string_marks[id] = self.string_mark;
        true
    }

    // =========================================================================
    // String operations
    // =========================================================================

    /// Find a free id, scanning the ring from just after the last allocation.
    ///
    /// The id is returned still marked free: the caller must set its liberty
    /// count before allocating again.
    pub fn allocate_string(&mut self) -> usize {
        let mut id = self.last_allocated;
        for _ in 0..STRING_RING_SIZE {
            id = (id + 1) % STRING_RING_SIZE;
            if self.liberties[id] == FREE_STRING {
                self.last_allocated = id;
                return id;
            }
        }
        unreachable!("string id ring exhausted");
    }

    /// Assign `new_id` to the whole string containing `start`.
    ///
    /// Returns the number of the string's liberties not yet marked in the
    /// current position pass, so callers can sum over several strings joined
    /// within one pass without counting a shared liberty twice.
    pub fn change_string_number(&mut self, grid: &Grid, start: Point, new_id: usize) -> i32 {
        let color = grid[start];
        debug_assert!(color.is_stone());
        if !self.mark_position(start) {
            return 0;
        }

        let mut libs = 0;
        self.queue.push(start);
        while let Some(pt) = self.queue.pop() {
            self.string_number[pt] = new_id;
            for n in neighbors(pt) {
                let cell = grid[n];
                if cell == color {
                    if self.mark_position(n) {
                        self.queue.push(n);
                    }
                } else if cell == Cell::Empty && self.mark_position(n) {
                    libs += 1;
                }
            }
        }
        libs
    }

    /// Merge a stone just placed at `pos` with its allied strings.
    ///
    /// `allies` holds one stone of each distinct same-colored neighbouring
    /// string. Returns the liberty count the surviving id had before the
    /// merge, or [`FREE_STRING`] when a fresh id was allocated.
    pub fn join_strings(
        &mut self,
        grid: &Grid,
        color: Color,
        pos: Point,
        direct_liberties: i32,
        allies: &[Point],
    ) -> i32 {
        debug_assert_eq!(grid[pos], Cell::from(color));

        match allies {
            [] => {
                let id = self.allocate_string();
                self.string_number[pos] = id;
                self.liberties[id] = direct_liberties;
                FREE_STRING
            }
            [ally] => {
                let id = self.string_number[*ally];
                let previous = self.liberties[id];
                self.string_number[pos] = id;

                // `pos` itself was a liberty of the ally; each empty neighbour
                // is new unless the ally already touches it elsewhere.
                let mut libs = previous - 1;
                for n in neighbors(pos) {
                    if grid[n] == Cell::Empty && !self.touches_string(grid, n, id, pos) {
                        libs += 1;
                    }
                }
                self.liberties[id] = libs;
                previous
            }
            [first, rest @ ..] => {
                let id = self.string_number[*first];
                let previous = self.liberties[id];
                for ally in rest {
                    let old = self.string_number[*ally];
                    self.free_string(old);
                }

                self.start_position_pass();
                self.mark_position(pos);
                self.string_number[pos] = id;
                let mut libs = 0;
                for n in neighbors(pos) {
                    if grid[n] == Cell::Empty && self.mark_position(n) {
                        libs += 1;
                    }
                }
                for ally in allies {
                    libs += self.change_string_number(grid, *ally, id);
                }
                self.liberties[id] = libs;
                previous
            }
        }
    }

    /// Whether empty point `lib` is adjacent to a stone of string `id`,
    /// ignoring the stone at `except`.
    fn touches_string(&self, grid: &Grid, lib: Point, id: usize, except: Point) -> bool {
        neighbors(lib)
            .into_iter()
            .any(|n| n != except && grid[n].is_stone() && self.string_number[n] == id)
    }

    /// Remove the string containing `start` from the grid.
    ///
    /// Every removed stone becomes one new liberty for each distinct opposing
    /// string next to it. Returns the number of stones removed.
    pub fn remove_string(&mut self, grid: &mut Grid, start: Point) -> usize {
        let cell = grid[start];
        let opponent = match cell.color() {
            Some(color) => Cell::from(color.other()),
            None => panic!("remove_string on empty point {start}"),
        };
        let id = self.string_number[start];

        let mut removed = 0;
        grid.set(start, Cell::Empty);
        self.queue.push(start);
        while let Some(pt) = self.queue.pop() {
            removed += 1;
            self.start_string_pass();
            for n in neighbors(pt) {
                let c = grid[n];
                if c == cell {
                    grid.set(n, Cell::Empty);
                    self.queue.push(n);
                } else if c == opponent {
                    let s = self.string_number[n];
                    if self.mark_string(s) {
                        self.liberties[s] += 1;
                    }
                }
            }
        }
        self.free_string(id);
        removed
    }

    /// Refill the empty region reachable from `pos` with `color` stones as a
    /// single fresh string. Inverse of [`StringTable::remove_string`].
    ///
    /// The region must be enclosed by stones or the edge. The new string gets
    /// `single_liberty` liberties, which the caller knows from context.
    pub fn reconstruct_string(
        &mut self,
        grid: &mut Grid,
        color: Color,
        pos: Point,
        single_liberty: i32,
    ) {
        debug_assert_eq!(grid[pos], Cell::Empty);
        let cell = Cell::from(color);
        let opponent = Cell::from(color.other());
        let id = self.allocate_string();

        grid.set(pos, cell);
        self.string_number[pos] = id;
        self.queue.push(pos);
        while let Some(pt) = self.queue.pop() {
            self.start_string_pass();
            for n in neighbors(pt) {
                let c = grid[n];
                if c == Cell::Empty {
                    grid.set(n, cell);
                    self.string_number[n] = id;
                    self.queue.push(n);
                } else if c == opponent {
                    let s = self.string_number[n];
                    if self.mark_string(s) {
                        self.liberties[s] -= 1;
                    }
                }
            }
        }
        self.liberties[id] = single_liberty;
    }

    /// Take the single stone at `pos` off the grid, splitting what remains of
    /// its string into fresh strings, one per disconnected piece.
    ///
    /// Returns the color of the lifted stone.
    pub fn lift_stone(&mut self, grid: &mut Grid, pos: Point) -> Color {
        let color = match grid[pos].color() {
            Some(color) => color,
            None => panic!("lift_stone on empty point {pos}"),
        };
        let cell = Cell::from(color);
        let opponent = Cell::from(color.other());
        let old_id = self.string_number[pos];
        grid.set(pos, Cell::Empty);

        self.start_string_pass();
        for n in neighbors(pos) {
            if grid[n] == opponent {
                let s = self.string_number[n];
                if self.mark_string(s) {
                    self.liberties[s] += 1;
                }
            }
        }

        // `old_id` stays allocated until every piece has its own id, so it is
        // never handed out while pieces still carry it.
        for n in neighbors(pos) {
            if grid[n] == cell && self.string_number[n] == old_id {
                let id = self.allocate_string();
                self.start_position_pass();
                let libs = self.change_string_number(grid, n, id);
                self.liberties[id] = libs;
            }
        }
        self.free_string(old_id);
        color
    }

    /// Put a `color` stone on the empty point `pos` without capturing
    /// anything, merging it with every neighbouring string of its color.
    pub fn restore_stone(&mut self, grid: &mut Grid, color: Color, pos: Point) {
        let cell = Cell::from(color);
        let opponent = Cell::from(color.other());
        grid.set(pos, cell);

        self.start_string_pass();
        let mut allies: Vec<usize> = Vec::with_capacity(4);
        for n in neighbors(pos) {
            let c = grid[n];
            let s = self.string_number[n];
            if c == opponent {
                if self.mark_string(s) {
                    self.liberties[s] -= 1;
                }
            } else if c == cell && self.mark_string(s) {
                allies.push(s);
            }
        }

        let id = match allies.split_first() {
            Some((&first, rest)) => {
                for &s in rest {
                    self.free_string(s);
                }
                first
            }
            None => self.allocate_string(),
        };
        self.start_position_pass();
        let libs = self.change_string_number(grid, pos, id);
        self.liberties[id] = libs;
    }

    /// Recompute every string id and liberty count from the grid alone.
    pub fn rebuild(&mut self, grid: &Grid) {
        self.liberties.fill(FREE_STRING);
        self.string_number.fill(NO_STRING);

        let mut strings = 0;
        for pt in grid.points() {
            if grid[pt].is_stone() && self.string_number[pt] == NO_STRING {
                let id = self.allocate_string();
                self.start_position_pass();
                let libs = self.change_string_number(grid, pt, id);
                self.liberties[id] = libs;
                strings += 1;
            }
        }
        debug!(strings, "rebuilt string table");
    }

    /// All stones of the string containing `pt`, in flood-fill order.
    pub fn string_stones(&self, grid: &Grid, pt: Point) -> Vec<Point> {
        let cell = grid[pt];
        if !cell.is_stone() {
            return Vec::new();
        }
        let mut visited = vec![false; GRID_SIZE];
        let mut stack = vec![pt];
        let mut stones = Vec::new();
        visited[pt] = true;
        while let Some(p) = stack.pop() {
            stones.push(p);
            for n in neighbors(p) {
                if !visited[n] && grid[n] == cell {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }
        stones
    }

    #[cfg(test)]
    fn set_marks_near_wrap(&mut self) {
        self.position_mark = u32::MAX - 1;
        self.string_mark = u32::MAX - 1;
    }
}
