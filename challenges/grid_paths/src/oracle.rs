use crate::direction::Direction;
use crate::grid::{Cell, VisitedGrid};

/// Decides, after a cell has been tentatively visited, whether the free
/// remainder of the grid has been split into pieces that no single path
/// can cover.
///
/// Implementations must be sound: reporting a split where a completion
/// exists would lose paths. They need not be complete.
pub trait SplitOracle {
    fn is_split(&mut self, grid: &VisitedGrid, entered: Cell) -> bool;
}

/// Never prunes. Used to cross-check the other oracles.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPruning;

impl SplitOracle for NoPruning {
    #[inline(always)]
    fn is_split(&mut self, _: &VisitedGrid, _: Cell) -> bool {
        false
    }
}

/// Counts the free cells reachable from the first free cell in row-major
/// order and compares against the total number of free cells.
///
/// Scratch buffers are kept between calls so a search allocates once.
#[derive(Debug, Default, Clone)]
pub struct FloodFill {
    seen: Vec<bool>,
    stack: Vec<Cell>,
}

impl FloodFill {
    pub fn new() -> FloodFill {
        Self::default()
    }

    fn reachable_from(&mut self, grid: &VisitedGrid, start: Cell) -> usize {
        let size = grid.size();
        self.seen.clear();
        self.seen.resize(size * size, false);
        self.stack.clear();

        self.seen[start.row * size + start.col] = true;
        self.stack.push(start);
        let mut reached = 0;

        while let Some(cell) = self.stack.pop() {
            reached += 1;
            for dir in Direction::ALL {
                let Some(next) = grid.neighbor(cell, dir) else {
                    continue;
                };
                let offset = next.row * size + next.col;
                if grid.is_visited(next) || self.seen[offset] {
                    continue;
                }
                self.seen[offset] = true;
                self.stack.push(next);
            }
        }
        reached
    }
}

impl SplitOracle for FloodFill {
    fn is_split(&mut self, grid: &VisitedGrid, _: Cell) -> bool {
        let Some(start) = grid.first_unvisited() else {
            // nothing left to place
            return false;
        };
        self.reachable_from(grid, start) != grid.unvisited_count()
    }
}

/// Constant-time local check on the cell just entered: free on both sides
/// along one axis and blocked on both sides along the other. The visited
/// path then walls the two free sides off from each other.
#[derive(Debug, Default, Clone, Copy)]
pub struct Barrier;

impl SplitOracle for Barrier {
    #[inline(always)]
    fn is_split(&mut self, grid: &VisitedGrid, entered: Cell) -> bool {
        let left_blocked = grid.is_blocked(entered, Direction::Left);
        let right_blocked = grid.is_blocked(entered, Direction::Right);
        let up_blocked = grid.is_blocked(entered, Direction::Up);
        let down_blocked = grid.is_blocked(entered, Direction::Down);

        (!left_blocked && !right_blocked && up_blocked && down_blocked)
            || (left_blocked && right_blocked && !up_blocked && !down_blocked)
    }
}

/// Runs the first oracle and only consults the second when it passes.
impl<A: SplitOracle, B: SplitOracle> SplitOracle for (A, B) {
    #[inline(always)]
    fn is_split(&mut self, grid: &VisitedGrid, entered: Cell) -> bool {
        self.0.is_split(grid, entered) || self.1.is_split(grid, entered)
    }
}
