use crate::direction::Direction;

/// A cell coordinate. Rows grow downwards, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }
}

/// The set of cells placed on the current partial path.
///
/// The origin is marked on construction and can never be released, so a
/// grid at search depth `k` always holds exactly `k + 1` visited cells.
#[derive(Debug, Clone)]
pub struct VisitedGrid {
    size: usize,
    cells: Vec<bool>,
    visited: usize,
}

impl VisitedGrid {
    pub fn new(size: usize) -> VisitedGrid {
        let mut cells = vec![false; size * size];
        cells[0] = true;
        VisitedGrid {
            size,
            cells,
            visited: 1,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Bottom-left corner, where every complete path must end.
    pub fn target(&self) -> Cell {
        Cell::new(self.size - 1, 0)
    }

    #[inline(always)]
    fn offset(&self, cell: Cell) -> usize {
        cell.row * self.size + cell.col
    }

    /// The neighbour of `cell` in direction `dir`, or `None` off the edge.
    #[inline(always)]
    pub fn neighbor(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.delta();
        // wrapping on underflow lands far outside the grid
        let row = cell.row.wrapping_add_signed(dr);
        let col = cell.col.wrapping_add_signed(dc);
        (row < self.size && col < self.size).then_some(Cell { row, col })
    }

    /// Whether the neighbour in `dir` is either off the grid or visited.
    #[inline(always)]
    pub fn is_blocked(&self, cell: Cell, dir: Direction) -> bool {
        self.neighbor(cell, dir)
            .is_none_or(|next| self.is_visited(next))
    }

    #[inline(always)]
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.cells[self.offset(cell)]
    }

    pub fn visit(&mut self, cell: Cell) {
        let offset = self.offset(cell);
        debug_assert!(!self.cells[offset], "{:?} visited twice", cell);
        self.cells[offset] = true;
        self.visited += 1;
    }

    pub fn release(&mut self, cell: Cell) {
        debug_assert_ne!(cell, Cell::ORIGIN, "the origin is never released");
        let offset = self.offset(cell);
        debug_assert!(self.cells[offset], "{:?} released while free", cell);
        self.cells[offset] = false;
        self.visited -= 1;
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    pub fn unvisited_count(&self) -> usize {
        self.cells.len() - self.visited
    }

    /// First free cell in row-major order.
    pub fn first_unvisited(&self) -> Option<Cell> {
        self.cells
            .iter()
            .position(|&visited| !visited)
            .map(|offset| Cell::new(offset / self.size, offset % self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_visited() {
        let grid = VisitedGrid::new(3);
        assert!(grid.is_visited(Cell::ORIGIN));
        assert_eq!(grid.visited_count(), 1);
        assert_eq!(grid.unvisited_count(), 8);
        assert_eq!(grid.first_unvisited(), Some(Cell::new(0, 1)));
        assert_eq!(grid.target(), Cell::new(2, 0));
    }

    #[test]
    fn test_visit_and_release() {
        let mut grid = VisitedGrid::new(2);
        grid.visit(Cell::new(0, 1));
        grid.visit(Cell::new(1, 1));
        assert_eq!(grid.visited_count(), 3);
        assert_eq!(grid.first_unvisited(), Some(Cell::new(1, 0)));

        grid.visit(Cell::new(1, 0));
        assert_eq!(grid.unvisited_count(), 0);
        assert_eq!(grid.first_unvisited(), None);

        grid.release(Cell::new(1, 0));
        grid.release(Cell::new(1, 1));
        assert_eq!(grid.visited_count(), 2);
        assert!(!grid.is_visited(Cell::new(1, 1)));
    }

    #[test]
    fn test_neighbors_stay_on_grid() {
        let grid = VisitedGrid::new(3);
        assert_eq!(grid.neighbor(Cell::ORIGIN, Direction::Up), None);
        assert_eq!(grid.neighbor(Cell::ORIGIN, Direction::Left), None);
        assert_eq!(
            grid.neighbor(Cell::ORIGIN, Direction::Right),
            Some(Cell::new(0, 1))
        );
        assert_eq!(
            grid.neighbor(Cell::ORIGIN, Direction::Down),
            Some(Cell::new(1, 0))
        );
        assert_eq!(grid.neighbor(Cell::new(2, 2), Direction::Down), None);
        assert_eq!(grid.neighbor(Cell::new(2, 2), Direction::Right), None);
    }

    #[test]
    fn test_blocked() {
        let grid = VisitedGrid::new(3);
        let cell = Cell::new(0, 1);
        assert!(grid.is_blocked(cell, Direction::Up));
        assert!(grid.is_blocked(cell, Direction::Left)); // origin
        assert!(!grid.is_blocked(cell, Direction::Right));
        assert!(!grid.is_blocked(cell, Direction::Down));
    }
}
