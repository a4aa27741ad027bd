use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Manhattan distance to another position
    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// A single grid cell with its role flags
///
/// Exactly one cell in a grid has `is_start` set and exactly one has
/// `is_end`; neither of those can ever have `is_wall`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
    pub is_start: bool,
    pub is_end: bool,
    pub is_wall: bool,
    pub is_visited: bool,
    pub is_path: bool,
}

/// Wall layout applied when a grid is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPattern {
    /// No walls
    Empty,
    /// Each non-start/non-end cell becomes a wall independently with the
    /// configured probability
    Random,
    /// A vertical wall segment at the middle column, with open rows at the
    /// top and bottom edges
    Barrier,
}

/// Invalid grid construction input, rejected before any algorithm runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    BadDimensions { rows: i32, cols: i32 },
    #[error("{role} position ({},{}) is out of bounds for a {rows}x{cols} grid", position.row, position.col)]
    OutOfBounds {
        role: &'static str,
        position: Position,
        rows: i32,
        cols: i32,
    },
    #[error("start and goal must be distinct cells, both are ({},{})", .0.row, .0.col)]
    StartEqualsGoal(Position),
}

/// Rectangular occupancy grid: pure data plus validated mutation
///
/// Wall layout, start and goal are fixed once constructed; search and
/// training runs only ever touch the `is_visited`/`is_path` marks, and only
/// on a private clone of the canonical grid.
#[derive(Debug, Clone)]
pub struct GridModel {
    pub rows: i32,
    pub cols: i32,
    pub start: Position,
    pub goal: Position,
    cells: Vec<Cell>,
}

impl GridModel {
    /// Create an empty grid (no walls) with validated start/goal
    pub fn new(rows: i32, cols: i32, start: Position, goal: Position) -> Result<Self, GridError> {
        Self::with_pattern(
            rows,
            cols,
            start,
            goal,
            GridPattern::Empty,
            0.0,
            &mut rand::thread_rng(),
        )
    }

    /// Create a grid honoring the requested wall pattern
    ///
    /// `wall_probability` only matters for [`GridPattern::Random`]. Start and
    /// goal cells are never walled, regardless of pattern.
    pub fn with_pattern(
        rows: i32,
        cols: i32,
        start: Position,
        goal: Position,
        pattern: GridPattern,
        wall_probability: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::BadDimensions { rows, cols });
        }
        for (role, position) in [("start", start), ("goal", goal)] {
            if position.row < 0 || position.row >= rows || position.col < 0 || position.col >= cols
            {
                return Err(GridError::OutOfBounds {
                    role,
                    position,
                    rows,
                    cols,
                });
            }
        }
        if start == goal {
            return Err(GridError::StartEqualsGoal(start));
        }

        let barrier_col = cols / 2;
        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let position = Position::new(row, col);
                let is_start = position == start;
                let is_end = position == goal;
                let wall = match pattern {
                    GridPattern::Empty => false,
                    GridPattern::Random => rng.gen::<f64>() < wall_probability,
                    GridPattern::Barrier => col == barrier_col && row > 2 && row < rows - 3,
                };
                cells.push(Cell {
                    row,
                    col,
                    is_start,
                    is_end,
                    // start/goal win over any pattern placement
                    is_wall: wall && !is_start && !is_end,
                    is_visited: false,
                    is_path: false,
                });
            }
        }

        Ok(GridModel {
            rows,
            cols,
            start,
            goal,
            cells,
        })
    }

    fn idx(&self, position: Position) -> usize {
        (position.row * self.cols + position.col) as usize
    }

    /// Check whether a position lies inside the grid
    pub fn in_bounds(&self, position: Position) -> bool {
        position.row >= 0 && position.row < self.rows && position.col >= 0 && position.col < self.cols
    }

    /// Check whether a position is blocked; out of bounds counts as blocked
    pub fn is_wall(&self, position: Position) -> bool {
        if !self.in_bounds(position) {
            return true;
        }
        self.cells[self.idx(position)].is_wall
    }

    /// Borrow the cell at an in-bounds position
    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[self.idx(position)]
    }

    /// Convert a position to its row-major cell ID
    pub fn cell_id(&self, position: Position) -> i32 {
        position.row * self.cols + position.col
    }

    /// Convert a row-major cell ID back to a position
    pub fn position_of(&self, id: i32) -> Position {
        Position::new(id / self.cols, id % self.cols)
    }

    /// Add a wall; silently a no-op on start, goal, or out-of-bounds cells
    pub fn paint_wall(&mut self, position: Position) {
        if !self.in_bounds(position) {
            return;
        }
        let idx = self.idx(position);
        let cell = &mut self.cells[idx];
        if cell.is_start || cell.is_end {
            return;
        }
        cell.is_wall = true;
    }

    /// Clear visited/path marks without touching walls
    pub fn reset_marks(&mut self) {
        for cell in &mut self.cells {
            cell.is_visited = false;
            cell.is_path = false;
        }
    }

    /// Mark a cell as visited by a run; never set on the start cell
    pub fn mark_visited(&mut self, position: Position) {
        if !self.in_bounds(position) || position == self.start {
            return;
        }
        let idx = self.idx(position);
        self.cells[idx].is_visited = true;
    }

    /// Mark a cell as part of the final path
    pub fn mark_path(&mut self, position: Position) {
        if !self.in_bounds(position) {
            return;
        }
        let idx = self.idx(position);
        self.cells[idx].is_path = true;
    }

    /// Collect the cell IDs of all walls, in row-major order
    pub fn wall_ids(&self) -> Vec<i32> {
        self.cells
            .iter()
            .filter(|cell| cell.is_wall)
            .map(|cell| self.cell_id(Position::new(cell.row, cell.col)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_20x40() -> GridModel {
        GridModel::new(20, 40, Position::new(10, 5), Position::new(10, 35)).unwrap()
    }

    #[test]
    fn rejects_start_equals_goal() {
        let err = GridModel::new(5, 5, Position::new(1, 1), Position::new(1, 1)).unwrap_err();
        assert_eq!(err, GridError::StartEqualsGoal(Position::new(1, 1)));
    }

    #[test]
    fn rejects_out_of_bounds_goal() {
        let err = GridModel::new(5, 5, Position::new(1, 1), Position::new(5, 0)).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { role: "goal", .. }));
    }

    #[test]
    fn rejects_bad_dimensions() {
        let err = GridModel::new(0, 5, Position::new(0, 0), Position::new(0, 1)).unwrap_err();
        assert!(matches!(err, GridError::BadDimensions { .. }));
    }

    #[test]
    fn random_pattern_never_walls_start_or_goal() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridModel::with_pattern(
            20,
            40,
            Position::new(10, 5),
            Position::new(10, 35),
            GridPattern::Random,
            1.0,
            &mut rng,
        )
        .unwrap();
        assert!(!grid.cell(grid.start).is_wall);
        assert!(!grid.cell(grid.goal).is_wall);
        // probability 1.0 walls everything else
        assert_eq!(grid.wall_ids().len(), 20 * 40 - 2);
    }

    #[test]
    fn barrier_pattern_leaves_edge_gaps() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridModel::with_pattern(
            20,
            40,
            Position::new(10, 5),
            Position::new(10, 35),
            GridPattern::Barrier,
            0.0,
            &mut rng,
        )
        .unwrap();
        for row in 0..20 {
            let walled = row > 2 && row < 17;
            assert_eq!(grid.is_wall(Position::new(row, 20)), walled, "row {}", row);
        }
        assert!(!grid.is_wall(Position::new(10, 19)));
        assert!(!grid.is_wall(Position::new(10, 21)));
    }

    #[test]
    fn paint_wall_is_noop_on_start_goal_and_out_of_bounds() {
        let mut grid = grid_20x40();
        grid.paint_wall(grid.start);
        grid.paint_wall(grid.goal);
        grid.paint_wall(Position::new(-1, 0));
        grid.paint_wall(Position::new(0, 40));
        assert!(!grid.cell(grid.start).is_wall);
        assert!(!grid.cell(grid.goal).is_wall);
        assert!(grid.wall_ids().is_empty());

        grid.paint_wall(Position::new(3, 3));
        assert!(grid.is_wall(Position::new(3, 3)));
    }

    #[test]
    fn reset_marks_keeps_walls() {
        let mut grid = grid_20x40();
        grid.paint_wall(Position::new(3, 3));
        grid.mark_visited(Position::new(4, 4));
        grid.mark_path(Position::new(5, 5));
        grid.reset_marks();
        assert!(grid.is_wall(Position::new(3, 3)));
        assert!(!grid.cell(Position::new(4, 4)).is_visited);
        assert!(!grid.cell(Position::new(5, 5)).is_path);
    }

    #[test]
    fn mark_visited_skips_start() {
        let mut grid = grid_20x40();
        grid.mark_visited(grid.start);
        assert!(!grid.cell(grid.start).is_visited);
    }

    #[test]
    fn cell_id_round_trip() {
        let grid = grid_20x40();
        let position = Position::new(7, 33);
        assert_eq!(grid.position_of(grid.cell_id(position)), position);
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = grid_20x40();
        assert!(grid.is_wall(Position::new(-1, 5)));
        assert!(grid.is_wall(Position::new(20, 5)));
        assert!(!grid.is_wall(Position::new(0, 0)));
    }
}
