use crate::grid::{GridError, GridModel, Position};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Errors from reading or writing a grid layout file
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode or parse save file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save file describes an invalid grid: {0}")]
    Grid(#[from] GridError),
}

/// Persisted wall layout
///
/// Only dimensions, start/goal and blocked cells are saved; visited/path
/// marks and learned tables never are.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    pub grid_rows: i32,
    pub grid_cols: i32,
    pub start: Position,
    pub goal: Position,
    /// Blocked cells (stored as row-major cell IDs)
    pub blocked_cells: Vec<i32>,
}

impl SaveState {
    /// Capture the wall layout of a grid
    pub fn from_grid(grid: &GridModel) -> Self {
        SaveState {
            grid_rows: grid.rows,
            grid_cols: grid.cols,
            start: grid.start,
            goal: grid.goal,
            blocked_cells: grid.wall_ids(),
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        let save_state: SaveState = serde_json::from_str(&json)?;
        Ok(save_state)
    }

    /// Rebuild a validated grid from the saved layout
    pub fn restore_grid(&self) -> Result<GridModel, SaveError> {
        let mut grid = GridModel::new(self.grid_rows, self.grid_cols, self.start, self.goal)?;
        for &cell_id in &self.blocked_cells {
            if cell_id >= 0 && cell_id < self.grid_rows * self.grid_cols {
                grid.paint_wall(grid.position_of(cell_id));
            }
        }
        Ok(grid)
    }
}
