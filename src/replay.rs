use crate::grid::{GridModel, Position};
use crate::path::{self, PathResult};
use crate::qlearning::ActionValueTable;
use std::collections::HashSet;

/// Deterministic greedy rollout of a learned action-value table
///
/// At each step the highest-valued action wins, with no exploration. Failure
/// cases, all reported as `NoPathFound` exactly like classical search:
/// an all-zero row (state never trained), a repeated position (the policy
/// cycles and would loop forever), stepping outside the grid, or exceeding
/// one step per grid cell.
pub fn replay(table: &ActionValueTable, grid: &GridModel) -> PathResult {
    let goal = grid.goal;
    let step_limit = (grid.rows * grid.cols) as usize;

    let mut current = grid.start;
    let mut steps: Vec<Position> = Vec::new();
    let mut seen: HashSet<Position> = HashSet::new();

    while current != goal && steps.len() < step_limit {
        if !grid.in_bounds(current) {
            return PathResult::NoPathFound;
        }
        if !seen.insert(current) {
            // Policy cycle
            return PathResult::NoPathFound;
        }
        steps.push(current);

        if table.is_zero_row(current) {
            // State never visited during training
            return PathResult::NoPathFound;
        }
        let (dr, dc) = table.best_action(current).delta();
        current = Position::new(current.row + dr, current.col + dc);
    }

    if current == goal {
        steps.push(goal);
        PathResult::Found(path::from_rollout(steps))
    } else {
        PathResult::NoPathFound
    }
}
