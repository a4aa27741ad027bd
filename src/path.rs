use crate::events::{CellRole, VisitEvent, VisitSink};
use crate::grid::{GridModel, Position};
use crate::search::SearchNode;

/// Terminal outcome of any route computation
///
/// `NoPathFound` is the normal result when the goal is unreachable (or, for
/// policy replay, when the learned table has no usable preference); it is
/// never surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    /// Ordered positions from start to goal, both inclusive
    Found(Vec<Position>),
    NoPathFound,
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    /// Number of cells on the path; 0 when no path was found
    pub fn len(&self) -> usize {
        match self {
            PathResult::Found(path) => path.len(),
            PathResult::NoPathFound => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> Option<&[Position]> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::NoPathFound => None,
        }
    }
}

/// Walk predecessor links from a terminal node back to the start and reverse
pub fn from_parent_chain(goal_node: &SearchNode) -> Vec<Position> {
    let mut path = vec![goal_node.position];
    let mut cursor = goal_node.parent.as_deref();
    while let Some(node) = cursor {
        path.push(node.position);
        cursor = node.parent.as_deref();
    }
    path.reverse();
    path
}

/// A greedy rollout is already ordered start-to-goal
pub fn from_rollout(steps: Vec<Position>) -> Vec<Position> {
    steps
}

/// Set path marks on the working grid and emit the path events in order
pub fn apply_path_marks(grid: &mut GridModel, path: &[Position], sink: &mut dyn VisitSink) {
    for &position in path {
        grid.mark_path(position);
        sink.on_visit(VisitEvent {
            position,
            role: CellRole::Path,
        });
    }
}
