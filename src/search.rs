use crate::events::{CellRole, VisitEvent, VisitSink};
use crate::grid::{GridModel, Position};
use crate::path::{self, PathResult};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

// Trace logging flag - set to true to enable debug output
const TRACE_SEARCH: bool = false;

/// 4-directional neighborhood, no diagonals; expansion order right, left,
/// down, up so FIFO tie-breaking keeps the goal-ward sweep
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Frontier ordering selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Order by accumulated cost alone (Dijkstra)
    UniformCost,
    /// Order by cost plus Manhattan distance to goal (A*)
    Heuristic,
}

impl SearchMode {
    fn evaluation_key(self, g: i32, position: Position, goal: Position) -> i32 {
        match self {
            SearchMode::UniformCost => g,
            SearchMode::Heuristic => g + position.manhattan(&goal),
        }
    }
}

/// A node in the frontier
///
/// The parent link exists solely for path reconstruction; nodes are owned by
/// the frontier/closed structures of one run and dropped at run end.
#[derive(Debug)]
pub struct SearchNode {
    pub position: Position,
    pub g: i32,
    pub f: i32,
    pub parent: Option<Rc<SearchNode>>,
}

/// Heap entry wrapper so the frontier pops the minimum evaluation key
struct FrontierEntry {
    f: i32,
    seq: u64,
    node: Rc<SearchNode>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .f
            .cmp(&self.f)
            // Tie-breaker: insertion order
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Terminal result of one search run plus its visit statistics
#[derive(Debug)]
pub struct SearchReport {
    pub result: PathResult,
    /// Dequeued, newly-closed, non-start nodes; one visit event was emitted
    /// for each
    pub visited: usize,
}

/// Frontier-based search over a working grid
///
/// Duplicate frontier entries are pushed freely and discarded on dequeue via
/// the closed set; no decrease-key is needed. The engine never sleeps: one
/// visit event per newly-closed, non-start node is emitted through the sink,
/// and pacing is entirely the host's concern. Walls, start and goal on the
/// grid are never mutated, only the visited/path marks.
pub fn search(grid: &mut GridModel, mode: SearchMode, sink: &mut dyn VisitSink) -> SearchReport {
    let start = grid.start;
    let goal = grid.goal;

    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    let mut closed: HashSet<Position> = HashSet::new();
    let mut seq: u64 = 0;
    let mut visited = 0usize;

    frontier.push(FrontierEntry {
        f: mode.evaluation_key(0, start, goal),
        seq,
        node: Rc::new(SearchNode {
            position: start,
            g: 0,
            f: mode.evaluation_key(0, start, goal),
            parent: None,
        }),
    });

    while let Some(entry) = frontier.pop() {
        let node = entry.node;

        // Duplicate frontier entry for an already-closed position
        if !closed.insert(node.position) {
            continue;
        }

        if node.position != start {
            visited += 1;
            grid.mark_visited(node.position);
            sink.on_visit(VisitEvent {
                position: node.position,
                role: CellRole::Visited,
            });
        }

        if node.position == goal {
            if TRACE_SEARCH {
                println!(
                    "[search] reached goal ({},{}) with g={} after {} visits",
                    goal.row, goal.col, node.g, visited
                );
            }
            let positions = path::from_parent_chain(&node);
            path::apply_path_marks(grid, &positions, sink);
            return SearchReport {
                result: PathResult::Found(positions),
                visited,
            };
        }

        for (dr, dc) in DIRECTIONS {
            let neighbor = Position::new(node.position.row + dr, node.position.col + dc);
            if grid.is_wall(neighbor) {
                continue;
            }
            let g = node.g + 1;
            let f = mode.evaluation_key(g, neighbor, goal);
            seq += 1;
            frontier.push(FrontierEntry {
                f,
                seq,
                node: Rc::new(SearchNode {
                    position: neighbor,
                    g,
                    f,
                    parent: Some(node.clone()),
                }),
            });
        }
    }

    if TRACE_SEARCH {
        println!(
            "[search] frontier exhausted after {} visits - no path",
            visited
        );
    }

    // Frontier exhausted: the normal terminal outcome for an unreachable goal
    SearchReport {
        result: PathResult::NoPathFound,
        visited,
    }
}
