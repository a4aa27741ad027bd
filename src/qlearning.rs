use crate::grid::{GridModel, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Trace logging flag - set to true to enable debug output
const TRACE_TRAINING: bool = false;

// Reward shaping. The wall-collision penalty is applied to the current
// state-action with no bootstrap term and ends the episode; this asymmetry
// is kept as-is because changing it changes the learned behavior.
const WALL_COLLISION_REWARD: f64 = -15.0;
const TOWARD_GOAL_REWARD: f64 = 1.0;
const AWAY_FROM_GOAL_REWARD: f64 = -1.5;
const GOAL_REWARD: f64 = 500.0;

/// The four moves available to the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Fixed (row, col) delta for this action
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// Index into an action-value row
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }
}

/// Dense tabular action-value function, one `[f64; 4]` row per grid cell
///
/// Zero-initialized at training start; an explicitly owned value returned by
/// the trainer and handed to the replayer, never ambient state. Lives until
/// the next training run replaces it.
#[derive(Debug, Clone)]
pub struct ActionValueTable {
    rows: i32,
    cols: i32,
    values: Vec<[f64; 4]>,
}

impl ActionValueTable {
    pub fn zeroed(rows: i32, cols: i32) -> Self {
        ActionValueTable {
            rows,
            cols,
            values: vec![[0.0; 4]; (rows * cols) as usize],
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    fn idx(&self, position: Position) -> usize {
        (position.row * self.cols + position.col) as usize
    }

    /// Action values at a position
    pub fn row(&self, position: Position) -> &[f64; 4] {
        &self.values[self.idx(position)]
    }

    fn row_mut(&mut self, position: Position) -> &mut [f64; 4] {
        let idx = self.idx(position);
        &mut self.values[idx]
    }

    /// Overwrite one entry; intended for hosts building synthetic tables
    pub fn set_value(&mut self, position: Position, action: Action, value: f64) {
        self.row_mut(position)[action.index()] = value;
    }

    /// Largest action value at a position
    pub fn max_value(&self, position: Position) -> f64 {
        self.row(position)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action at a position; first maximum wins
    pub fn best_action(&self, position: Position) -> Action {
        let row = self.row(position);
        let mut best = 0;
        for i in 1..4 {
            if row[i] > row[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    /// True when the state was never updated during training
    pub fn is_zero_row(&self, position: Position) -> bool {
        self.row(position).iter().all(|v| *v == 0.0)
    }

    fn is_all_equal_row(&self, position: Position) -> bool {
        let row = self.row(position);
        row.iter().all(|v| *v == row[0])
    }
}

/// Cooperative cancellation signal shared with an external controller
///
/// Set from anywhere, observed by the trainer at chunk boundaries only; an
/// in-flight episode always completes first.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Training hyperparameters; run-start constants, never renegotiated mid-run
#[derive(Debug, Clone, Copy)]
pub struct TrainingParams {
    pub episodes: u64,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon_start: f64,
    pub epsilon_decay: f64,
    pub epsilon_floor: f64,
    pub max_steps: u32,
    /// Episodes per chunk; snapshot emission and the cancellation check both
    /// sit on chunk boundaries
    pub snapshot_every: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        TrainingParams {
            episodes: 1_000_000,
            alpha: 0.2,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_decay: 0.9998,
            epsilon_floor: 0.1,
            max_steps: 1000,
            snapshot_every: 1000,
        }
    }
}

/// Periodic progress report consumed by the external progress reporter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSnapshot {
    pub episode: u64,
    pub epsilon: f64,
    pub successes: u64,
}

/// Terminal result of a training run
///
/// Both variants carry the table: a cancelled run leaves it in its
/// partially-trained state.
#[derive(Debug)]
pub enum TrainingOutcome {
    Completed {
        table: ActionValueTable,
        snapshot: TrainingSnapshot,
        states_seen: usize,
    },
    Cancelled {
        table: ActionValueTable,
        snapshot: TrainingSnapshot,
        states_seen: usize,
    },
}

impl TrainingOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TrainingOutcome::Cancelled { .. })
    }

    pub fn table(&self) -> &ActionValueTable {
        match self {
            TrainingOutcome::Completed { table, .. } => table,
            TrainingOutcome::Cancelled { table, .. } => table,
        }
    }

    pub fn snapshot(&self) -> TrainingSnapshot {
        match self {
            TrainingOutcome::Completed { snapshot, .. } => *snapshot,
            TrainingOutcome::Cancelled { snapshot, .. } => *snapshot,
        }
    }

    /// Take ownership of the learned table
    pub fn into_table(self) -> ActionValueTable {
        match self {
            TrainingOutcome::Completed { table, .. } => table,
            TrainingOutcome::Cancelled { table, .. } => table,
        }
    }
}

/// Tabular Q-learning over a private copy of the grid
///
/// The trainer is a resumable stepper: [`run_chunk`](Self::run_chunk) runs
/// one cadence worth of episodes and hands control back to the host, which
/// is what keeps a long training run responsive. [`train`](Self::train)
/// drives chunks to completion and checks the cancel flag at each boundary.
pub struct QLearningTrainer {
    grid: GridModel,
    params: TrainingParams,
    table: ActionValueTable,
    epsilon: f64,
    episode: u64,
    successes: u64,
    states_seen: HashSet<Position>,
    rng: StdRng,
}

impl QLearningTrainer {
    pub fn new(grid: &GridModel, params: TrainingParams) -> Self {
        Self::with_rng(grid, params, StdRng::from_entropy())
    }

    /// Seeded construction for reproducible runs
    pub fn with_seed(grid: &GridModel, params: TrainingParams, seed: u64) -> Self {
        Self::with_rng(grid, params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: &GridModel, params: TrainingParams, rng: StdRng) -> Self {
        QLearningTrainer {
            grid: grid.clone(),
            table: ActionValueTable::zeroed(grid.rows, grid.cols),
            epsilon: params.epsilon_start,
            episode: 0,
            successes: 0,
            states_seen: HashSet::new(),
            params,
            rng,
        }
    }

    pub fn snapshot(&self) -> TrainingSnapshot {
        TrainingSnapshot {
            episode: self.episode,
            epsilon: self.epsilon,
            successes: self.successes,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.episode >= self.params.episodes
    }

    /// Distinct states visited across all episodes so far
    pub fn states_seen(&self) -> usize {
        self.states_seen.len()
    }

    /// Run one cadence worth of episodes, then hand control back to the host
    pub fn run_chunk(&mut self) -> TrainingSnapshot {
        let chunk_end = (self.episode + self.params.snapshot_every).min(self.params.episodes);
        while self.episode < chunk_end {
            self.run_episode();
            self.episode += 1;
        }
        if TRACE_TRAINING {
            println!(
                "[training] episode {}/{} eps={:.3} successes={}",
                self.episode, self.params.episodes, self.epsilon, self.successes
            );
        }
        self.snapshot()
    }

    /// Drive chunks to the full episode budget
    ///
    /// The cancel flag is observed once per chunk boundary; when already set
    /// at the first boundary the table comes back untouched. On completion
    /// the final snapshot rides on the outcome itself.
    pub fn train(
        mut self,
        cancel: &CancelFlag,
        on_snapshot: &mut dyn FnMut(TrainingSnapshot),
    ) -> TrainingOutcome {
        while !self.is_complete() {
            if cancel.is_cancelled() {
                let snapshot = self.snapshot();
                let states_seen = self.states_seen.len();
                return TrainingOutcome::Cancelled {
                    table: self.table,
                    snapshot,
                    states_seen,
                };
            }
            let snapshot = self.run_chunk();
            on_snapshot(snapshot);
        }
        let snapshot = self.snapshot();
        let states_seen = self.states_seen.len();
        TrainingOutcome::Completed {
            table: self.table,
            snapshot,
            states_seen,
        }
    }

    fn run_episode(&mut self) {
        self.epsilon = (self.epsilon * self.params.epsilon_decay).max(self.params.epsilon_floor);

        let goal = self.grid.goal;
        let mut current = self.grid.start;
        let mut steps: u32 = 0;

        while current != goal && steps < self.params.max_steps {
            self.states_seen.insert(current);

            let action = self.select_action(current);
            let (dr, dc) = action.delta();
            let candidate = Position::new(current.row + dr, current.col + dc);

            if self.grid.is_wall(candidate) {
                // Collision: penalize the attempted move and end the episode;
                // the agent never occupies the candidate cell
                let alpha = self.params.alpha;
                let q = &mut self.table.row_mut(current)[action.index()];
                *q += alpha * (WALL_COLLISION_REWARD - *q);
                break;
            }

            let mut reward = if candidate.manhattan(&goal) < current.manhattan(&goal) {
                TOWARD_GOAL_REWARD
            } else {
                AWAY_FROM_GOAL_REWARD
            };
            if candidate == goal {
                reward = GOAL_REWARD;
                self.successes += 1;
            }

            let max_next = self.table.max_value(candidate);
            let alpha = self.params.alpha;
            let gamma = self.params.gamma;
            let q = &mut self.table.row_mut(current)[action.index()];
            *q += alpha * (reward + gamma * max_next - *q);

            current = candidate;
            steps += 1;
        }
    }

    /// ε-greedy selection; an all-equal row also falls back to a uniform
    /// random pick so an untrained table carries no directional bias
    fn select_action(&mut self, position: Position) -> Action {
        if self.rng.gen::<f64>() < self.epsilon || self.table.is_all_equal_row(position) {
            return Action::ALL[self.rng.gen_range(0..4)];
        }
        self.table.best_action(position)
    }
}
