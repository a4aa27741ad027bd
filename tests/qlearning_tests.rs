use pathlab::{
    replay, search, CancelFlag, GridModel, PathResult, Position, QLearningTrainer, SearchMode,
    TrainingParams, TrainingSnapshot,
};
use pathlab::events::NullSink;

fn all_zero(table: &pathlab::ActionValueTable) -> bool {
    (0..table.rows()).all(|row| {
        (0..table.cols()).all(|col| table.is_zero_row(Position::new(row, col)))
    })
}

#[test]
fn open_grid_policy_converges_to_the_optimal_path() {
    let grid = GridModel::new(4, 6, Position::new(2, 1), Position::new(2, 4)).unwrap();
    let params = TrainingParams {
        episodes: 4000,
        epsilon_decay: 0.995,
        max_steps: 100,
        snapshot_every: 500,
        ..TrainingParams::default()
    };

    let trainer = QLearningTrainer::with_seed(&grid, params, 7);
    let outcome = trainer.train(&CancelFlag::new(), &mut |_| {});
    assert!(!outcome.is_cancelled());
    let snapshot = outcome.snapshot();
    assert_eq!(snapshot.episode, 4000);
    assert!(snapshot.successes > 0, "no episode ever reached the goal");

    let result = replay(outcome.table(), &grid);
    let manhattan = grid.start.manhattan(&grid.goal) as usize;
    match result {
        PathResult::Found(path) => {
            assert_eq!(path.len(), manhattan + 1, "suboptimal path: {:?}", path);
            assert_eq!(path[0], grid.start);
            assert_eq!(*path.last().unwrap(), grid.goal);
        }
        PathResult::NoPathFound => panic!("policy did not converge"),
    }
}

#[test]
fn learned_detour_matches_classical_search_length() {
    // Vertical barrier with a single gap at the top row
    let mut grid = GridModel::new(5, 7, Position::new(2, 1), Position::new(2, 5)).unwrap();
    for row in 1..5 {
        grid.paint_wall(Position::new(row, 3));
    }

    let mut working = grid.clone();
    let classical = search(&mut working, SearchMode::UniformCost, &mut NullSink);
    assert_eq!(classical.result.len(), 9, "expected an 8-step detour");

    let params = TrainingParams {
        episodes: 20_000,
        epsilon_decay: 0.9995,
        max_steps: 200,
        snapshot_every: 1000,
        ..TrainingParams::default()
    };
    let trainer = QLearningTrainer::with_seed(&grid, params, 11);
    let outcome = trainer.train(&CancelFlag::new(), &mut |_| {});

    let result = replay(outcome.table(), &grid);
    assert_eq!(
        result.len(),
        classical.result.len(),
        "learned path differs from the optimal detour: {:?}",
        result
    );
    assert!(result
        .positions()
        .unwrap()
        .contains(&Position::new(0, 3)));
}

#[test]
fn cancelling_before_the_first_chunk_leaves_the_table_untouched() {
    let grid = GridModel::new(4, 6, Position::new(2, 1), Position::new(2, 4)).unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let trainer = QLearningTrainer::with_seed(&grid, TrainingParams::default(), 3);
    let outcome = trainer.train(&cancel, &mut |_| panic!("no snapshot expected"));

    assert!(outcome.is_cancelled());
    assert_eq!(outcome.snapshot().episode, 0);
    assert!(all_zero(outcome.table()));
    // An untrained table can never replay
    assert_eq!(replay(outcome.table(), &grid), PathResult::NoPathFound);
}

#[test]
fn cancellation_takes_effect_at_the_next_chunk_boundary() {
    let grid = GridModel::new(4, 6, Position::new(2, 1), Position::new(2, 4)).unwrap();
    let params = TrainingParams {
        episodes: 10_000,
        snapshot_every: 1000,
        max_steps: 50,
        ..TrainingParams::default()
    };

    let cancel = CancelFlag::new();
    let handle = cancel.clone();
    let trainer = QLearningTrainer::with_seed(&grid, params, 5);
    let outcome = trainer.train(&cancel, &mut |_| handle.cancel());

    assert!(outcome.is_cancelled());
    // The first chunk completed before the signal became visible
    assert_eq!(outcome.snapshot().episode, 1000);
    assert!(!all_zero(outcome.table()));
}

#[test]
fn snapshots_are_emitted_once_per_chunk() {
    let grid = GridModel::new(4, 6, Position::new(2, 1), Position::new(2, 4)).unwrap();
    let params = TrainingParams {
        episodes: 2500,
        snapshot_every: 1000,
        max_steps: 50,
        ..TrainingParams::default()
    };

    let mut snapshots: Vec<TrainingSnapshot> = Vec::new();
    let trainer = QLearningTrainer::with_seed(&grid, params, 9);
    let outcome = trainer.train(&CancelFlag::new(), &mut |snapshot| snapshots.push(snapshot));

    let episodes: Vec<u64> = snapshots.iter().map(|s| s.episode).collect();
    assert_eq!(episodes, vec![1000, 2000, 2500]);
    assert_eq!(outcome.snapshot().episode, 2500);
    for pair in snapshots.windows(2) {
        assert!(pair[0].epsilon >= pair[1].epsilon);
        assert!(pair[0].successes <= pair[1].successes);
    }
}
