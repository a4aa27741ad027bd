use pathlab::{
    replay, search, CancelFlag, Config, EventLog, GridModel, GridPattern, PathResult, Position,
    QLearningTrainer, SearchMode, TrainingOutcome, TrainingParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::time::Instant;

/// Render a grid to the terminal, standing in for the excluded renderer
fn render_grid(grid: &GridModel) -> String {
    let mut out = String::new();
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let cell = grid.cell(Position::new(row, col));
            let symbol = if cell.is_start {
                'S'
            } else if cell.is_end {
                'G'
            } else if cell.is_path {
                '*'
            } else if cell.is_wall {
                '#'
            } else if cell.is_visited {
                '+'
            } else {
                '.'
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

fn report(label: &str, result: &PathResult, visited: usize, elapsed_ms: f64) {
    match result {
        PathResult::Found(path) => println!(
            "{}: path of {} cells, {} visited, {:.2}ms",
            label,
            path.len(),
            visited,
            elapsed_ms
        ),
        PathResult::NoPathFound => println!(
            "{}: no path found ({} visited, {:.2}ms)",
            label, visited, elapsed_ms
        ),
    }
}

fn run_classical(grid: &GridModel, mode: SearchMode, label: &str, event_log: &mut Option<EventLog>) {
    // Runs mutate a private working copy, never the canonical grid
    let mut working = grid.clone();
    let start_time = Instant::now();
    let report_data = match event_log {
        Some(log) => search(&mut working, mode, log),
        None => {
            let mut sink = pathlab::NullSink;
            search(&mut working, mode, &mut sink)
        }
    };
    let elapsed = start_time.elapsed().as_secs_f64() * 1000.0;
    report(label, &report_data.result, report_data.visited, elapsed);
    println!("{}", render_grid(&working));
}

fn run_qlearning(grid: &GridModel, params: TrainingParams, seed: Option<u64>) {
    let trainer = match seed {
        Some(seed) => QLearningTrainer::with_seed(grid, params, seed),
        None => QLearningTrainer::new(grid, params),
    };

    let cancel = CancelFlag::new();
    let start_time = Instant::now();
    let total = params.episodes;
    // Print at most ~20 progress lines regardless of budget
    let print_every = (total / (params.snapshot_every * 20)).max(1) * params.snapshot_every;

    let outcome = trainer.train(&cancel, &mut |snapshot| {
        if snapshot.episode % print_every == 0 {
            println!(
                "  episode {:>9}/{} eps={:.3} goals={}",
                snapshot.episode, total, snapshot.epsilon, snapshot.successes
            );
        }
    });

    let elapsed = start_time.elapsed().as_secs_f64() * 1000.0;
    match &outcome {
        TrainingOutcome::Completed {
            snapshot,
            states_seen,
            ..
        } => println!(
            "Training complete: {} episodes, {} goals, {} states explored, {:.2}ms",
            snapshot.episode, snapshot.successes, states_seen, elapsed
        ),
        TrainingOutcome::Cancelled { snapshot, .. } => {
            println!("Training cancelled at episode {}", snapshot.episode);
            return;
        }
    }

    let mut working = grid.clone();
    let result = replay(outcome.table(), &working);
    match &result {
        PathResult::Found(path) => {
            for &position in path {
                working.mark_path(position);
            }
            println!("Q-Learning replay: path of {} cells", path.len());
        }
        PathResult::NoPathFound => {
            println!("Q-Learning replay: no path found (policy did not converge)")
        }
    }
    println!("{}", render_grid(&working));
}

fn main() {
    let config = Config::load();
    let args: Vec<String> = env::args().skip(1).collect();

    let mut pattern = GridPattern::Empty;
    let mut episodes_override: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "empty" => pattern = GridPattern::Empty,
            "random" => pattern = GridPattern::Random,
            "barrier" => pattern = GridPattern::Barrier,
            "--episodes" => {
                episodes_override = iter.next().and_then(|v| v.parse().ok());
            }
            "--seed" => {
                seed = iter.next().and_then(|v| v.parse().ok());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: pathlab [empty|random|barrier] [--episodes N] [--seed N]");
                std::process::exit(2);
            }
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let grid = match GridModel::with_pattern(
        config.grid.rows,
        config.grid.cols,
        config.grid.start(),
        config.grid.goal(),
        pattern,
        config.grid.wall_probability,
        &mut rng,
    ) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Invalid grid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Grid {}x{}, start ({},{}), goal ({},{})\n",
        grid.rows, grid.cols, grid.start.row, grid.start.col, grid.goal.row, grid.goal.col
    );

    let mut event_log = if config.logging.enable_event_log {
        Some(EventLog::new())
    } else {
        None
    };

    run_classical(&grid, SearchMode::UniformCost, "Dijkstra", &mut event_log);
    run_classical(&grid, SearchMode::Heuristic, "A*", &mut event_log);

    let mut params = TrainingParams::from(&config.training);
    if let Some(episodes) = episodes_override {
        params.episodes = episodes;
    }
    run_qlearning(&grid, params, seed);

    if let Some(log) = &event_log {
        println!("Event log: {}", log.summary());
        if let Err(e) = log.save_to_file(&config.logging.event_log_path) {
            eprintln!("Warning: failed to save event log: {}", e);
        } else {
            println!("Event log saved to {}", config.logging.event_log_path);
        }
    }
}
