pub mod config;
pub mod events;
pub mod grid;
pub mod path;
pub mod qlearning;
pub mod replay;
pub mod save_state;
pub mod search;

pub use config::Config;
pub use events::{CellRole, EventLog, NullSink, VisitEvent, VisitSink};
pub use grid::{Cell, GridError, GridModel, GridPattern, Position};
pub use path::PathResult;
pub use qlearning::{
    Action, ActionValueTable, CancelFlag, QLearningTrainer, TrainingOutcome, TrainingParams,
    TrainingSnapshot,
};
pub use replay::replay;
pub use save_state::SaveState;
pub use search::{search, SearchMode, SearchReport};
