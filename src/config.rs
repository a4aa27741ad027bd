use crate::grid::Position;
use crate::qlearning::TrainingParams;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_start_row")]
    pub start_row: i32,
    #[serde(default = "default_start_col")]
    pub start_col: i32,
    #[serde(default = "default_goal_row")]
    pub goal_row: i32,
    #[serde(default = "default_goal_col")]
    pub goal_col: i32,
    #[serde(default = "default_wall_probability")]
    pub wall_probability: f64,
}

#[derive(Debug, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_episodes")]
    pub episodes: u64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_epsilon_start")]
    pub epsilon_start: f64,
    #[serde(default = "default_epsilon_decay")]
    pub epsilon_decay: f64,
    #[serde(default = "default_epsilon_floor")]
    pub epsilon_floor: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_rows() -> i32 { 20 }
fn default_cols() -> i32 { 40 }
fn default_start_row() -> i32 { 10 }
fn default_start_col() -> i32 { 5 }
fn default_goal_row() -> i32 { 10 }
fn default_goal_col() -> i32 { 35 }
fn default_wall_probability() -> f64 { 0.25 }
fn default_episodes() -> u64 { 1_000_000 }
fn default_alpha() -> f64 { 0.2 }
fn default_gamma() -> f64 { 0.99 }
fn default_epsilon_start() -> f64 { 1.0 }
fn default_epsilon_decay() -> f64 { 0.9998 }
fn default_epsilon_floor() -> f64 { 0.1 }
fn default_max_steps() -> u32 { 1000 }
fn default_snapshot_every() -> u64 { 1000 }
fn default_event_log_path() -> String { "visit_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            start_row: default_start_row(),
            start_col: default_start_col(),
            goal_row: default_goal_row(),
            goal_col: default_goal_col(),
            wall_probability: default_wall_probability(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            alpha: default_alpha(),
            gamma: default_gamma(),
            epsilon_start: default_epsilon_start(),
            epsilon_decay: default_epsilon_decay(),
            epsilon_floor: default_epsilon_floor(),
            max_steps: default_max_steps(),
            snapshot_every: default_snapshot_every(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_event_log: false,
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            training: TrainingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GridConfig {
    pub fn start(&self) -> Position {
        Position::new(self.start_row, self.start_col)
    }

    pub fn goal(&self) -> Position {
        Position::new(self.goal_row, self.goal_col)
    }
}

impl From<&TrainingConfig> for TrainingParams {
    fn from(config: &TrainingConfig) -> Self {
        TrainingParams {
            episodes: config.episodes,
            alpha: config.alpha,
            gamma: config.gamma,
            epsilon_start: config.epsilon_start,
            epsilon_decay: config.epsilon_decay,
            epsilon_floor: config.epsilon_floor,
            max_steps: config.max_steps,
            snapshot_every: config.snapshot_every,
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    println!("Loaded configuration from config.toml");
                    config
                }
                Err(e) => {
                    eprintln!("Warning: Failed to parse config.toml: {}", e);
                    eprintln!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                println!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [grid]
            rows = 10
            cols = 12

            [training]
            episodes = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.rows, 10);
        assert_eq!(config.grid.cols, 12);
        assert_eq!(config.grid.start(), Position::new(10, 5));
        assert_eq!(config.training.episodes, 5000);
        assert_eq!(config.training.alpha, 0.2);
        assert_eq!(config.training.snapshot_every, 1000);
        assert!(!config.logging.enable_event_log);
    }

    #[test]
    fn training_config_converts_to_params() {
        let config = TrainingConfig::default();
        let params = TrainingParams::from(&config);
        assert_eq!(params.episodes, 1_000_000);
        assert_eq!(params.gamma, 0.99);
        assert_eq!(params.epsilon_floor, 0.1);
    }
}
