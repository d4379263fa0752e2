// Configuration module for reading Snake.toml
// Every tunable of the decision engine lives here, grouped by the part that reads it

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub heuristics: HeuristicsConfig,
    pub heat: HeatConfig,
    pub debug: DebugConfig,
}

/// Appearance reported on the info endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Response deadline handling
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Move limits and alternate-branch budgets handed to the path solver
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub dead_end_move_cap: usize,
    pub stronger_threat_moves: usize,
    pub stronger_threat_alternates: usize,
    pub weaker_prey_alternates: usize,
    pub food_search_moves: usize,
    pub food_search_alternates: usize,
    pub tail_chase_alternates: usize,
    pub contest_opponent_moves: usize,
    pub contest_min_buffer: usize,
    pub food_contest_opponent_moves: usize,
    pub food_contest_max_competition: usize,
}

/// Thresholds the heuristic evaluators compare against
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicsConfig {
    pub starving_health: i32,
    /// Paths at most this long count as an immediate threat
    pub danger_path_length: usize,
    pub max_threat_agents: usize,
    pub tail_chase_duel_min_distance: f64,
    pub tail_chase_duel_max_distance: f64,
    pub stronger_path_slack: usize,
    pub kill_block_min_path: usize,
    pub kill_block_max_path: usize,
    pub max_food_targets: usize,
    pub max_weaker_targets: usize,
    pub far_food_path: usize,
    /// Path cells closer than this to the head ignore opponent markers
    pub dead_end_marker_grace: usize,
}

/// Weights of the weighted heat tags. Death tags are not weighted.
#[derive(Debug, Deserialize, Clone)]
pub struct HeatConfig {
    pub forward: u32,
    pub most_future: u32,
    pub second_most_future: u32,
    pub least_future: u32,
    pub food: u32,
    pub food_edge: u32,
    pub food_cluster: u32,
    pub food_starving: u32,
    pub food_fight: u32,
    pub future_food: u32,
    pub food_when_weak: u32,
    pub solo_food_death: u32,
    pub farthest_from_self: u32,
    pub chase_tail: u32,
    pub chase_tail_urgent: u32,
    pub possible_kill: u32,
    pub future_kill: u32,
    pub future_kill_closest: u32,
    pub future_kill_block: u32,
    pub edge: u32,
    pub move_off_edge: u32,
    pub corner: u32,
    pub snake_future_death: u32,
    pub stronger_snake: u32,
}

/// Debug logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            server: ServerConfig {
                author: "heat-snake".to_string(),
                color: "#A8894F".to_string(),
                head: "fang".to_string(),
                tail: "curled".to_string(),
            },
            timing: TimingConfig {
                response_time_budget_ms: 500,
                network_overhead_ms: 100,
            },
            search: SearchConfig {
                dead_end_move_cap: 12,
                stronger_threat_moves: 9,
                stronger_threat_alternates: 1,
                weaker_prey_alternates: 3,
                food_search_moves: 7,
                food_search_alternates: 0,
                tail_chase_alternates: 1,
                contest_opponent_moves: 7,
                contest_min_buffer: 3,
                food_contest_opponent_moves: 5,
                food_contest_max_competition: 1,
            },
            heuristics: HeuristicsConfig {
                starving_health: 25,
                danger_path_length: 5,
                max_threat_agents: 2,
                tail_chase_duel_min_distance: 2.0,
                tail_chase_duel_max_distance: 5.0,
                stronger_path_slack: 3,
                kill_block_min_path: 3,
                kill_block_max_path: 7,
                max_food_targets: 2,
                max_weaker_targets: 2,
                far_food_path: 5,
                dead_end_marker_grace: 2,
            },
            heat: HeatConfig {
                forward: 1,
                most_future: 3,
                second_most_future: 1,
                least_future: 3,
                food: 4,
                food_edge: 1,
                food_cluster: 10,
                food_starving: 8,
                food_fight: 6,
                future_food: 5,
                food_when_weak: 7,
                solo_food_death: 15,
                farthest_from_self: 2,
                chase_tail: 2,
                chase_tail_urgent: 4,
                possible_kill: 9,
                future_kill: 2,
                future_kill_closest: 2,
                future_kill_block: 12,
                edge: 6,
                move_off_edge: 4,
                corner: 0,
                snake_future_death: 16,
                stronger_snake: 10,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Could not load Snake.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}
