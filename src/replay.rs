// Replays the per-turn debug log through the decision engine
//
// Each logged board is decided again with the current configuration and the
// replayed move is compared with the logged one. Turns are independent, so a
// whole log is replayed on the rayon pool.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::decision::{decide, Decision, ScoredMove};
use crate::grid::Grid;
use crate::heat::HeatCatalog;
use crate::simple_profiler;
use crate::types::{Board, Direction};

/// One line of the debug log
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    #[serde(default)]
    pub game_id: String,
    pub turn: i32,
    /// Missing in hand-written logs, the first snake is assumed then
    #[serde(default)]
    pub you_id: Option<String>,
    pub chosen_move: String,
    /// Ranked candidates as scored when the move was made
    #[serde(default)]
    pub scores: Vec<ScoredMove>,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

impl LogEntry {
    /// Id of the snake that made the logged move
    pub fn our_id(&self) -> Result<&str, String> {
        match &self.you_id {
            Some(id) => Ok(id.as_str()),
            None => self
                .board
                .snakes
                .first()
                .map(|snake| snake.id.as_str())
                .ok_or_else(|| format!("Turn {} has no snakes on the board", self.turn)),
        }
    }

    /// Decision snapshot of the logged board
    pub fn grid(&self) -> Result<Grid, String> {
        let our_id = self.our_id()?;
        let you = self
            .board
            .snakes
            .iter()
            .find(|snake| snake.id == our_id)
            .ok_or_else(|| format!("Turn {}: snake '{}' is not on the board", self.turn, our_id))?;
        Grid::from_snapshot(&self.board, you)
    }

    /// Score the logged ranking gave to `direction`, if it was recorded
    pub fn logged_score(&self, direction: Direction) -> Option<i32> {
        self.scores
            .iter()
            .find(|scored| scored.direction == direction)
            .map(|scored| scored.score)
    }
}

/// Logged versus replayed outcome of one turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    /// Replayed score of the replayed move
    pub replayed_score: i32,
    /// Replayed score of the logged move, `None` when it is no longer legal
    pub original_move_score: Option<i32>,
    /// Score the log recorded for its own move
    pub logged_score: Option<i32>,
    pub computation_time_ms: u128,
}

impl ReplayResult {
    /// How much better the replayed move scores than the logged one
    pub fn score_gap(&self) -> Option<i32> {
        self.original_move_score
            .map(|original| self.replayed_score.saturating_sub(original))
    }
}

/// Aggregates over a set of replayed turns
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
    pub average_time_ms: f64,
    /// (turn, milliseconds) of the slowest replay
    pub slowest: Option<(i32, u128)>,
    /// How often each direction was replayed
    pub replayed_directions: BTreeMap<&'static str, usize>,
}

pub struct ReplayEngine {
    config: Config,
    catalog: HeatCatalog,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        let catalog = HeatCatalog::from_config(&config.heat);
        ReplayEngine {
            config,
            catalog,
            verbose,
        }
    }

    /// Parses a JSONL log; blank lines are skipped, any malformed line fails the load
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let path = log_path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read log {}: {}", path.display(), e))?;

        let entries = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<LogEntry>(line)
                    .map_err(|e| format!("{} line {}: {}", path.display(), index + 1, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Read {} turns from {}", entries.len(), path.display());
        Ok(entries)
    }

    /// Runs the full decision pipeline on a logged board
    pub fn decide_entry(&self, entry: &LogEntry) -> Result<Decision, String> {
        let grid = entry.grid()?;
        Ok(decide(&grid, &self.catalog, &self.config))
    }

    /// Decides one logged turn again and compares it with the log
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Direction::parse(&entry.chosen_move)?;

        let started = Instant::now();
        let decision = self.decide_entry(entry)?;
        let elapsed = started.elapsed().as_millis();

        let replayed_score = decision.ranked.first().map_or(0, |best| best.score);
        let original_move_score = decision
            .ranked
            .iter()
            .find(|scored| scored.direction == original_move)
            .map(|scored| scored.score);

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: decision.direction,
            matches: decision.direction == original_move,
            replayed_score,
            original_move_score,
            logged_score: entry.logged_score(original_move),
            computation_time_ms: elapsed,
        };

        if !self.verbose {
            debug!("Turn {} replayed as {}", result.turn, result.replayed_move);
        } else if result.matches {
            info!(
                "Turn {}: same move {} (score {}, {}ms)",
                result.turn, result.replayed_move, result.replayed_score, elapsed
            );
        } else {
            warn!(
                "Turn {}: logged {} but replayed {} (score {} vs {:?}, {}ms)",
                result.turn,
                result.original_move,
                result.replayed_move,
                result.replayed_score,
                result.original_move_score,
                elapsed
            );
        }

        Ok(result)
    }

    /// Replays every entry in parallel; results keep the log's order and
    /// entries that cannot be replayed are reported and left out
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .map(|entry| {
                let outcome = self.replay_entry(entry);
                simple_profiler::merge_thread_local();
                outcome.map_err(|e| warn!("Skipping turn {}: {}", entry.turn, e)).ok()
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Replays the listed turns in the given order; an unknown turn is an error
    pub fn replay_turns(&self, entries: &[LogEntry], turns: &[i32]) -> Result<Vec<ReplayResult>, String> {
        let selected = turns
            .iter()
            .map(|turn| {
                entries
                    .iter()
                    .find(|entry| entry.turn == *turn)
                    .ok_or_else(|| format!("Turn {} is not in the log", turn))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(selected.len());
        for entry in selected {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Skipping turn {}: {}", entry.turn, e),
            }
        }
        simple_profiler::merge_thread_local();

        Ok(results)
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let mut stats = ReplayStats {
            total_turns: results.len(),
            ..ReplayStats::default()
        };
        if results.is_empty() {
            return stats;
        }

        let mut total_time = 0u128;
        for result in results {
            if result.matches {
                stats.matches += 1;
            }
            total_time += result.computation_time_ms;
            if stats.slowest.map_or(true, |(_, ms)| result.computation_time_ms > ms) {
                stats.slowest = Some((result.turn, result.computation_time_ms));
            }
            *stats
                .replayed_directions
                .entry(result.replayed_move.as_str())
                .or_insert(0) += 1;
        }

        stats.mismatches = stats.total_turns - stats.matches;
        stats.match_rate = 100.0 * stats.matches as f64 / stats.total_turns as f64;
        stats.average_time_ms = total_time as f64 / stats.total_turns as f64;
        stats
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);
        let rule = "═══════════════════════════════════════════════════════════";

        println!("\n{}", rule);
        println!("                    REPLAY REPORT");
        println!("{}", rule);
        println!("Turns replayed:   {}", stats.total_turns);
        println!("Same move:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Different move:   {}", stats.mismatches);
        println!("Average decision: {:.1}ms", stats.average_time_ms);
        if let Some((turn, ms)) = stats.slowest {
            println!("Slowest decision: {}ms on turn {}", ms, turn);
        }
        for (direction, count) in &stats.replayed_directions {
            println!("  {:<6} {}", direction, count);
        }
        println!("{}\n", rule);

        let changed: Vec<&ReplayResult> = results.iter().filter(|r| !r.matches).collect();
        if changed.is_empty() {
            return;
        }

        println!("{}", rule);
        println!("                   CHANGED DECISIONS");
        println!("{}", rule);
        for result in changed {
            let logged = result
                .logged_score
                .map_or_else(|| "-".to_string(), |score| score.to_string());
            let gap = result
                .score_gap()
                .map_or_else(|| "illegal now".to_string(), |gap| format!("+{}", gap));
            println!(
                "Turn {:>4}: {:<5} -> {:<5} logged score {:>8}, replay gap {}",
                result.turn, result.original_move, result.replayed_move, logged, gap
            );
        }
        println!();
    }

    /// Checks the logged moves; each turn lists the moves accepted for it
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, accepted) in expected_moves {
            let entry = entries
                .iter()
                .find(|entry| entry.turn == *turn)
                .ok_or_else(|| format!("Turn {} is not in the log", turn))?;
            let logged = Direction::parse(&entry.chosen_move)?;

            if !accepted.contains(&logged) {
                let names: Vec<&str> = accepted.iter().map(Direction::as_str).collect();
                return Err(format!(
                    "Turn {}: logged {}, expected {}",
                    turn,
                    logged,
                    names.join(" or ")
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"{"turn": 4, "chosen_move": "Up", "board": {"height": 7, "width": 7, "food": [],
        "snakes": [{"id": "a", "name": "A", "health": 90, "body": [{"x": 3, "y": 3}, {"x": 3, "y": 2}],
                    "head": {"x": 3, "y": 3}, "length": 2}]}}"#;

    fn result(turn: i32, matches: bool, ms: u128) -> ReplayResult {
        ReplayResult {
            turn,
            original_move: Direction::Up,
            replayed_move: if matches { Direction::Up } else { Direction::Left },
            matches,
            replayed_score: 5,
            original_move_score: Some(2),
            logged_score: None,
            computation_time_ms: ms,
        }
    }

    #[test]
    fn test_minimal_entry_defaults_to_first_snake() {
        let entry: LogEntry = serde_json::from_str(ENTRY).expect("entry should parse");
        assert_eq!(entry.our_id().unwrap(), "a");
        assert!(entry.scores.is_empty());
        assert_eq!(entry.logged_score(Direction::Up), None);
        assert!(entry.grid().is_ok());
    }

    #[test]
    fn test_unknown_snake_id_is_rejected() {
        let mut entry: LogEntry = serde_json::from_str(ENTRY).unwrap();
        entry.you_id = Some("ghost".to_string());
        assert!(entry.grid().is_err());
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries: Vec<LogEntry> = vec![serde_json::from_str(ENTRY).unwrap()];

        assert!(engine
            .validate_expected_moves(&entries, &[(4, vec![Direction::Up, Direction::Left])])
            .is_ok());
        assert!(engine
            .validate_expected_moves(&entries, &[(4, vec![Direction::Down])])
            .is_err());
        assert!(engine.validate_expected_moves(&entries, &[(5, vec![Direction::Up])]).is_err());
    }

    #[test]
    fn test_generate_stats() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let stats = engine.generate_stats(&[
            result(1, true, 4),
            result(2, false, 9),
            result(3, true, 2),
            result(4, true, 1),
        ]);

        assert_eq!(stats.total_turns, 4);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.match_rate, 75.0);
        assert_eq!(stats.average_time_ms, 4.0);
        assert_eq!(stats.slowest, Some((2, 9)));
        assert_eq!(stats.replayed_directions.get("up"), Some(&3));
        assert_eq!(stats.replayed_directions.get("left"), Some(&1));
    }

    #[test]
    fn test_empty_results_have_empty_stats() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let stats = engine.generate_stats(&[]);
        assert_eq!(stats.total_turns, 0);
        assert_eq!(stats.match_rate, 0.0);
        assert!(stats.slowest.is_none());
    }

    #[test]
    fn test_score_gap() {
        assert_eq!(result(1, false, 1).score_gap(), Some(3));
        let mut gone = result(1, false, 1);
        gone.original_move_score = None;
        assert_eq!(gone.score_gap(), None);
    }
}
