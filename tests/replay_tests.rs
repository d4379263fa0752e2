// Integration tests for the replay engine
//
// Covers loading a debug log, replaying selected and all turns, and
// validating logged moves.

use heat_snake::config::Config;
use heat_snake::replay::ReplayEngine;
use heat_snake::types::Direction;
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(Config::default_hardcoded(), false)
}

#[test]
fn test_load_log_file_short_game() {
    let entries = engine()
        .load_log_file(fixture_path("short_game.jsonl"))
        .expect("Failed to load short_game.jsonl");

    assert_eq!(entries.len(), 3, "Expected 3 log entries");
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.turn, i as i32, "Turn number should match index");
        assert_eq!(entry.game_id, "fixture-game");
        assert_eq!(entry.you_id.as_deref(), Some("me"));
    }
    assert_eq!(entries[1].board.snakes.len(), 2);
    assert_eq!(entries[2].scores.len(), 3);
    assert_eq!(entries[2].scores[0].direction, Direction::Up);
}

#[test]
fn test_load_missing_file_fails() {
    assert!(engine()
        .load_log_file(fixture_path("does_not_exist.jsonl"))
        .is_err());
}

#[test]
fn test_replay_forced_and_starving_turns_match() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("short_game.jsonl")).unwrap();

    let results = engine.replay_turns(&entries, &[0, 2]).expect("turns should exist");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.matches), "{:?}", results);
    assert_eq!(results[1].replayed_move, Direction::Up);

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.matches, 2);
    assert_eq!(stats.match_rate, 100.0);
}

#[test]
fn test_replay_all_keeps_log_order() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("short_game.jsonl")).unwrap();

    let results = engine.replay_all(&entries);
    let turns: Vec<i32> = results.iter().map(|r| r.turn).collect();
    assert_eq!(turns, vec![0, 1, 2]);

    // Up runs into the longer snake's reach and down is our neck
    let contested = &results[1];
    assert_ne!(contested.replayed_move, Direction::Up);
    assert_ne!(contested.replayed_move, Direction::Down);
}

#[test]
fn test_replay_unknown_turn_fails() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("short_game.jsonl")).unwrap();
    assert!(engine.replay_turns(&entries, &[9]).is_err());
}

#[test]
fn test_validate_logged_moves() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("short_game.jsonl")).unwrap();

    let expected = vec![
        (0, vec![Direction::Up]),
        (1, vec![Direction::Left, Direction::Right]),
    ];
    assert!(engine.validate_expected_moves(&entries, &expected).is_ok());

    let wrong = vec![(2, vec![Direction::Down])];
    assert!(engine.validate_expected_moves(&entries, &wrong).is_err());
}
