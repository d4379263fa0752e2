// Prints one logged turn: the board, the logged scores and the replayed heat tags
//
// Usage:
//   show_turn_details <log_file.jsonl> <turn_number> [--config <path>]

use std::env;
use std::process;

use heat_snake::config::Config;
use heat_snake::replay::ReplayEngine;

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: show_turn_details <log_file.jsonl> <turn_number> [--config <path>]");
        process::exit(1);
    }

    let target_turn: i32 = args[2]
        .parse()
        .unwrap_or_else(|e| fail(format!("Turn must be a number: {}", e)));

    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => match args.get(i + 1) {
            Some(path) => Config::from_file(path).unwrap_or_else(|e| fail(e)),
            None => fail("--config requires an argument".to_string()),
        },
        None => Config::load_or_default(),
    };

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&args[1]).unwrap_or_else(|e| fail(e));
    let entry = entries
        .iter()
        .find(|e| e.turn == target_turn)
        .unwrap_or_else(|| fail(format!("Turn {} not found in {}", target_turn, args[1])));

    let grid = entry.grid().unwrap_or_else(|e| fail(e));
    let me = grid.me();

    println!("═══════════════════════════════════════════════════════════");
    println!("              TURN {} FULL DETAILS", entry.turn);
    println!("═══════════════════════════════════════════════════════════\n");

    println!("Game: {}", entry.game_id);
    println!("Our Snake: {} (health={}, length={})", me.name, me.health, me.length());
    println!("Head: {}", me.head());
    println!("Logged move: {}", entry.chosen_move);
    println!();
    println!("{}", grid);
    println!();

    for other in grid.others() {
        println!(
            "Opponent {}: head {} health {} length {}",
            other.name,
            other.head(),
            other.health,
            other.length()
        );
    }
    println!();

    if !entry.scores.is_empty() {
        println!("═══════════════════════════════════════════════════════════");
        println!("                    LOGGED SCORES");
        println!("═══════════════════════════════════════════════════════════\n");
        for scored in &entry.scores {
            println!("  {:<6} {} {:>8}", scored.direction, scored.cell, scored.score);
        }
        println!();
    }

    let decision = engine.decide_entry(entry).unwrap_or_else(|e| fail(e));

    println!("═══════════════════════════════════════════════════════════");
    println!("                REPLAYED CANDIDATES");
    println!("═══════════════════════════════════════════════════════════\n");
    for scored in &decision.ranked {
        println!("  {:<6} {} {:>8}", scored.direction, scored.cell, scored.score);
        if let Some(tags) = decision.heat.tags(&scored.cell) {
            for tag in tags {
                println!("      {:<20} {:?} x{}", tag.name, tag.category, tag.weight);
            }
        }
    }
    println!();
    println!("Replayed move: {}", decision.direction);
}
