// ASCII-art board converter
//
// Usage:
//   board_ascii --json <state.json>    Write <state.json>.txt with the board drawn as ASCII art
//   board_ascii --ascii <board.txt>    Write <board.txt>.json with the wire game state of an ASCII board
//   board_ascii --size <W>x<H>         Print an empty board to fill in by hand

use std::env;
use std::fs;
use std::process;

use heat_snake::grid::{empty_board_ascii, parse_ascii_board, Grid};
use heat_snake::types::GameState;

fn print_usage() {
    eprintln!("USAGE:");
    eprintln!("  board_ascii --json <state.json>");
    eprintln!("  board_ascii --ascii <board.txt>");
    eprintln!("  board_ascii --size <W>x<H>");
    eprintln!();
    eprintln!("In ASCII boards letters are snakes (upper case head), '+' is food, 'Y' is you.");
}

fn json_to_ascii(path: &str) -> Result<String, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let state: GameState =
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path, e))?;
    let grid = Grid::from_snapshot(&state.board, &state.you)?;

    let out_path = format!("{}.txt", path);
    fs::write(&out_path, format!("{}\n", grid))
        .map_err(|e| format!("Failed to write {}: {}", out_path, e))?;
    Ok(out_path)
}

fn ascii_to_json(path: &str) -> Result<String, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let state = parse_ascii_board(&text)?;
    let json =
        serde_json::to_string_pretty(&state).map_err(|e| format!("Failed to serialize state: {}", e))?;

    let out_path = format!("{}.json", path);
    fs::write(&out_path, json + "\n").map_err(|e| format!("Failed to write {}: {}", out_path, e))?;
    Ok(out_path)
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid size '{}'. Expected WxH", s));
    }
    let width = parts[0]
        .parse::<i32>()
        .map_err(|e| format!("Invalid width '{}': {}", parts[0], e))?;
    let height = parts[1]
        .parse::<i32>()
        .map_err(|e| format!("Invalid height '{}': {}", parts[1], e))?;
    if width <= 0 || height <= 0 {
        return Err(format!("Board size must be positive, got {}x{}", width, height));
    }
    Ok((width, height))
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "--json" => json_to_ascii(&args[2]).map(|out_path| format!("Wrote {}", out_path)),
        "--ascii" => ascii_to_json(&args[2]).map(|out_path| format!("Wrote {}", out_path)),
        "--size" => parse_size(&args[2]).map(|(width, height)| empty_board_ascii(width, height)),
        other => Err(format!("Unknown option '{}'", other)),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
