// Re-decides logged turns with the current configuration
//
// Usage:
//   replay <log_file> --all [--verbose] [--config <path>]
//   replay <log_file> --turns 5,10,15
//   replay <log_file> --validate 5:up,10:right|down
//
// BATTLESNAKE_PROFILE=1 appends a timing breakdown.

use std::env;
use std::process;
use std::time::Instant;

use heat_snake::config::Config;
use heat_snake::replay::{ReplayEngine, ReplayResult};
use heat_snake::simple_profiler;
use heat_snake::types::Direction;

const USAGE: &str = "\
heat-snake replay

USAGE:
  replay <log_file> (--all | --turns <T1,T2,...> | --validate <T:M|M,...>) [OPTIONS]

MODES:
  --all                   Re-decide every logged turn
  --turns <T1,T2,...>     Re-decide the listed turns
  --validate <T:M|M,...>  Check logged moves, '|' separates accepted moves

OPTIONS:
  --verbose               Log every replayed turn
  --config <path>         Tuning file (default: Snake.toml)
  --help                  Show this message";

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Args {
    log_file: String,
    config_path: String,
    verbose: bool,
    mode: Mode,
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("bad turn '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let mut parts = pair.trim().splitn(2, ':');
            let turn = parts.next().unwrap_or_default();
            let moves = parts
                .next()
                .ok_or_else(|| format!("'{}' is not turn:move", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("bad turn '{}': {}", turn, e))?;
            let accepted = moves
                .split('|')
                .map(Direction::parse)
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, accepted))
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let log_file = args.get(1).ok_or("missing log file")?.clone();
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut rest = args.iter().skip(2);
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match flag.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => mode = Some(Mode::Turns(parse_turns(&value()?)?)),
            "--validate" => mode = Some(Mode::Validate(parse_expected_moves(&value()?)?)),
            "--config" => config_path = value()?,
            "--verbose" => verbose = true,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    let mode = mode.ok_or("pick one of --all, --turns or --validate")?;
    Ok(Args {
        log_file,
        config_path,
        verbose,
        mode,
    })
}

fn run(args: Args) -> Result<(), String> {
    let config = Config::from_file(&args.config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {} not loaded ({}), using built-in tuning", args.config_path, e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, args.verbose);
    let entries = engine.load_log_file(&args.log_file)?;
    if entries.is_empty() {
        return Err(format!("{} holds no turns", args.log_file));
    }
    println!("{}: {} turns", args.log_file, entries.len());

    simple_profiler::reset();
    let started = Instant::now();

    let results: Vec<ReplayResult> = match args.mode {
        Mode::All => engine.replay_all(&entries),
        Mode::Turns(turns) => engine.replay_turns(&entries, &turns)?,
        Mode::Validate(expected) => {
            engine.validate_expected_moves(&entries, &expected)?;
            println!("✓ {} logged move(s) as expected", expected.len());
            return Ok(());
        }
    };

    engine.print_report(&results);
    simple_profiler::print_report(started.elapsed().as_millis() as u64);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        println!("{}", USAGE);
        return;
    }

    let outcome = parse_args(&args).and_then(run);
    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        eprintln!();
        eprintln!("{}", USAGE);
        process::exit(1);
    }
}
