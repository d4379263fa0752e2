// Decision behaviour through the Bot, the way the server drives it

use heat_snake::bot::Bot;
use heat_snake::config::Config;
use heat_snake::decision::decide;
use heat_snake::grid::Grid;
use heat_snake::heat::HeatCatalog;
use heat_snake::types::{Battlesnake, Board, Coord, Direction, Game, GameState};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Generous budget so slow test builds never hit the fallback move
fn relaxed_bot() -> Bot {
    let mut config = Config::default_hardcoded();
    config.timing.response_time_budget_ms = 5_000;
    Bot::new(config)
}

fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

fn game(id: &str) -> Game {
    Game {
        id: id.to_string(),
        ruleset: HashMap::new(),
        timeout: 500,
    }
}

fn board(snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
    Board {
        height: 11,
        width: 11,
        food: food.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
        snakes,
        hazards: Vec::new(),
    }
}

async fn chosen_move(bot: &Bot, board: &Board, you: &Battlesnake) -> String {
    let response = bot
        .get_move(&game("decision"), &3, board, you)
        .await
        .expect("move request should succeed");
    response["move"].as_str().expect("move should be a string").to_string()
}

#[tokio::test]
async fn test_only_legal_move_is_taken() {
    let bot = Bot::new(Config::default_hardcoded());
    let me = snake("me", 90, &[(0, 0), (1, 0), (2, 0)]);
    let board = board(vec![me.clone()], &[]);

    assert_eq!(chosen_move(&bot, &board, &me).await, "up");
}

#[tokio::test]
async fn test_starving_solo_snake_eats_adjacent_food() {
    let bot = relaxed_bot();
    let me = snake("me", 5, &[(5, 5), (5, 4), (5, 3)]);
    let board = board(vec![me.clone()], &[(5, 6)]);

    assert_eq!(chosen_move(&bot, &board, &me).await, "up");
}

#[tokio::test]
async fn test_avoids_cell_a_longer_snake_can_reach() {
    let bot = relaxed_bot();
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let bully = snake("bully", 90, &[(5, 7), (5, 8), (5, 9), (5, 10), (4, 10)]);
    let board = board(vec![me.clone(), bully], &[]);

    let chosen = chosen_move(&bot, &board, &me).await;
    assert_ne!(chosen, "up", "up shares a cell with the longer snake's next move");
    assert_ne!(chosen, "down", "down is our own neck");
}

#[tokio::test]
async fn test_response_carries_shout_for_turn() {
    let bot = Bot::new(Config::default_hardcoded());
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let board = board(vec![me.clone()], &[]);

    let response = bot.get_move(&game("shout"), &12, &board, &me).await.unwrap();
    assert_eq!(response["shout"], Bot::shout(12));
    assert_eq!(Bot::shout(12), "Harder");
}

#[tokio::test]
async fn test_snapshot_without_us_is_rejected() {
    let bot = Bot::new(Config::default_hardcoded());
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let other = snake("other", 90, &[(1, 1), (1, 2), (1, 3)]);
    let board = board(vec![other], &[]);

    assert!(bot.get_move(&game("ghost"), &1, &board, &me).await.is_err());
}

#[test]
fn test_end_scores_survival_and_eliminations() {
    let bot = Bot::new(Config::default_hardcoded());
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let rival = snake("rival", 90, &[(1, 1), (1, 2), (1, 3)]);

    let start_board = board(vec![me.clone(), rival], &[]);
    bot.start(&game("scored"), &0, &start_board, &me);
    assert_eq!(bot.active_games(), 1);

    let end_board = board(vec![me.clone()], &[]);
    assert_eq!(bot.end(&game("scored"), &40, &end_board, &me), 3 * 2 + 5);
    assert_eq!(bot.active_games(), 0);
}

#[test]
fn test_end_without_us_scores_elimination() {
    let bot = Bot::new(Config::default_hardcoded());
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let rival = snake("rival", 90, &[(1, 1), (1, 2), (1, 3)]);

    bot.start(&game("lost"), &0, &board(vec![me.clone(), rival.clone()], &[]), &me);
    assert_eq!(bot.end(&game("lost"), &12, &board(vec![rival], &[]), &me), -50);
}

#[test]
fn test_recorded_board_turns_away_from_the_pocket() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("future_dead_end_007.json");
    let text = fs::read_to_string(&path).expect("Failed to read future_dead_end_007.json");
    let state: GameState = serde_json::from_str(&text).expect("Failed to parse fixture");
    let grid = Grid::from_snapshot(&state.board, &state.you).expect("Fixture should be a valid board");

    let config = Config::default_hardcoded();
    let catalog = HeatCatalog::from_config(&config.heat);
    let decision = decide(&grid, &catalog, &config);

    assert_eq!(decision.direction, Direction::Right);

    let score = |direction: Direction| {
        decision
            .ranked
            .iter()
            .find(|candidate| candidate.direction == direction)
            .map(|candidate| candidate.score)
    };
    let right = score(Direction::Right).expect("right should be legal");
    let left = score(Direction::Left).expect("left should be legal");
    assert!(right > left, "right {} should beat left {}", right, left);
}

#[tokio::test]
async fn test_session_follows_the_latest_move_turn() {
    let bot = relaxed_bot();
    let me = snake("me", 90, &[(5, 5), (5, 4), (5, 3)]);
    let board = board(vec![me.clone()], &[]);
    let game = game("decision");

    bot.start(&game, &0, &board, &me);
    assert_eq!(bot.last_turn("decision"), Some(0));

    chosen_move(&bot, &board, &me).await;
    assert_eq!(bot.last_turn("decision"), Some(3));

    bot.end(&game, &4, &board, &me);
    assert_eq!(bot.last_turn("decision"), None);
}
