// Battlesnake bot: per-game sessions around the per-turn decision engine
//
// The decision itself is synchronous and CPU bound. It runs on tokio's blocking
// pool and the request waits for it no longer than the configured budget.

use log::{error, info, warn};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::{DebugLogger, TurnRecord};
use crate::decision::{decide, fallback_direction};
use crate::grid::Grid;
use crate::heat::HeatCatalog;
use crate::types::{Battlesnake, Board, Game};

/// Shouted in turn order, one word per move
const SHOUTS: [&str; 8] = [
    "Work it", "Make it", "Do it", "Makes us", "Harder", "Better", "Faster", "Stronger",
];

/// Score of a game we did not survive
const ELIMINATED_SCORE: i32 = -50;

/// What the bot remembers about a running game
#[derive(Debug, Clone)]
struct GameSession {
    opponents_at_start: usize,
    turn: i32,
}

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    catalog: Arc<HeatCatalog>,
    sessions: Mutex<HashMap<String, GameSession>>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration and no debug log
    pub fn new(config: Config) -> Self {
        Self::with_debug_logger(config, DebugLogger::disabled())
    }

    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        let catalog = Arc::new(HeatCatalog::from_config(&config.heat));
        Bot {
            config,
            catalog,
            sessions: Mutex::new(HashMap::new()),
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": self.config.server.author,
            "color": self.config.server.color,
            "head": self.config.server.head,
            "tail": self.config.server.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, turn: &i32, board: &Board, _you: &Battlesnake) {
        let opponents = board.snakes.len().saturating_sub(1);
        self.sessions.lock().insert(
            game.id.clone(),
            GameSession {
                opponents_at_start: opponents,
                turn: *turn,
            },
        );

        let names: Vec<&str> = board.snakes.iter().map(|snake| snake.name.as_str()).collect();
        info!(
            "GAME START {} on {}x{} against {} opponents: {}",
            game.id,
            board.width,
            board.height,
            opponents,
            names.join(", ")
        );
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Ok(Value)` - JSON response with the chosen move and this turn's shout
    /// * `Err(String)` - The snapshot could not be turned into a board
    pub async fn get_move(
        &self,
        game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, String> {
        let start_time = Instant::now();
        let grid = Grid::from_snapshot(board, you)?;
        let opponents = grid.others().count();

        info!("Turn {}: Computing move ({} opponents)", turn, opponents);

        {
            let mut sessions = self.sessions.lock();
            let session = sessions.entry(game.id.clone()).or_insert_with(|| GameSession {
                opponents_at_start: opponents,
                turn: *turn,
            });
            session.turn = *turn;
        }

        let fallback = fallback_direction(&grid);
        let catalog = self.catalog.clone();
        let config = self.config.clone();
        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());

        let task = tokio::task::spawn_blocking(move || decide(&grid, &catalog, &config));
        let (direction, scores) = match tokio::time::timeout(budget, task).await {
            Ok(Ok(decision)) => (decision.direction, decision.ranked),
            Ok(Err(e)) => {
                error!("Turn {}: decision task failed: {}", turn, e);
                (fallback, Vec::new())
            }
            Err(_) => {
                warn!(
                    "Turn {}: decision exceeded {}ms, falling back to {}",
                    turn,
                    budget.as_millis(),
                    fallback
                );
                (fallback, Vec::new())
            }
        };

        let shout = Self::shout(*turn);
        info!(
            "Turn {}: Chose {} (score: {}, time: {}ms) shouted: {}",
            turn,
            direction,
            scores.first().map_or(0, |best| best.score),
            start_time.elapsed().as_millis(),
            shout
        );

        if self.debug_logger.is_enabled() {
            self.debug_logger.log_turn(TurnRecord {
                game_id: game.id.clone(),
                turn: *turn,
                you_id: you.id.clone(),
                board: board.clone(),
                chosen_move: direction,
                scores,
            });
        }

        Ok(json!({ "move": direction.as_str(), "shout": shout }))
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    ///
    /// Returns the game score: `-50` when eliminated, otherwise twice our length
    /// plus five for every opponent that disappeared since the start
    pub fn end(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> i32 {
        let session = self.sessions.lock().remove(&game.id);
        let remaining = board.snakes.iter().filter(|snake| snake.id != you.id).count();
        let opponents_at_start = session.as_ref().map_or(remaining, |s| s.opponents_at_start);
        let last_move_turn = session.map_or(*turn, |s| s.turn);

        let score = match board.snakes.iter().find(|snake| snake.id == you.id) {
            Some(me) => {
                info!("{:!^50}", " WINNER ");
                let eliminated = opponents_at_start.saturating_sub(remaining);
                me.body.len() as i32 * 2 + eliminated as i32 * 5
            }
            None => {
                info!("{:.^50}", " Loser ");
                ELIMINATED_SCORE
            }
        };

        info!(
            "GAME OVER {} after {} turns (last move on turn {}), score {}",
            game.id, turn, last_move_turn, score
        );
        score
    }

    /// Number of games currently tracked
    pub fn active_games(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Turn of the latest move request seen for a running game
    pub fn last_turn(&self, game_id: &str) -> Option<i32> {
        self.sessions.lock().get(game_id).map(|session| session.turn)
    }

    pub fn shout(turn: i32) -> &'static str {
        SHOUTS[turn.rem_euclid(SHOUTS.len() as i32) as usize]
    }
}
