// JSONL turn log
//
// Each decided turn becomes one JSON line holding the board, our id, the chosen
// move and the ranked candidates. Lines are written from spawned tokio tasks so
// the move response never waits on the disk.

use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::decision::ScoredMove;
use crate::types::{Board, Direction};

/// Everything recorded about one turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub game_id: String,
    pub turn: i32,
    pub you_id: String,
    pub chosen_move: Direction,
    pub scores: Vec<ScoredMove>,
    pub board: Board,
}

#[derive(Serialize)]
struct LogLine<'a> {
    #[serde(flatten)]
    record: &'a TurnRecord,
    timestamp: String,
}

impl TurnRecord {
    /// The record as one newline-terminated JSON line, stamped with the current time
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let line = LogLine {
            record: self,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        serde_json::to_string(&line).map(|json| json + "\n")
    }
}

/// Cheap to clone; clones share the same file
#[derive(Clone)]
pub struct DebugLogger {
    sink: Option<Arc<Mutex<File>>>,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`.
    /// A file that cannot be created leaves the logger disabled.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let opened = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await;

        match opened {
            Ok(file) => {
                info!("Writing turn log to {}", log_file_path);
                DebugLogger {
                    sink: Some(Arc::new(Mutex::new(file))),
                }
            }
            Err(e) => {
                error!("Turn log {} unavailable: {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Queues the record for writing. Must be called inside a tokio runtime.
    pub fn log_turn(&self, record: TurnRecord) {
        let sink = match &self.sink {
            Some(sink) => sink.clone(),
            None => return,
        };

        tokio::spawn(async move {
            let line = match record.to_json_line() {
                Ok(line) => line,
                Err(e) => {
                    error!("Turn {} not logged: {}", record.turn, e);
                    return;
                }
            };

            let mut file = sink.lock().await;
            let written = match file.write_all(line.as_bytes()).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                error!("Turn {} not logged: {}", record.turn, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    #[test]
    fn test_json_line_matches_replay_format() {
        let record = TurnRecord {
            game_id: "g".to_string(),
            turn: 9,
            you_id: "me".to_string(),
            chosen_move: Direction::Left,
            scores: vec![ScoredMove {
                direction: Direction::Left,
                cell: Coord::new(2, 3),
                score: 42,
            }],
            board: Board {
                height: 5,
                width: 5,
                food: vec![],
                snakes: vec![],
                hazards: vec![],
            },
        };

        let line = record.to_json_line().unwrap();
        assert!(line.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["chosen_move"], "left");
        assert_eq!(value["you_id"], "me");
        assert_eq!(value["scores"][0]["score"], 42);
        assert!(value["timestamp"].as_str().map_or(false, |t| !t.is_empty()));
    }

    #[test]
    fn test_disabled_logger_ignores_records() {
        assert!(!DebugLogger::disabled().is_enabled());
    }
}
