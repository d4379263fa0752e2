// Library exports for the heat-snake bot
// The server binary, the replay tool and the board utilities all build on these modules

pub mod bot;
pub mod config;
pub mod contest;
pub mod debug_logger;
pub mod decision;
pub mod grid;
pub mod heat;
pub mod heuristics;
pub mod pathfinding;
pub mod replay;
pub mod simple_profiler;
pub mod types;
