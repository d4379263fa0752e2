// Move selector: runs the heuristic passes for one turn and ranks the legal moves

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::grid::Grid;
use crate::heat::{HeatCatalog, HeatLedger};
use crate::heuristics::Turn;
use crate::pathfinding::PathOptions;
use crate::simple_profiler::ProfileGuard;
use crate::types::{Coord, Direction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub direction: Direction,
    pub cell: Coord,
    pub score: i32,
}

/// Outcome of one decision, with the ranking and the ledger kept for diagnostics
#[derive(Debug, Clone)]
pub struct Decision {
    pub direction: Direction,
    /// Legal moves, best first
    pub ranked: Vec<ScoredMove>,
    pub heat: HeatLedger,
}

/// Legal moves of the controlling agent ordered by ledger score.
/// The sort is stable so the first evaluated move wins ties.
pub fn rank_moves(grid: &Grid, heat: &HeatLedger) -> Vec<ScoredMove> {
    let head = grid.me().head();
    let mut ranked: Vec<ScoredMove> = grid
        .legal_moves(grid.me())
        .into_iter()
        .filter_map(|cell| {
            Direction::between(&head, &cell).map(|direction| ScoredMove {
                direction,
                cell,
                score: heat.score(&cell),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Highest scoring legal move, or any direction at all when nothing is legal
pub fn select_move(grid: &Grid, heat: &HeatLedger) -> Direction {
    match rank_moves(grid, heat).first() {
        Some(best) => best.direction,
        None => random_direction(),
    }
}

/// First legal move without any evaluation, for when the deadline is already gone
pub fn fallback_direction(grid: &Grid) -> Direction {
    let me = grid.me();
    grid.legal_moves(me)
        .first()
        .and_then(|cell| Direction::between(&me.head(), cell))
        .unwrap_or_else(random_direction)
}

fn random_direction() -> Direction {
    let mut rng = rand::rng();
    *Direction::all().choose(&mut rng).unwrap_or(&Direction::Up)
}

/// Runs every heuristic pass for the current board and picks a move
pub fn decide(grid: &Grid, catalog: &HeatCatalog, config: &Config) -> Decision {
    let _guard = ProfileGuard::new("decision");

    let mut turn = Turn::new(grid, catalog, config);
    crate::profile!("heuristics", {
        if grid.others().next().is_none() {
            solo_turn(&mut turn);
        } else {
            contested_turn(&mut turn);
        }
    });

    let ranked = rank_moves(grid, &turn.heat);
    let direction = match ranked.first() {
        Some(best) => best.direction,
        None => {
            log::warn!("No legal moves from {}, picking at random", grid.me().head());
            random_direction()
        }
    };

    for candidate in &ranked {
        let tags: Vec<&str> = turn
            .heat
            .tags(&candidate.cell)
            .map(|tags| tags.iter().map(|tag| tag.name).collect())
            .unwrap_or_default();
        log::debug!(
            "  {} {}: {} {:?}",
            candidate.direction,
            candidate.cell,
            candidate.score,
            tags
        );
    }

    Decision {
        direction,
        ranked,
        heat: turn.heat,
    }
}

/// Alone on the board: stay compact, eat only when hunger demands it
fn solo_turn(turn: &mut Turn) {
    let grid = turn.grid;
    let me = grid.me();
    let moves = grid.legal_moves(me);
    let starve_threshold = (me.length() as i32).max((grid.width + grid.height) / 4);

    turn.chase_tail(true, &[]);

    if me.head().is_adjacent(&me.tail()) {
        turn.heat.add(me.tail(), turn.catalog.chase_tail);
    }

    if me.health > starve_threshold {
        for food in &grid.food {
            turn.heat.add(*food, turn.catalog.solo_food_death);
        }
    }

    for cell in &moves {
        if grid.is_food(cell) {
            turn.starvation(*cell, starve_threshold);
        }
        turn.dead_end(*cell);
    }
}

fn contested_turn(turn: &mut Turn) {
    let grid = turn.grid;
    let config = turn.config;
    let me = grid.me();
    let moves = grid.legal_moves(me);

    turn.default_board_heat();
    turn.forward(&moves);

    for cell in &moves {
        if grid.is_food(cell) {
            turn.starvation(*cell, config.heuristics.starving_health);
        }
        turn.dead_end(*cell);
    }

    turn.branching(&moves);

    if moves.is_empty() {
        return;
    }

    turn.self_distance(&moves);

    let opponents = grid.others().count();
    let weaker_range = if opponents == 1 {
        (grid.area() / 3 + 1) as usize
    } else {
        grid.width.min(grid.height) as usize
    };

    let weaker = turn.paths_to_me(
        &grid.weaker_than(me),
        &PathOptions::new()
            .move_limit(weaker_range)
            .alternates(config.search.weaker_prey_alternates),
    );
    let stronger = turn.paths_to_me(
        &grid.stronger_than(me),
        &PathOptions::new()
            .move_limit(config.search.stronger_threat_moves)
            .alternates(config.search.stronger_threat_alternates)
            .simulate_movement(true),
    );
    log::debug!(
        "{} weaker and {} stronger agents can reach {}",
        weaker.len(),
        stronger.len(),
        me.head()
    );

    turn.future_kill(&moves, &stronger, &weaker);

    if !stronger.is_empty() || weaker.is_empty() {
        turn.most_dangerous(&moves, &stronger);
        turn.chase_tail(false, &stronger);

        let food = turn.paths_to_food();
        turn.extra_food(&food, &stronger);
    }
}
