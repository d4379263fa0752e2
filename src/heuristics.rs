// Heuristic evaluators: independent passes that write heat tags for one decision
//
// Each pass reads the immutable grid and adds tags to the turn's ledger. Passes
// never remove tags, so their order only matters where one pass reads tags an
// earlier pass wrote (dead-end detection reads the opponent markers).

use std::collections::HashSet;

use crate::config::Config;
use crate::contest::{is_closest_strongest, ContestOptions};
use crate::grid::{Agent, Grid};
use crate::heat::{HeatCatalog, HeatLedger};
use crate::pathfinding::{find_path, PathOptions};
use crate::types::{Coord, Direction};

/// An agent with its path toward some target, usually my head
#[derive(Debug, Clone)]
pub struct AgentPath<'a> {
    pub agent: &'a Agent,
    pub path: Vec<Coord>,
}

impl<'a> AgentPath<'a> {
    /// Cell the agent passes through right before reaching the target
    pub fn approach(&self) -> Option<Coord> {
        self.path.len().checked_sub(2).map(|index| self.path[index])
    }
}

/// A reachable food cell with my path to it
#[derive(Debug, Clone)]
pub struct FoodPath {
    pub food: Coord,
    pub path: Vec<Coord>,
}

/// Per-decision context. Built fresh for every move request.
pub struct Turn<'a> {
    pub grid: &'a Grid,
    pub catalog: &'a HeatCatalog,
    pub config: &'a Config,
    pub heat: HeatLedger,
}

impl<'a> Turn<'a> {
    pub fn new(grid: &'a Grid, catalog: &'a HeatCatalog, config: &'a Config) -> Self {
        Turn {
            grid,
            catalog,
            config,
            heat: HeatLedger::new(),
        }
    }

    /// Bodies, opponent reach, food, corners, edges and the ring outside the board
    pub fn default_board_heat(&mut self) {
        let grid = self.grid;
        let tags = self.catalog;
        let me = grid.me();
        let my_moves = grid.legal_moves(me);

        for agent in &grid.agents {
            for cell in &agent.body {
                self.heat.add(*cell, tags.snake_body);
            }
        }

        for other in grid.others() {
            for cell in grid.legal_moves(other) {
                self.heat.add(cell, tags.future_snake_marker);

                if other.length() >= me.length() {
                    self.heat.add(cell, tags.snake_future_death);
                    self.heat.add(cell, tags.future_strong_snake_marker);
                } else if my_moves.contains(&cell) {
                    self.heat.add(cell, tags.possible_kill);
                }
            }
        }

        for food in &grid.food {
            self.heat.add(*food, tags.food);

            if grid.on_edge(food, 1) {
                self.heat.add(*food, tags.food_edge);
            }
            if food.neighbors().iter().any(|cell| grid.is_food(cell)) {
                self.heat.add(*food, tags.food_cluster);
            }
        }

        for corner in grid.corners().iter() {
            self.heat.add(*corner, tags.corner);
        }

        for y in 0..grid.height {
            self.heat.add(Coord::new(0, y), tags.edge);
            self.heat.add(Coord::new(grid.width - 1, y), tags.edge);
        }
        for x in 0..grid.width {
            self.heat.add(Coord::new(x, 0), tags.edge);
            self.heat.add(Coord::new(x, grid.height - 1), tags.edge);
        }

        for y in -1..=grid.height {
            self.heat.add(Coord::new(-1, y), tags.out_of_bounds);
            self.heat.add(Coord::new(grid.width, y), tags.out_of_bounds);
        }
        for x in -1..=grid.width {
            self.heat.add(Coord::new(x, -1), tags.out_of_bounds);
            self.heat.add(Coord::new(x, grid.height), tags.out_of_bounds);
        }
    }

    /// Rewards keeping the current heading
    pub fn forward(&mut self, moves: &[Coord]) {
        let me = self.grid.me();
        if let Some(direction) = me.heading() {
            let ahead = direction.apply(&me.head());
            if moves.contains(&ahead) {
                self.heat.add(ahead, self.catalog.forward);
            }
        }
    }

    pub fn starvation(&mut self, cell: Coord, threshold: i32) {
        if self.grid.me().health <= threshold {
            self.heat.add(cell, self.catalog.food_starving);
        }
    }

    /// Probes whether stepping onto `candidate` still lets me get back to my tail.
    /// Returns the length of the probe path.
    pub fn dead_end(&mut self, candidate: Coord) -> usize {
        let grid = self.grid;
        let me = grid.me();
        let tail = me.tail();

        let limit = (me.length() + 2)
            .min((grid.width + grid.height) as usize)
            .min(self.config.search.dead_end_move_cap);
        let stepped = me.step_toward(candidate, false);
        let path = find_path(
            grid,
            &stepped,
            tail,
            &PathOptions::new().move_limit(limit).return_closest(true),
        );

        let grace = self.config.heuristics.dead_end_marker_grace;
        let mut could_be_blocked = false;
        let mut walker = me.clone();
        for (position, cell) in path.iter().enumerate() {
            walker = walker.step_toward(*cell, false);

            if position >= grace && self.heat.has(cell, &self.catalog.future_snake_marker) {
                could_be_blocked = true;
                break;
            }
            if grid.legal_moves(&walker).len() > 1 {
                break;
            }
        }

        let misses_tail = path.len() <= me.length() && path.last() != Some(&tail);
        if path.is_empty() || misses_tail || (path.len() > 3 && could_be_blocked) {
            log::debug!(
                "dead end at {}: path {} of {}, blocked {}",
                candidate,
                path.len(),
                me.length(),
                could_be_blocked
            );
            self.heat.add(candidate, self.catalog.deadend);
        }

        path.len()
    }

    /// Ranks the candidates by how many moves they leave open
    pub fn branching(&mut self, moves: &[Coord]) {
        if moves.len() < 2 {
            return;
        }

        let grid = self.grid;
        let me = grid.me();
        let mut counts: Vec<(Coord, usize)> = moves
            .iter()
            .map(|cell| (*cell, grid.legal_moves(&me.step_toward(*cell, false)).len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let runner_up = counts[1].1;
        for (position, (cell, count)) in counts.iter().enumerate() {
            if position == 0 && *count > runner_up {
                self.heat.add(*cell, self.catalog.most_future);
            } else if position <= 1 {
                self.heat.add(*cell, self.catalog.second_most_future);
            } else if *count == 1 {
                self.heat.add(*cell, self.catalog.least_future);
            }
        }
    }

    /// Prefers the candidate farthest from my own body
    pub fn self_distance(&mut self, moves: &[Coord]) {
        let me = self.grid.me();
        if me.length() <= 2 {
            return;
        }

        let mut farthest: Option<(Coord, f64)> = None;
        for cell in moves {
            let clearance = me
                .body
                .iter()
                .map(|segment| cell.distance(segment))
                .fold(f64::INFINITY, f64::min);

            if farthest.map_or(true, |(_, best)| clearance >= best) {
                farthest = Some((*cell, clearance));
            }
        }

        if let Some((cell, _)) = farthest {
            self.heat.add(cell, self.catalog.farthest_from_self);
        }
    }

    /// Paths from each agent to my head, shortest first; unreachable agents are dropped
    pub fn paths_to_me(&self, agents: &[&'a Agent], options: &PathOptions) -> Vec<AgentPath<'a>> {
        let grid = self.grid;
        let head = grid.me().head();

        let mut paths: Vec<AgentPath<'a>> = agents
            .iter()
            .map(|agent| AgentPath {
                agent: *agent,
                path: find_path(grid, agent, head, options),
            })
            .filter(|threat| !threat.path.is_empty())
            .collect();
        paths.sort_by_key(|threat| threat.path.len());
        paths
    }

    /// Blocking moves against approaching agents and attack cells against weaker ones
    pub fn future_kill(&mut self, moves: &[Coord], stronger: &[AgentPath<'a>], weaker: &[AgentPath<'a>]) {
        let grid = self.grid;
        let me = grid.me();
        let others = grid.others().count();
        let tuning = &self.config.heuristics;

        if others > 0 && moves.len() > 1 {
            let bodies: HashSet<Coord> = grid
                .others()
                .flat_map(|agent| agent.body.iter().copied())
                .collect();

            let blocks: Vec<Coord> = moves
                .iter()
                .copied()
                .filter(|cell| {
                    let touching = cell.neighbors().iter().filter(|n| bodies.contains(*n)).count();
                    if !grid.on_edge(cell, 1) && touching != 1 {
                        return false;
                    }
                    let stepped = me.step_toward(*cell, grid.is_food(cell));
                    leaves_opposite_pair(cell, &grid.legal_moves(&stepped))
                })
                .collect();

            if !blocks.is_empty() {
                let mut threats: Vec<&AgentPath> = stronger.iter().chain(weaker.iter()).collect();
                threats.sort_by_key(|threat| threat.path.len());

                for threat in threats.iter().take(tuning.max_threat_agents) {
                    let length = threat.path.len();
                    if length < tuning.kill_block_min_path {
                        break;
                    }
                    if length > tuning.kill_block_max_path {
                        let pinned = grid.legal_moves(&threat.agent.step_toward(threat.path[1], false));
                        if pinned.len() != 1 {
                            break;
                        }
                    }

                    let their_head = threat.agent.head();
                    let block = blocks
                        .iter()
                        .min_by(|a, b| a.distance(&their_head).total_cmp(&b.distance(&their_head)));

                    if let Some(block) = block {
                        if me.head().distance(&their_head) > block.distance(&their_head) {
                            log::debug!("blocking {} at {}", threat.agent.name, block);
                            self.heat.add(*block, self.catalog.future_kill_block);
                        }
                    }
                }
            }
        }

        if weaker.is_empty() {
            return;
        }

        if grid.weaker_than(me).len() == others {
            for (rank, prey) in weaker.iter().enumerate() {
                let kill_cell = match prey.approach() {
                    Some(cell) => cell,
                    None => continue,
                };

                if rank == 0 {
                    self.heat.add(kill_cell, self.catalog.future_kill_closest);
                } else if rank >= tuning.max_weaker_targets {
                    break;
                }

                if prey.path.len() > 2 {
                    self.heat.add(kill_cell, self.catalog.future_kill);
                }
            }
        } else if !stronger.is_empty() {
            if let Some(kill_cell) = weaker[0].approach() {
                let threatened = stronger
                    .iter()
                    .any(|threat| threat.path.len() <= tuning.danger_path_length);

                if threatened {
                    self.heat.add(kill_cell, self.catalog.stronger_snake);
                } else {
                    self.heat.add(kill_cell, self.catalog.future_kill);
                }
            }
        }
    }

    /// Marks my move closest to each of the nearest stronger agents
    pub fn most_dangerous(&mut self, moves: &[Coord], stronger: &[AgentPath<'a>]) {
        if moves.is_empty() || stronger.is_empty() {
            return;
        }

        let grid = self.grid;
        let me = grid.me();
        let tags = self.catalog;
        let on_edge = grid.on_edge(&me.head(), 1);

        for threat in stronger.iter().take(self.config.heuristics.max_threat_agents) {
            let their_head = threat.agent.head();
            let top = match moves
                .iter()
                .min_by(|a, b| a.distance(&their_head).total_cmp(&b.distance(&their_head)))
            {
                Some(cell) => *cell,
                None => continue,
            };

            if on_edge {
                if threat.path.contains(&top) {
                    self.heat.add(top, tags.stronger_snake);
                } else if let Some(cell) = threat.approach() {
                    self.heat.add(cell, tags.stronger_snake);
                }

                for cell in moves.iter().filter(|cell| !grid.on_edge(cell, 1)) {
                    self.heat.add(*cell, tags.move_off_edge);
                }
            } else if grid.is_food(&top) && me.length() + 1 >= threat.agent.length() {
                self.heat.add(top, tags.food_when_weak);
            } else {
                self.heat.add(top, tags.stronger_snake);
            }
        }
    }

    /// Follows my own tail when food is scarce, a duel goes badly or when forced
    pub fn chase_tail(&mut self, force: bool, stronger: &[AgentPath<'a>]) {
        let grid = self.grid;
        let me = grid.me();
        let tail = me.tail();
        let tuning = &self.config.heuristics;

        let options = PathOptions::new()
            .move_limit(me.length() + 1)
            .alternates(self.config.search.tail_chase_alternates)
            .simulate_movement(true);
        let path = find_path(grid, me, tail, &options);

        if path.len() < 2 || path[1] == tail {
            return;
        }
        let step = path[1];

        let contested = stronger
            .iter()
            .filter(|threat| threat.path.len() <= path.len() + tuning.stronger_path_slack)
            .any(|threat| threat.path.contains(&step));
        if contested {
            return;
        }

        let others: Vec<&Agent> = grid.others().collect();
        let duel_distance = tuning.tail_chase_duel_min_distance..=tuning.tail_chase_duel_max_distance;

        if grid.food.is_empty() {
            self.heat.add(step, self.catalog.chase_tail);
        } else if others.len() == 1
            && me.length() < others[0].length()
            && duel_distance.contains(&me.head().distance(&others[0].head()))
        {
            self.heat.add(step, self.catalog.chase_tail_urgent);
        } else if force {
            self.heat.add(step, self.catalog.chase_tail_urgent);
        }
    }

    /// My paths to every food reachable within the food search budget
    pub fn paths_to_food(&self) -> Vec<FoodPath> {
        let grid = self.grid;
        let options = PathOptions::new()
            .move_limit(self.config.search.food_search_moves)
            .alternates(self.config.search.food_search_alternates);

        grid.food
            .iter()
            .map(|food| FoodPath {
                food: *food,
                path: find_path(grid, grid.me(), *food, &options),
            })
            .filter(|target| !target.path.is_empty())
            .collect()
    }

    /// Steers toward the closest food I can claim, away from food I would fight over
    pub fn extra_food(&mut self, food_paths: &[FoodPath], stronger: &[AgentPath<'a>]) {
        let tuning = &self.config.heuristics;
        let search = &self.config.search;

        if food_paths.is_empty() {
            return;
        }
        if let Some(closest) = stronger.first() {
            if closest.path.len() <= tuning.danger_path_length {
                return;
            }
        }

        let threatened: HashSet<Coord> = stronger
            .iter()
            .filter(|threat| threat.path.len() <= tuning.danger_path_length)
            .flat_map(|threat| threat.path.iter().copied())
            .collect();

        let mut closest: Vec<&FoodPath> = food_paths.iter().collect();
        closest.sort_by_key(|target| target.path.len());

        let grid = self.grid;
        let mut chosen = 0;
        for target in closest {
            let step = target.path[1];
            let on_threat_path = threatened.contains(&step);

            if chosen >= tuning.max_food_targets
                || (target.path.len() >= tuning.far_food_path && !stronger.is_empty() && on_threat_path)
            {
                break;
            }

            let exposed = !stronger.is_empty() && !on_threat_path;
            if exposed {
                self.starvation(step, tuning.starving_health);
            }

            let contest = ContestOptions {
                max_competition: Some(search.food_contest_max_competition),
                check_path: Some(target.path.clone()),
                max_opponent_moves: search.food_contest_opponent_moves,
                min_buffer: search.contest_min_buffer,
            };

            if is_closest_strongest(grid, target.food, grid.me(), &contest) {
                chosen += 1;
                log::debug!("claiming food {} via {}", target.food, step);
                self.heat.add(step, self.catalog.future_food);
                if exposed {
                    self.heat.add(step, self.catalog.food_when_weak);
                }
            } else {
                self.heat.add(step, self.catalog.food_fight);
            }
        }
    }
}

/// True when exactly two continuations remain and they point in opposite directions
fn leaves_opposite_pair(from: &Coord, continuations: &[Coord]) -> bool {
    if continuations.len() != 2 {
        return false;
    }

    match (
        Direction::between(from, &continuations[0]),
        Direction::between(from, &continuations[1]),
    ) {
        (Some(first), Some(second)) => first.is_opposite(&second),
        _ => false,
    }
}
