// Path solver: bounded best-first search over simulated agent moves
//
// The frontier is ordered by straight-line distance to the goal, then by path
// length, then by discovery order. Every expanded state carries the agent as it
// would look after walking the path, so bodies move (and grow on food) while
// the search advances.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::grid::{Agent, Grid};
use crate::simple_profiler::ProfileGuard;
use crate::types::Coord;

/// Knobs of a single path search
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// Dequeue budget; `None` or zero falls back to the number of free cells
    pub move_limit: Option<usize>,
    /// Length of the one-shot second-best branch seeded from the first fork
    pub alternate_limit: usize,
    /// When false the agent is searched as a detached copy and its own
    /// committed body stays an obstacle
    pub simulate_movement: bool,
    /// Return the path to the last expanded state instead of nothing on failure
    pub return_closest: bool,
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_limit(mut self, limit: usize) -> Self {
        self.move_limit = Some(limit);
        self
    }

    pub fn alternates(mut self, limit: usize) -> Self {
        self.alternate_limit = limit;
        self
    }

    pub fn simulate_movement(mut self, simulate: bool) -> Self {
        self.simulate_movement = simulate;
        self
    }

    pub fn return_closest(mut self, closest: bool) -> Self {
        self.return_closest = closest;
        self
    }
}

struct SearchState {
    cell: Coord,
    agent: Agent,
    parent: Option<usize>,
    path_len: usize,
    distance: f64,
    children: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    distance: f64,
    path_len: usize,
    state: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

// Reversed so the max-heap pops the nearest, shortest, earliest entry
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.path_len.cmp(&self.path_len))
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct PathSearch<'a> {
    grid: &'a Grid,
    goal: Coord,
    states: Vec<SearchState>,
}

impl<'a> PathSearch<'a> {
    fn push_state(&mut self, cell: Coord, agent: Agent, parent: Option<usize>) -> usize {
        let path_len = parent.map_or(1, |p| self.states[p].path_len + 1);
        let distance = if cell == self.goal {
            0.0
        } else {
            cell.distance(&self.goal)
        };

        self.states.push(SearchState {
            cell,
            agent,
            parent,
            path_len,
            distance,
            children: None,
        });
        self.states.len() - 1
    }

    /// Successors of a state, generated once and memoized.
    /// The goal is always reachable from a neighbouring cell, even when occupied.
    fn children(&mut self, id: usize) -> Vec<usize> {
        if let Some(children) = &self.states[id].children {
            return children.clone();
        }

        let cell = self.states[id].cell;
        let agent = self.states[id].agent.clone();
        let moves = self.grid.legal_moves(&agent);

        let mut children = Vec::with_capacity(moves.len() + 1);
        for next in &moves {
            let stepped = agent.step_toward(*next, self.grid.is_food(next));
            children.push(self.push_state(*next, stepped, Some(id)));
        }

        if cell.is_adjacent(&self.goal) && !moves.contains(&self.goal) {
            let stepped = agent.step_toward(self.goal, self.grid.is_food(&self.goal));
            children.push(self.push_state(self.goal, stepped, Some(id)));
        }

        self.states[id].children = Some(children.clone());
        children
    }

    fn has_ancestor_at(&self, id: usize, cell: &Coord) -> bool {
        let mut current = self.states[id].parent;
        while let Some(ancestor) = current {
            if self.states[ancestor].cell == *cell {
                return true;
            }
            current = self.states[ancestor].parent;
        }
        false
    }

    fn entry(&self, id: usize) -> FrontierEntry {
        FrontierEntry {
            distance: self.states[id].distance,
            path_len: self.states[id].path_len,
            state: id,
        }
    }

    fn path_to(&self, id: usize) -> Vec<Coord> {
        let mut path = Vec::with_capacity(self.states[id].path_len);
        let mut current = Some(id);
        while let Some(state) = current {
            path.push(self.states[state].cell);
            current = self.states[state].parent;
        }
        path.reverse();
        path
    }

    /// A child may be queued when its cell is neither expanded already nor on its own path
    fn is_open(&self, id: usize, visited: &HashSet<Coord>) -> bool {
        let cell = self.states[id].cell;
        !visited.contains(&cell) && !self.has_ancestor_at(id, &cell)
    }

    /// Walks the greedy continuation of `start` for up to `limit` steps,
    /// queueing every state it passes. Stops early when no open child is left.
    fn seed_alternate(
        &mut self,
        start: usize,
        limit: usize,
        visited: &HashSet<Coord>,
        frontier: &mut BinaryHeap<FrontierEntry>,
    ) {
        if !self.is_open(start, visited) {
            return;
        }

        let mut current = start;
        for _ in 0..limit {
            let children = self.children(current);
            let nearest = children
                .iter()
                .copied()
                .filter(|child| self.is_open(*child, visited))
                .min_by(|a, b| self.states[*a].distance.total_cmp(&self.states[*b].distance));

            current = match nearest {
                Some(nearest) => nearest,
                None => break,
            };
            frontier.push(self.entry(current));

            if self.states[current].distance == 0.0 {
                break;
            }
        }
    }
}

/// Searches a path for `agent` from its head to `goal`.
///
/// The returned path starts with the head and ends with the goal. It is empty
/// when the goal could not be reached within the move limit, unless
/// `return_closest` asks for the path to the last expanded cell instead.
pub fn find_path(grid: &Grid, agent: &Agent, goal: Coord, options: &PathOptions) -> Vec<Coord> {
    let _guard = ProfileGuard::new("path_search");

    let start = if options.simulate_movement {
        agent.clone()
    } else {
        agent.detached()
    };

    let limit = match options.move_limit {
        Some(limit) if limit > 0 => limit,
        _ => grid.free_cells(),
    } + 1;

    let mut search = PathSearch {
        grid,
        goal,
        states: Vec::new(),
    };
    let origin = search.push_state(start.head(), start, None);

    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEntry {
        distance: 0.0,
        path_len: 0,
        state: origin,
    });

    let mut visited: HashSet<Coord> = HashSet::new();
    let mut seed_pending = options.alternate_limit > 0;
    let mut dequeued = 0;
    let mut last = origin;
    let mut found = None;

    while found.is_none() && dequeued < limit {
        let entry = match frontier.pop() {
            Some(entry) => entry,
            None => break,
        };
        dequeued += 1;

        let id = entry.state;
        let cell = search.states[id].cell;
        visited.insert(cell);
        last = id;

        if cell == goal && search.states[id].parent.is_some() {
            found = Some(id);
            break;
        }

        let children = search.children(id);
        for &child in &children {
            let child_cell = search.states[child].cell;
            if child_cell == goal {
                found = Some(child);
                break;
            }
            if !search.is_open(child, &visited) {
                continue;
            }
            frontier.push(search.entry(child));
        }

        if found.is_some() {
            break;
        }

        if seed_pending && children.len() > 1 {
            seed_pending = false;

            let mut ranked = children.clone();
            ranked.sort_by(|a, b| {
                search.states[*a]
                    .distance
                    .total_cmp(&search.states[*b].distance)
            });
            search.seed_alternate(ranked[1], options.alternate_limit, &visited, &mut frontier);
        }
    }

    log::debug!(
        "path {} -> {}: {} after {} dequeues ({} states)",
        agent.head(),
        goal,
        if found.is_some() { "found" } else { "not found" },
        dequeued,
        search.states.len()
    );

    match found {
        Some(id) => search.path_to(id),
        None if options.return_closest => search.path_to(last),
        None => Vec::new(),
    }
}
