// Grid model: board geometry, agents and the movement rules every search shares
//
// Everything here is an immutable snapshot. Stepping an agent returns a new agent,
// the board itself never changes during a decision.

use std::collections::HashMap;
use std::fmt;

use crate::types::{Battlesnake, Board, Coord, Direction, Game, GameState};

/// A snake as seen by the decision core
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub health: i32,
    /// Head first, tail last
    pub body: Vec<Coord>,
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Agent {}

impl Agent {
    pub fn new(id: &str, name: &str, health: i32, body: Vec<Coord>) -> Self {
        Agent {
            id: id.to_string(),
            name: name.to_string(),
            health,
            body,
        }
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: &Coord) -> bool {
        self.body.contains(cell)
    }

    /// Neighbours of the head the body itself does not block.
    /// The tail counts as free once fully spawned and not freshly fed.
    pub fn possible_moves(&self) -> Vec<Coord> {
        let tail = self.tail();
        let tail_vacates = self.length() > 3 && self.health < 100;

        self.head()
            .neighbors()
            .iter()
            .filter(|cell| !self.contains(cell) || (**cell == tail && tail_vacates))
            .copied()
            .collect()
    }

    /// One simulated turn. Growing keeps the whole body and refills health,
    /// otherwise the tail is dropped and one health point is spent.
    pub fn step(&self, direction: Direction, grow: bool) -> Agent {
        let mut body = Vec::with_capacity(self.body.len() + 1);
        body.push(direction.apply(&self.head()));

        let (kept, health) = if grow {
            (&self.body[..], 100)
        } else {
            (&self.body[..self.body.len() - 1], self.health - 1)
        };
        body.extend_from_slice(kept);

        Agent {
            id: self.id.clone(),
            name: self.name.clone(),
            health,
            body,
        }
    }

    /// Steps onto an adjacent cell.
    ///
    /// # Panics
    /// When `cell` is not orthogonally adjacent to the head.
    pub fn step_toward(&self, cell: Coord, grow: bool) -> Agent {
        match Direction::between(&self.head(), &cell) {
            Some(direction) => self.step(direction, grow),
            None => panic!(
                "agent {} cannot step from {} to non-adjacent {}",
                self.id,
                self.head(),
                cell
            ),
        }
    }

    /// Direction the agent is currently travelling, unknown while stacked or a single cell
    pub fn heading(&self) -> Option<Direction> {
        if self.body.len() < 2 {
            return None;
        }
        Direction::between(&self.body[1], &self.body[0])
    }

    /// Copy of this agent under an id no board agent carries, so the committed
    /// body stays an obstacle while the copy is simulated
    pub fn detached(&self) -> Agent {
        Agent {
            id: format!("{}#detached", self.id),
            name: self.name.clone(),
            health: self.health,
            body: self.body.clone(),
        }
    }
}

/// Immutable board snapshot for one decision
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    /// Agents in snapshot order
    pub agents: Vec<Agent>,
    pub food: Vec<Coord>,
    my_index: usize,
}

impl Grid {
    pub fn new(
        width: i32,
        height: i32,
        agents: Vec<Agent>,
        food: Vec<Coord>,
        my_id: &str,
    ) -> Result<Grid, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("Invalid board size {}x{}", width, height));
        }

        if let Some(empty) = agents.iter().find(|agent| agent.body.is_empty()) {
            return Err(format!("Snake '{}' has an empty body", empty.id));
        }

        let my_index = agents
            .iter()
            .position(|agent| agent.id == my_id)
            .ok_or_else(|| format!("Snake '{}' is not on the board", my_id))?;

        Ok(Grid {
            width,
            height,
            agents,
            food,
            my_index,
        })
    }

    /// Builds the decision snapshot from a wire board, rejecting malformed input
    pub fn from_snapshot(board: &Board, you: &Battlesnake) -> Result<Grid, String> {
        let agents = board
            .snakes
            .iter()
            .map(|snake| Agent::new(&snake.id, &snake.name, snake.health, snake.body.clone()))
            .collect();

        Grid::new(board.width, board.height, agents, board.food.clone(), &you.id)
    }

    pub fn me(&self) -> &Agent {
        &self.agents[self.my_index]
    }

    pub fn others(&self) -> impl Iterator<Item = &Agent> + '_ {
        let my_index = self.my_index;
        self.agents
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != my_index)
            .map(|(_, agent)| agent)
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// Cells not covered by any body
    pub fn free_cells(&self) -> usize {
        let occupied: usize = self.agents.iter().map(Agent::length).sum();
        (self.area() as usize).saturating_sub(occupied)
    }

    pub fn in_bounds(&self, cell: &Coord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn is_food(&self, cell: &Coord) -> bool {
        self.food.contains(cell)
    }

    /// Moves for `agent` that stay on the board and avoid every other agent's body,
    /// in up, down, left, right order
    pub fn legal_moves(&self, agent: &Agent) -> Vec<Coord> {
        agent
            .possible_moves()
            .into_iter()
            .filter(|cell| self.in_bounds(cell))
            .filter(|cell| {
                !self
                    .agents
                    .iter()
                    .any(|other| other.id != agent.id && other.contains(cell))
            })
            .collect()
    }

    /// True when the cell lies within `margin` rows or columns of a border
    pub fn on_edge(&self, cell: &Coord, margin: i32) -> bool {
        let margin = margin.min((self.width + self.height) / 2);
        (0..margin).any(|ring| {
            cell.x == ring
                || cell.y == ring
                || cell.x == self.width - 1 - ring
                || cell.y == self.height - 1 - ring
        })
    }

    pub fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(0, 0),
            Coord::new(0, self.height - 1),
            Coord::new(self.width - 1, 0),
            Coord::new(self.width - 1, self.height - 1),
        ]
    }

    /// Agents strictly shorter than `reference`
    pub fn weaker_than(&self, reference: &Agent) -> Vec<&Agent> {
        self.agents
            .iter()
            .filter(|agent| agent.length() < reference.length())
            .collect()
    }

    /// Agents strictly longer than `reference`
    pub fn stronger_than(&self, reference: &Agent) -> Vec<&Agent> {
        self.agents
            .iter()
            .filter(|agent| agent.length() > reference.length())
            .collect()
    }

    fn letter_for(&self, agent: &Agent) -> char {
        if agent.id == self.me().id {
            return 'y';
        }
        match agent.name.chars().find(|c| c.is_ascii_alphabetic()) {
            Some(c) if c.to_ascii_lowercase() != 'y' => c.to_ascii_lowercase(),
            _ => 's',
        }
    }

    fn symbol_at(&self, cell: &Coord) -> char {
        if self.is_food(cell) {
            return '+';
        }
        for agent in &self.agents {
            if agent.contains(cell) {
                let letter = self.letter_for(agent);
                return if agent.head() == *cell {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                };
            }
        }
        ' '
    }
}

/// Empty ASCII-art frame for a board of the given size
pub fn empty_board_ascii(width: i32, height: i32) -> String {
    render_ascii(width, height, |_| ' ')
}

fn render_ascii<F: Fn(&Coord) -> char>(width: i32, height: i32, symbol: F) -> String {
    let columns = width.max(0) as usize;
    let header = format!("╔{}╗", vec!["==="; columns].join("╤"));
    let spacer = format!("╟┄{}┄╢", vec!["┄"; columns].join("┄┼┄"));
    let footer = format!("╚{}╝", vec!["==="; columns].join("╧"));

    let rows: Vec<String> = (0..height)
        .rev()
        .map(|y| {
            let cells: Vec<String> = (0..width)
                .map(|x| symbol(&Coord::new(x, y)).to_string())
                .collect();
            format!("║ {} ║", cells.join(" │ "))
        })
        .collect();

    format!("{}\n{}\n{}", header, rows.join(format!("\n{}\n", spacer).as_str()), footer)
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_ascii(self.width, self.height, |cell| {
            self.symbol_at(cell)
        }))
    }
}

/// Reads an ASCII-art board back into a wire game state.
///
/// Letters mark snakes (upper case head, lower case body), `+` marks food and
/// `Y`/`y` is the controlling snake. Body order past the head follows reading
/// order, top row first.
pub fn parse_ascii_board(text: &str) -> Result<GameState, String> {
    let rows: Vec<Vec<char>> = text
        .lines()
        .filter(|line| line.contains('│'))
        .map(|line| {
            line.split('│')
                .map(|cell| {
                    cell.trim_matches(|c: char| c == '║' || c.is_whitespace())
                        .chars()
                        .next()
                        .unwrap_or(' ')
                })
                .collect()
        })
        .collect();

    let height = rows.len() as i32;
    let width = rows.first().map(|row| row.len()).unwrap_or(0) as i32;
    if width == 0 || height == 0 {
        return Err("No board rows found".to_string());
    }

    let mut food = Vec::new();
    let mut order: Vec<char> = Vec::new();
    let mut bodies: HashMap<char, (Option<Coord>, Vec<Coord>)> = HashMap::new();

    for (row_index, row) in rows.iter().enumerate() {
        if row.len() as i32 != width {
            return Err(format!(
                "Row {} has {} cells, expected {}",
                row_index + 1,
                row.len(),
                width
            ));
        }

        for (column, symbol) in row.iter().enumerate() {
            let cell = Coord::new(column as i32, height - row_index as i32 - 1);
            match symbol {
                ' ' => {}
                '+' => food.push(cell),
                c if c.is_ascii_alphabetic() => {
                    let key = c.to_ascii_uppercase();
                    if !bodies.contains_key(&key) {
                        order.push(key);
                    }
                    let entry = bodies.entry(key).or_insert((None, Vec::new()));
                    if c.is_ascii_uppercase() {
                        entry.0 = Some(cell);
                    } else {
                        entry.1.push(cell);
                    }
                }
                other => return Err(format!("Unexpected symbol '{}' at {}", other, cell)),
            }
        }
    }

    let mut snakes = Vec::new();
    for key in order {
        let (head, rest) = &bodies[&key];
        let head = (*head).ok_or_else(|| format!("Snake '{}' has no head", key))?;
        let mut body = vec![head];
        body.extend_from_slice(rest);

        snakes.push(Battlesnake {
            id: format!("snake-{}", key.to_ascii_lowercase()),
            name: key.to_string(),
            health: 100,
            head,
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
        });
    }

    let you = snakes
        .iter()
        .find(|snake| snake.name == "Y")
        .cloned()
        .ok_or_else(|| "Board has no 'Y' snake".to_string())?;

    Ok(GameState {
        game: Game {
            id: "ascii-board".to_string(),
            ruleset: HashMap::new(),
            timeout: 500,
        },
        turn: 1,
        board: Board {
            height,
            width,
            food,
            snakes,
            hazards: Vec::new(),
        },
        you,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn sample_grid() -> Grid {
        let me = Agent::new("me", "me", 90, vec![c(1, 0), c(1, 1), c(1, 2), c(2, 2)]);
        let other = Agent::new("other", "other", 80, vec![c(4, 4), c(4, 3), c(4, 2)]);
        Grid::new(7, 7, vec![me, other], vec![c(6, 6)], "me").unwrap()
    }

    #[test]
    fn test_step_without_growth_drops_tail_and_health() {
        let agent = Agent::new("a", "a", 50, vec![c(2, 2), c(2, 1), c(2, 0)]);
        let moved = agent.step(Direction::Right, false);
        assert_eq!(moved.body, vec![c(3, 2), c(2, 2), c(2, 1)]);
        assert_eq!(moved.health, 49);
        assert_eq!(agent.body.len(), 3, "original agent must be untouched");
    }

    #[test]
    fn test_step_with_growth_keeps_tail_and_refills_health() {
        let agent = Agent::new("a", "a", 50, vec![c(2, 2), c(2, 1), c(2, 0)]);
        let moved = agent.step(Direction::Up, true);
        assert_eq!(moved.body, vec![c(2, 3), c(2, 2), c(2, 1), c(2, 0)]);
        assert_eq!(moved.health, 100);
    }

    #[test]
    #[should_panic]
    fn test_step_toward_non_adjacent_cell_panics() {
        let agent = Agent::new("a", "a", 50, vec![c(2, 2), c(2, 1)]);
        agent.step_toward(c(4, 4), false);
    }

    #[test]
    fn test_tail_is_free_only_for_spawned_hungry_agents() {
        // Head at (1,1) with the tail wrapped around to (1,0)
        let body = vec![c(1, 1), c(2, 1), c(2, 0), c(1, 0)];
        let hungry = Agent::new("a", "a", 99, body.clone());
        let fed = Agent::new("a", "a", 100, body);

        assert!(hungry.possible_moves().contains(&c(1, 0)));
        assert!(!fed.possible_moves().contains(&c(1, 0)));
    }

    #[test]
    fn test_legal_moves_respect_bounds_and_other_bodies() {
        let grid = sample_grid();
        // (1,0): up is own neck, down is off the board
        assert_eq!(grid.legal_moves(grid.me()), vec![c(0, 0), c(2, 0)]);

        let other = grid.agent("other").unwrap();
        assert_eq!(grid.legal_moves(other), vec![c(4, 5), c(3, 4), c(5, 4)]);
    }

    #[test]
    fn test_legal_moves_ignore_own_committed_body_for_same_id() {
        let grid = sample_grid();
        let stepped = grid.me().step(Direction::Right, false);
        // The committed body shares the id so only the stepped body blocks
        assert!(grid.legal_moves(&stepped).contains(&c(3, 0)));
        assert!(grid.legal_moves(&stepped).contains(&c(2, 1)));
    }

    #[test]
    fn test_on_edge_with_margin() {
        let grid = sample_grid();
        assert!(grid.on_edge(&c(0, 3), 1));
        assert!(grid.on_edge(&c(3, 6), 1));
        assert!(!grid.on_edge(&c(1, 3), 1));
        assert!(grid.on_edge(&c(1, 3), 2));
        assert!(!grid.on_edge(&c(3, 3), 2));
    }

    #[test]
    fn test_strength_partitions_exclude_ties() {
        let grid = sample_grid();
        let me = grid.me();
        assert_eq!(grid.weaker_than(me).len(), 1);
        assert!(grid.stronger_than(me).is_empty());

        let tie = Agent::new("tie", "tie", 90, vec![c(0, 6), c(1, 6), c(2, 6), c(3, 6)]);
        let grid = Grid::new(7, 7, vec![grid.me().clone(), tie], vec![], "me").unwrap();
        assert!(grid.weaker_than(grid.me()).is_empty());
        assert!(grid.stronger_than(grid.me()).is_empty());
    }

    #[test]
    fn test_heading_follows_neck() {
        let agent = Agent::new("a", "a", 50, vec![c(2, 3), c(2, 2)]);
        assert_eq!(agent.heading(), Some(Direction::Up));

        let stacked = Agent::new("a", "a", 50, vec![c(2, 2), c(2, 2), c(2, 2)]);
        assert_eq!(stacked.heading(), None);
    }

    #[test]
    fn test_grid_requires_controlling_agent() {
        let other = Agent::new("other", "other", 80, vec![c(4, 4)]);
        assert!(Grid::new(7, 7, vec![other], vec![], "me").is_err());
        assert!(Grid::new(0, 7, vec![], vec![], "me").is_err());
    }

    #[test]
    fn test_ascii_round_trip_keeps_heads_and_food() {
        let grid = sample_grid();
        let art = grid.to_string();
        assert!(art.starts_with('╔'));

        let state = parse_ascii_board(&art).expect("art should parse back");
        assert_eq!(state.board.width, 7);
        assert_eq!(state.board.height, 7);
        assert_eq!(state.board.food, vec![c(6, 6)]);
        assert_eq!(state.you.head, c(1, 0));
        assert_eq!(state.you.length, 4);

        let other = state
            .board
            .snakes
            .iter()
            .find(|snake| snake.name == "O")
            .expect("other snake should be present");
        assert_eq!(other.head, c(4, 4));
        assert_eq!(other.length, 3);
    }

    #[test]
    fn test_empty_board_has_one_row_per_height() {
        let art = empty_board_ascii(3, 2);
        assert_eq!(art.lines().filter(|line| line.contains('│')).count(), 2);
        assert!(parse_ascii_board(&art).is_err(), "no 'Y' snake on an empty board");
    }
}
