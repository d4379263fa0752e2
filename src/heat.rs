// Heat ledger: per-cell sets of categorized, weighted tags and their aggregate score
//
// A cell's score is dominated by the weight balance of its tags. Tag counts per
// category only break ties, and any death tag pins the cell to DEATH_SCORE.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::config::HeatConfig;
use crate::types::Coord;

/// Score of any cell carrying a death tag, below every reachable non-death score
pub const DEATH_SCORE: i32 = -100_000;

/// Score of a cell nothing has been said about
pub const NEUTRAL_SCORE: i32 = 0;

const WEIGHT_SCALE: i32 = 1000;
const POSSIBLE_DEATH_PENALTY: i32 = 100;
const DANGER_PENALTY: i32 = 10;
const GOOD_BONUS: i32 = 1;

/// Ordered by escalating severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HeatCategory {
    None,
    Good,
    Danger,
    PossibleDeath,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HeatTag {
    pub name: &'static str,
    pub category: HeatCategory,
    pub weight: u32,
}

impl HeatTag {
    pub const fn new(name: &'static str, category: HeatCategory, weight: u32) -> Self {
        HeatTag {
            name,
            category,
            weight,
        }
    }
}

/// Tags recorded per cell for one decision
#[derive(Debug, Clone, Default)]
pub struct HeatLedger {
    cells: HashMap<Coord, BTreeSet<HeatTag>>,
}

impl HeatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `tag` at `cell`; adding the same tag twice changes nothing
    pub fn add(&mut self, cell: Coord, tag: HeatTag) {
        self.cells.entry(cell).or_insert_with(BTreeSet::new).insert(tag);
    }

    pub fn has(&self, cell: &Coord, tag: &HeatTag) -> bool {
        self.cells
            .get(cell)
            .map_or(false, |tags| tags.contains(tag))
    }

    /// `None` when nothing was ever recorded at the cell
    pub fn tags(&self, cell: &Coord) -> Option<&BTreeSet<HeatTag>> {
        self.cells.get(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn score(&self, cell: &Coord) -> i32 {
        let tags = match self.cells.get(cell) {
            Some(tags) => tags,
            None => return NEUTRAL_SCORE,
        };

        if tags.iter().any(|tag| tag.category == HeatCategory::Death) {
            return DEATH_SCORE;
        }

        let mut balance: i32 = 0;
        let mut adjustment: i32 = 0;
        for tag in tags {
            let weight = tag.weight as i32;
            match tag.category {
                HeatCategory::Good => {
                    balance += weight;
                    adjustment += GOOD_BONUS;
                }
                HeatCategory::Danger => {
                    balance -= weight;
                    adjustment -= DANGER_PENALTY;
                }
                HeatCategory::PossibleDeath => {
                    balance -= weight;
                    adjustment -= POSSIBLE_DEATH_PENALTY;
                }
                HeatCategory::None | HeatCategory::Death => {}
            }
        }

        DEATH_SCORE.max(balance * WEIGHT_SCALE + adjustment)
    }
}

/// Every named tag the evaluators write, built once from configured weights
#[derive(Debug, Clone)]
pub struct HeatCatalog {
    pub forward: HeatTag,
    pub most_future: HeatTag,
    pub second_most_future: HeatTag,
    pub least_future: HeatTag,
    pub food: HeatTag,
    pub food_edge: HeatTag,
    pub food_cluster: HeatTag,
    pub food_starving: HeatTag,
    pub food_fight: HeatTag,
    pub future_food: HeatTag,
    pub food_when_weak: HeatTag,
    pub solo_food_death: HeatTag,
    pub farthest_from_self: HeatTag,
    pub chase_tail: HeatTag,
    pub chase_tail_urgent: HeatTag,
    pub future_snake_marker: HeatTag,
    pub future_strong_snake_marker: HeatTag,
    pub possible_kill: HeatTag,
    pub future_kill: HeatTag,
    pub future_kill_closest: HeatTag,
    pub future_kill_block: HeatTag,
    pub edge: HeatTag,
    pub move_off_edge: HeatTag,
    pub corner: HeatTag,
    pub snake_body: HeatTag,
    pub snake_future_death: HeatTag,
    pub stronger_snake: HeatTag,
    pub deadend: HeatTag,
    pub out_of_bounds: HeatTag,
}

impl HeatCatalog {
    pub fn from_config(weights: &HeatConfig) -> Self {
        use HeatCategory::*;

        HeatCatalog {
            forward: HeatTag::new("forward", Good, weights.forward),
            most_future: HeatTag::new("most_future", Good, weights.most_future),
            second_most_future: HeatTag::new("2nd_most_future", Good, weights.second_most_future),
            least_future: HeatTag::new("least_future", Danger, weights.least_future),
            food: HeatTag::new("food", Good, weights.food),
            food_edge: HeatTag::new("food-edge", Danger, weights.food_edge),
            food_cluster: HeatTag::new("food-cluster", Good, weights.food_cluster),
            food_starving: HeatTag::new("food_starving", Good, weights.food_starving),
            food_fight: HeatTag::new("food-fight", Danger, weights.food_fight),
            future_food: HeatTag::new("future-food", Good, weights.future_food),
            food_when_weak: HeatTag::new("food-when-weak", Good, weights.food_when_weak),
            solo_food_death: HeatTag::new("solo-food-death", Danger, weights.solo_food_death),
            farthest_from_self: HeatTag::new("farthest_from_self", Good, weights.farthest_from_self),
            chase_tail: HeatTag::new("chase_tail", Good, weights.chase_tail),
            chase_tail_urgent: HeatTag::new("chase_tail_urgent", Good, weights.chase_tail_urgent),
            future_snake_marker: HeatTag::new("future-snake-marker", None, 0),
            future_strong_snake_marker: HeatTag::new("future-strong-snake-marker", None, 0),
            possible_kill: HeatTag::new("possible_kill", Good, weights.possible_kill),
            future_kill: HeatTag::new("future-kill", Good, weights.future_kill),
            future_kill_closest: HeatTag::new("future-kill-closest", Good, weights.future_kill_closest),
            future_kill_block: HeatTag::new("future-kill-block", Good, weights.future_kill_block),
            edge: HeatTag::new("edge", Danger, weights.edge),
            move_off_edge: HeatTag::new("move-off-edge", Good, weights.move_off_edge),
            corner: HeatTag::new("corner", Danger, weights.corner),
            snake_body: HeatTag::new("snake-body", Death, 1),
            snake_future_death: HeatTag::new("snake-future-death", PossibleDeath, weights.snake_future_death),
            stronger_snake: HeatTag::new("stronger-snake", Danger, weights.stronger_snake),
            deadend: HeatTag::new("deadend", Death, 1),
            out_of_bounds: HeatTag::new("outofbounds", Death, 1),
        }
    }
}
