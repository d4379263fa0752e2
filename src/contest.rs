// Contest check: whether an agent can claim a target cell against every other agent

use crate::grid::{Agent, Grid};
use crate::pathfinding::{find_path, PathOptions};
use crate::simple_profiler::ProfileGuard;
use crate::types::Coord;

/// A leader this close to the target wins even against a longer runner-up
const CLOSE_CLAIM_PATH: usize = 5;

#[derive(Debug, Clone)]
pub struct ContestOptions {
    /// How many closer contenders are tolerated; defaults to every other agent
    pub max_competition: Option<usize>,
    /// Precomputed path of the checked agent to the target
    pub check_path: Option<Vec<Coord>>,
    /// Move limit for the checked agent's own search
    pub max_opponent_moves: usize,
    /// Move limit for contenders, and the lead a longer contender must have
    pub min_buffer: usize,
}

impl Default for ContestOptions {
    fn default() -> Self {
        ContestOptions {
            max_competition: None,
            check_path: None,
            max_opponent_moves: 7,
            min_buffer: 3,
        }
    }
}

/// True when `checker` can safely contest `target`.
///
/// Contenders are the other agents with a path to the target within
/// `min_buffer` moves. When someone is closer, every closer contender must be
/// shorter than the checker, or longer but trailing by more than the buffer.
/// When the checker leads, it must be strictly closer than the runner-up and
/// either longer than it or within a short distance of the target.
pub fn is_closest_strongest(grid: &Grid, target: Coord, checker: &Agent, options: &ContestOptions) -> bool {
    let _guard = ProfileGuard::new("contest");
    let others: Vec<&Agent> = grid.agents.iter().filter(|agent| agent.id != checker.id).collect();
    if others.is_empty() {
        return true;
    }

    let max_competition = options.max_competition.unwrap_or_else(|| others.len());

    let check_path = match &options.check_path {
        Some(path) => path.clone(),
        None => find_path(
            grid,
            checker,
            target,
            &PathOptions::new().move_limit(options.max_opponent_moves),
        ),
    };
    if check_path.is_empty() {
        return false;
    }

    let contender_options = PathOptions::new().move_limit(options.min_buffer);
    let mut contenders: Vec<(&Agent, Vec<Coord>)> = others
        .iter()
        .map(|agent| (*agent, find_path(grid, agent, target, &contender_options)))
        .filter(|(_, path)| !path.is_empty())
        .collect();
    contenders.push((checker, check_path));
    contenders.sort_by_key(|(_, path)| path.len());

    if contenders.len() == 1 {
        return true;
    }

    let rank = contenders
        .iter()
        .position(|(agent, _)| agent.id == checker.id)
        .unwrap_or(0);
    let check_len = contenders[rank].1.len();
    let leader = contenders[0].0;

    if leader.id != checker.id && rank <= max_competition {
        return contenders[..rank].iter().all(|(agent, path)| {
            agent.length() < checker.length()
                || (agent.length() > checker.length() && check_len + options.min_buffer < path.len())
        });
    }

    if leader.id == checker.id {
        let (runner_up, runner_up_path) = &contenders[1];
        return check_len < runner_up_path.len()
            && (checker.length() > runner_up.length() || check_len <= CLOSE_CLAIM_PATH);
    }

    false
}
