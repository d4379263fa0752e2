// Path solver scenarios on a recorded mid-game board
//
// Our snake coils along the bottom-left while "snacky" curls around (4,4),
// leaving a pocket that only opens once bodies are allowed to move.

use heat_snake::grid::Grid;
use heat_snake::pathfinding::{find_path, PathOptions};
use heat_snake::types::{Coord, GameState};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn load_grid() -> Grid {
    let text = fs::read_to_string(fixture_path("future_dead_end_007.json"))
        .expect("Failed to read future_dead_end_007.json");
    let state: GameState = serde_json::from_str(&text).expect("Failed to parse fixture");
    Grid::from_snapshot(&state.board, &state.you).expect("Fixture should be a valid board")
}

fn coords(cells: &[(i32, i32)]) -> Vec<Coord> {
    cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
}

#[test]
fn test_fixture_loads_both_snakes() {
    let grid = load_grid();
    assert_eq!(grid.me().id, "me");
    assert_eq!(grid.me().length(), 6);
    assert_eq!(grid.agent("snacky").map(|agent| agent.length()), Some(8));
    assert_eq!(grid.free_cells(), 121 - 14);
}

#[test]
fn test_simulated_path_to_own_tail() {
    let grid = load_grid();
    let path = find_path(
        &grid,
        grid.me(),
        Coord::new(4, 2),
        &PathOptions::new().simulate_movement(true),
    );

    assert_eq!(path, coords(&[(1, 0), (2, 0), (2, 1), (3, 1), (3, 2), (4, 2)]));
}

#[test]
fn test_simulated_path_slips_through_vacated_body() {
    let grid = load_grid();
    let path = find_path(
        &grid,
        grid.me(),
        Coord::new(3, 4),
        &PathOptions::new().simulate_movement(true),
    );

    // (2,2) is our own body now but gone by the time we get there
    assert_eq!(
        path,
        coords(&[(1, 0), (2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (3, 4)])
    );
}

#[test]
fn test_static_path_goes_around() {
    let grid = load_grid();
    let path = find_path(&grid, grid.me(), Coord::new(3, 4), &PathOptions::new());

    assert_eq!(
        path,
        coords(&[
            (1, 0),
            (2, 0),
            (2, 1),
            (3, 1),
            (4, 1),
            (5, 1),
            (5, 2),
            (6, 2),
            (6, 3),
            (6, 4),
            (6, 5),
            (6, 6),
            (5, 6),
            (5, 7),
            (4, 7),
            (3, 7),
            (3, 6),
            (3, 5),
            (3, 4),
        ])
    );
}

#[test]
fn test_alternates_find_the_shorter_side() {
    let grid = load_grid();
    let path = find_path(
        &grid,
        grid.me(),
        Coord::new(3, 4),
        &PathOptions::new().alternates(3),
    );

    assert_eq!(
        path,
        coords(&[(1, 0), (0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (2, 4), (3, 4)])
    );
}

#[test]
fn test_paths_are_contiguous_and_start_at_head() {
    let grid = load_grid();
    let me = grid.me();

    for simulate in [false, true].iter() {
        let path = find_path(
            &grid,
            me,
            Coord::new(9, 9),
            &PathOptions::new().simulate_movement(*simulate),
        );
        assert_eq!(path.first(), Some(&me.head()));
        assert_eq!(path.last(), Some(&Coord::new(9, 9)));
        assert!(path.windows(2).all(|pair| pair[0].is_adjacent(&pair[1])));
    }
}

#[test]
fn test_move_limit_cuts_search_short() {
    let grid = load_grid();
    let options = PathOptions::new().move_limit(3);

    assert!(find_path(&grid, grid.me(), Coord::new(9, 9), &options).is_empty());

    let closest = find_path(&grid, grid.me(), Coord::new(9, 9), &options.return_closest(true));
    assert!(!closest.is_empty());
    assert_eq!(closest[0], grid.me().head());
    assert!(closest.len() <= 4);
}

#[test]
fn test_repeated_searches_return_the_same_path() {
    let grid = load_grid();
    let options = PathOptions::new().alternates(3).simulate_movement(true);

    for goal in [Coord::new(3, 4), Coord::new(9, 9), Coord::new(0, 10)].iter() {
        let first = find_path(&grid, grid.me(), *goal, &options);
        let second = find_path(&grid, grid.me(), *goal, &options);
        assert_eq!(first, second, "search towards {} is not stable", goal);
    }
}

#[test]
fn test_paths_never_repeat_a_cell() {
    let grid = load_grid();

    for alternates in 0..6 {
        for simulate in [false, true].iter() {
            let options = PathOptions::new()
                .alternates(alternates)
                .simulate_movement(*simulate);
            for goal in [Coord::new(3, 4), Coord::new(4, 2), Coord::new(9, 9), Coord::new(0, 10)].iter() {
                let path = find_path(&grid, grid.me(), *goal, &options);
                let unique: HashSet<&Coord> = path.iter().collect();
                assert_eq!(unique.len(), path.len(), "repeated cell in {:?}", path);
            }
        }
    }
}
