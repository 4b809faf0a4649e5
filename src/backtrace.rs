//! Path commitment: turn a found connection into wire on the grid.

use crate::grid::RoutingGrid;
use crate::netlist::Net;
use crate::search::SearchState;
use crate::types::Point;

/// Cells next to the grid corner from which the walk continues into an
/// unreached predecessor. Unreached records point at (0, 0).
const CORNER_GUARD: [Point; 2] = [Point::new(0, 1), Point::new(1, 0)];

/// Walk predecessor links from `from` back towards the search start, giving
/// every cell to `net` until a cell the net already owns (or an unreached
/// cell) is hit. Returns the number of cells newly committed.
pub fn commit_path(grid: &mut RoutingGrid, state: &SearchState, net: &Net, from: Point) -> usize {
    let mut current = from;
    let mut prev: Option<Point> = None;
    let mut committed = 0;

    loop {
        let unreached =
            !state.is_visited(current) && !prev.is_some_and(|p| CORNER_GUARD.contains(&p));
        if grid.get(current).is_owned_by(net.id) || unreached {
            break;
        }
        // Every pass claims a cell that was not the net's, so the walk is bounded by the grid size
        grid.set_owner(current, net.id);
        committed += 1;
        prev = Some(current);
        current = state.get(current).pred;
    }

    grid.claim_pins(net.id, net.pins());
    committed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellState;

    fn setup(width: i32, height: i32, pins: &[Point]) -> (RoutingGrid, SearchState, Net) {
        let net = Net::from_pins(0, pins).unwrap();
        let mut grid = RoutingGrid::new(width, height);
        grid.claim_pins(0, net.pins());
        let state = SearchState::for_grid(&grid);
        (grid, state, net)
    }

    #[test]
    fn follows_predecessors_to_owned_cell() {
        let (mut grid, mut state, net) = setup(4, 2, &[Point::new(0, 0), Point::new(3, 0)]);
        state.visit(Point::new(2, 0), Point::new(3, 0), 3);
        state.visit(Point::new(1, 0), Point::new(2, 0), 3);

        assert_eq!(commit_path(&mut grid, &state, &net, Point::new(1, 0)), 2);
        assert_eq!(grid.to_legacy(), vec![vec![-2, -2, -2, -2], vec![0, 0, 0, 0]]);
    }

    #[test]
    fn starting_on_owned_cell_commits_nothing() {
        let (mut grid, state, net) = setup(3, 1, &[Point::new(0, 0), Point::new(2, 0)]);
        let before = grid.clone();
        assert_eq!(commit_path(&mut grid, &state, &net, Point::new(2, 0)), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn stops_at_unreached_cell() {
        let (mut grid, state, net) = setup(3, 3, &[Point::new(0, 0), Point::new(2, 2)]);
        assert_eq!(commit_path(&mut grid, &state, &net, Point::new(1, 1)), 0);
        assert_eq!(grid.get(Point::new(1, 1)), CellState::Free);
    }

    #[test]
    fn corner_guard_walks_into_origin_cell() {
        let (mut grid, mut state, net) = setup(3, 3, &[Point::new(2, 2), Point::new(2, 0)]);
        state.visit(Point::new(0, 1), Point::new(0, 0), 4);

        assert_eq!(commit_path(&mut grid, &state, &net, Point::new(0, 1)), 2);
        assert!(grid.get(Point::new(0, 0)).is_owned_by(0));
        assert!(grid.get(Point::new(0, 1)).is_owned_by(0));
    }
}
