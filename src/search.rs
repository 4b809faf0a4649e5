//! Per-search scratch state: predecessor records and the cost-bucketed frontier.

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::grid::RoutingGrid;
use crate::types::Point;

/// Predecessor and cost of a cell touched during one search.
/// A zero cost means the cell has not been reached.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchRecord {
    pub pred: Point,
    pub cost: u32,
}

/// Scratch surface for one sink search
#[derive(Clone, Debug)]
pub struct SearchState {
    width: i32,
    records: Vec<SearchRecord>,
}

impl SearchState {
    /// Fresh state sized to match `grid`
    pub fn for_grid(grid: &RoutingGrid) -> Self {
        Self {
            width: grid.width(),
            records: vec![SearchRecord::default(); grid.width() as usize * grid.height() as usize],
        }
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        p.y as usize * self.width as usize + p.x as usize
    }

    /// Clear every record back to unreached
    pub fn reset(&mut self) {
        self.records.fill(SearchRecord::default());
    }

    #[inline]
    pub fn get(&self, p: Point) -> SearchRecord {
        self.records[self.index(p)]
    }

    #[inline]
    pub fn is_visited(&self, p: Point) -> bool {
        self.get(p).cost != 0
    }

    #[inline]
    pub fn visit(&mut self, p: Point, pred: Point, cost: u32) {
        let idx = self.index(p);
        self.records[idx] = SearchRecord { pred, cost };
    }
}

/// Cells waiting to be expanded, grouped by cost. Within a cost bucket
/// cells come out in the order they went in.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    buckets: BTreeMap<u32, VecDeque<Point>>,
}

impl Frontier {
    pub fn seeded(cost: u32, p: Point) -> Self {
        let mut frontier = Self::default();
        frontier.push(cost, p);
        frontier
    }

    pub fn push(&mut self, cost: u32, p: Point) {
        self.buckets.entry(cost).or_default().push_back(p);
    }

    /// Remove the oldest cell of the lowest-cost bucket, dropping the bucket once drained
    pub fn pop_lowest(&mut self) -> Option<(u32, Point)> {
        let mut bucket = self.buckets.first_entry()?;
        let cost = *bucket.key();
        let p = bucket.get_mut().pop_front();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        p.map(|p| (cost, p))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }
}

/// Point from which the search is one step from the sink's origin or from the net itself
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Connection {
    pub cost: u32,
    pub location: Point,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn frontier_pops_lowest_cost_first() {
        let mut f = Frontier::seeded(8, Point::new(4, 4));
        f.push(6, Point::new(1, 1));
        f.push(10, Point::new(2, 2));
        f.push(6, Point::new(0, 1));
        assert_eq!(f.len(), 4);
        assert_eq!(f.pop_lowest(), Some((6, Point::new(1, 1))));
        assert_eq!(f.pop_lowest(), Some((6, Point::new(0, 1))));
        assert_eq!(f.pop_lowest(), Some((8, Point::new(4, 4))));
        assert_eq!(f.pop_lowest(), Some((10, Point::new(2, 2))));
        assert_eq!(f.pop_lowest(), None);
        assert!(f.is_empty());
    }

    #[test]
    fn late_arrivals_join_back_of_bucket() {
        let mut f = Frontier::seeded(4, Point::new(0, 0));
        f.push(4, Point::new(1, 0));
        assert_eq!(f.pop_lowest(), Some((4, Point::new(0, 0))));
        f.push(4, Point::new(2, 0));
        assert_eq!(f.pop_lowest(), Some((4, Point::new(1, 0))));
        assert_eq!(f.pop_lowest(), Some((4, Point::new(2, 0))));
    }

    #[test]
    fn search_state_resets_to_unvisited() {
        let grid = RoutingGrid::new(3, 3);
        let mut state = SearchState::for_grid(&grid);
        assert!(!state.is_visited(Point::new(1, 1)));
        state.visit(Point::new(1, 1), Point::new(1, 2), 5);
        assert!(state.is_visited(Point::new(1, 1)));
        assert_eq!(state.get(Point::new(1, 1)).pred, Point::new(1, 2));
        state.reset();
        assert_eq!(state.get(Point::new(1, 1)), SearchRecord::default());
    }

    proptest! {
        #[test]
        fn frontier_yields_nondecreasing_costs(costs in proptest::collection::vec(1u32..20, 0..40)) {
            let mut f = Frontier::default();
            for (i, &c) in costs.iter().enumerate() {
                f.push(c, Point::new(i as i32, 0));
            }
            let mut last = 0;
            let mut seen = 0;
            while let Some((cost, p)) = f.pop_lowest() {
                prop_assert!(cost >= last);
                prop_assert_eq!(costs[p.x as usize], cost);
                last = cost;
                seen += 1;
            }
            prop_assert_eq!(seen, costs.len());
        }
    }
}
