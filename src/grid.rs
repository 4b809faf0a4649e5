//! Permanent routing surface.

use std::fmt;

use crate::types::{CellState, NetId, Point};

/// Grid of obstructions, free cells and committed wires.
///
/// Obstructions are fixed at construction. Ownership only ever goes from
/// `Free` to `Owned(net)` through [`RoutingGrid::set_owner`]; nothing unsets it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingGrid {
    width: i32,
    height: i32,
    /// Row-major, index = y * width + x
    cells: Vec<CellState>,
}

impl RoutingGrid {
    /// Empty grid. Dimensions must be positive and the cell count must fit in an `i32`.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(
            width > 0 && height > 0 && width.checked_mul(height).is_some(),
            "unsupported grid dimensions {width}x{height}"
        );
        Self {
            width,
            height,
            cells: vec![CellState::Free; width as usize * height as usize],
        }
    }

    /// Grid with the given obstructions already placed
    pub fn with_obstructions(width: i32, height: i32, obstructions: &[Point]) -> Self {
        let mut grid = Self::new(width, height);
        for &p in obstructions {
            let idx = grid.index(p);
            grid.cells[idx] = CellState::Obstruction;
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        assert!(self.in_bounds(p), "{p} outside {}x{} grid", self.width, self.height);
        p.y as usize * self.width as usize + p.x as usize
    }

    #[inline]
    pub fn get(&self, p: Point) -> CellState {
        self.cells[self.index(p)]
    }

    #[inline]
    pub fn is_obstruction(&self, p: Point) -> bool {
        self.get(p) == CellState::Obstruction
    }

    /// In-bounds orthogonal neighbors of `p`, in probe order
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        p.neighbors().filter(move |&n| self.in_bounds(n))
    }

    /// Mark `p` as owned by `net`. Returns whether the cell changed.
    ///
    /// Re-asserting a cell the net already owns is a no-op. Panics if the
    /// cell is an obstruction or belongs to another net.
    pub fn set_owner(&mut self, p: Point, net: NetId) -> bool {
        let idx = self.index(p);
        match self.cells[idx] {
            CellState::Free => {
                self.cells[idx] = CellState::Owned(net);
                true
            }
            CellState::Owned(owner) if owner == net => false,
            other => panic!("cannot give {p} to net {net}: cell is {other:?}"),
        }
    }

    /// Re-assert ownership of every pin of a net
    pub fn claim_pins(&mut self, net: NetId, pins: impl IntoIterator<Item = Point>) {
        for pin in pins {
            self.set_owner(pin, net);
        }
    }

    /// All cells currently owned by `net`
    pub fn owned_by(&self, net: NetId) -> Vec<Point> {
        self.points().filter(|&p| self.get(p).is_owned_by(net)).collect()
    }

    /// Every coordinate, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(x, y)))
    }

    /// Rows `[y][x]` in the legacy integer encoding
    pub fn to_legacy(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| c.to_legacy()).collect())
            .collect()
    }
}

impl fmt::Display for RoutingGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_legacy() {
            let line: Vec<String> = row.iter().map(|v| format!("{v:>3}")).collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
