//! Shared types and constants for the wire router.

use serde::Serialize;
use std::fmt;

/// Index of a net in routing order.
pub type NetId = u32;

/// 4 directions for orthogonal routing, in probe order
pub const DIRECTIONS: [(i32, i32); 4] = [
    (1, 0),  // +x
    (-1, 0), // -x
    (0, 1),  // +y
    (0, -1), // -y
];

/// Legacy integer encoding of a free cell
pub const LEGACY_FREE: i32 = 0;
/// Legacy integer encoding of an obstruction
pub const LEGACY_OBSTRUCTION: i32 = -1;

/// Grid coordinate
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors in `DIRECTIONS` order, unchecked against bounds
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        DIRECTIONS.into_iter().map(move |d| self.offset(d))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Permanent state of one grid cell
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum CellState {
    #[default]
    Free,
    Obstruction,
    Owned(NetId),
}

impl CellState {
    /// Encode as free=0, obstruction=-1, net k = -(k+2)
    #[inline]
    pub fn to_legacy(self) -> i32 {
        match self {
            CellState::Free => LEGACY_FREE,
            CellState::Obstruction => LEGACY_OBSTRUCTION,
            CellState::Owned(net) => -(net as i32 + 2),
        }
    }

    /// Inverse of `to_legacy`; `None` for positive values
    #[cfg(test)]
    pub fn from_legacy(value: i32) -> Option<Self> {
        match value {
            LEGACY_FREE => Some(CellState::Free),
            LEGACY_OBSTRUCTION => Some(CellState::Obstruction),
            v if v < LEGACY_OBSTRUCTION => Some(CellState::Owned((-v - 2) as NetId)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_owned_by(self, net: NetId) -> bool {
        self == CellState::Owned(net)
    }
}

/// Manhattan distance between two grid coordinates
#[inline]
pub fn manhattan(a: Point, b: Point) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
