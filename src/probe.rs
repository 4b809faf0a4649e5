//! Neighbor probes driving one sink search.

use rustc_hash::FxHashSet;

use crate::grid::RoutingGrid;
use crate::netlist::Net;
use crate::search::{Connection, Frontier, SearchState};
use crate::types::{manhattan, CellState, Point};

/// What one sink search is looking for
pub struct SearchTarget<'a> {
    pub net: &'a Net,
    /// The net's source; the search works its way back towards it
    pub origin: Point,
    /// Where the search starts
    pub sink: Point,
    sink_pins: FxHashSet<Point>,
}

impl<'a> SearchTarget<'a> {
    pub fn new(net: &'a Net, sink: Point) -> Self {
        Self {
            net,
            origin: net.source,
            sink,
            sink_pins: net.sinks.iter().copied().collect(),
        }
    }

    /// Distance back to the origin plus distance out from the sink
    #[inline]
    pub fn cost(&self, p: Point) -> u32 {
        manhattan(p, self.origin) + manhattan(p, self.sink)
    }

    #[inline]
    fn is_sink_pin(&self, p: Point) -> bool {
        self.sink_pins.contains(&p)
    }
}

/// Probe the neighbors of `current`.
///
/// If any neighbor is a committed, non-sink cell of the net, returns the
/// reconnection and queues nothing. Otherwise every unreached free neighbor
/// gets `current` as predecessor and joins the frontier.
pub fn probe_neighbors(
    grid: &mut RoutingGrid,
    state: &mut SearchState,
    frontier: &mut Frontier,
    target: &SearchTarget<'_>,
    current: Point,
) -> Option<Connection> {
    let net = target.net.id;
    let mut reconnection = None;

    // All four directions are checked; the last hit sets the cost
    for n in grid.neighbors(current) {
        if grid.get(n).is_owned_by(net) && !target.is_sink_pin(n) {
            let cost = target.cost(n);
            state.visit(n, current, cost);
            reconnection = Some(Connection {
                cost,
                location: current,
            });
        }
    }

    if reconnection.is_none() {
        for n in grid.neighbors(current) {
            if !state.is_visited(n) && grid.get(n) == CellState::Free {
                let cost = target.cost(n);
                state.visit(n, current, cost);
                frontier.push(cost, n);
            }
        }
    }

    grid.claim_pins(net, target.net.pins());
    reconnection
}

/// First reached neighbor of the origin, in direction order
pub fn find_sink_adjacent(
    grid: &RoutingGrid,
    state: &SearchState,
    origin: Point,
) -> Option<Connection> {
    grid.neighbors(origin).find_map(|n| {
        let record = state.get(n);
        (record.cost > 0).then_some(Connection {
            cost: record.cost,
            location: n,
        })
    })
}
