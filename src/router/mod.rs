//! Net router: routes every net, sink by sink, committing each path before the next search.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backtrace::commit_path;
use crate::grid::RoutingGrid;
use crate::netlist::{Net, Problem};
use crate::probe::{find_sink_adjacent, probe_neighbors, SearchTarget};
use crate::search::{Connection, Frontier, SearchState};
use crate::types::{manhattan, NetId, Point};


/// Router settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouterConfig {
    /// Cap on frontier pops per sink search; `None` searches until the frontier runs dry
    pub max_expansions: Option<u32>,
}

/// How a sink got connected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectVia {
    /// The search touched wire the net already owns
    Reconnection,
    /// The search reached a neighbor of the net's source
    SinkAdjacency,
    /// Sink and source are the same cell
    Coincident,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SinkOutcome {
    Connected { via: ConnectVia },
    /// Frontier exhausted without a connection
    Unreachable,
    /// Expansion cap hit first
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SinkReport {
    pub sink: Point,
    pub outcome: SinkOutcome,
    pub connection: Option<Connection>,
    pub expansions: u32,
    /// Cells newly given to the net by this sink's path
    pub committed: usize,
}

impl SinkReport {
    pub fn is_connected(&self) -> bool {
        matches!(self.outcome, SinkOutcome::Connected { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetReport {
    pub net: NetId,
    pub sinks: Vec<SinkReport>,
}

impl NetReport {
    /// Every sink connected
    pub fn is_complete(&self) -> bool {
        self.sinks.iter().all(SinkReport::is_connected)
    }

    pub fn failed_sinks(&self) -> impl Iterator<Item = &SinkReport> {
        self.sinks.iter().filter(|s| !s.is_connected())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub nets: Vec<NetReport>,
}

impl RouteReport {
    pub fn is_complete(&self) -> bool {
        self.nets.iter().all(NetReport::is_complete)
    }

    /// `(net, sink)` for every sink left unconnected
    pub fn unrouted(&self) -> Vec<(NetId, Point)> {
        self.nets
            .iter()
            .flat_map(|n| n.failed_sinks().map(move |s| (n.net, s.sink)))
            .collect()
    }
}

/// Sequential maze router over a single shared grid
#[derive(Clone, Debug, Default)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Build the problem's grid and route all of its nets in order
    pub fn route(&self, problem: &Problem) -> (RoutingGrid, RouteReport) {
        let mut grid = problem.build_grid();
        let report = self.route_nets(&mut grid, &problem.nets);
        (grid, report)
    }

    pub fn route_nets(&self, grid: &mut RoutingGrid, nets: &[Net]) -> RouteReport {
        let mut state = SearchState::for_grid(grid);
        let nets = nets
            .iter()
            .map(|net| self.route_net_with(grid, &mut state, net))
            .collect();
        RouteReport { nets }
    }

    /// Route the sinks of one net, in pin order. Unreachable sinks are
    /// reported and skipped.
    pub fn route_net(&self, grid: &mut RoutingGrid, net: &Net) -> NetReport {
        let mut state = SearchState::for_grid(grid);
        self.route_net_with(grid, &mut state, net)
    }

    fn route_net_with(&self, grid: &mut RoutingGrid, state: &mut SearchState, net: &Net) -> NetReport {
        let sinks: Vec<SinkReport> = net
            .sinks
            .iter()
            .map(|&sink| self.route_sink(grid, state, net, sink))
            .collect();

        let connected = sinks.iter().filter(|s| s.is_connected()).count();
        let committed: usize = sinks.iter().map(|s| s.committed).sum();
        info!(
            net = net.id,
            connected,
            sinks = sinks.len(),
            committed,
            "net routed"
        );
        NetReport { net: net.id, sinks }
    }

    fn route_sink(
        &self,
        grid: &mut RoutingGrid,
        state: &mut SearchState,
        net: &Net,
        sink: Point,
    ) -> SinkReport {
        if sink == net.source {
            debug!(net = net.id, %sink, "sink coincides with source");
            return SinkReport {
                sink,
                outcome: SinkOutcome::Connected {
                    via: ConnectVia::Coincident,
                },
                connection: None,
                expansions: 0,
                committed: 0,
            };
        }

        state.reset();
        let target = SearchTarget::new(net, sink);
        let mut frontier = Frontier::seeded(manhattan(net.source, sink), sink);
        let mut expansions: u32 = 0;

        let found = loop {
            let Some((_, current)) = frontier.pop_lowest() else {
                break Err(SinkOutcome::Unreachable);
            };
            if self.config.max_expansions.is_some_and(|max| expansions >= max) {
                break Err(SinkOutcome::Abandoned);
            }
            expansions += 1;

            if let Some(conn) = probe_neighbors(grid, state, &mut frontier, &target, current) {
                break Ok((ConnectVia::Reconnection, conn));
            }
            if let Some(conn) = find_sink_adjacent(grid, state, net.source) {
                break Ok((ConnectVia::SinkAdjacency, conn));
            }
        };

        match found {
            Ok((via, conn)) => {
                let committed = commit_path(grid, state, net, conn.location);
                debug!(
                    net = net.id,
                    %sink,
                    ?via,
                    at = %conn.location,
                    cost = conn.cost,
                    expansions,
                    committed,
                    "sink connected"
                );
                SinkReport {
                    sink,
                    outcome: SinkOutcome::Connected { via },
                    connection: Some(conn),
                    expansions,
                    committed,
                }
            }
            Err(outcome) => {
                warn!(net = net.id, %sink, ?outcome, expansions, "sink not routed");
                SinkReport {
                    sink,
                    outcome,
                    connection: None,
                    expansions,
                    committed: 0,
                }
            }
        }
    }
}
