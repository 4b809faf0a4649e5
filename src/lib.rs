//! Grid-based multi-net wire router.
//!
//! Nets are routed one at a time, sink by sink, with a Manhattan-cost
//! wavefront that starts at the sink and works back towards the net's
//! source. The search stops at the first cell that touches either the
//! source or wire the net already owns, and that path is committed to the
//! grid before the next search starts.
//!
//! With the `python` feature this builds as a Python extension via PyO3.

pub mod backtrace;
pub mod error;
pub mod grid;
pub mod netlist;
pub mod probe;
pub mod router;
pub mod search;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use error::{Error, ParseError, ProblemError};
pub use grid::RoutingGrid;
pub use netlist::{Net, Problem};
pub use router::{ConnectVia, NetReport, RouteReport, Router, RouterConfig, SinkOutcome, SinkReport};
pub use search::Connection;
pub use types::{manhattan, CellState, NetId, Point};
