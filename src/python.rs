//! Python bindings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::netlist::Problem;
use crate::router::{Router, RouterConfig};
use crate::types::{manhattan, Point};

/// Legacy grid rows plus `(net, (x, y))` for every sink left unrouted
type RouteOutput = (Vec<Vec<i32>>, Vec<(u32, (i32, i32))>);

/// Sequential grid router
#[pyclass]
struct WireRouter {
    router: Router,
}

#[pymethods]
impl WireRouter {
    #[new]
    #[pyo3(signature = (max_expansions=None))]
    fn new(max_expansions: Option<u32>) -> Self {
        Self {
            router: Router::new(RouterConfig { max_expansions }),
        }
    }

    #[getter]
    fn max_expansions(&self) -> Option<u32> {
        self.router.config().max_expansions
    }

    /// Route a problem given in the text input format
    fn route_text(&self, text: &str) -> PyResult<RouteOutput> {
        let problem = Problem::parse(text).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(self.run(&problem))
    }

    /// Route nets given as lists of (x, y) pins, source first
    fn route(
        &self,
        width: i32,
        height: i32,
        obstructions: Vec<(i32, i32)>,
        nets: Vec<Vec<(i32, i32)>>,
    ) -> PyResult<RouteOutput> {
        let problem = Problem::new(
            width,
            height,
            obstructions.into_iter().map(Point::from).collect(),
            nets.into_iter()
                .map(|pins| pins.into_iter().map(Point::from).collect())
                .collect(),
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(self.run(&problem))
    }
}

impl WireRouter {
    fn run(&self, problem: &Problem) -> RouteOutput {
        let (grid, report) = self.router.route(problem);
        let unrouted = report
            .unrouted()
            .into_iter()
            .map(|(net, sink)| (net, sink.into()))
            .collect();
        (grid.to_legacy(), unrouted)
    }
}

/// Manhattan distance between two (x, y) points
#[pyfunction]
#[pyo3(name = "manhattan")]
fn py_manhattan(a: (i32, i32), b: (i32, i32)) -> u32 {
    manhattan(a.into(), b.into())
}

/// Python module
#[pymodule]
fn wire_router(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<WireRouter>()?;
    m.add_function(wrap_pyfunction!(py_manhattan, m)?)?;
    Ok(())
}
