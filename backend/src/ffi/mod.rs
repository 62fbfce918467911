//! FFI (Foreign Function Interface) module
//!
//! PyO3 bindings exposing the liquidity engine to Python.
//!
//! # Design Principles
//!
//! 1. **Minimal boundary**: one run function plus the presets
//! 2. **Simple types**: dicts, lists and floats at the boundary
//! 3. **Validate inputs**: parameters and events are checked before the loop
//! 4. **Safe errors**: Rust errors become Python ValueError
//! 5. **No references**: Python gets copies, never references to Rust state

pub mod types;

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::orchestrator::run;
use crate::scenario::ScenarioKind;
use types::{output_to_py, parse_events, parse_parameters, parameters_to_py};

/// Run one scenario.
///
/// # Example (from Python)
///
/// ```python
/// from liquidity_simulator_core_rs import run_scenario
///
/// params = {"pe_cash": 0, "pc_cash": 0, "pre_cash": 0, "cash_pool": 50,
///           "borrow_rate": 4.25, "idle_rate": 4.25, "days": 1}
/// result = run_scenario(params, [{"PE": -5.0}], "pre-funded")
/// print(result["summary"]["total_borrowed"])  # 5.0
/// ```
#[pyfunction]
pub fn run_scenario<'py>(
    py: Python<'py>,
    params: &Bound<'py, PyDict>,
    events: &Bound<'py, PyList>,
    scenario: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let kind: ScenarioKind = scenario.parse().map_err(to_py_err)?;
    let parameters = parse_parameters(params)?;
    let events = parse_events(events)?;

    let output = run(&parameters, &events, kind).map_err(to_py_err)?;
    output_to_py(py, &output)
}

/// Preset parameters for every scenario, keyed by scenario name.
#[pyfunction]
pub fn scenario_presets(py: Python<'_>, days: usize) -> PyResult<Bound<'_, PyDict>> {
    let dict = PyDict::new(py);
    for kind in ScenarioKind::ALL {
        dict.set_item(kind.name(), parameters_to_py(py, &kind.preset(days))?)?;
    }
    Ok(dict)
}

fn to_py_err(err: crate::orchestrator::SimulationError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}
