//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::arrivals::DayEvents;
use crate::models::pool::{AccountKey, ExpectedReturns, PoolId, PoolState};
use crate::orchestrator::{DailyRecord, SimulationOutput, SimulationSummary};
use crate::scenario::ScenarioParameters;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with a clear error message.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

// ========================================================================
// Input Parsers
// ========================================================================

/// Convert Python dict to ScenarioParameters
pub fn parse_parameters(py_params: &Bound<'_, PyDict>) -> PyResult<ScenarioParameters> {
    let defaults = ExpectedReturns::default();
    let expected_returns = match py_params.get_item("expected_returns")? {
        Some(value) => {
            let returns = value.downcast::<PyDict>()?;
            ExpectedReturns {
                pe: extract_with_default(returns, "PE", defaults.pe)?,
                pc: extract_with_default(returns, "PC", defaults.pc)?,
                pre: extract_with_default(returns, "PRE", defaults.pre)?,
            }
        }
        None => defaults,
    };

    Ok(ScenarioParameters {
        pe_cash: extract_required(py_params, "pe_cash")?,
        pc_cash: extract_required(py_params, "pc_cash")?,
        pre_cash: extract_required(py_params, "pre_cash")?,
        cash_pool: extract_required(py_params, "cash_pool")?,
        borrow_rate: extract_required(py_params, "borrow_rate")?,
        idle_rate: extract_required(py_params, "idle_rate")?,
        days: extract_required(py_params, "days")?,
        expected_returns,
    })
}

/// Convert a Python list of `{"PE": amount, ...}` dicts to day events.
///
/// `None` entries are quiet days.
pub fn parse_events(py_events: &Bound<'_, PyList>) -> PyResult<Vec<DayEvents>> {
    let mut events = Vec::with_capacity(py_events.len());

    for item in py_events.iter() {
        if item.is_none() {
            events.push(DayEvents::new());
            continue;
        }

        let day = item.downcast::<PyDict>()?;
        let mut flows = DayEvents::new();
        for pool in PoolId::ALL {
            if let Some(value) = day.get_item(pool.code())? {
                if !value.is_none() {
                    flows.set(pool, value.extract()?);
                }
            }
        }
        events.push(flows);
    }

    Ok(events)
}

// ========================================================================
// Output Converters
// ========================================================================

pub fn parameters_to_py<'py>(
    py: Python<'py>,
    params: &ScenarioParameters,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("pe_cash", params.pe_cash)?;
    dict.set_item("pc_cash", params.pc_cash)?;
    dict.set_item("pre_cash", params.pre_cash)?;
    dict.set_item("cash_pool", params.cash_pool)?;
    dict.set_item("borrow_rate", params.borrow_rate)?;
    dict.set_item("idle_rate", params.idle_rate)?;
    dict.set_item("days", params.days)?;

    let returns = PyDict::new(py);
    for pool in PoolId::ALL {
        returns.set_item(pool.code(), params.expected_returns.for_pool(pool))?;
    }
    dict.set_item("expected_returns", returns)?;
    Ok(dict)
}

fn pool_state_to_py<'py>(py: Python<'py>, pool: &PoolState) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("cash", pool.cash)?;
    dict.set_item("borrow", pool.borrow)?;
    dict.set_item("interest_owed", pool.interest_owed)?;
    dict.set_item("interest_paid", pool.interest_paid)?;
    dict.set_item("interest_earned", pool.interest_earned)?;
    dict.set_item("cash_drag", pool.cash_drag)?;
    dict.set_item("borrow_drag", pool.borrow_drag)?;
    Ok(dict)
}

fn record_to_py<'py>(py: Python<'py>, record: &DailyRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("day", record.day())?;

    let pools = PyDict::new(py);
    for (id, pool) in record.pools() {
        pools.set_item(id.code(), pool_state_to_py(py, pool)?)?;
    }
    dict.set_item("pools", pools)?;

    let cash_pool = record.cash_pool();
    let cp = PyDict::new(py);
    cp.set_item("cash", cash_pool.cash)?;
    cp.set_item("interest_earned", cash_pool.interest_earned)?;
    cp.set_item("interest_receivable", cash_pool.interest_receivable)?;
    cp.set_item("cash_drag", cash_pool.cash_drag)?;
    cp.set_item("borrow_drag", cash_pool.borrow_drag)?;
    dict.set_item("cash_pool", cp)?;

    let activity = PyDict::new(py);
    let interest = PyDict::new(py);
    for key in AccountKey::ALL {
        activity.set_item(key.to_string(), record.activity(key))?;
        interest.set_item(
            key.to_string(),
            record.totals().interest.get(&key).copied().unwrap_or(0.0),
        )?;
    }
    dict.set_item("activity", activity)?;
    dict.set_item("interest", interest)?;
    dict.set_item("borrowed", record.totals().borrowed)?;
    dict.set_item("repaid", record.totals().repaid)?;
    dict.set_item("drag", record.totals().drag)?;
    Ok(dict)
}

fn summary_to_py<'py>(py: Python<'py>, summary: &SimulationSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);

    let pools = PyDict::new(py);
    for (id, pool) in &summary.pools {
        let p = PyDict::new(py);
        p.set_item("interest_paid", pool.interest_paid)?;
        p.set_item("ending_cash", pool.ending_cash)?;
        p.set_item("ending_borrow", pool.ending_borrow)?;
        p.set_item("cash_drag", pool.cash_drag)?;
        p.set_item("borrow_drag", pool.borrow_drag)?;
        pools.set_item(id.code(), p)?;
    }
    dict.set_item("pools", pools)?;

    let cp = PyDict::new(py);
    cp.set_item("interest_earned", summary.cash_pool.interest_earned)?;
    cp.set_item("ending_cash", summary.cash_pool.ending_cash)?;
    cp.set_item("interest_receivable", summary.cash_pool.interest_receivable)?;
    cp.set_item("cash_drag", summary.cash_pool.cash_drag)?;
    cp.set_item("borrow_drag", summary.cash_pool.borrow_drag)?;
    dict.set_item("cash_pool", cp)?;

    dict.set_item("total_borrowed", summary.total_borrowed)?;
    dict.set_item("total_repaid", summary.total_repaid)?;
    dict.set_item("total_drag", summary.total_drag)?;
    dict.set_item("days", summary.days)?;
    Ok(dict)
}

/// Convert a finished run to `{"records": [...], "summary": {...}}`
pub fn output_to_py<'py>(py: Python<'py>, output: &SimulationOutput) -> PyResult<Bound<'py, PyDict>> {
    let records = PyList::empty(py);
    for record in &output.records {
        records.append(record_to_py(py, record)?)?;
    }

    let dict = PyDict::new(py);
    dict.set_item("records", records)?;
    dict.set_item("summary", summary_to_py(py, &output.summary)?)?;
    Ok(dict)
}
