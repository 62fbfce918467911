//! Liquidity Simulator Core - Rust Engine
//!
//! Daily cash-liquidity simulation for private-asset investment pools that
//! fund capital calls from a central cash pool, an internal facility or an
//! external line of credit.
//!
//! # Architecture
//!
//! - **core**: Rate conversion
//! - **models**: Domain types (PoolState, CashPoolState, SimulationState, Event)
//! - **arrivals**: Cash-flow event source (fixed or seeded random)
//! - **scenario**: Parameter records, presets and scenario adjustments
//! - **settlement**: Debt-service waterfall and deferred interest crediting
//! - **orchestrator**: Day loop, summary, checkpoints, scenario comparison
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Money values are f64 millions; rates are annual percent
//! 2. All randomness is deterministic (seeded RNG)
//! 3. The engine is a pure function of parameters and events
//! 4. Daily records are value snapshots; none aliases another

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod scenario;
pub mod settlement;

// Re-exports for convenience
pub use arrivals::{CashFlowConfig, CashFlowSource, DayEvents, FixedCashFlows, RandomCashFlowGenerator};
pub use models::{
    cash_pool::CashPoolState,
    event::{Event, EventLog},
    pool::{AccountKey, ExpectedReturns, PoolId, PoolState},
    state::SimulationState,
};
pub use orchestrator::{
    compare_presets, compare_scenarios, run, run_with_adjustment, summarize_records, DailyRecord,
    Orchestrator, SimulationError, SimulationOutput, SimulationSummary,
};
pub use rng::RngManager;
pub use scenario::{ScenarioAdjustment, ScenarioKind, ScenarioParameters, DEFAULT_CASH_POOL_NOTIONAL};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn liquidity_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::run_scenario, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::scenario_presets, m)?)?;
    Ok(())
}
