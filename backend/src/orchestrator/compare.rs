//! Scenario comparison
//!
//! Runs several funding scenarios against one shared event sequence. Each run
//! owns its own state; the sequence is only read, so runs execute on the
//! rayon pool with no synchronization.

use crate::arrivals::DayEvents;
use crate::orchestrator::engine::{run, SimulationError, SimulationOutput};
use crate::scenario::{ScenarioKind, ScenarioParameters};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One scenario's run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub parameters: ScenarioParameters,
    pub output: SimulationOutput,
}

/// Headline figures used to rank scenarios against each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHeadline {
    pub kind: ScenarioKind,
    /// Interest all pools paid to the cash pool
    pub interest_paid: f64,
    /// Opportunity cost of idle pool cash
    pub cash_drag: f64,
    /// Interest cost of drawn borrow
    pub borrow_drag: f64,
    /// Facility-sizing drag booked on the cash pool
    pub facility_drag: f64,
    /// Sum of daily drag
    pub total_drag: f64,
    /// Mean end-of-day idle cash: pool cash plus any positive cash-pool balance
    pub average_idle_cash: f64,
    /// Cost of a negative cash pool balance (external line only)
    pub external_line_cost: f64,
}

impl ScenarioOutcome {
    pub fn headline(&self) -> ScenarioHeadline {
        let summary = &self.output.summary;
        let records = &self.output.records;

        let idle_total: f64 = records
            .iter()
            .map(|r| r.total_pool_cash() + r.cash_pool().cash.max(0.0))
            .sum();
        let average_idle_cash = if records.is_empty() {
            0.0
        } else {
            idle_total / records.len() as f64
        };

        ScenarioHeadline {
            kind: self.kind,
            interest_paid: summary.total_interest_paid(),
            cash_drag: summary.total_pool_cash_drag(),
            borrow_drag: summary.total_borrow_drag(),
            facility_drag: summary.cash_pool.cash_drag,
            total_drag: summary.total_drag,
            average_idle_cash,
            external_line_cost: summary.cash_pool.borrow_drag,
        }
    }
}

/// Run every `(kind, parameters)` pair against the same events concurrently.
///
/// Results come back in input order. If any run fails, its error is returned
/// in place of the outcomes.
pub fn compare_scenarios(
    runs: &[(ScenarioKind, ScenarioParameters)],
    events: &[DayEvents],
) -> Result<Vec<ScenarioOutcome>, SimulationError> {
    runs.par_iter()
        .map(|&(kind, parameters)| {
            run(&parameters, events, kind).map(|output| ScenarioOutcome {
                kind,
                parameters,
                output,
            })
        })
        .collect()
}

/// Run all three presets over `days` days against the same events.
pub fn compare_presets(
    days: usize,
    events: &[DayEvents],
) -> Result<Vec<ScenarioOutcome>, SimulationError> {
    let runs: Vec<_> = ScenarioKind::ALL
        .iter()
        .map(|kind| (*kind, kind.preset(days)))
        .collect();
    compare_scenarios(&runs, events)
}
