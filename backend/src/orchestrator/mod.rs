//! Orchestrator - day loop, aggregation and run tooling
//!
//! See `engine.rs` for the day transition.

pub mod checkpoint;
pub mod compare;
pub mod engine;
pub mod summary;

// Re-export main types for convenience
pub use engine::{
    advance_day, run, run_with_adjustment, validate_events, DailyRecord, DayCarry, DayOutcome,
    DayTotals, EngineContext, Orchestrator, RunCounters, SimulationError, SimulationOutput,
};

pub use checkpoint::{compute_config_hash, ledger_digest, validate_records, RunCheckpoint};
pub use compare::{compare_presets, compare_scenarios, ScenarioHeadline, ScenarioOutcome};
pub use summary::{summarize_records, CashPoolSummary, PoolSummary, SimulationSummary};
