//! Run summary aggregation
//!
//! Reduces a finished run into per-pool and cash-pool end figures plus run
//! totals. Two equivalent paths exist:
//!
//! - [`SimulationSummary::from_carry`] reads final state and run counters
//!   (what the engine uses).
//! - [`summarize_records`] derives the same summary purely from the daily
//!   ledger of a complete run.

use crate::models::pool::PoolId;
use crate::orchestrator::engine::{DailyRecord, DayCarry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// End-of-run figures for one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub interest_paid: f64,
    pub ending_cash: f64,
    pub ending_borrow: f64,
    pub cash_drag: f64,
    pub borrow_drag: f64,
}

/// End-of-run figures for the cash pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CashPoolSummary {
    /// Cumulative idle interest earned over the run
    pub interest_earned: f64,
    pub ending_cash: f64,
    /// Informational receivable; not reconciled with pool interest paid
    pub interest_receivable: f64,
    pub cash_drag: f64,
    pub borrow_drag: f64,
}

/// Run-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub pools: BTreeMap<PoolId, PoolSummary>,
    pub cash_pool: CashPoolSummary,
    pub total_borrowed: f64,
    pub total_repaid: f64,
    /// Sum of every day's drag
    pub total_drag: f64,
    pub days: usize,
}

impl SimulationSummary {
    /// Build the summary from final state and accumulated counters.
    pub fn from_carry(carry: &DayCarry) -> Self {
        let state = &carry.state;
        let counters = &carry.counters;
        let cash_pool = state.cash_pool();

        Self {
            pools: state
                .pools()
                .iter()
                .map(|(id, pool)| {
                    (
                        *id,
                        PoolSummary {
                            interest_paid: pool.interest_paid,
                            ending_cash: pool.cash,
                            ending_borrow: pool.borrow,
                            cash_drag: pool.cash_drag,
                            borrow_drag: pool.borrow_drag,
                        },
                    )
                })
                .collect(),
            cash_pool: CashPoolSummary {
                interest_earned: counters.cash_pool_interest_earned,
                ending_cash: cash_pool.cash,
                interest_receivable: cash_pool.interest_receivable,
                cash_drag: cash_pool.cash_drag,
                borrow_drag: cash_pool.borrow_drag,
            },
            total_borrowed: counters.total_borrowed,
            total_repaid: counters.total_repaid,
            total_drag: counters.total_drag,
            days: counters.days_completed,
        }
    }

    /// Summary figures for one pool.
    pub fn pool(&self, id: PoolId) -> PoolSummary {
        self.pools.get(&id).copied().unwrap_or_default()
    }

    /// Interest paid by every pool combined.
    pub fn total_interest_paid(&self) -> f64 {
        self.pools.values().map(|p| p.interest_paid).sum()
    }

    /// Cash drag across pools (excludes the facility drag on the cash pool).
    pub fn total_pool_cash_drag(&self) -> f64 {
        self.pools.values().map(|p| p.cash_drag).sum()
    }

    /// Borrow drag across pools.
    pub fn total_borrow_drag(&self) -> f64 {
        self.pools.values().map(|p| p.borrow_drag).sum()
    }
}

/// Derive the summary from a complete daily ledger (days 1..=N).
///
/// Returns `None` for an empty ledger.
pub fn summarize_records(records: &[DailyRecord]) -> Option<SimulationSummary> {
    let last = records.last()?;

    let mut total_borrowed = 0.0;
    let mut total_repaid = 0.0;
    let mut total_drag = 0.0;
    let mut interest_earned = 0.0;
    for record in records {
        total_borrowed += record.totals().borrowed;
        total_repaid += record.totals().repaid;
        total_drag += record.totals().drag;
        interest_earned += record.cash_pool().interest_earned;
    }

    let cash_pool = last.cash_pool();
    Some(SimulationSummary {
        pools: last
            .pools()
            .iter()
            .map(|(id, pool)| {
                (
                    *id,
                    PoolSummary {
                        interest_paid: pool.interest_paid,
                        ending_cash: pool.cash,
                        ending_borrow: pool.borrow,
                        cash_drag: pool.cash_drag,
                        borrow_drag: pool.borrow_drag,
                    },
                )
            })
            .collect(),
        cash_pool: CashPoolSummary {
            interest_earned,
            ending_cash: cash_pool.cash,
            interest_receivable: cash_pool.interest_receivable,
            cash_drag: cash_pool.cash_drag,
            borrow_drag: cash_pool.borrow_drag,
        },
        total_borrowed,
        total_repaid,
        total_drag,
        days: last.day(),
    })
}
