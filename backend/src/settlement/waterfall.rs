//! Debt-service waterfall
//!
//! Applies a pool's available cash to what it owes the cash pool:
//!
//! ```text
//! available cash ──► interest_owed (capped at available)
//!                ──► borrow principal (capped at what is left)
//!                ──► remainder stays on the pool as idle cash
//! ```
//!
//! The amount paid is returned to the cash pool by the caller.

use crate::models::pool::PoolState;
use serde::{Deserialize, Serialize};

/// Cash a pool paid back during one waterfall application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtServicePayment {
    pub interest_paid: f64,
    pub principal_repaid: f64,
}

impl DebtServicePayment {
    /// Total returned to the cash pool
    pub fn total(&self) -> f64 {
        self.interest_paid + self.principal_repaid
    }
}

/// Run the waterfall on a pool.
///
/// Returns `None` when the pool has no positive cash or owes nothing; in that
/// case the pool is untouched.
pub fn service_debt(pool: &mut PoolState) -> Option<DebtServicePayment> {
    if pool.cash <= 0.0 || !pool.has_debt() {
        return None;
    }

    let mut available = pool.cash;

    let interest_paid = pool.interest_owed.min(available);
    pool.interest_owed -= interest_paid;
    pool.interest_paid += interest_paid;
    available -= interest_paid;

    let principal_repaid = pool.borrow.min(available);
    pool.borrow -= principal_repaid;
    available -= principal_repaid;

    pool.cash = available;

    Some(DebtServicePayment {
        interest_paid,
        principal_repaid,
    })
}
