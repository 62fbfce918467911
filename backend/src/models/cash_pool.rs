//! Central cash pool model
//!
//! The cash pool funds pool deficits and absorbs repayments. Its balance can
//! go negative when deficits exceed it (in the external line-of-credit preset
//! that negative balance is the drawn line).

use serde::{Deserialize, Serialize};

/// Balances and running counters for the central cash facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashPoolState {
    /// Facility cash; negative means funding exceeded the balance
    pub cash: f64,
    /// Idle interest earned today; reset at the start of every day
    pub interest_earned: f64,
    /// Cumulative interest implied by outstanding pool borrow.
    ///
    /// Informational only: never settled against pool `interest_owed` or
    /// `interest_paid`.
    pub interest_receivable: f64,
    /// Cumulative facility-sizing drag (internal-pool scenario)
    pub cash_drag: f64,
    /// Cumulative cost of a negative facility balance (external line of credit)
    pub borrow_drag: f64,
}

impl CashPoolState {
    /// Create a cash pool with opening cash.
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            ..Self::default()
        }
    }

    /// Fund a pool deficit.
    pub fn fund(&mut self, amount: f64) {
        self.cash -= amount;
    }

    /// Absorb a pool repayment (interest and/or principal).
    pub fn receive(&mut self, amount: f64) {
        self.cash += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fund_can_drive_balance_negative() {
        let mut pool = CashPoolState::with_cash(3.0);
        pool.fund(5.0);
        assert_eq!(pool.cash, -2.0);
        pool.receive(2.0);
        assert_eq!(pool.cash, 0.0);
    }
}
