//! Deferred Interest Module
//!
//! Idle interest earned on day N is not spendable until day N+1. The engine
//! schedules each day's idle interest here and applies the whole schedule
//! to opening cash at the start of the following day.
//!
//! # Usage
//!
//! ```rust
//! use liquidity_simulator_core_rs::settlement::DeferredInterest;
//! use liquidity_simulator_core_rs::{AccountKey, SimulationState};
//!
//! let mut state = SimulationState::new(&[], 10.0);
//! let mut schedule = DeferredInterest::new();
//!
//! // End of day 1
//! schedule.accumulate(AccountKey::CashPool, 0.0012);
//!
//! // Start of day 2
//! let events = schedule.apply_all(&mut state, 2);
//! assert_eq!(events.len(), 1);
//! assert!((state.cash_pool().cash - 10.0012).abs() < 1e-12);
//! assert!(schedule.is_empty());
//! ```

use crate::models::event::Event;
use crate::models::pool::{AccountKey, PoolId};
use crate::models::state::SimulationState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interest credits waiting for the next day.
///
/// Uses BTreeMap for deterministic application order (pools, then cash pool).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeferredInterest {
    pending: BTreeMap<AccountKey, f64>,
}

impl DeferredInterest {
    /// Create a new empty schedule.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }

    /// Schedule interest for an account. Non-positive amounts are ignored.
    pub fn accumulate(&mut self, account: AccountKey, amount: f64) {
        if amount > 0.0 {
            *self.pending.entry(account).or_insert(0.0) += amount;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Credit every scheduled amount to opening cash and clear the schedule.
    ///
    /// Returns one `InterestCredited` event per credited account, in key order.
    pub fn apply_all(&mut self, state: &mut SimulationState, day: usize) -> Vec<Event> {
        let pending = std::mem::take(&mut self.pending);
        let mut events = Vec::with_capacity(pending.len());

        for (account, amount) in pending {
            match pool_for(account) {
                Some(pool) => state.pool_mut(pool).cash += amount,
                None => state.cash_pool_mut().cash += amount,
            }
            events.push(Event::InterestCredited {
                day,
                account,
                amount,
            });
        }

        events
    }
}

fn pool_for(account: AccountKey) -> Option<PoolId> {
    match account {
        AccountKey::PrivateEquity => Some(PoolId::PrivateEquity),
        AccountKey::PrivateCredit => Some(PoolId::PrivateCredit),
        AccountKey::PrivateRealEstate => Some(PoolId::PrivateRealEstate),
        AccountKey::CashPool => None,
    }
}
