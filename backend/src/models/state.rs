//! Simulation State
//!
//! Complete mutable state of one scenario run: every pool plus the central
//! cash pool.
//!
//! # Critical Invariants
//!
//! 1. Every pool in `PoolId::ALL` is present exactly once
//! 2. After a day completes, pool cash and borrow are non-negative
//! 3. Iteration is always in `PoolId` order (BTreeMap) for determinism

use crate::models::cash_pool::CashPoolState;
use crate::models::pool::{PoolId, PoolState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use liquidity_simulator_core_rs::{PoolId, SimulationState};
///
/// let state = SimulationState::new(&[(PoolId::PrivateEquity, 10.0)], 50.0);
/// assert_eq!(state.pool(PoolId::PrivateEquity).cash, 10.0);
/// assert_eq!(state.pool(PoolId::PrivateCredit).cash, 0.0);
/// assert_eq!(state.cash_pool().cash, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pools: BTreeMap<PoolId, PoolState>,
    cash_pool: CashPoolState,
}

impl SimulationState {
    /// Create state from opening pool cash and cash-pool cash.
    ///
    /// Pools not listed start empty.
    pub fn new(opening_cash: &[(PoolId, f64)], cash_pool_cash: f64) -> Self {
        let mut pools: BTreeMap<PoolId, PoolState> = PoolId::ALL
            .iter()
            .map(|id| (*id, PoolState::default()))
            .collect();

        for (id, cash) in opening_cash {
            pools.insert(*id, PoolState::with_cash(*cash));
        }

        Self {
            pools,
            cash_pool: CashPoolState::with_cash(cash_pool_cash),
        }
    }

    /// Get a pool by ID
    pub fn pool(&self, id: PoolId) -> &PoolState {
        // Constructor guarantees presence of every PoolId
        &self.pools[&id]
    }

    /// Get a mutable pool by ID
    pub fn pool_mut(&mut self, id: PoolId) -> &mut PoolState {
        self.pools.entry(id).or_default()
    }

    /// All pools in PoolId order
    pub fn pools(&self) -> &BTreeMap<PoolId, PoolState> {
        &self.pools
    }

    pub fn cash_pool(&self) -> &CashPoolState {
        &self.cash_pool
    }

    pub fn cash_pool_mut(&mut self) -> &mut CashPoolState {
        &mut self.cash_pool
    }

    /// Borrow outstanding across every pool.
    pub fn total_borrow(&self) -> f64 {
        self.pools.values().map(|p| p.borrow).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pools_present() {
        let state = SimulationState::new(&[], 0.0);
        assert_eq!(state.pools().len(), 3);
        let keys: Vec<_> = state.pools().keys().copied().collect();
        assert_eq!(keys, PoolId::ALL.to_vec());
    }

    #[test]
    fn test_totals() {
        let mut state = SimulationState::new(
            &[(PoolId::PrivateEquity, 5.0), (PoolId::PrivateCredit, 2.5)],
            10.0,
        );
        state.pool_mut(PoolId::PrivateRealEstate).borrow = 4.0;

        assert_eq!(state.pool(PoolId::PrivateCredit).cash, 2.5);
        assert_eq!(state.total_borrow(), 4.0);
    }
}
