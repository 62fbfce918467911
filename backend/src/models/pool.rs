//! Investment pool model
//!
//! Each pool holds idle cash and may carry drawn borrow from the cash pool.
//! The set of pools is closed: private equity, private credit and private
//! real estate.
//!
//! Money is f64 in millions of currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one of the fixed investment pools.
///
/// Ordering is PE < PC < PRE; every per-pool loop in the engine follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PoolId {
    #[serde(rename = "PE")]
    PrivateEquity,
    #[serde(rename = "PC")]
    PrivateCredit,
    #[serde(rename = "PRE")]
    PrivateRealEstate,
}

impl PoolId {
    /// All pools in processing order.
    pub const ALL: [PoolId; 3] = [
        PoolId::PrivateEquity,
        PoolId::PrivateCredit,
        PoolId::PrivateRealEstate,
    ];

    /// Short ledger code ("PE", "PC", "PRE").
    pub fn code(&self) -> &'static str {
        match self {
            PoolId::PrivateEquity => "PE",
            PoolId::PrivateCredit => "PC",
            PoolId::PrivateRealEstate => "PRE",
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ledger key: one of the pools or the central cash pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountKey {
    #[serde(rename = "PE")]
    PrivateEquity,
    #[serde(rename = "PC")]
    PrivateCredit,
    #[serde(rename = "PRE")]
    PrivateRealEstate,
    #[serde(rename = "CASH_POOL")]
    CashPool,
}

impl AccountKey {
    /// Every key in ledger order (pools first, cash pool last).
    pub const ALL: [AccountKey; 4] = [
        AccountKey::PrivateEquity,
        AccountKey::PrivateCredit,
        AccountKey::PrivateRealEstate,
        AccountKey::CashPool,
    ];
}

impl From<PoolId> for AccountKey {
    fn from(pool: PoolId) -> Self {
        match pool {
            PoolId::PrivateEquity => AccountKey::PrivateEquity,
            PoolId::PrivateCredit => AccountKey::PrivateCredit,
            PoolId::PrivateRealEstate => AccountKey::PrivateRealEstate,
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::CashPool => f.write_str("CASH_POOL"),
            AccountKey::PrivateEquity => f.write_str("PE"),
            AccountKey::PrivateCredit => f.write_str("PC"),
            AccountKey::PrivateRealEstate => f.write_str("PRE"),
        }
    }
}

/// Target annual returns (percent) each pool would earn on invested capital.
///
/// Cash drag is measured against these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedReturns {
    pub pe: f64,
    pub pc: f64,
    pub pre: f64,
}

impl Default for ExpectedReturns {
    fn default() -> Self {
        Self {
            pe: 15.0,
            pc: 10.0,
            pre: 8.0,
        }
    }
}

impl ExpectedReturns {
    /// Annual expected return (percent) for a pool.
    pub fn for_pool(&self, pool: PoolId) -> f64 {
        match pool {
            PoolId::PrivateEquity => self.pe,
            PoolId::PrivateCredit => self.pc,
            PoolId::PrivateRealEstate => self.pre,
        }
    }

    /// Simple average across the three pools (annual percent).
    pub fn average(&self) -> f64 {
        (self.pe + self.pc + self.pre) / 3.0
    }
}

/// Balances and running counters for one pool.
///
/// Snapshots are taken by value (`Clone`), so no two daily records share
/// a `PoolState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    /// Idle cash held by the pool (≥ 0 at day end)
    pub cash: f64,
    /// Outstanding drawn principal (≥ 0)
    pub borrow: f64,
    /// Accrued, unpaid interest on `borrow`
    pub interest_owed: f64,
    /// Cumulative interest paid back to the cash pool
    pub interest_paid: f64,
    /// Idle interest earned today; reset at the start of every day
    pub interest_earned: f64,
    /// Cumulative opportunity cost of idle cash
    pub cash_drag: f64,
    /// Cumulative interest cost of drawn borrow
    pub borrow_drag: f64,
}

impl PoolState {
    /// Create a pool with opening cash and nothing else.
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            ..Self::default()
        }
    }

    /// Add an external cash flow (negative = capital call).
    pub fn apply_cash_flow(&mut self, amount: f64) {
        self.cash += amount;
    }

    /// Convert a negative cash balance into drawn borrow.
    ///
    /// Returns the deficit drawn (0.0 when cash is non-negative). Cash is set
    /// to exactly zero.
    pub fn convert_deficit(&mut self) -> f64 {
        if self.cash < 0.0 {
            let deficit = -self.cash;
            self.borrow += deficit;
            self.cash = 0.0;
            deficit
        } else {
            0.0
        }
    }

    /// Accrue one day of interest on outstanding borrow.
    ///
    /// Returns the interest accrued (0.0 when nothing is drawn).
    pub fn accrue_borrow_interest(&mut self, daily_borrow_rate: f64) -> f64 {
        if self.borrow > 0.0 {
            let interest = self.borrow * daily_borrow_rate;
            self.interest_owed += interest;
            self.borrow_drag += interest;
            interest
        } else {
            0.0
        }
    }

    /// True when the pool owes principal or interest.
    pub fn has_debt(&self) -> bool {
        self.borrow > 0.0 || self.interest_owed > 0.0
    }
}
