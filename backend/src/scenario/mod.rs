//! Scenario parameters and presets
//!
//! A scenario is a parameter record (opening balances, rates, horizon) plus a
//! [`ScenarioKind`] tag. The engine is parameter-driven; the tag only selects
//! the scenario-level drag adjustment applied to the cash pool.
//!
//! # Example
//!
//! ```rust
//! use liquidity_simulator_core_rs::scenario::{ScenarioKind, ScenarioParameters};
//!
//! let params = ScenarioKind::InternalPool.preset(365);
//! assert_eq!(params.cash_pool, 100.0);
//! assert!(params.validate().is_ok());
//!
//! let bad = ScenarioParameters { days: 0, ..params };
//! assert!(bad.validate().is_err());
//! ```

pub mod adjustment;

pub use adjustment::{FacilitySizingDrag, NoAdjustment, ScenarioAdjustment};

use crate::core::daily_rate;
use crate::models::pool::{ExpectedReturns, PoolId};
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Starting cash-pool balance of the pre-funded baseline (millions).
///
/// The internal-pool facility drag is always sized off this constant, never
/// off the running scenario's own balance.
pub const DEFAULT_CASH_POOL_NOTIONAL: f64 = 100.0;

/// Default borrow rate for internal funding (annual %)
pub const DEFAULT_BORROW_RATE: f64 = 4.25;

/// Rate on an external line of credit (annual %)
pub const EXTERNAL_LINE_BORROW_RATE: f64 = 6.50;

/// Rate earned on idle cash (annual %)
pub const DEFAULT_IDLE_RATE: f64 = 4.25;

/// Funding policy being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Pools hold their own cash up front
    PreFunded,
    /// Pools borrow from a shared internal cash facility
    InternalPool,
    /// Pools draw on an external line of credit
    ExternalLineOfCredit,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::PreFunded,
        ScenarioKind::InternalPool,
        ScenarioKind::ExternalLineOfCredit,
    ];

    /// Kebab-case name used in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::PreFunded => "pre-funded",
            ScenarioKind::InternalPool => "internal-pool",
            ScenarioKind::ExternalLineOfCredit => "external-line-of-credit",
        }
    }

    /// Preset parameters for this scenario over `days` days.
    pub fn preset(&self, days: usize) -> ScenarioParameters {
        match self {
            ScenarioKind::PreFunded => ScenarioParameters {
                pe_cash: 50.0,
                pc_cash: 30.0,
                pre_cash: 20.0,
                cash_pool: DEFAULT_CASH_POOL_NOTIONAL,
                borrow_rate: DEFAULT_BORROW_RATE,
                idle_rate: DEFAULT_IDLE_RATE,
                days,
                expected_returns: ExpectedReturns::default(),
            },
            ScenarioKind::InternalPool => ScenarioParameters {
                pe_cash: 0.0,
                pc_cash: 0.0,
                pre_cash: 0.0,
                cash_pool: DEFAULT_CASH_POOL_NOTIONAL,
                borrow_rate: DEFAULT_BORROW_RATE,
                idle_rate: DEFAULT_IDLE_RATE,
                days,
                expected_returns: ExpectedReturns::default(),
            },
            ScenarioKind::ExternalLineOfCredit => ScenarioParameters {
                pe_cash: 0.0,
                pc_cash: 0.0,
                pre_cash: 0.0,
                cash_pool: 0.0,
                borrow_rate: EXTERNAL_LINE_BORROW_RATE,
                idle_rate: DEFAULT_IDLE_RATE,
                days,
                expected_returns: ExpectedReturns::default(),
            },
        }
    }

    /// Scenario-level cash-pool drag adjustment for this kind.
    pub fn adjustment(&self) -> Box<dyn ScenarioAdjustment> {
        match self {
            ScenarioKind::InternalPool => Box::new(FacilitySizingDrag::default()),
            ScenarioKind::PreFunded | ScenarioKind::ExternalLineOfCredit => Box::new(NoAdjustment),
        }
    }

    /// Whether a negative cash-pool balance is a priced external draw.
    pub fn prices_negative_cash_pool(&self) -> bool {
        matches!(self, ScenarioKind::ExternalLineOfCredit)
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-funded" | "prefunded" => Ok(ScenarioKind::PreFunded),
            "internal-pool" | "internal" => Ok(ScenarioKind::InternalPool),
            "external-line-of-credit" | "external" | "loc" => Ok(ScenarioKind::ExternalLineOfCredit),
            other => Err(SimulationError::InvalidConfig(format!(
                "unknown scenario '{}' (expected pre-funded, internal-pool or external-line-of-credit)",
                other
            ))),
        }
    }
}

/// Complete parameter record for one run.
///
/// Money in millions; rates in annual percent (4.25 = 4.25%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Opening cash of the private equity pool
    pub pe_cash: f64,
    /// Opening cash of the private credit pool
    pub pc_cash: f64,
    /// Opening cash of the private real estate pool
    pub pre_cash: f64,
    /// Opening cash of the central cash pool
    pub cash_pool: f64,
    /// Annual rate charged on drawn borrow
    pub borrow_rate: f64,
    /// Annual rate earned on idle cash
    pub idle_rate: f64,
    /// Horizon in whole days (≥ 1)
    pub days: usize,
    /// Target annual returns used for cash drag
    #[serde(default)]
    pub expected_returns: ExpectedReturns,
}

impl ScenarioParameters {
    /// Check every field before the day loop starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.days == 0 {
            return Err(SimulationError::InvalidConfig(
                "days must be a positive integer".to_string(),
            ));
        }

        for (name, value) in [
            ("pe_cash", self.pe_cash),
            ("pc_cash", self.pc_cash),
            ("pre_cash", self.pre_cash),
            ("cash_pool", self.cash_pool),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [("borrow_rate", self.borrow_rate), ("idle_rate", self.idle_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        for pool in PoolId::ALL {
            let value = self.expected_returns.for_pool(pool);
            if !value.is_finite() {
                return Err(SimulationError::InvalidConfig(format!(
                    "expected return for {} must be finite, got {}",
                    pool, value
                )));
            }
        }

        Ok(())
    }

    /// Opening cash per pool, in PoolId order.
    pub fn opening_pool_cash(&self) -> [(PoolId, f64); 3] {
        [
            (PoolId::PrivateEquity, self.pe_cash),
            (PoolId::PrivateCredit, self.pc_cash),
            (PoolId::PrivateRealEstate, self.pre_cash),
        ]
    }

    pub fn daily_borrow_rate(&self) -> f64 {
        daily_rate(self.borrow_rate)
    }

    pub fn daily_idle_rate(&self) -> f64 {
        daily_rate(self.idle_rate)
    }

    /// Daily expected-return rate for a pool.
    pub fn daily_expected_rate(&self, pool: PoolId) -> f64 {
        daily_rate(self.expected_returns.for_pool(pool))
    }
}
