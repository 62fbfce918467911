//! Scenario-level drag adjustments
//!
//! The internal-pool scenario carries a standing facility-sizing cost on the
//! cash pool. It is expressed as a trait so a caller can swap the sizing rule
//! without touching the engine.

use crate::core::daily_rate;
use crate::scenario::{ScenarioParameters, DEFAULT_CASH_POOL_NOTIONAL};
use std::fmt;

/// Daily cash-pool drag added at the end of each simulated day.
pub trait ScenarioAdjustment: Send + Sync + fmt::Debug {
    /// Drag (millions) to book on the cash pool for one day.
    fn daily_cash_pool_drag(&self, params: &ScenarioParameters) -> f64;
}

/// No scenario-level drag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdjustment;

impl ScenarioAdjustment for NoAdjustment {
    fn daily_cash_pool_drag(&self, _params: &ScenarioParameters) -> f64 {
        0.0
    }
}

/// Facility-sizing drag: `notional × (avg expected return − idle rate)`.
///
/// Only a positive spread produces drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacilitySizingDrag {
    /// Cash held in the facility (millions)
    pub notional: f64,
}

impl Default for FacilitySizingDrag {
    fn default() -> Self {
        Self {
            notional: DEFAULT_CASH_POOL_NOTIONAL,
        }
    }
}

impl ScenarioAdjustment for FacilitySizingDrag {
    fn daily_cash_pool_drag(&self, params: &ScenarioParameters) -> f64 {
        let spread = params.expected_returns.average() - params.idle_rate;
        if spread > 0.0 {
            self.notional * daily_rate(spread)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pool::ExpectedReturns;
    use crate::scenario::ScenarioKind;

    #[test]
    fn test_facility_drag_uses_fixed_notional() {
        let params = ScenarioParameters {
            cash_pool: 7.0,
            ..ScenarioKind::InternalPool.preset(1)
        };
        let drag = FacilitySizingDrag::default().daily_cash_pool_drag(&params);
        // avg(15, 10, 8) = 11; spread 6.75%
        let expected = 100.0 * (6.75 / 100.0 / 365.0);
        assert!((drag - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_drag_when_idle_rate_exceeds_returns() {
        let params = ScenarioParameters {
            idle_rate: 20.0,
            expected_returns: ExpectedReturns::default(),
            ..ScenarioKind::InternalPool.preset(1)
        };
        assert_eq!(FacilitySizingDrag::default().daily_cash_pool_drag(&params), 0.0);
    }

    #[test]
    fn test_custom_notional() {
        let params = ScenarioKind::InternalPool.preset(1);
        let half = FacilitySizingDrag { notional: 50.0 }.daily_cash_pool_drag(&params);
        let full = FacilitySizingDrag::default().daily_cash_pool_drag(&params);
        assert!((full - 2.0 * half).abs() < 1e-15);
    }
}
