//! Annual-to-daily rate conversion
//!
//! All rates in configuration are annual percentages (e.g. 4.25 means 4.25%).
//! The engine works with daily simple rates: annual / 100 / 365. There is no
//! compounding-frequency adjustment beyond that.

/// Day-count basis for converting annual rates.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Convert an annual percentage rate into a daily simple rate.
///
/// # Example
/// ```
/// use liquidity_simulator_core_rs::core::daily_rate;
///
/// let r = daily_rate(4.25);
/// assert!((r - 0.0425 / 365.0).abs() < 1e-15);
/// ```
pub fn daily_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / DAYS_PER_YEAR
}
