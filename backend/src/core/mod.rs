//! Core primitives shared by the engine: rate conversion and day counting.

pub mod rates;

pub use rates::{daily_rate, DAYS_PER_YEAR};
