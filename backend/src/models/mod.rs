//! Domain models for the liquidity simulator

pub mod cash_pool;
pub mod event;
pub mod pool;
pub mod state;

// Re-exports
pub use cash_pool::CashPoolState;
pub use event::{Event, EventLog};
pub use pool::{AccountKey, ExpectedReturns, PoolId, PoolState};
pub use state::SimulationState;
