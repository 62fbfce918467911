//! Settlement Module
//!
//! Cash movements between pools and the central cash pool that happen inside
//! a simulated day:
//! - Debt-service waterfall (interest first, then principal)
//! - Deferred idle-interest crediting (earned on day N, spendable on day N+1)
//!
//! # Critical Invariants
//!
//! 1. **Waterfall order**: outstanding interest is always paid before principal
//! 2. **Cash cap**: a pool never pays more than the cash it holds
//! 3. **One-day lag**: idle interest never lands in the same day's closing cash
//!
//! # Example
//!
//! ```rust
//! use liquidity_simulator_core_rs::PoolState;
//! use liquidity_simulator_core_rs::settlement::service_debt;
//!
//! let mut pool = PoolState {
//!     cash: 3.0,
//!     borrow: 5.0,
//!     interest_owed: 0.5,
//!     ..PoolState::default()
//! };
//!
//! let payment = service_debt(&mut pool).unwrap();
//! assert_eq!(payment.interest_paid, 0.5);
//! assert_eq!(payment.principal_repaid, 2.5);
//! assert_eq!(pool.cash, 0.0);
//! assert_eq!(pool.borrow, 2.5);
//! ```

pub mod deferred;
pub mod waterfall;

pub use deferred::DeferredInterest;
pub use waterfall::{service_debt, DebtServicePayment};
