//! Event logging for simulation replay and auditing.
//!
//! Every state change the engine makes is captured as an [`Event`]. The log
//! lets a consumer explain any figure in a daily record without re-running
//! the arithmetic.
//!
//! # Event Types
//!
//! Events follow the order of the day's processing steps:
//! - **InterestCredited**: previously scheduled idle interest lands in cash
//! - **CashFlowApplied**: capital call or distribution hits a pool
//! - **DeficitFunded**: cash pool funds a pool shortfall as borrow
//! - **BorrowInterestAccrued**: interest added to a pool's amount owed
//! - **DebtServiced**: waterfall payment (interest, then principal)
//! - **IdleInterestScheduled**: idle interest computed for the next day
//! - **CashDragAccrued** / **FacilityDragAccrued**: opportunity cost
//! - **DayClosed**: day totals
//!
//! # Example
//!
//! ```rust
//! use liquidity_simulator_core_rs::models::{Event, EventLog};
//! use liquidity_simulator_core_rs::PoolId;
//!
//! let mut log = EventLog::new();
//! log.log(Event::CashFlowApplied {
//!     day: 3,
//!     pool: PoolId::PrivateEquity,
//!     amount: -4.5,
//! });
//!
//! assert_eq!(log.events_on_day(3).len(), 1);
//! assert_eq!(log.events()[0].event_type(), "CashFlowApplied");
//! ```

use crate::models::pool::{AccountKey, PoolId};
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events carry the 1-based day on which they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Interest scheduled on the prior day credited to opening cash
    InterestCredited {
        day: usize,
        account: AccountKey,
        amount: f64,
    },

    /// External cash flow applied to a pool (negative = capital call)
    CashFlowApplied {
        day: usize,
        pool: PoolId,
        amount: f64,
    },

    /// Negative pool cash converted to borrow funded by the cash pool
    DeficitFunded {
        day: usize,
        pool: PoolId,
        amount: f64,
        cash_pool_balance: f64,
    },

    /// Interest accrued on outstanding borrow
    BorrowInterestAccrued {
        day: usize,
        pool: PoolId,
        borrow: f64,
        interest: f64,
    },

    /// Waterfall payment returned to the cash pool
    DebtServiced {
        day: usize,
        pool: PoolId,
        interest_paid: f64,
        principal_repaid: f64,
    },

    /// Idle interest earned today, credited on the next day
    IdleInterestScheduled {
        day: usize,
        account: AccountKey,
        amount: f64,
    },

    /// Opportunity cost of a pool's idle cash
    CashDragAccrued {
        day: usize,
        pool: PoolId,
        amount: f64,
    },

    /// Scenario-level facility drag booked on the cash pool
    FacilityDragAccrued { day: usize, amount: f64 },

    /// Day finished; totals match the day's record
    DayClosed {
        day: usize,
        borrowed: f64,
        repaid: f64,
        drag: f64,
    },
}

impl Event {
    /// Day on which this event occurred
    pub fn day(&self) -> usize {
        match self {
            Event::InterestCredited { day, .. } => *day,
            Event::CashFlowApplied { day, .. } => *day,
            Event::DeficitFunded { day, .. } => *day,
            Event::BorrowInterestAccrued { day, .. } => *day,
            Event::DebtServiced { day, .. } => *day,
            Event::IdleInterestScheduled { day, .. } => *day,
            Event::CashDragAccrued { day, .. } => *day,
            Event::FacilityDragAccrued { day, .. } => *day,
            Event::DayClosed { day, .. } => *day,
        }
    }

    /// Event type name (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::InterestCredited { .. } => "InterestCredited",
            Event::CashFlowApplied { .. } => "CashFlowApplied",
            Event::DeficitFunded { .. } => "DeficitFunded",
            Event::BorrowInterestAccrued { .. } => "BorrowInterestAccrued",
            Event::DebtServiced { .. } => "DebtServiced",
            Event::IdleInterestScheduled { .. } => "IdleInterestScheduled",
            Event::CashDragAccrued { .. } => "CashDragAccrued",
            Event::FacilityDragAccrued { .. } => "FacilityDragAccrued",
            Event::DayClosed { .. } => "DayClosed",
        }
    }

    /// Ledger account this event touches, if any
    pub fn account(&self) -> Option<AccountKey> {
        match self {
            Event::InterestCredited { account, .. } => Some(*account),
            Event::IdleInterestScheduled { account, .. } => Some(*account),
            Event::CashFlowApplied { pool, .. }
            | Event::DeficitFunded { pool, .. }
            | Event::BorrowInterestAccrued { pool, .. }
            | Event::DebtServiced { pool, .. }
            | Event::CashDragAccrued { pool, .. } => Some((*pool).into()),
            Event::FacilityDragAccrued { .. } => Some(AccountKey::CashPool),
            Event::DayClosed { .. } => None,
        }
    }
}

/// Append-only, day-ordered event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Append every event from a finished day
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All events for a given day
    pub fn events_on_day(&self, day: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.day() == day).collect()
    }

    /// All events of a given type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// All events touching an account
    pub fn events_for_account(&self, account: AccountKey) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.account() == Some(account))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let mut log = EventLog::new();
        log.log(Event::CashFlowApplied {
            day: 1,
            pool: PoolId::PrivateCredit,
            amount: 2.0,
        });
        log.log(Event::FacilityDragAccrued { day: 1, amount: 0.1 });
        log.log(Event::DayClosed {
            day: 2,
            borrowed: 0.0,
            repaid: 0.0,
            drag: 0.0,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_on_day(1).len(), 2);
        assert_eq!(log.events_of_type("DayClosed").len(), 1);
        assert_eq!(log.events_for_account(AccountKey::CashPool).len(), 1);
        assert_eq!(log.events_for_account(AccountKey::PrivateCredit).len(), 1);
    }

    #[test]
    fn test_serialized_tag_matches_event_type() {
        let event = Event::DebtServiced {
            day: 4,
            pool: PoolId::PrivateEquity,
            interest_paid: 0.01,
            principal_repaid: 1.0,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.event_type());
        assert_eq!(value["pool"], "PE");
    }
}
