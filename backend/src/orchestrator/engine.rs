//! Orchestrator Engine
//!
//! Day-by-day liquidity simulation for the investment pools and the central
//! cash pool.
//!
//! # Architecture
//!
//! The engine is a pure transition function, [`advance_day`], threaded over
//! an explicit [`DayCarry`]:
//!
//! ```text
//! For each day d in 1..=days:
//!  1. Credit interest scheduled on day d-1; reset today's interest_earned
//!  2. Apply today's cash flows to pool cash
//!  3. Convert negative pool cash into borrow funded by the cash pool
//!  4. Accrue borrow interest (interest_owed, borrow_drag, day drag)
//!  5. Debt-service waterfall: interest first, then principal
//!  6. Schedule idle interest on positive pool cash for day d+1
//!  7. Accrue cash drag where expected return > idle rate
//!  8. Accrue informational interest receivable on the cash pool
//!  9. Schedule cash-pool idle interest for day d+1
//! 10. Book the scenario-level facility drag (internal pool only)
//! 11. Snapshot everything into an immutable DailyRecord
//! ```
//!
//! # Example
//!
//! ```rust
//! use liquidity_simulator_core_rs::arrivals::DayEvents;
//! use liquidity_simulator_core_rs::orchestrator::run;
//! use liquidity_simulator_core_rs::scenario::{ScenarioKind, ScenarioParameters};
//! use liquidity_simulator_core_rs::PoolId;
//!
//! let params = ScenarioParameters {
//!     pe_cash: 0.0,
//!     pc_cash: 0.0,
//!     pre_cash: 0.0,
//!     cash_pool: 50.0,
//!     borrow_rate: 4.25,
//!     idle_rate: 4.25,
//!     days: 1,
//!     expected_returns: Default::default(),
//! };
//! let events = vec![DayEvents::new().with(PoolId::PrivateEquity, -5.0)];
//!
//! let output = run(&params, &events, ScenarioKind::PreFunded).unwrap();
//! let day1 = &output.records[0];
//! assert_eq!(day1.pool(PoolId::PrivateEquity).borrow, 5.0);
//! assert_eq!(day1.cash_pool().cash, 45.0);
//! assert_eq!(output.summary.total_borrowed, 5.0);
//! ```

use crate::arrivals::DayEvents;
use crate::models::cash_pool::CashPoolState;
use crate::models::event::{Event, EventLog};
use crate::models::pool::{AccountKey, PoolId, PoolState};
use crate::models::state::SimulationState;
use crate::orchestrator::summary::SimulationSummary;
use crate::scenario::{ScenarioAdjustment, ScenarioKind, ScenarioParameters};
use crate::settlement::{service_debt, DeferredInterest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types
///
/// All configuration problems are caught before the first day runs; inside
/// the day loop every branch is plain arithmetic and cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Non-finite cash-flow amount in the event sequence
    #[error("Invalid event on day {day} for {pool}: amount {amount} is not finite")]
    InvalidEvent { day: usize, pool: PoolId, amount: f64 },

    /// More event days supplied than days simulated
    #[error("Event sequence has {len} days but the horizon is {days} days")]
    EventSequenceTooLong { len: usize, days: usize },

    /// `step` called after the last day
    #[error("Simulation horizon of {days} days already completed")]
    HorizonComplete { days: usize },

    /// Checkpoint parameters do not match the parameters supplied on restore
    #[error("Config mismatch: checkpoint hash {expected}, supplied parameters hash {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Ledger integrity check failed
    #[error("State validation error: {0}")]
    StateValidationError(String),
}

// ============================================================================
// Records
// ============================================================================

/// Day-level totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    /// Deficits converted to borrow today
    pub borrowed: f64,
    /// Interest plus principal returned to the cash pool today
    pub repaid: f64,
    /// Interest accrued today: borrow interest per pool, receivable accrual
    /// for the cash pool
    pub interest: BTreeMap<AccountKey, f64>,
    /// Borrow interest + cash drag + facility drag booked today
    pub drag: f64,
}

/// Immutable snapshot of one simulated day.
///
/// Holds value copies of every balance; nothing is shared with the live
/// state or with other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    day: usize,
    pools: BTreeMap<PoolId, PoolState>,
    cash_pool: CashPoolState,
    activity: BTreeMap<AccountKey, f64>,
    totals: DayTotals,
}

impl DailyRecord {
    /// 1-based day index
    pub fn day(&self) -> usize {
        self.day
    }

    /// Closing state of a pool
    ///
    /// Engine-built records hold every pool; a deserialized record should pass
    /// [`validate_records`](crate::orchestrator::validate_records) first, since
    /// a missing pool panics here.
    pub fn pool(&self, id: PoolId) -> &PoolState {
        &self.pools[&id]
    }

    pub fn pools(&self) -> &BTreeMap<PoolId, PoolState> {
        &self.pools
    }

    /// Closing idle cash across pools (excludes the cash pool).
    pub fn total_pool_cash(&self) -> f64 {
        self.pools.values().map(|p| p.cash).sum()
    }

    /// Closing borrow across pools.
    pub fn total_borrow(&self) -> f64 {
        self.pools.values().map(|p| p.borrow).sum()
    }

    /// Closing state of the cash pool
    pub fn cash_pool(&self) -> &CashPoolState {
        &self.cash_pool
    }

    /// Net cash-pool-facing flow for an account today.
    ///
    /// Pools: the raw external cash flow. Cash pool: repayments received minus
    /// deficits funded.
    pub fn activity(&self, key: AccountKey) -> f64 {
        self.activity.get(&key).copied().unwrap_or(0.0)
    }

    pub fn activity_ledger(&self) -> &BTreeMap<AccountKey, f64> {
        &self.activity
    }

    pub fn totals(&self) -> &DayTotals {
        &self.totals
    }
}

// ============================================================================
// Carry
// ============================================================================

/// Run-level counters accumulated across days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunCounters {
    pub total_borrowed: f64,
    pub total_repaid: f64,
    pub total_drag: f64,
    /// Cumulative idle interest earned by the cash pool
    pub cash_pool_interest_earned: f64,
    /// Last completed day (0 before the first day)
    pub days_completed: usize,
}

/// Everything one day hands to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCarry {
    pub state: SimulationState,
    /// Idle interest earned yesterday, credited at the start of today
    pub scheduled_interest: DeferredInterest,
    pub counters: RunCounters,
}

impl DayCarry {
    /// Opening carry from scenario parameters.
    pub fn opening(params: &ScenarioParameters) -> Self {
        Self {
            state: SimulationState::new(&params.opening_pool_cash(), params.cash_pool),
            scheduled_interest: DeferredInterest::new(),
            counters: RunCounters::default(),
        }
    }
}

/// Fixed per-run inputs to the transition function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineContext {
    pub params: ScenarioParameters,
    pub kind: ScenarioKind,
    pub daily_borrow_rate: f64,
    pub daily_idle_rate: f64,
    /// Scenario-level cash-pool drag booked every day
    pub facility_drag: f64,
}

impl EngineContext {
    pub fn new(
        params: ScenarioParameters,
        kind: ScenarioKind,
        adjustment: &dyn ScenarioAdjustment,
    ) -> Self {
        Self::with_facility_drag(params, kind, adjustment.daily_cash_pool_drag(&params))
    }

    /// Context with an already-resolved daily facility drag.
    pub fn with_facility_drag(params: ScenarioParameters, kind: ScenarioKind, facility_drag: f64) -> Self {
        Self {
            params,
            kind,
            daily_borrow_rate: params.daily_borrow_rate(),
            daily_idle_rate: params.daily_idle_rate(),
            facility_drag,
        }
    }
}

/// Result of one day's transition.
#[derive(Debug, Clone)]
pub struct DayOutcome {
    pub carry: DayCarry,
    pub record: DailyRecord,
    pub events: Vec<Event>,
}

fn zeroed_ledger() -> BTreeMap<AccountKey, f64> {
    AccountKey::ALL.iter().map(|key| (*key, 0.0)).collect()
}

// ============================================================================
// Transition
// ============================================================================

/// Advance the simulation by one day.
///
/// Pure: the previous carry is left untouched and the new carry, the day's
/// record and the day's events are returned.
pub fn advance_day(
    prev: &DayCarry,
    day: usize,
    flows: &DayEvents,
    ctx: &EngineContext,
) -> DayOutcome {
    let mut carry = prev.clone();
    let mut events = Vec::new();
    let mut activity = zeroed_ledger();
    let mut interest = zeroed_ledger();
    let mut borrowed = 0.0;
    let mut repaid = 0.0;
    let mut drag = 0.0;

    let DayCarry {
        state,
        scheduled_interest,
        counters,
    } = &mut carry;

    // 1. Yesterday's idle interest becomes spendable today
    events.extend(scheduled_interest.apply_all(state, day));
    for pool in PoolId::ALL {
        state.pool_mut(pool).interest_earned = 0.0;
    }
    state.cash_pool_mut().interest_earned = 0.0;

    // 2. External cash flows
    for pool in PoolId::ALL {
        let amount = flows.amount(pool);
        state.pool_mut(pool).apply_cash_flow(amount);
        activity.insert(pool.into(), amount);
        if amount != 0.0 {
            events.push(Event::CashFlowApplied { day, pool, amount });
        }
    }

    // 3. Deficits become borrow
    for pool in PoolId::ALL {
        let deficit = state.pool_mut(pool).convert_deficit();
        if deficit > 0.0 {
            state.cash_pool_mut().fund(deficit);
            *activity.entry(AccountKey::CashPool).or_insert(0.0) -= deficit;
            borrowed += deficit;
            events.push(Event::DeficitFunded {
                day,
                pool,
                amount: deficit,
                cash_pool_balance: state.cash_pool().cash,
            });
        }
    }

    // 4. Borrow interest
    for pool in PoolId::ALL {
        let accrued = state.pool_mut(pool).accrue_borrow_interest(ctx.daily_borrow_rate);
        if accrued > 0.0 {
            drag += accrued;
            interest.insert(pool.into(), accrued);
            events.push(Event::BorrowInterestAccrued {
                day,
                pool,
                borrow: state.pool(pool).borrow,
                interest: accrued,
            });
        }
    }

    // 5. Waterfall
    for pool in PoolId::ALL {
        if let Some(payment) = service_debt(state.pool_mut(pool)) {
            let paid = payment.total();
            state.cash_pool_mut().receive(paid);
            *activity.entry(AccountKey::CashPool).or_insert(0.0) += paid;
            repaid += paid;
            events.push(Event::DebtServiced {
                day,
                pool,
                interest_paid: payment.interest_paid,
                principal_repaid: payment.principal_repaid,
            });
        }
    }

    // 6. Pool idle interest, credited tomorrow
    for pool in PoolId::ALL {
        let cash = state.pool(pool).cash;
        if cash > 0.0 {
            let earned = cash * ctx.daily_idle_rate;
            state.pool_mut(pool).interest_earned = earned;
            scheduled_interest.accumulate(pool.into(), earned);
            if earned > 0.0 {
                events.push(Event::IdleInterestScheduled {
                    day,
                    account: pool.into(),
                    amount: earned,
                });
            }
        }
    }

    // 7. Cash drag
    for pool in PoolId::ALL {
        let cash = state.pool(pool).cash;
        let expected = ctx.params.daily_expected_rate(pool);
        if cash > 0.0 && expected > ctx.daily_idle_rate {
            let cost = cash * (expected - ctx.daily_idle_rate);
            state.pool_mut(pool).cash_drag += cost;
            drag += cost;
            events.push(Event::CashDragAccrued {
                day,
                pool,
                amount: cost,
            });
        }
    }

    // 8. Informational receivable
    let receivable = state.total_borrow() * ctx.daily_borrow_rate;
    state.cash_pool_mut().interest_receivable += receivable;
    interest.insert(AccountKey::CashPool, receivable);

    // 9. Cash pool idle interest (or the cost of a drawn external line)
    let cash_pool_cash = state.cash_pool().cash;
    if cash_pool_cash > 0.0 {
        let earned = cash_pool_cash * ctx.daily_idle_rate;
        state.cash_pool_mut().interest_earned = earned;
        scheduled_interest.accumulate(AccountKey::CashPool, earned);
        counters.cash_pool_interest_earned += earned;
        if earned > 0.0 {
            events.push(Event::IdleInterestScheduled {
                day,
                account: AccountKey::CashPool,
                amount: earned,
            });
        }
    } else if cash_pool_cash < 0.0 && ctx.kind.prices_negative_cash_pool() {
        state.cash_pool_mut().borrow_drag += -cash_pool_cash * ctx.daily_borrow_rate;
    }

    // 10. Facility drag
    if ctx.facility_drag > 0.0 {
        state.cash_pool_mut().cash_drag += ctx.facility_drag;
        drag += ctx.facility_drag;
        events.push(Event::FacilityDragAccrued {
            day,
            amount: ctx.facility_drag,
        });
    }

    counters.total_borrowed += borrowed;
    counters.total_repaid += repaid;
    counters.total_drag += drag;
    counters.days_completed = day;

    events.push(Event::DayClosed {
        day,
        borrowed,
        repaid,
        drag,
    });
    trace!(day, borrowed, repaid, drag, "day closed");

    // 11. Snapshot
    let record = DailyRecord {
        day,
        pools: state.pools().clone(),
        cash_pool: state.cash_pool().clone(),
        activity,
        totals: DayTotals {
            borrowed,
            repaid,
            interest,
            drag,
        },
    };

    DayOutcome {
        carry,
        record,
        events,
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Finished run: the daily ledger, its summary and the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub records: Vec<DailyRecord>,
    pub summary: SimulationSummary,
    #[serde(default)]
    pub event_log: EventLog,
}

/// Stateful driver around [`advance_day`].
///
/// Owns one scenario's carry; independent orchestrators share nothing and
/// can run on separate threads.
pub struct Orchestrator {
    ctx: EngineContext,
    carry: DayCarry,
    records: Vec<DailyRecord>,
    event_log: EventLog,
}

impl Orchestrator {
    /// Create an orchestrator using the scenario kind's own adjustment.
    pub fn new(params: ScenarioParameters, kind: ScenarioKind) -> Result<Self, SimulationError> {
        Self::with_adjustment(params, kind, kind.adjustment().as_ref())
    }

    /// Create an orchestrator with an injected scenario adjustment.
    pub fn with_adjustment(
        params: ScenarioParameters,
        kind: ScenarioKind,
        adjustment: &dyn ScenarioAdjustment,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self {
            ctx: EngineContext::new(params, kind, adjustment),
            carry: DayCarry::opening(&params),
            records: Vec::new(),
            event_log: EventLog::new(),
        })
    }

    /// Resume from a previously captured carry.
    ///
    /// `facility_drag` is the daily drag the paused run was booking, so an
    /// injected adjustment carries over unchanged.
    pub(crate) fn resume(
        params: ScenarioParameters,
        kind: ScenarioKind,
        facility_drag: f64,
        carry: DayCarry,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        if carry.counters.days_completed > params.days {
            return Err(SimulationError::InvalidConfig(format!(
                "checkpoint is at day {} but the horizon is {} days",
                carry.counters.days_completed, params.days
            )));
        }
        Ok(Self {
            ctx: EngineContext::with_facility_drag(params, kind, facility_drag),
            carry,
            records: Vec::new(),
            event_log: EventLog::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Last completed day (0 before the first step)
    pub fn current_day(&self) -> usize {
        self.carry.counters.days_completed
    }

    pub fn is_complete(&self) -> bool {
        self.current_day() >= self.ctx.params.days
    }

    pub fn parameters(&self) -> &ScenarioParameters {
        &self.ctx.params
    }

    pub fn scenario(&self) -> ScenarioKind {
        self.ctx.kind
    }

    /// Daily scenario-level drag booked on the cash pool
    pub fn facility_drag(&self) -> f64 {
        self.ctx.facility_drag
    }

    pub fn state(&self) -> &SimulationState {
        &self.carry.state
    }

    pub fn carry(&self) -> &DayCarry {
        &self.carry
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Summary of everything simulated so far.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_carry(&self.carry)
    }

    // ========================================================================
    // Day Loop
    // ========================================================================

    /// Simulate the next day.
    pub fn step(&mut self, flows: &DayEvents) -> Result<&DailyRecord, SimulationError> {
        if self.is_complete() {
            return Err(SimulationError::HorizonComplete {
                days: self.ctx.params.days,
            });
        }

        let day = self.current_day() + 1;
        validate_day_events(day, flows)?;

        let DayOutcome {
            carry,
            record,
            events,
        } = advance_day(&self.carry, day, flows, &self.ctx);

        self.carry = carry;
        self.event_log.extend(events);
        self.records.push(record);

        Ok(&self.records[self.records.len() - 1])
    }

    /// Run every remaining day. Days without an entry in `events` are quiet.
    pub fn run_to_completion(
        mut self,
        events: &[DayEvents],
    ) -> Result<SimulationOutput, SimulationError> {
        let quiet = DayEvents::new();
        while !self.is_complete() {
            let idx = self.current_day();
            let flows = events.get(idx).unwrap_or(&quiet);
            self.step(flows)?;
        }
        Ok(self.into_output())
    }

    /// Consume the orchestrator into its output.
    pub fn into_output(self) -> SimulationOutput {
        let summary = SimulationSummary::from_carry(&self.carry);
        SimulationOutput {
            records: self.records,
            summary,
            event_log: self.event_log,
        }
    }
}

fn validate_day_events(day: usize, flows: &DayEvents) -> Result<(), SimulationError> {
    for (pool, amount) in flows.entries() {
        if !amount.is_finite() {
            return Err(SimulationError::InvalidEvent { day, pool, amount });
        }
    }
    Ok(())
}

/// Check an event sequence against a horizon before any day runs.
pub fn validate_events(events: &[DayEvents], days: usize) -> Result<(), SimulationError> {
    if events.len() > days {
        return Err(SimulationError::EventSequenceTooLong {
            len: events.len(),
            days,
        });
    }
    for (idx, flows) in events.iter().enumerate() {
        validate_day_events(idx + 1, flows)?;
    }
    Ok(())
}

/// Run a full scenario.
///
/// `events` may be shorter than `params.days`; missing days are quiet.
pub fn run(
    params: &ScenarioParameters,
    events: &[DayEvents],
    kind: ScenarioKind,
) -> Result<SimulationOutput, SimulationError> {
    run_with_adjustment(params, events, kind, kind.adjustment().as_ref())
}

/// Run a full scenario with an injected scenario adjustment.
pub fn run_with_adjustment(
    params: &ScenarioParameters,
    events: &[DayEvents],
    kind: ScenarioKind,
    adjustment: &dyn ScenarioAdjustment,
) -> Result<SimulationOutput, SimulationError> {
    params.validate()?;
    validate_events(events, params.days)?;

    debug!(scenario = %kind, days = params.days, event_days = events.len(), "starting run");
    let output = Orchestrator::with_adjustment(*params, kind, adjustment)?.run_to_completion(events)?;
    debug!(
        scenario = %kind,
        total_borrowed = output.summary.total_borrowed,
        total_repaid = output.summary.total_repaid,
        total_drag = output.summary.total_drag,
        "run complete"
    );

    Ok(output)
}
