//! Checkpoint - Save/Resume and Ledger Integrity
//!
//! Captures an orchestrator's carry so a run can be paused and resumed, and
//! provides the integrity checks used on finished ledgers.
//!
//! # Critical Invariants
//!
//! - **Determinism**: same parameters + same events → same ledger digest
//! - **Non-negativity**: pool cash, borrow and interest owed never below zero
//! - **Day indexing**: records are days 1..=N with no gaps
//! - **Config Matching**: a checkpoint only resumes under matching parameters

use crate::orchestrator::engine::{DailyRecord, DayCarry, Orchestrator, SimulationError};
use crate::models::pool::PoolId;
use crate::scenario::{ScenarioAdjustment, ScenarioKind, ScenarioParameters};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Paused run: everything needed to continue from the next day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCheckpoint {
    /// Last completed day
    pub day: usize,

    pub scenario: ScenarioKind,

    /// Carry handed to the next day
    pub carry: DayCarry,

    /// SHA256 hash of the parameters (for validation on resume)
    pub config_hash: String,

    /// Daily facility drag resolved from the run's scenario adjustment
    pub facility_drag: f64,
}

impl RunCheckpoint {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string(self).map_err(|e| {
            SimulationError::SerializationError(format!("Checkpoint serialization failed: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Checkpoint deserialization failed: {}", e))
        })
    }
}

impl Orchestrator {
    /// Capture the current carry.
    pub fn checkpoint(&self) -> Result<RunCheckpoint, SimulationError> {
        Ok(RunCheckpoint {
            day: self.current_day(),
            scenario: self.scenario(),
            carry: self.carry().clone(),
            config_hash: compute_config_hash(self.parameters())?,
            facility_drag: self.facility_drag(),
        })
    }

    /// Resume a run from a checkpoint.
    ///
    /// The resumed orchestrator's ledger starts at `checkpoint.day + 1` and
    /// keeps booking the facility drag recorded in the checkpoint.
    pub fn from_checkpoint(
        params: ScenarioParameters,
        checkpoint: RunCheckpoint,
    ) -> Result<Self, SimulationError> {
        let actual = compute_config_hash(&params)?;
        if actual != checkpoint.config_hash {
            return Err(SimulationError::ConfigMismatch {
                expected: checkpoint.config_hash,
                actual,
            });
        }
        if checkpoint.carry.counters.days_completed != checkpoint.day {
            return Err(SimulationError::StateValidationError(format!(
                "checkpoint day {} disagrees with carry day {}",
                checkpoint.day, checkpoint.carry.counters.days_completed
            )));
        }
        if !checkpoint.facility_drag.is_finite() || checkpoint.facility_drag < 0.0 {
            return Err(SimulationError::StateValidationError(format!(
                "checkpoint facility drag {} is not a finite non-negative amount",
                checkpoint.facility_drag
            )));
        }
        if let Some(pool) = missing_pool(checkpoint.carry.state.pools()) {
            return Err(SimulationError::StateValidationError(format!(
                "checkpoint state has no entry for pool {}",
                pool
            )));
        }
        Orchestrator::resume(
            params,
            checkpoint.scenario,
            checkpoint.facility_drag,
            checkpoint.carry,
        )
    }

    /// Resume a run that was started with an injected adjustment.
    ///
    /// Fails with `ConfigMismatch` when `adjustment` would book a different
    /// daily drag than the paused run did.
    pub fn from_checkpoint_with_adjustment(
        params: ScenarioParameters,
        checkpoint: RunCheckpoint,
        adjustment: &dyn ScenarioAdjustment,
    ) -> Result<Self, SimulationError> {
        let resolved = adjustment.daily_cash_pool_drag(&params);
        if resolved != checkpoint.facility_drag {
            return Err(SimulationError::ConfigMismatch {
                expected: format!("facility drag {}", checkpoint.facility_drag),
                actual: format!("facility drag {}", resolved),
            });
        }
        Orchestrator::from_checkpoint(params, checkpoint)
    }
}

fn missing_pool<V>(pools: &BTreeMap<PoolId, V>) -> Option<PoolId> {
    PoolId::ALL.into_iter().find(|id| !pools.contains_key(id))
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of any serializable value
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA256 digest of a daily ledger.
///
/// Two runs are byte-for-byte identical exactly when their digests match.
pub fn ledger_digest(records: &[DailyRecord]) -> Result<String, SimulationError> {
    compute_config_hash(&records)
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate a complete ledger
///
/// Checks:
/// - Exactly `expected_days` records, days 1..=N strictly increasing
/// - Every pool present in every record
/// - Every figure finite
/// - Pool cash, borrow and interest owed non-negative
pub fn validate_records(
    records: &[DailyRecord],
    expected_days: usize,
) -> Result<(), SimulationError> {
    if records.len() != expected_days {
        return Err(SimulationError::StateValidationError(format!(
            "expected {} daily records, found {}",
            expected_days,
            records.len()
        )));
    }

    for (idx, record) in records.iter().enumerate() {
        let expected_day = idx + 1;
        if record.day() != expected_day {
            return Err(SimulationError::StateValidationError(format!(
                "record {} has day {}, expected {}",
                idx,
                record.day(),
                expected_day
            )));
        }

        if let Some(pool) = missing_pool(record.pools()) {
            return Err(SimulationError::StateValidationError(format!(
                "day {}: no entry for pool {}",
                record.day(),
                pool
            )));
        }

        for (id, pool) in record.pools() {
            let figures = [
                pool.cash,
                pool.borrow,
                pool.interest_owed,
                pool.interest_paid,
                pool.interest_earned,
                pool.cash_drag,
                pool.borrow_drag,
            ];
            if figures.iter().any(|v| !v.is_finite()) {
                return Err(SimulationError::StateValidationError(format!(
                    "day {}: non-finite figure on pool {}",
                    record.day(),
                    id
                )));
            }
            if pool.cash < 0.0 || pool.borrow < 0.0 || pool.interest_owed < 0.0 {
                return Err(SimulationError::StateValidationError(format!(
                    "day {}: pool {} has negative balance (cash={}, borrow={}, interest_owed={})",
                    record.day(),
                    id,
                    pool.cash,
                    pool.borrow,
                    pool.interest_owed
                )));
            }
        }

        let cash_pool = record.cash_pool();
        if !cash_pool.cash.is_finite() || !record.totals().drag.is_finite() {
            return Err(SimulationError::StateValidationError(format!(
                "day {}: non-finite cash pool or drag figure",
                record.day()
            )));
        }
    }

    Ok(())
}
