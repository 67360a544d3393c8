//! Per-contract imbalance windows and forced-hedge timing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};

/// Errors raised by the scheduler.
///
/// Both are programmer-error class failures surfaced synchronously to the
/// caller; every other path is total.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Negative timeout passed at construction.
    #[error("invalid hedge timeout: {0} ms, must be non-negative")]
    Configuration(i64),
    /// Empty contract identifier passed to an operation.
    #[error("contract identifier must not be empty")]
    InvalidContract,
}

/// A contract whose legs are mismatched, awaiting either a natural fill of
/// the complementary side or a forced hedge.
#[derive(Debug, Clone, Serialize)]
pub struct PendingImbalance {
    pub contract_id: String,
    /// When the imbalance was first observed. Repeated sightings keep this
    /// timestamp, so the window measures imbalance age.
    pub noted_at: DateTime<Utc>,
}

/// Tracks how long each contract has been one-sided and reports when the
/// configured window has elapsed.
///
/// Strategies call [`note_imbalance`](Self::note_imbalance) on every
/// detected fill mismatch, poll [`due`](Self::due) each tick, and
/// [`clear`](Self::clear) once the corrective hedge is confirmed filled.
/// Clearing is the caller's job: the scheduler never expires entries on its
/// own, and an uncleared contract stays due on every subsequent tick.
pub struct HedgeScheduler {
    hedge_timeout_ms: i64,
    pending: HashMap<String, PendingImbalance>,
    clock: Box<dyn Clock>,
}

impl HedgeScheduler {
    /// Create a scheduler on the system clock.
    pub fn new(hedge_timeout_ms: i64) -> Result<Self, SchedulerError> {
        Self::with_clock(hedge_timeout_ms, Box::new(SystemClock))
    }

    /// Create a scheduler on an injected clock (paper trading, tests).
    pub fn with_clock(
        hedge_timeout_ms: i64,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SchedulerError> {
        if hedge_timeout_ms < 0 {
            return Err(SchedulerError::Configuration(hedge_timeout_ms));
        }

        Ok(Self {
            hedge_timeout_ms,
            pending: HashMap::new(),
            clock,
        })
    }

    /// Record that a contract's legs are mismatched.
    ///
    /// The first call opens the hedge window; repeated calls while the
    /// imbalance is unresolved are no-ops and keep the original timestamp.
    pub fn note_imbalance(&mut self, contract_id: &str) -> Result<(), SchedulerError> {
        validate_contract_id(contract_id)?;

        if self.pending.contains_key(contract_id) {
            // Already pending, keep the original timestamp.
            return Ok(());
        }

        let noted_at = self.clock.now();
        debug!(
            contract_id = %contract_id,
            noted_at = %noted_at,
            timeout_ms = self.hedge_timeout_ms,
            "One-sided exposure noted, hedge window opened"
        );

        self.pending.insert(
            contract_id.to_string(),
            PendingImbalance {
                contract_id: contract_id.to_string(),
                noted_at,
            },
        );

        Ok(())
    }

    /// Whether a contract's imbalance has outlived the hedge window.
    ///
    /// `false` when nothing is pending for the contract. The boundary is
    /// inclusive: an imbalance exactly as old as the timeout is due.
    /// Querying never mutates state, so this is safe to call on every
    /// strategy tick.
    pub fn due(&self, contract_id: &str) -> Result<bool, SchedulerError> {
        validate_contract_id(contract_id)?;

        let pending = match self.pending.get(contract_id) {
            Some(p) => p,
            None => return Ok(false),
        };

        let age_ms = (self.clock.now() - pending.noted_at).num_milliseconds();
        Ok(age_ms >= self.hedge_timeout_ms)
    }

    /// Drop a contract's pending record, returning it if one existed.
    ///
    /// Call after the corrective hedge is confirmed filled; a later
    /// `note_imbalance` then opens a fresh window.
    pub fn clear(
        &mut self,
        contract_id: &str,
    ) -> Result<Option<PendingImbalance>, SchedulerError> {
        validate_contract_id(contract_id)?;

        let cleared = self.pending.remove(contract_id);

        match &cleared {
            Some(pending) => {
                let age_ms = (self.clock.now() - pending.noted_at).num_milliseconds();
                info!(
                    contract_id = %contract_id,
                    age_ms,
                    "Cleared pending imbalance"
                );
            }
            None => {
                debug!(contract_id = %contract_id, "Nothing pending to clear");
            }
        }

        Ok(cleared)
    }

    /// All pending contracts whose window has elapsed.
    pub fn due_contracts(&self) -> Vec<String> {
        let now = self.clock.now();

        self.pending
            .values()
            .filter(|p| (now - p.noted_at).num_milliseconds() >= self.hedge_timeout_ms)
            .map(|p| p.contract_id.clone())
            .collect()
    }

    /// Get the pending record for a contract.
    pub fn get_pending(&self, contract_id: &str) -> Option<&PendingImbalance> {
        self.pending.get(contract_id)
    }

    /// Number of contracts with an outstanding imbalance.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The configured window in milliseconds.
    pub fn hedge_timeout_ms(&self) -> i64 {
        self.hedge_timeout_ms
    }

    /// Log a summary of outstanding imbalances (call periodically for monitoring).
    pub fn log_pending_summary(&self) {
        if self.pending.is_empty() {
            return;
        }

        let due = self.due_contracts();
        info!(
            pending_count = self.pending.len(),
            due_count = due.len(),
            timeout_ms = self.hedge_timeout_ms,
            "Hedge window summary"
        );
    }
}

fn validate_contract_id(contract_id: &str) -> Result<(), SchedulerError> {
    if contract_id.is_empty() {
        return Err(SchedulerError::InvalidContract);
    }
    Ok(())
}
