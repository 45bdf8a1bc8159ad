//! The VM power-state machine.
//!
//! Timed transitions resolve lazily: every operation first settles any
//! pending completion against the injected clock, so no background timer is
//! needed and a process restart never loses or duplicates a transition.

use chrono::{DateTime, Duration, Utc};

use crate::models::{CommandOutcome, PowerState, TransitionEvent, VmRecord, VmStatus};
use crate::rng;
use crate::store::StateStore;

/// Boot delay range in seconds, drawn per transition.
const START_DELAY_SECS: (f64, f64) = (8.0, 15.0);
/// Deallocation delay range in seconds.
const STOP_DELAY_SECS: (f64, f64) = (5.0, 12.0);

pub struct ComputeSimulator {
    store: StateStore,
}

impl ComputeSimulator {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn into_store(self) -> StateStore {
        self.store
    }

    /// Start a deallocated VM. Any other state ignores the command and
    /// leaves the record untouched.
    pub fn request_start(&mut self, identity: &str, now: DateTime<Utc>) -> CommandOutcome {
        let seed = rng::seed_for(identity);
        let record = self.store.record(identity, now);
        settle(record, now);

        match record.current_state {
            PowerState::Deallocated => {
                let eta = schedule(record, seed, now, START_DELAY_SECS);
                transition(record, now, PowerState::Starting);
                record.pending_completion_at = Some(eta);
                log::debug!("{}: start accepted, running at {}", identity, eta);
                CommandOutcome::Accepted { pending_eta: eta }
            }
            current => CommandOutcome::Ignored { current },
        }
    }

    /// Stop (deallocate) a running VM. Any other state ignores the command.
    pub fn request_stop(&mut self, identity: &str, now: DateTime<Utc>) -> CommandOutcome {
        let seed = rng::seed_for(identity);
        let record = self.store.record(identity, now);
        settle(record, now);

        match record.current_state {
            PowerState::Running => {
                let eta = schedule(record, seed, now, STOP_DELAY_SECS);
                transition(record, now, PowerState::Deallocating);
                record.pending_completion_at = Some(eta);
                log::debug!("{}: stop accepted, deallocated at {}", identity, eta);
                CommandOutcome::Accepted { pending_eta: eta }
            }
            current => CommandOutcome::Ignored { current },
        }
    }

    /// Current state after settling pending transitions.
    pub fn get_state(&mut self, identity: &str, now: DateTime<Utc>) -> VmStatus {
        let record = self.store.record(identity, now);
        settle(record, now);
        VmStatus {
            state: record.current_state,
            state_entered_at: record.state_entered_at,
            elapsed_seconds: (now - record.state_entered_at).num_seconds(),
            pending_eta: record.pending_completion_at,
            last_start_at: record.last_start_at,
            snooze_until: record.snooze_until,
        }
    }

    /// Settled snapshot of the event history.
    pub fn get_history(&mut self, identity: &str, now: DateTime<Utc>) -> Vec<TransitionEvent> {
        let record = self.store.record(identity, now);
        settle(record, now);
        record.event_history.clone()
    }

    /// Settled read-only view of the full record, for collaborators that
    /// walk the history directly (uptime accounting).
    pub fn record(&mut self, identity: &str, now: DateTime<Utc>) -> &VmRecord {
        let record = self.store.record(identity, now);
        settle(record, now);
        record
    }

    /// Set or clear the advisory snooze deadline. Stored and exposed only;
    /// nothing in the simulator acts on it.
    pub fn set_snooze(
        &mut self,
        identity: &str,
        now: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) {
        let record = self.store.record(identity, now);
        settle(record, now);
        record.snooze_until = until;
    }
}

/// Complete a due pending transition. The event is stamped with the
/// scheduled completion instant rather than the observation time, so the
/// history does not depend on when the next poll happens to arrive.
fn settle(record: &mut VmRecord, now: DateTime<Utc>) {
    let Some(eta) = record.pending_completion_at else {
        return;
    };
    if now < eta {
        return;
    }

    match record.current_state {
        PowerState::Starting => {
            record.event_history.push(TransitionEvent {
                at: eta,
                from: PowerState::Starting,
                to: PowerState::Running,
            });
            record.current_state = PowerState::Running;
            record.state_entered_at = eta;
            record.last_start_at = Some(eta);
        }
        PowerState::Deallocating => {
            record.event_history.push(TransitionEvent {
                at: eta,
                from: PowerState::Deallocating,
                to: PowerState::Deallocated,
            });
            record.current_state = PowerState::Deallocated;
            record.state_entered_at = eta;
        }
        // A pending time on a stable state violates the record invariant;
        // drop it so the record degrades to a consistent shape.
        _ => {}
    }
    record.pending_completion_at = None;
}

fn schedule(
    record: &VmRecord,
    seed: u64,
    now: DateTime<Utc>,
    range: (f64, f64),
) -> DateTime<Utc> {
    // Cursor is the history length at draw time, so replaying the same
    // command sequence reproduces the same delays.
    let cursor = record.event_history.len() as u64;
    let delay = rng::uniform(seed, cursor, range.0, range.1);
    now + Duration::milliseconds((delay * 1000.0).round() as i64)
}

fn transition(record: &mut VmRecord, at: DateTime<Utc>, to: PowerState) {
    record.event_history.push(TransitionEvent {
        at,
        from: record.current_state,
        to,
    });
    record.current_state = to;
    record.state_entered_at = at;
}
