use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Power states mirror the Azure VM lifecycle. `Deallocated` and `Running`
/// are stable; `Starting` and `Deallocating` carry a pending completion time.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub enum PowerState {
    Deallocated,
    Starting,
    Running,
    Deallocating,
}

impl PowerState {
    pub fn is_transient(self) -> bool {
        matches!(self, PowerState::Starting | PowerState::Deallocating)
    }

    /// Friendly label for display.
    pub fn label(self) -> &'static str {
        match self {
            PowerState::Deallocated => "Stopped",
            PowerState::Starting => "Starting...",
            PowerState::Running => "Running",
            PowerState::Deallocating => "Stopping...",
        }
    }

    /// Azure-style state code, e.g. "PowerState/running".
    pub fn azure_code(self) -> &'static str {
        match self {
            PowerState::Deallocated => "PowerState/deallocated",
            PowerState::Starting => "PowerState/starting",
            PowerState::Running => "PowerState/running",
            PowerState::Deallocating => "PowerState/deallocating",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerState::Deallocated => "Deallocated",
            PowerState::Starting => "Starting",
            PowerState::Running => "Running",
            PowerState::Deallocating => "Deallocating",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct TransitionEvent {
    #[serde(rename = "timestamp")]
    pub at: DateTime<Utc>,
    #[serde(rename = "from_state")]
    pub from: PowerState,
    #[serde(rename = "to_state")]
    pub to: PowerState,
}

/// Per-VM simulation record. Persisted; the RNG seed is derived from the
/// identity and never stored.
///
/// Invariant: `pending_completion_at` is `Some` iff `current_state` is
/// transient. `event_history` is append-only and non-decreasing in time.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VmRecord {
    pub current_state: PowerState,
    pub state_entered_at: DateTime<Utc>,
    #[serde(default)]
    pub pending_completion_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_history: Vec<TransitionEvent>,
}

impl VmRecord {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            current_state: PowerState::Deallocated,
            state_entered_at: created_at,
            pending_completion_at: None,
            last_start_at: None,
            snooze_until: None,
            event_history: Vec::new(),
        }
    }
}

/// One synthetic data point. Recomputed on demand, never persisted.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct MetricSample {
    pub at: DateTime<Utc>,
    pub cpu_percent: f64,
    pub network_in_bytes: f64,
    pub network_out_bytes: f64,
}

/// Snapshot returned by state queries, after pending transitions settle.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct VmStatus {
    pub state: PowerState,
    pub state_entered_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub pending_eta: Option<DateTime<Utc>>,
    pub last_start_at: Option<DateTime<Utc>>,
    pub snooze_until: Option<DateTime<Utc>>,
}

/// Result of a start/stop command. A rejected command is a no-op, not an
/// error: the record is left untouched and the current state reported back.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum CommandOutcome {
    Accepted { pending_eta: DateTime<Utc> },
    Ignored { current: PowerState },
}
