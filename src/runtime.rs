//! Uptime accounting over the persisted event history.
//!
//! Only time spent in `Running` counts; the transient states on either side
//! of a run do not.

use chrono::{DateTime, Utc};

use crate::models::{PowerState, TransitionEvent, VmRecord};

/// Seconds of `Running` time inside `[window_start, window_end]`.
///
/// Running intervals are the spans from each `-> Running` event to the next
/// `Running ->` event; a final unmatched entry is an open run, closed at
/// `now` while the VM is still running. Each interval contributes its
/// overlap with the window, so multiple runs in one window sum and an open
/// run is clipped at the window end.
pub fn total_running_seconds(
    record: &VmRecord,
    now: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> f64 {
    let mut total = 0.0;
    let mut entered: Option<DateTime<Utc>> = None;

    for event in &record.event_history {
        if event.to == PowerState::Running {
            entered = Some(event.at);
        } else if event.from == PowerState::Running {
            if let Some(run_start) = entered.take() {
                total += overlap_seconds(run_start, event.at, window_start, window_end);
            }
        }
    }

    if let Some(run_start) = entered {
        if record.current_state == PowerState::Running {
            total += overlap_seconds(run_start, now, window_start, window_end);
        }
    }

    total
}

/// Chronological history events within `[start, end]`.
pub fn events_in_window(
    record: &VmRecord,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<TransitionEvent> {
    record
        .event_history
        .iter()
        .filter(|event| event.at >= start && event.at <= end)
        .copied()
        .collect()
}

fn overlap_seconds(
    seg_start: DateTime<Utc>,
    seg_end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> f64 {
    let clipped_start = seg_start.max(window_start);
    let clipped_end = seg_end.min(window_end);
    if clipped_start < clipped_end {
        (clipped_end - clipped_start).num_milliseconds() as f64 / 1000.0
    } else {
        0.0
    }
}
