//! Synthetic CPU and network metrics.
//!
//! Samples are a pure function of `(identity, timestamp, state, last start)`.
//! Idle VMs sit at a jittery baseline; a recent start adds an exponentially
//! decaying surge whose amplitude and time constant are drawn once per VM.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::models::{MetricSample, PowerState};
use crate::rng;

const CPU_BASELINE_MEAN: f64 = 2.0;
const CPU_BASELINE_STD: f64 = 0.8;
const NET_BASELINE_MEAN: f64 = 150_000.0;
const NET_BASELINE_STD: f64 = 50_000.0;

/// A start stops contributing after this long.
const SURGE_WINDOW_MINUTES: f64 = 10.0;
const CPU_SURGE_RANGE: (f64, f64) = (40.0, 80.0);
const CPU_TAU_MINUTES: (f64, f64) = (2.0, 6.0);
const NET_SURGE_RANGE: (f64, f64) = (2e6, 20e6);
const NET_TAU_MINUTES: (f64, f64) = (2.0, 8.0);

/// The 90-day lookback cap, matching the Azure Monitor retention window.
const MAX_LOOKBACK_SECS: i64 = 90 * 86_400 - 1;

// Jitter cursors pack the sample's unix second with a channel tag; surge
// parameter cursors are fixed per VM.
const CHANNEL_CPU: u64 = 0;
const CHANNEL_NET_IN: u64 = 1;
const CHANNEL_NET_OUT: u64 = 2;
const CURSOR_CPU_SURGE: u64 = u64::MAX;
const CURSOR_CPU_TAU: u64 = u64::MAX - 1;
const CURSOR_NET_SURGE: u64 = u64::MAX - 2;
const CURSOR_NET_TAU: u64 = u64::MAX - 3;

fn jitter_cursor(at: DateTime<Utc>, channel: u64) -> u64 {
    (at.timestamp() as u64) << 2 | channel
}

/// One sample. Identical arguments always reproduce identical output.
pub fn sample(
    identity: &str,
    at: DateTime<Utc>,
    state: PowerState,
    last_start: Option<DateTime<Utc>>,
) -> MetricSample {
    let seed = rng::seed_for(identity);
    let cpu_base = rng::normal(
        seed,
        jitter_cursor(at, CHANNEL_CPU),
        CPU_BASELINE_MEAN,
        CPU_BASELINE_STD,
    );
    let net_in_base = rng::normal(
        seed,
        jitter_cursor(at, CHANNEL_NET_IN),
        NET_BASELINE_MEAN,
        NET_BASELINE_STD,
    );
    let net_out_base = rng::normal(
        seed,
        jitter_cursor(at, CHANNEL_NET_OUT),
        NET_BASELINE_MEAN,
        NET_BASELINE_STD,
    );

    let recent_start = last_start.filter(|started| {
        *started <= at && minutes_between(*started, at) < SURGE_WINDOW_MINUTES
    });

    if state != PowerState::Running && recent_start.is_none() {
        return clamp(at, cpu_base, net_in_base, net_out_base);
    }

    let (mut cpu, mut net_in, mut net_out) = (cpu_base, net_in_base, net_out_base);
    if let Some(started) = recent_start {
        let minutes_since = minutes_between(started, at);

        let amplitude = rng::uniform(seed, CURSOR_CPU_SURGE, CPU_SURGE_RANGE.0, CPU_SURGE_RANGE.1);
        let tau = rng::uniform(seed, CURSOR_CPU_TAU, CPU_TAU_MINUTES.0, CPU_TAU_MINUTES.1);
        cpu += amplitude * (-minutes_since / tau).exp();

        let net_amplitude =
            rng::uniform(seed, CURSOR_NET_SURGE, NET_SURGE_RANGE.0, NET_SURGE_RANGE.1);
        let net_tau = rng::uniform(seed, CURSOR_NET_TAU, NET_TAU_MINUTES.0, NET_TAU_MINUTES.1);
        let surge = net_amplitude * (-minutes_since / net_tau).exp();
        net_in += surge;
        net_out += surge;
    }
    clamp(at, cpu, net_in, net_out)
}

fn clamp(at: DateTime<Utc>, cpu: f64, net_in: f64, net_out: f64) -> MetricSample {
    MetricSample {
        at,
        cpu_percent: cpu.clamp(0.0, 100.0),
        network_in_bytes: net_in.max(0.0),
        network_out_bytes: net_out.max(0.0),
    }
}

fn minutes_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

/// Finite, restartable series over `[start, end]` at `step` spacing.
/// Cloning the iterator replays it; the values depend only on the inputs.
#[derive(Clone, Debug)]
pub struct SampleSeries {
    identity: String,
    state: PowerState,
    last_start: Option<DateTime<Utc>>,
    next_at: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for SampleSeries {
    type Item = MetricSample;

    fn next(&mut self) -> Option<MetricSample> {
        if self.next_at > self.end {
            return None;
        }
        let item = sample(&self.identity, self.next_at, self.state, self.last_start);
        self.next_at += self.step;
        Some(item)
    }
}

/// Series over an arbitrary window. The end bound is inclusive. The
/// predefined UI windows are just particular `(start, end, step)` triples.
pub fn sample_series(
    identity: &str,
    state: PowerState,
    last_start: Option<DateTime<Utc>>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<SampleSeries> {
    if end < start {
        return Err(Error::WindowInverted);
    }
    if step <= Duration::zero() {
        return Err(Error::StepZero);
    }
    Ok(SampleSeries {
        identity: identity.to_string(),
        state,
        last_start,
        next_at: start,
        end,
        step,
    })
}

/// Sample spacing used when the caller does not pick one: 15 minutes past a
/// day of span, 5 minutes past 6 hours, otherwise 1 minute.
pub fn default_step_for(span: Duration) -> Duration {
    if span > Duration::days(1) {
        Duration::seconds(900)
    } else if span > Duration::hours(6) {
        Duration::seconds(300)
    } else {
        Duration::seconds(60)
    }
}

/// Clamp a window start to at most the retention lookback before `end`.
pub fn clamp_lookback(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let floor = end - Duration::seconds(MAX_LOOKBACK_SECS);
    start.max(floor)
}
