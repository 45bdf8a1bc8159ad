use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use vm_sim::cli::{self, Command, FormatArg};
use vm_sim::compute::ComputeSimulator;
use vm_sim::error::{Error, Result};
use vm_sim::models::{MetricSample, VmStatus};
use vm_sim::store::StateStore;
use vm_sim::{config, metrics, output, runtime};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;
    let now = match &args.now {
        Some(value) => cli::parse_timestamp(value)?,
        None => Utc::now(),
    };
    let inventory = config::load_inventory_or_demo(args.config.as_deref())?;
    let store = StateStore::load(&args.state)?;
    let mut sim = ComputeSimulator::new(store);

    match &args.command {
        Command::Start { vm } => {
            let identity = inventory.resolve(vm);
            let outcome = sim.request_start(&identity, now);
            emit(args.format, &outcome, || {
                output::print_outcome(&identity, &outcome)
            })?;
        }
        Command::Stop { vm } => {
            let identity = inventory.resolve(vm);
            let outcome = sim.request_stop(&identity, now);
            emit(args.format, &outcome, || {
                output::print_outcome(&identity, &outcome)
            })?;
        }
        Command::Status { vm: Some(vm) } => {
            let identity = inventory.resolve(vm);
            let status = sim.get_state(&identity, now);
            emit(args.format, &status, || {
                output::print_status(&identity, &status)
            })?;
        }
        Command::Status { vm: None } => {
            let mut statuses: BTreeMap<String, VmStatus> = BTreeMap::new();
            for entry in &inventory.vms {
                let identity = entry.identity();
                let status = sim.get_state(&identity, now);
                statuses.insert(identity, status);
            }
            emit(args.format, &statuses, || {
                // Inventory order, not map order.
                for entry in &inventory.vms {
                    let identity = entry.identity();
                    output::print_status(&identity, &statuses[&identity]);
                }
            })?;
        }
        Command::History { vm } => {
            let identity = inventory.resolve(vm);
            let events = sim.get_history(&identity, now);
            emit(args.format, &events, || {
                output::print_history(&identity, &events)
            })?;
        }
        Command::Metrics {
            vm,
            window,
            start,
            end,
            step_seconds,
        } => {
            let identity = inventory.resolve(vm);
            let status = sim.get_state(&identity, now);
            let (window_start, window_end) = match (start, end) {
                (Some(start), Some(end)) => {
                    (cli::parse_timestamp(start)?, cli::parse_timestamp(end)?)
                }
                _ => match window.span() {
                    Some(span) => (now - span, now),
                    // Current run: from the last start, or a short live
                    // window when the VM has never run.
                    None => (
                        status.last_start_at.unwrap_or(now - Duration::minutes(15)),
                        now,
                    ),
                },
            };
            let window_start = metrics::clamp_lookback(window_start, window_end);
            let step = match step_seconds {
                Some(secs) if *secs <= 0 => return Err(Error::StepZero),
                Some(secs) => Duration::seconds(*secs),
                None => metrics::default_step_for(window_end - window_start),
            };
            let samples: Vec<MetricSample> = metrics::sample_series(
                &identity,
                status.state,
                status.last_start_at,
                window_start,
                window_end,
                step,
            )?
            .collect();
            emit(args.format, &samples, || output::print_samples(&samples))?;
        }
        Command::Uptime {
            vm,
            window,
            start,
            end,
        } => {
            let identity = inventory.resolve(vm);
            let status = sim.get_state(&identity, now);
            let (window_start, window_end) = match (start, end) {
                (Some(start), Some(end)) => {
                    (cli::parse_timestamp(start)?, cli::parse_timestamp(end)?)
                }
                _ => match window.span() {
                    Some(span) => (now - span, now),
                    None => (status.last_start_at.unwrap_or(now), now),
                },
            };
            let window_start = metrics::clamp_lookback(window_start, window_end);
            let total = runtime::total_running_seconds(
                sim.record(&identity, now),
                now,
                window_start,
                window_end,
            );
            let report = UptimeReport {
                identity: identity.clone(),
                total_running_seconds: total,
            };
            emit(args.format, &report, || {
                output::print_uptime(&identity, total)
            })?;
        }
        Command::Snooze { vm, until } => {
            let identity = inventory.resolve(vm);
            let until = match until {
                Some(value) => Some(cli::parse_timestamp(value)?),
                None => None,
            };
            sim.set_snooze(&identity, now, until);
            let status = sim.get_state(&identity, now);
            emit(args.format, &status, || {
                output::print_status(&identity, &status)
            })?;
        }
    }

    // Mutations can happen on any command path: reads settle pending
    // transitions too.
    sim.store().save(&args.state)?;
    Ok(())
}

#[derive(Serialize)]
struct UptimeReport {
    identity: String,
    total_running_seconds: f64,
}

fn emit<T: Serialize>(format: FormatArg, value: &T, human: impl FnOnce()) -> Result<()> {
    match format {
        FormatArg::Json => {
            let encoded = serde_json::to_string_pretty(value)
                .map_err(|err| Error::Cli(err.to_string()))?;
            println!("{}", encoded);
        }
        FormatArg::Human => human(),
    }
    Ok(())
}
