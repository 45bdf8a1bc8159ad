use chrono::{DateTime, Duration, Utc};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "vm-sim", about = "Deterministic Azure VM lifecycle and metrics simulator")]
pub struct Args {
    /// Simulator state file; created on first write.
    #[arg(long, default_value = "sim_state.json", global = true)]
    pub state: PathBuf,
    /// VM inventory (.toml or .json); defaults to a single demo VM.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Override the wall clock (RFC 3339); defaults to the current time"
    )]
    pub now: Option<String>,
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: FormatArg,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request a VM start.
    Start { vm: String },
    /// Request a VM stop (deallocate).
    Stop { vm: String },
    /// Power state of one VM, or of the whole inventory.
    Status { vm: Option<String> },
    /// Lifecycle event history for a VM.
    History { vm: String },
    /// Synthetic CPU and network samples over a window.
    Metrics {
        vm: String,
        #[arg(long, value_enum, default_value = "current")]
        window: WindowArg,
        /// Explicit window start (RFC 3339); overrides --window.
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Explicit window end (RFC 3339).
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Sample spacing in seconds; defaults by window span.
        #[arg(long)]
        step_seconds: Option<i64>,
    },
    /// Total running time within a window.
    Uptime {
        vm: String,
        #[arg(long, value_enum, default_value = "current")]
        window: WindowArg,
        #[arg(long, requires = "end")]
        start: Option<String>,
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
    /// Set or clear the advisory auto-shutdown snooze deadline.
    Snooze {
        vm: String,
        /// RFC 3339 deadline; omit to clear.
        #[arg(long)]
        until: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatArg {
    Human,
    Json,
}

/// The UI's predefined windows. `Current` means "since the last start".
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowArg {
    Current,
    #[value(name = "1d")]
    OneDay,
    #[value(name = "7d")]
    SevenDays,
    #[value(name = "30d")]
    ThirtyDays,
    #[value(name = "90d")]
    NinetyDays,
}

impl WindowArg {
    pub fn span(self) -> Option<Duration> {
        match self {
            WindowArg::Current => None,
            WindowArg::OneDay => Some(Duration::minutes(1_440)),
            WindowArg::SevenDays => Some(Duration::minutes(10_080)),
            WindowArg::ThirtyDays => Some(Duration::minutes(43_200)),
            WindowArg::NinetyDays => Some(Duration::minutes(129_600)),
        }
    }
}

pub fn parse_args() -> Result<Args> {
    match Args::try_parse() {
        Ok(args) => Ok(args),
        Err(err)
            if err.kind() == ErrorKind::DisplayHelp || err.kind() == ErrorKind::DisplayVersion =>
        {
            err.exit()
        }
        Err(err) => Err(Error::Cli(err.to_string())),
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_spans_match_the_ui_table() {
        assert_eq!(WindowArg::Current.span(), None);
        assert_eq!(WindowArg::OneDay.span(), Some(Duration::days(1)));
        assert_eq!(WindowArg::SevenDays.span(), Some(Duration::days(7)));
        assert_eq!(WindowArg::ThirtyDays.span(), Some(Duration::days(30)));
        assert_eq!(WindowArg::NinetyDays.span(), Some(Duration::days(90)));
    }

    #[test]
    fn timestamps_parse_rfc3339_only() {
        assert!(parse_timestamp("2026-01-01T00:00:00Z").is_ok());
        assert!(parse_timestamp("2026-01-01T00:00:00+02:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let ts = parse_timestamp("2026-01-01T02:00:00+02:00").unwrap();
        assert_eq!(ts, parse_timestamp("2026-01-01T00:00:00Z").unwrap());
    }
}
