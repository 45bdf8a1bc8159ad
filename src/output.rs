use crate::models::{CommandOutcome, MetricSample, TransitionEvent, VmStatus};

pub fn format_uptime(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3_600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86_400 {
        format!("{}h {}m", seconds / 3_600, (seconds % 3_600) / 60)
    } else {
        format!("{}d {}h", seconds / 86_400, (seconds % 86_400) / 3_600)
    }
}

pub fn format_bytes(value: f64) -> String {
    let mut value = value;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} TB", value)
}

pub fn print_status(identity: &str, status: &VmStatus) {
    let eta = match status.pending_eta {
        Some(eta) => format!(" (completes {})", eta.to_rfc3339()),
        None => String::new(),
    };
    println!(
        "{}: {} for {}{}",
        identity,
        status.state.label(),
        format_uptime(status.elapsed_seconds.max(0) as u64),
        eta
    );
}

pub fn print_outcome(identity: &str, outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Accepted { pending_eta } => {
            println!("{}: accepted, completes {}", identity, pending_eta.to_rfc3339());
        }
        CommandOutcome::Ignored { current } => {
            println!("{}: ignored ({})", identity, current.label());
        }
    }
}

pub fn print_history(identity: &str, events: &[TransitionEvent]) {
    println!("History for {}:", identity);
    for event in events {
        println!("{} {} -> {}", event.at.to_rfc3339(), event.from, event.to);
    }
    if events.is_empty() {
        println!("(no events)");
    }
}

pub fn print_samples(samples: &[MetricSample]) {
    for sample in samples {
        println!(
            "{} cpu: {:.1}% in: {} out: {}",
            sample.at.to_rfc3339(),
            sample.cpu_percent,
            format_bytes(sample.network_in_bytes),
            format_bytes(sample.network_out_bytes),
        );
    }
}

pub fn print_uptime(identity: &str, seconds: f64) {
    println!("{}: {}", identity, format_uptime(seconds.max(0.0) as u64));
}
