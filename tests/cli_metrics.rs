use assert_cmd::Command;
use std::path::Path;

const VM: &str = "demo-vm-1";

fn metrics_json(state: &Path, now: &str, extra: &[&str]) -> Vec<serde_json::Value> {
    let mut cmd = Command::cargo_bin("vm-sim").expect("binary should build");
    cmd.arg("--state")
        .arg(state)
        .args(["--now", now, "--format", "json", "metrics", VM])
        .args(extra);
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn fixed_window_is_deterministic_across_processes() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("sim_state.json");
    let window = [
        "--start",
        "2026-01-01T00:00:00Z",
        "--end",
        "2026-01-01T00:15:00Z",
        "--step-seconds",
        "60",
    ];

    let first = metrics_json(&state, "2026-01-01T01:00:00Z", &window);
    let second = metrics_json(&state, "2026-01-01T01:00:00Z", &window);
    assert_eq!(first.len(), 16);
    assert_eq!(first, second);
}

#[test]
fn samples_respect_value_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("sim_state.json");

    let samples = metrics_json(
        &state,
        "2026-01-01T12:00:00Z",
        &["--window", "1d", "--step-seconds", "900"],
    );
    assert!(!samples.is_empty());
    for sample in &samples {
        let cpu = sample["cpu_percent"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&cpu), "cpu {} out of range", cpu);
        assert!(sample["network_in_bytes"].as_f64().unwrap() >= 0.0);
        assert!(sample["network_out_bytes"].as_f64().unwrap() >= 0.0);
    }
}

#[test]
fn recently_started_vm_shows_elevated_cpu() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("sim_state.json");

    let mut start = Command::cargo_bin("vm-sim").expect("binary should build");
    start
        .arg("--state")
        .arg(&state)
        .args(["--now", "2026-01-01T00:00:00Z", "start", VM])
        .assert()
        .success();

    // 20s after the boot completed the start surge dominates.
    let samples = metrics_json(
        &state,
        "2026-01-01T00:00:35Z",
        &["--window", "current", "--step-seconds", "5"],
    );
    let peak = samples
        .iter()
        .map(|s| s["cpu_percent"].as_f64().unwrap())
        .fold(0.0_f64, f64::max);
    assert!(peak > 20.0, "peak cpu {} not elevated", peak);
    assert!(peak <= 100.0);
}
