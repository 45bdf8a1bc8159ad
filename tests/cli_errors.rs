use assert_cmd::Command;
use predicates::str::contains;

fn vm_sim() -> Command {
    Command::cargo_bin("vm-sim").expect("binary should build")
}

#[test]
fn invalid_now_timestamp_fails() {
    let dir = tempfile::tempdir().unwrap();
    vm_sim()
        .arg("--state")
        .arg(dir.path().join("sim_state.json"))
        .args(["--now", "yesterday", "status", "demo-vm-1"])
        .assert()
        .failure()
        .stderr(contains("Error: invalid timestamp 'yesterday'"));
}

#[test]
fn unsupported_config_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("vms.yaml");
    std::fs::write(&config, "vms: []").unwrap();

    vm_sim()
        .arg("--state")
        .arg(dir.path().join("sim_state.json"))
        .arg("--config")
        .arg(&config)
        .args(["status", "demo-vm-1"])
        .assert()
        .failure()
        .stderr(contains("Error: unsupported config format 'yaml'"));
}

#[test]
fn malformed_state_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("sim_state.json");
    std::fs::write(&state, "{ this is not json").unwrap();

    vm_sim()
        .arg("--state")
        .arg(&state)
        .args(["status", "demo-vm-1"])
        .assert()
        .failure()
        .stderr(contains("Error: failed to parse state"));
}

#[test]
fn inverted_metrics_window_fails() {
    let dir = tempfile::tempdir().unwrap();
    vm_sim()
        .arg("--state")
        .arg(dir.path().join("sim_state.json"))
        .args([
            "metrics",
            "demo-vm-1",
            "--start",
            "2026-01-02T00:00:00Z",
            "--end",
            "2026-01-01T00:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(contains("Error: window end must be after window start"));
}

#[test]
fn zero_step_fails() {
    let dir = tempfile::tempdir().unwrap();
    vm_sim()
        .arg("--state")
        .arg(dir.path().join("sim_state.json"))
        .args([
            "metrics",
            "demo-vm-1",
            "--start",
            "2026-01-01T00:00:00Z",
            "--end",
            "2026-01-01T01:00:00Z",
            "--step-seconds",
            "0",
        ])
        .assert()
        .failure()
        .stderr(contains("Error: sample step must be greater than zero"));
}

#[test]
fn metrics_start_without_end_fails() {
    let dir = tempfile::tempdir().unwrap();
    vm_sim()
        .arg("--state")
        .arg(dir.path().join("sim_state.json"))
        .args(["metrics", "demo-vm-1", "--start", "2026-01-01T00:00:00Z"])
        .assert()
        .failure();
}
