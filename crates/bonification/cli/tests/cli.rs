//! Binary-level tests for the `bonif` command.

use assert_cmd::Command;
use predicates::prelude::*;

fn scenario_path() -> String {
    format!("{}/scenarios/basic.toml", env!("CARGO_MANIFEST_DIR"))
}

fn bonif() -> Command {
    let mut cmd = Command::cargo_bin("bonif").unwrap();
    cmd.env_remove("BONIF_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn score_prints_component_score() {
    bonif()
        .args(["score", "--kind", "time", "--actual", "90", "--target", "100"])
        .assert()
        .success()
        .stdout("82\n");

    bonif()
        .args(["score", "--kind", "quality", "--actual", "0", "--target", "80"])
        .assert()
        .success()
        .stdout("60\n");
}

#[test]
fn simulate_reports_payout_as_json() {
    let output = bonif()
        .args(["simulate", "--scenario", &scenario_path(), "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["jobs"][0]["state"], "BonusPaid");
    assert_eq!(report["jobs"][0]["payout"], 100);
    assert_eq!(report["jobs"][1]["state"], "Evaluated");
    assert_eq!(report["jobs"][1]["violations"].as_array().unwrap().len(), 3);
    assert_eq!(report["pools"][0]["pool"], 500);
}

#[test]
fn simulate_text_output() {
    bonif()
        .args(["simulate", "--scenario", &scenario_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("BonusPaid"))
        .stdout(predicate::str::contains("paid: 100"))
        .stdout(predicate::str::contains("quality below minimum"));
}

#[test]
fn missing_scenario_fails() {
    bonif()
        .args(["simulate", "--scenario", "/nonexistent/scenario.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn config_shows_defaults() {
    bonif()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"history_limit\": 10"));
}
