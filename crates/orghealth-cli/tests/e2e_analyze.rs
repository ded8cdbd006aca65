//! E2E tests for `orghealth analyze` and `orghealth config show`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn oh_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("orghealth"));
    cmd.current_dir(dir);
    cmd.env("ORGHEALTH_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn run_ok(dir: &Path, args: &[&str]) {
    oh_cmd(dir).args(args).assert().success();
}

/// Sales (KPI 50, S 0.3) → Logistics (KPI 80, S 0.8), W = 2, Δt = 4 h.
fn seed_two_subdivisions(dir: &Path) {
    run_ok(dir, &["init"]);
    run_ok(
        dir,
        &[
            "subdivision",
            "add",
            "--name",
            "Sales",
            "--resources",
            "10000",
            "--kpi",
            "50",
            "--state",
            "0.3",
        ],
    );
    run_ok(
        dir,
        &[
            "subdivision",
            "add",
            "--name",
            "Logistics",
            "--resources",
            "8000",
            "--kpi",
            "80",
            "--state",
            "0.8",
        ],
    );
    run_ok(
        dir,
        &[
            "link",
            "add",
            "--from",
            "1",
            "--to",
            "2",
            "--importance",
            "2",
            "--delay",
            "4",
        ],
    );
}

fn analyze_json(dir: &Path) -> Value {
    let output = oh_cmd(dir)
        .args(["analyze", "--json"])
        .output()
        .expect("analyze should not crash");
    assert!(
        output.status.success(),
        "analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn empty_company_prints_no_data() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["init"]);

    oh_cmd(dir.path())
        .args(["analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no data for analysis"));
}

#[test]
fn unknown_company_prints_company_not_found() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["init"]);

    let output = oh_cmd(dir.path())
        .args(["analyze", "--company", "42", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["company"], 42);
    assert_eq!(shown["message"], "no data for analysis (company not found)");

    oh_cmd(dir.path())
        .args(["analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no data for analysis (no subdivisions)."));
}

#[test]
fn single_subdivision_fails_with_e2003() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["init"]);
    run_ok(
        dir.path(),
        &[
            "subdivision",
            "add",
            "--name",
            "Solo",
            "--resources",
            "1",
            "--kpi",
            "90",
            "--state",
            "0.1",
        ],
    );

    oh_cmd(dir.path())
        .args(["analyze", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E2003\""));
}

#[test]
fn json_diagnosis_matches_hand_computed_values() {
    let dir = TempDir::new().unwrap();
    seed_two_subdivisions(dir.path());

    let diagnosis = analyze_json(dir.path());
    let entries = diagnosis["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let logistics = &entries[0];
    assert_eq!(logistics["name"], "Logistics");
    assert!(approx(&logistics["index"], -0.8));
    assert_eq!(logistics["findings"][0]["kind"], "high_state");

    let sales = &entries[1];
    assert_eq!(sales["name"], "Sales");
    assert!(approx(&sales["centrality"], 2.0));
    assert!(approx(&sales["delay"], 4.0));
    assert!(approx(&sales["index"], -0.3));
    assert_eq!(sales["findings"][0]["kind"], "low_kpi");
    assert_eq!(sales["findings"][1]["kind"], "link_delay");
    assert_eq!(sales["findings"][1]["severity"], "critical");
    assert_eq!(sales["findings"][1]["to_name"], "Logistics");
    assert_eq!(sales["suggestions"].as_array().unwrap().len(), 3);

    assert_eq!(diagnosis["worst"]["name"], "Logistics");
}

#[test]
fn text_report_lists_findings_and_worst() {
    let dir = TempDir::new().unwrap();
    seed_two_subdivisions(dir.path());

    oh_cmd(dir.path())
        .args(["analyze", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANALYSIS RESULTS"))
        .stdout(predicate::str::contains(
            "critical delay on link Sales→Logistics (4.0 h > 3.0 h).",
        ))
        .stdout(predicate::str::contains("Logistics (ID=2, I = -0.80)"));
}

#[test]
fn config_thresholds_change_findings() {
    let dir = TempDir::new().unwrap();
    seed_two_subdivisions(dir.path());
    std::fs::write(
        dir.path().join(".orghealth/config.toml"),
        "[analysis.thresholds]\nkpi_low = 40.0\ndelay_crit = 10.0\n",
    )
    .unwrap();

    let diagnosis = analyze_json(dir.path());
    let sales = &diagnosis["entries"][1];
    assert_eq!(sales["name"], "Sales");
    let findings = sales["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1, "KPI 50 is no longer low");
    assert_eq!(findings[0]["severity"], "elevated");
}

#[test]
fn dangling_link_source_is_ignored() {
    let dir = TempDir::new().unwrap();
    seed_two_subdivisions(dir.path());
    run_ok(
        dir.path(),
        &[
            "link",
            "add",
            "--from",
            "99",
            "--to",
            "1",
            "--importance",
            "10",
            "--delay",
            "72",
        ],
    );

    let diagnosis = analyze_json(dir.path());
    assert!(approx(&diagnosis["entries"][1]["index"], -0.3));
}

#[test]
fn malformed_config_fails_with_e1002() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["init"]);
    std::fs::write(dir.path().join(".orghealth/config.toml"), "[analysis\n").unwrap();

    oh_cmd(dir.path())
        .args(["analyze", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn config_show_reports_effective_values() {
    let dir = TempDir::new().unwrap();

    let output = oh_cmd(dir.path())
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["from_file"], false);
    assert!(approx(&shown["config"]["analysis"]["coefficients"]["beta"], 0.5));
    assert_eq!(shown["config"]["store"]["default_company"], 1);

    oh_cmd(dir.path())
        .args(["config", "show", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[analysis.thresholds]"));
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().unwrap();
    oh_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orghealth"));
}
