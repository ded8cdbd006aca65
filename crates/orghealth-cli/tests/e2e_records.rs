//! E2E tests for `orghealth init` and subdivision / link record management.

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

fn init_project(dir: &Path) {
    oh_cmd(dir).args(["init"]).assert().success();
}

fn json_of(dir: &Path, args: &[&str]) -> Value {
    let output = oh_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn add_subdivision(dir: &Path, name: &str, kpi: &str, state: &str) -> i64 {
    let created = json_of(
        dir,
        &[
            "subdivision",
            "add",
            "--name",
            name,
            "--resources",
            "10000",
            "--kpi",
            kpi,
            "--state",
            state,
        ],
    );
    created["id"].as_i64().expect("id")
}

fn add_link(dir: &Path, from: i64, to: i64, importance: &str, delay: &str) -> i64 {
    let created = json_of(
        dir,
        &[
            "link",
            "add",
            "--from",
            &from.to_string(),
            "--to",
            &to.to_string(),
            "--importance",
            importance,
            "--delay",
            delay,
        ],
    );
    created["id"].as_i64().expect("id")
}

#[test]
fn init_creates_project_skeleton() {
    let dir = TempDir::new().unwrap();
    oh_cmd(dir.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized .orghealth"));

    assert!(dir.path().join(".orghealth").is_dir());
    assert!(dir.path().join(".orghealth/config.toml").is_file());
    assert!(dir.path().join(".orghealth/orghealth.db").is_file());
}

#[test]
fn init_twice_requires_force() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    oh_cmd(dir.path())
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    oh_cmd(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn commands_before_init_report_not_initialized() {
    let dir = TempDir::new().unwrap();
    oh_cmd(dir.path())
        .args(["subdivision", "list", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn unreadable_store_reports_store_failure() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let orghealth = dir.path().join(".orghealth");
    for sidecar in ["orghealth.db-wal", "orghealth.db-shm"] {
        let _ = std::fs::remove_file(orghealth.join(sidecar));
    }
    std::fs::write(
        orghealth.join("orghealth.db"),
        "not a sqlite database\n".repeat(32),
    )
    .unwrap();

    oh_cmd(dir.path())
        .args(["subdivision", "list", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E3001\""));
}

#[test]
fn subdivision_add_list_edit() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let sales = add_subdivision(dir.path(), "Sales", "50", "0.3");
    let logistics = add_subdivision(dir.path(), "Logistics", "80", "0.8");

    let listed = json_of(dir.path(), &["subdivision", "list"]);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Sales", "Logistics"]);

    let edited = json_of(
        dir.path(),
        &["subdivision", "edit", &sales.to_string(), "--kpi", "72"],
    );
    assert_eq!(edited["name"], "Sales");
    assert_eq!(edited["kpi"], 72.0);
    assert_eq!(edited["state"], 0.3, "omitted flags keep stored values");

    oh_cmd(dir.path())
        .args(["subdivision", "list", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{logistics}\tLogistics")));
}

#[test]
fn out_of_range_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    oh_cmd(dir.path())
        .args([
            "subdivision",
            "add",
            "--name",
            "Broken",
            "--resources",
            "100",
            "--kpi",
            "120",
            "--state",
            "0.3",
            "--json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_kpi"));

    oh_cmd(dir.path())
        .args([
            "link",
            "add",
            "--from",
            "1",
            "--to",
            "2",
            "--importance",
            "5",
            "--delay",
            "-1",
            "--json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_delay"));

    let listed = json_of(dir.path(), &["subdivision", "list"]);
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn editing_missing_records_fails_with_codes() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    oh_cmd(dir.path())
        .args(["subdivision", "edit", "42", "--kpi", "10", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));

    oh_cmd(dir.path())
        .args(["link", "delete", "42", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn link_list_shows_placeholder_for_dangling_target() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let sales = add_subdivision(dir.path(), "Sales", "50", "0.3");
    add_link(dir.path(), sales, 404, "1", "0.5");

    let links = json_of(dir.path(), &["link", "list"]);
    assert_eq!(links[0]["from_name"], "Sales");
    assert_eq!(links[0]["to_name"], "ID404");
}

#[test]
fn link_edit_changes_weight_only() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let a = add_subdivision(dir.path(), "A", "70", "0.1");
    let b = add_subdivision(dir.path(), "B", "70", "0.1");
    let link = add_link(dir.path(), a, b, "2", "4");

    let edited = json_of(
        dir.path(),
        &["link", "edit", &link.to_string(), "--importance", "9"],
    );
    assert_eq!(edited["importance"], 9.0);
    assert_eq!(edited["delay"], 4.0);
    assert_eq!(edited["from_id"], a);
    assert_eq!(edited["to_id"], b);
}

#[test]
fn subdivision_delete_cascades_links() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let a = add_subdivision(dir.path(), "A", "70", "0.1");
    let b = add_subdivision(dir.path(), "B", "70", "0.1");
    let c = add_subdivision(dir.path(), "C", "70", "0.1");
    add_link(dir.path(), a, b, "1", "1");
    add_link(dir.path(), c, a, "1", "1");
    let kept = add_link(dir.path(), b, c, "1", "1");

    let deleted = json_of(
        dir.path(),
        &["subdivision", "delete", &a.to_string(), "--force"],
    );
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["links"], 2);

    let links = json_of(dir.path(), &["link", "list"]);
    let ids: Vec<i64> = links
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![kept]);
}

#[test]
fn company_flag_scopes_records() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    add_subdivision(dir.path(), "HQ", "70", "0.1");
    let other = json_of(dir.path(), &["subdivision", "list", "--company", "2"]);
    assert!(other.as_array().unwrap().is_empty());
}

#[test]
fn db_flag_points_at_alternate_store() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("elsewhere.db");
    let db_arg = db.to_str().unwrap();

    oh_cmd(dir.path())
        .args(["--db", db_arg, "init"])
        .assert()
        .success();
    assert!(db.is_file());

    let listed = json_of(dir.path(), &["--db", db_arg, "subdivision", "list"]);
    assert!(listed.as_array().unwrap().is_empty());
}
