//! E2E tests for `dagpath all` and `dagpath.toml` handling.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const GOOD: &str = r#"{"n": 3, "edges": [{"u": 0, "v": 1, "w": 2}, {"u": 1, "v": 2, "w": 3}]}"#;

fn dagpath_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dagpath"));
    cmd.current_dir(dir);
    cmd.env("DAGPATH_LOG", "error");
    cmd.env_remove("DAGPATH_FORMAT");
    cmd.env_remove("DAGPATH_TIMING");
    cmd
}

fn setup_batch() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let data = dir.path().join("data");
    std::fs::create_dir(&data).expect("mkdir");
    std::fs::write(data.join("b_good.json"), GOOD).expect("write");
    std::fs::write(data.join("a_broken.json"), "{not json").expect("write");
    std::fs::write(data.join("readme.txt"), "ignored").expect("write");
    dir
}

#[test]
fn all_writes_csv_with_error_row() {
    let dir = setup_batch();

    dagpath_cmd(dir.path())
        .args(["all", "data", "--csv", "out.csv", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing: a_broken.json"))
        .stdout(predicate::str::contains("Processing: b_good.json"))
        .stdout(predicate::str::contains("2 file(s) analyzed, 1 failed"))
        .stdout(predicate::str::contains("Results written to out.csv"));

    let csv = std::fs::read_to_string(dir.path().join("out.csv")).expect("csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "File,Algorithm,Output,Time(ns),Metrics");
    assert!(lines[1].starts_with("a_broken.json,ERROR,"));
    assert!(lines[2].starts_with("b_good.json,SCC,count=3,"));
    assert!(lines[3].starts_with("b_good.json,TOPO,\"[2, 1, 0]\","));
    assert!(lines[4].starts_with("b_good.json,DAG Shortest,"));
    assert!(lines[5].starts_with("b_good.json,DAG Longest,\"len=2 path=[2, 1, 0]\","));
    assert_eq!(lines.len(), 6);
}

#[test]
fn all_json_lists_files_in_name_order() {
    let dir = setup_batch();

    let output = dagpath_cmd(dir.path())
        .args(["all", "data", "--json"])
        .output()
        .expect("dagpath should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");

    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["file"], "a_broken.json");
    assert!(files[0]["error"].is_string());
    assert_eq!(files[1]["file"], "b_good.json");
    assert_eq!(files[1]["analysis"]["stages"][0]["stage"], "SCC");
    assert!(json.get("csv").is_none());
    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn all_on_missing_path_fails() {
    let dir = TempDir::new().expect("tempdir");

    dagpath_cmd(dir.path())
        .args(["all", "nowhere", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no JSON files found"));
}

#[test]
fn bare_csv_flag_uses_configured_path() {
    let dir = setup_batch();
    std::fs::write(
        dir.path().join("dagpath.toml"),
        "[output]\ncsv_path = \"report.csv\"\n",
    )
    .expect("write config");

    dagpath_cmd(dir.path())
        .args(["all", "data/b_good.json", "--csv", "--format", "text"])
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("report.csv")).expect("csv");
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn zero_weight_policy_from_config() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("g.json"),
        r#"{"n": 2, "edges": [{"u": 0, "v": 1, "w": 0}]}"#,
    )
    .expect("write");

    let run = |dir: &Path| -> Value {
        let output = dagpath_cmd(dir)
            .args(["shortest", "g.json", "--raw", "--json"])
            .output()
            .expect("dagpath should not crash");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("valid JSON")
    };

    assert_eq!(run(dir.path())["shortest"]["dist"][1], 0.0);

    std::fs::write(
        dir.path().join("dagpath.toml"),
        "[ingest]\nzero_weight = \"as_one\"\n",
    )
    .expect("write config");
    assert_eq!(run(dir.path())["shortest"]["dist"][1], 1.0);
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("bad.toml"), "[ingest\n").expect("write config");
    std::fs::write(dir.path().join("g.json"), GOOD).expect("write");

    dagpath_cmd(dir.path())
        .args(["--config", "bad.toml", "scc", "g.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}
