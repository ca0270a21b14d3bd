use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const COUNTER: &str = r#"
contract Counter {
    count: u256;

    @external
    fn increment() {
        this.count = this.count + 1;
    }

    @view
    fn current(): u256 {
        return this.count;
    }
}
"#;

const BROKEN: &str = r#"
contract Broken {
    @external
    fn oops() {
        this.missing = 1;
    }
}
"#;

fn quartzc() -> Command {
    Command::cargo_bin("quartzc").unwrap()
}

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn build_writes_target_source_and_abi() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "counter.qz", COUNTER);
    let output = dir.path().join("counter.c");

    quartzc()
        .arg("build")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let source = fs::read_to_string(&output).unwrap();
    assert!(source.contains("void Counter_increment(void)"));
    assert!(source.contains("void quartz_dispatch(u32 selector)"));

    let abi = fs::read_to_string(dir.path().join("counter.abi.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&abi).unwrap();
    assert!(entries
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["name"] == "increment"));
}

#[test]
fn build_without_output_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "counter.qz", COUNTER);

    quartzc()
        .arg("build")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Counter_current"));
}

#[test]
fn build_rejects_broken_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "broken.qz", BROKEN);

    quartzc()
        .arg("build")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn check_reports_valid_and_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_source(&dir, "counter.qz", COUNTER);
    let bad = write_source(&dir, "broken.qz", BROKEN);

    quartzc()
        .arg("check")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"));

    quartzc()
        .arg("check")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn inspect_dumps_contract_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "counter.qz", COUNTER);

    let assert = quartzc().arg("inspect").arg(&input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let contract: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(contract["name"], "Counter");
    assert_eq!(contract["storage"][0]["name"], "count");
}

#[test]
fn missing_input_fails() {
    quartzc()
        .arg("build")
        .arg("does-not-exist.qz")
        .assert()
        .failure();
}
