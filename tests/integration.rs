use assert_cmd::Command;
use predicates::prelude::*;

fn yaml_key_audit() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("yaml-key-audit");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn audit_manifests() -> Command {
    let mut cmd = yaml_key_audit();
    cmd.args([
        "audit",
        "tests/fixtures/manifests",
        "--config",
        "tests/fixtures/manifests.toml",
    ]);
    cmd
}

// ── audit ────────────────────────────────────────────────────────────────────

#[test]
fn audit_manifests_fails() {
    audit_manifests()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Required readinessProbe key not found"))
        .stdout(predicate::str::contains("deployment.yaml:9:7"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn audit_clean_passes() {
    yaml_key_audit()
        .args([
            "audit",
            "tests/fixtures/clean",
            "--config",
            "tests/fixtures/manifests.toml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));
}

#[test]
fn audit_json_format() {
    let output = audit_manifests().args(["--format", "json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["summary"]["files"], 2);
    let rules: Vec<&str> = value["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["rule_key"].as_str().unwrap())
        .collect();
    assert_eq!(rules, vec!["no-host-network", "replicas-range", "readiness-probe"]);
}

#[test]
fn audit_sarif_format() {
    audit_manifests()
        .args(["--format", "sarif"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""))
        .stdout(predicate::str::contains("\"startColumn\": 7"));
}

#[test]
fn audit_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");
    audit_manifests()
        .args(["--format", "json", "--output"])
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"readiness-probe\""));
}

#[test]
fn audit_broken_yaml_reports_parse_error() {
    yaml_key_audit()
        .args(["audit", "tests/fixtures/broken"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("parsing-error"))
        .stdout(predicate::str::contains("Parse error: "));
}

#[test]
fn audit_warnings_pass_status_but_exit_1() {
    yaml_key_audit()
        .args([
            "audit",
            "tests/fixtures/timeouts",
            "--config",
            "tests/fixtures/warnings.toml",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("in milliseconds=5000"));
}

#[test]
fn audit_strict_mode_fails_on_warnings() {
    yaml_key_audit()
        .args([
            "audit",
            "tests/fixtures/timeouts",
            "--config",
            "tests/fixtures/warnings.toml",
            "--strict",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn audit_nonexistent_path_exits_2() {
    yaml_key_audit()
        .args(["audit", "tests/fixtures/does-not-exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn audit_missing_config_exits_2() {
    yaml_key_audit()
        .args([
            "audit",
            "tests/fixtures/clean",
            "--config",
            "tests/fixtures/missing.toml",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn audit_invalid_rule_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[[rules]]\ncheck = \"forbidden-key\"\nkey-name = \"(\"\n").unwrap();
    yaml_key_audit()
        .args(["audit", "tests/fixtures/clean", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid regex in 'key-name'"));
}

// ── list-rules / explain ─────────────────────────────────────────────────────

#[test]
fn list_rules_shows_templates() {
    yaml_key_audit()
        .args(["list-rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("forbidden-key"))
        .stdout(predicate::str::contains("duration-in-range"))
        .stdout(predicate::str::contains("required-key"))
        .stdout(predicate::str::contains("parsing-error"))
        .stdout(predicate::str::contains("Total: 5 templates"));
}

#[test]
fn explain_known_check() {
    yaml_key_audit()
        .args(["explain", "required-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required"))
        .stdout(predicate::str::contains("parent-key-name-root"));
}

#[test]
fn explain_unknown_check_exits_2() {
    yaml_key_audit()
        .args(["explain", "no-such-check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown check"));
}
