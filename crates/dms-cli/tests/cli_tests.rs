//! CLI integration tests for the `dms` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("dms").unwrap();
    cmd.env_remove("DMS_ENVIRONMENT").env_remove("DMS_ACCOUNT");
    cmd
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const CONTEXT: &str = r#"{
  "dev": {
    "region": "us-east-1",
    "subnetIds": ["subnet-1", "subnet-2"],
    "replicationInstanceIdentifier": "dev-repl",
    "replicationSubnetGroupIdentifier": "dev-subnets",
    "replicationTaskSettings": { "Logging": { "EnableLogging": false } },
    "tasks": [
      {
        "name": "demo_test",
        "sourceSecretsManagerSecretId": "src",
        "targetSecretsManagerSecretId": "tgt",
        "replicationTaskSettings": { "ValidationSettings": { "ThreadCount": 15 } }
      }
    ]
  },
  "broken": {
    "subnetIds": [],
    "replicationInstanceIdentifier": "x",
    "replicationSubnetGroupIdentifier": "y",
    "tasks": [
      {
        "name": "ledger",
        "sourceSecretsManagerSecretId": "src",
        "targetSecretsManagerSecretId": "tgt",
        "targetEngineName": "oracle"
      }
    ]
  }
}"#;

// =============================================================================
// Help
// =============================================================================

#[test]
fn help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synth"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("mapping"))
        .stdout(predicate::str::contains("task-settings"))
        .stdout(predicate::str::contains("list-engines"));
}

#[test]
fn synth_help_lists_flags() {
    cmd()
        .args(["synth", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--environment"))
        .stdout(predicate::str::contains("--account"))
        .stdout(predicate::str::contains("--stack-name"))
        .stdout(predicate::str::contains("--format"));
}

// =============================================================================
// synth
// =============================================================================

#[test]
fn synth_prints_template_json() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    let output = cmd()
        .args(["synth", "--environment", "dev", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let template: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let resources = template["Resources"].as_object().unwrap();
    let endpoints = resources
        .values()
        .filter(|r| r["Type"] == "AWS::DMS::Endpoint")
        .count();
    assert_eq!(endpoints, 2);
    assert!(resources.values().any(|r| {
        r["Properties"]["ReplicationTaskIdentifier"] == "demo-test-replication-dev-repl"
    }));
}

#[test]
fn synth_reads_environment_from_env_var() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .env("DMS_ENVIRONMENT", "dev")
        .args(["synth", "--format", "yaml", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("AWSTemplateFormatVersion: 2010-09-09").or(
            predicate::str::contains("AWSTemplateFormatVersion: '2010-09-09'"),
        ));
}

#[test]
fn synth_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);
    let out = dir.path().join("template.json");

    cmd()
        .args(["synth", "-e", "dev", "-c"])
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("AWS::DMS::ReplicationInstance"));
}

#[test]
fn synth_refuses_invalid_context() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["synth", "-e", "broken", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("subnetIds"));
}

#[test]
fn synth_unknown_environment_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["synth", "-e", "qa", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment 'qa' not found"));
}

#[test]
fn synth_requires_environment() {
    cmd().arg("synth").assert().failure();
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn validate_passes_good_context() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["validate", "-e", "dev", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task #1: 'demo_test'"))
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn validate_reports_every_error_and_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["validate", "-e", "broken", "-c"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED with 2 error(s)"))
        .stderr(predicate::str::contains("databaseName is required for oracle"));
}

// =============================================================================
// mapping
// =============================================================================

#[test]
fn mapping_generates_rules_from_file() {
    let dir = TempDir::new().unwrap();
    let rules = write_file(
        &dir,
        "mapping-rules.json",
        r#"{"tables": [{"schemaName": "Platform", "tableName": "Users", "hashColumns": ["email"]}]}"#,
    );

    let output = cmd()
        .arg("mapping")
        .arg(&rules)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let mappings: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let rules = mappings["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0]["rule-name"], "include table users");
    assert_eq!(rules[1]["rule-action"], "remove-column");
    assert_eq!(rules[2]["value"], "email_hashed");
}

#[test]
fn mapping_with_empty_tables_prints_empty_rules() {
    let dir = TempDir::new().unwrap();
    let rules = write_file(&dir, "rules.yaml", "tables: []\n");

    cmd()
        .arg("mapping")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rules": []"#));
}

// =============================================================================
// task-settings
// =============================================================================

#[test]
fn task_settings_defaults_without_config() {
    cmd()
        .arg("task-settings")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""TargetTablePrepMode": "DROP_AND_CREATE""#))
        .stdout(predicate::str::contains(r#""ThreadCount": 5"#));
}

#[test]
fn task_settings_layers_context_and_task() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["task-settings", "-e", "dev", "--task", "demo_test", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ThreadCount": 15"#))
        .stdout(predicate::str::contains(r#""EnableLogging": false"#));
}

#[test]
fn task_settings_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "env.json", CONTEXT);

    cmd()
        .args(["task-settings", "-e", "dev", "--task", "nope", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task 'nope' not found"));
}

// =============================================================================
// list-engines
// =============================================================================

#[test]
fn list_engines_shows_every_engine() {
    cmd()
        .arg("list-engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("aurora-postgresql"))
        .stdout(predicate::str::contains("MicrosoftSqlServerSettings"))
        .stdout(predicate::str::contains("parallelLoadThreads=1 maxFileSize=512"));
}

#[test]
fn list_engines_json() {
    let output = cmd()
        .args(["list-engines", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 5);
    assert_eq!(rows[0]["engine"], "mysql");
    assert_eq!(rows[0]["requires_database_name"], false);
}
