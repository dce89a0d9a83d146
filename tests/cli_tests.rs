use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SAMPLE_INVOICES: &str = r#"{
  "total": 5,
  "items": [
    {
      "id": "inv-1",
      "amount": 100,
      "description": "Consulting, January",
      "documentDate": "2024-12-01",
      "dueDate": "2024-12-31",
      "client": {"id": "c1", "name": "Acme", "emails": ["a@acme.test", "b@acme.test"], "phone": "050-1"},
      "url": {"he": "https://docs.test/inv-1-he", "en": "https://docs.test/inv-1-en"}
    },
    {
      "id": "inv-2",
      "amount": 250.5,
      "documentDate": "2025-01-10",
      "items": [{"dueDate": "2025-02-10"}],
      "client": {"id": "c2", "name": "Beta"}
    },
    {
      "id": "inv-3",
      "amount": 40,
      "dueDate": "2025-03-01",
      "client": {"id": "c1", "name": "Acme Renamed"}
    },
    {
      "id": "inv-4",
      "amount": 10,
      "client": {"id": "c3", "name": "No Due Date"}
    },
    {
      "id": "inv-5",
      "amount": 5,
      "dueDate": "next week"
    }
  ]
}"#;

fn export_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("invoice-export"));
    cmd.env_remove("GREENINVOICE_API_ID")
        .env_remove("GREENINVOICE_API_SECRET")
        .env_remove("GOOGLE_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_input(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("invoices.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help() {
    export_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Group open invoices by client"));
}

#[test]
fn test_version() {
    export_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice-export"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("export-config");

    export_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized invoice-export config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[greeninvoice]"));
    assert!(content.contains("Invoice Tracker"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("export-config");

    export_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    export_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_export_from_file_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), SAMPLE_INVOICES);

    let output = export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish", "--now", "2025-01-15"])
        .args(["--input", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(lines.len(), 4, "header, two clients, trailing empty: {csv:?}");

    assert!(lines[0].starts_with("client_id,client_name,client_email,client_phone,invoice1_status"));
    assert!(lines[0].ends_with("invoice2_create_date,invoice2_due_date"));

    assert_eq!(
        lines[1],
        "c1,Acme,\"a@acme.test, b@acme.test\",050-1,\
         past_due,inv-1,100,\"Consulting, January\",https://docs.test/inv-1-he,2024-12-01,2024-12-31,\
         to_be_paid,inv-3,40,,,,2025-03-01"
    );
    assert_eq!(
        lines[2],
        "c2,Beta,,,to_be_paid,inv-2,250.5,,,2025-01-10,2025-02-10,,,,,,,"
    );
    assert_eq!(lines[3], "");
}

#[test]
fn test_export_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), SAMPLE_INVOICES);
    let out = temp_dir.path().join("out.csv");

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish", "--now", "2025-01-15"])
        .args(["--input", input.to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Wrote"));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("c2,Beta"));
    assert!(!csv.contains("inv-4"));
    assert!(!csv.contains("inv-5"));
}

#[test]
fn test_export_empty_list_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "[]");

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish", "--input", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout("client_id,client_name,client_email,client_phone\r\n");
}

#[test]
fn test_export_is_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), SAMPLE_INVOICES);

    let run = || {
        export_cmd()
            .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
            .args(["export", "--no-publish", "--now", "2025-01-15T08:00:00"])
            .args(["--input", input.to_str().unwrap()])
            .output()
            .unwrap()
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn test_export_requires_api_credentials() {
    let temp_dir = TempDir::new().unwrap();

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GREENINVOICE_API_ID"));
}

#[test]
fn test_publish_requires_access_token() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), SAMPLE_INVOICES);

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("GOOGLE_ACCESS_TOKEN"));
}

#[test]
fn test_invalid_now_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "[]");

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish", "--now", "tomorrow"])
        .args(["--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --now value"));
}

#[test]
fn test_malformed_input_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "{\"items\": [");

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["export", "--no-publish", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid invoice payload"));
}

#[test]
fn test_clients_summary() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), SAMPLE_INVOICES);

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["clients", "--now", "2025-01-15"])
        .args(["--input", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("PAST DUE"))
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("Beta"))
        .stdout(predicate::str::contains("Acme Renamed").not())
        .stdout(predicate::str::contains("Total: 2 clients"));
}

#[test]
fn test_clients_empty() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), r#"{"items": []}"#);

    export_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap()])
        .args(["clients", "--input", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No open invoices."));
}
