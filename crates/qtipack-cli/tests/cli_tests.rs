//! CLI integration tests using assert_cmd.

use std::io::Cursor;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK: &str = r#"[
    {"question": "Q1?", "options": {"A) true one": true, "B) false one": false}, "success": "Good", "error": "Bad"},
    {"question": "Value is $x$ when...", "options": {"A) yes": true, "B) no": true, "C) maybe": false}}
]"#;

fn qtipack() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("qtipack").unwrap()
}

fn write_bank(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("bank.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn build_writes_archive() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, BANK);
    let output = dir.path().join("out").join("package.zip");

    qtipack()
        .current_dir(dir.path())
        .arg("build")
        .arg("--bank")
        .arg(&bank)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Item 1 -> I"))
        .stdout(predicate::str::contains("Wrote 2 item(s)"));

    let bytes = std::fs::read(&output).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3);
    assert!(archive.by_name("imsmanifest.xml").is_ok());
}

#[test]
fn build_json_summary() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, BANK);
    let output = dir.path().join("package.zip");

    let assert = qtipack()
        .current_dir(dir.path())
        .arg("build")
        .arg("--bank")
        .arg(&bank)
        .arg("--output")
        .arg(&output)
        .arg("--json")
        .arg("--item-name-prefix")
        .arg("Frage")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["items"].as_array().unwrap().len(), 2);
    assert_eq!(summary["items"][1]["title"], "Frage 2");
    assert_eq!(summary["items"][0]["index"], 0);
}

#[test]
fn build_empty_options_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(
        &dir,
        r#"[{"question": "ok", "options": {"a": true}}, {"question": "bad", "options": {}}]"#,
    );
    let output = dir.path().join("package.zip");

    qtipack()
        .current_dir(dir.path())
        .arg("build")
        .arg("--bank")
        .arg(&bank)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 1: options list is empty"));

    assert!(!output.exists());
}

#[test]
fn build_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "{ not json");

    qtipack()
        .current_dir(dir.path())
        .arg("build")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid question bank"));
}

#[test]
fn build_uses_config_output() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, BANK);
    std::fs::write(
        dir.path().join("qtipack.toml"),
        "output = \"from-config.zip\"\n[package]\nshuffle = false\n",
    )
    .unwrap();

    qtipack()
        .current_dir(dir.path())
        .arg("build")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success();

    assert!(dir.path().join("from-config.zip").exists());
}

#[test]
fn validate_prints_table() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, BANK);

    qtipack()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct"))
        .stdout(predicate::str::contains("ID_1").not())
        .stdout(predicate::str::contains("Value is $$x$$ when..."))
        .stdout(predicate::str::contains("2 question(s) valid."));
}

#[test]
fn validate_no_correct_option_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, r#"[{"question": "Q", "options": {"a": false}}]"#);

    qtipack()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no option is marked correct"));
}

#[test]
fn validate_nonexistent_file() {
    qtipack()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    qtipack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created qtipack.toml"))
        .stdout(predicate::str::contains("Created questions.json"));

    assert!(dir.path().join("qtipack.toml").exists());
    assert!(dir.path().join("questions.json").exists());

    qtipack()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("questions.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 question(s) valid."));
}

#[test]
fn init_skips_existing_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("qtipack.toml"), "# mine\n").unwrap();

    qtipack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));

    let content = std::fs::read_to_string(dir.path().join("qtipack.toml")).unwrap();
    assert_eq!(content, "# mine\n");
}

#[test]
fn help_lists_commands() {
    qtipack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("init"));
}
