//! Concurrency tests for wkt.
//!
//! These tests verify that multiple processes can safely:
//! - Mutate the store simultaneously (store lock)
//! - Append finished sessions to the journal (file locking)

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wkt"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .arg("--data-dir")
        .arg(home.join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn id_from(output: &[u8]) -> String {
    String::from_utf8_lossy(output)
        .lines()
        .find_map(|line| line.trim().strip_prefix("id: "))
        .map(str::to_string)
        .expect("no id line in output")
}

fn store_json(home: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(home.join("data/store.json")).expect("Failed to read store");
    serde_json::from_str(&raw).expect("store is not valid JSON")
}

#[test]
fn test_concurrent_exercise_creation() {
    let temp_dir = setup_test_dir();
    let home: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let home = home.clone();
            thread::spawn(move || {
                cli(&home)
                    .args(["exercise", "create", "--type", "reps", "--muscle", "back"])
                    .arg("--name")
                    .arg(format!("Row Variation {}", i))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every create must survive; a lost update would drop one
    let store = store_json(&home);
    let exercises = store["exercises"].as_array().expect("exercises array");
    assert_eq!(exercises.len(), 8, "Expected 8 exercises, got {}", exercises.len());
}

#[test]
fn test_concurrent_session_finishing() {
    let temp_dir = setup_test_dir();
    let home: PathBuf = temp_dir.path().to_path_buf();

    let plank = id_from(
        &cli(&home)
            .args(["exercise", "create", "--name", "Plank", "--type", "timed"])
            .args(["--muscle", "core"])
            .assert()
            .success()
            .get_output()
            .stdout,
    );
    let plan = id_from(
        &cli(&home)
            .args(["plan", "create", "--name", "Core"])
            .args(["--trainer", "00000000-0000-0000-0000-00000000000a"])
            .assert()
            .success()
            .get_output()
            .stdout,
    );
    cli(&home)
        .args(["plan", "add", &plan, &plank, "--sets", "2", "--duration", "30s"])
        .assert()
        .success();

    let sessions: Vec<String> = (0..5)
        .map(|_| {
            id_from(
                &cli(&home)
                    .args(["session", "start", &plan])
                    .args(["--client", "00000000-0000-0000-0000-00000000000c"])
                    .assert()
                    .success()
                    .get_output()
                    .stdout,
            )
        })
        .collect();

    let handles: Vec<_> = sessions
        .into_iter()
        .map(|session| {
            let home = home.clone();
            thread::spawn(move || {
                cli(&home)
                    .args(["session", "complete", &session])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let journal = std::fs::read_to_string(home.join("data/journal/sessions.jsonl"))
        .expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 5);
    for line in journal.lines() {
        let record: serde_json::Value =
            serde_json::from_str(line).expect("journal line is not valid JSON");
        assert_eq!(record["status"], "completed");
    }

    let store = store_json(&home);
    let completed = store["sessions"]
        .as_array()
        .expect("sessions array")
        .iter()
        .filter(|s| s["status"] == "completed")
        .count();
    assert_eq!(completed, 5);
}
