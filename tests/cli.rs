use predicates::prelude::*;
use assert_cmd::Command;
use tempfile::tempdir;

fn quick_reader(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("quick-reader").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn test_dump_welcome_text() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.arg("--dump");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("0-6\tWelcome\n"))
        .stdout(predicate::str::contains("56-63\tquickly."));
}

#[test]
fn test_dump_file_with_chunk_size() {
    let home = tempdir().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("fox.txt");
    std::fs::write(&path, "The quick  brown fox").unwrap();

    let mut cmd = quick_reader(home.path());
    cmd.args(["--dump", "-k", "2"]).arg(&path);
    cmd.assert()
        .success()
        .stdout("0-8\tThe quick\n11-19\tbrown fox\n");
}

#[test]
fn test_dump_json() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.args(["--dump", "--json", "--chunk-size", "5"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let chunks: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let chunks = chunks.as_array().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["start_offset"], 0);
    assert_eq!(chunks[0]["word_count"], 5);
    assert_eq!(chunks[1]["text"], "start to begin reading quickly.");
}

#[test]
fn test_dump_reads_stdin() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.args(["--dump", "-"]).write_stdin("один два");
    cmd.assert().success().stdout("0-3\tодин\n5-7\tдва\n");
}

#[test]
fn test_first_run_writes_default_configuration() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.arg("--dump");
    cmd.assert().success();

    let saved = home.path().join("quick-reader").join("configuration.json");
    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
    assert_eq!(config["Setting"]["default_wpm"], 300);
    assert_eq!(config["Keymap"]["toggle_play"], " ");
}

#[test]
fn test_dump_uses_configured_chunk_size() {
    let home = tempdir().unwrap();
    let config = home.path().join("custom.json");
    std::fs::write(&config, r#"{"Setting": {"default_chunk_size": 10}}"#).unwrap();

    let mut cmd = quick_reader(home.path());
    cmd.arg("--dump").arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("0-63\tWelcome to"));
}

#[test]
fn test_missing_file_fails() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.args(["--dump", "does-not-exist.txt"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_json_requires_dump() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.arg("--json");
    cmd.assert().failure();
}

#[test]
fn test_zero_wpm_is_rejected() {
    let home = tempdir().unwrap();
    let mut cmd = quick_reader(home.path());
    cmd.args(["--dump", "-w", "0"]);
    cmd.assert().failure();
}
