use assert_cmd::Command;
use predicates::prelude::*;

// Both binaries validate their input files before touching the model, so the
// failure paths run without model files or network access.

#[test]
fn student_embed_fails_on_missing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("student_embed")
        .unwrap()
        .current_dir(dir.path())
        .args(["--input", "no_such_file.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fatal error"))
        .stderr(predicate::str::contains("no_such_file.csv"));
}

#[test]
fn web_embed_fails_on_missing_chunks() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("web_embed")
        .unwrap()
        .current_dir(dir.path())
        .args(["--chunks", "no_such_chunks.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fatal error"))
        .stderr(predicate::str::contains("no_such_chunks.json"));
}

#[test]
fn web_embed_fails_on_malformed_media() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chunks.json"), "[]").unwrap();
    std::fs::write(dir.path().join("media.json"), "{broken").unwrap();
    Command::cargo_bin("web_embed")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("media.json"));
}
