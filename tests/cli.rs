use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn notez(home: &Path, owner: Option<&str>) -> Command {
    let mut cmd = Command::cargo_bin("notez").unwrap();
    cmd.env("NOTEZ_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("NOTEZ_OWNER");
    if let Some(owner) = owner {
        cmd.env("NOTEZ_OWNER", owner);
    }
    cmd
}

#[test]
fn add_list_view_delete_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path().join("home");
    let source = temp_dir.path().join("week1.md");
    std::fs::write(&source, "# Topic\n\nCells **divide**.").unwrap();

    notez(&home, Some("ana"))
        .arg("add")
        .arg(&source)
        .arg("--tags")
        .arg("bio, exam")
        .assert()
        .success()
        .stdout(predicate::str::contains("Note created: week1"));

    notez(&home, Some("ana"))
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. week1 #bio #exam"));

    notez(&home, Some("ana"))
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Topic</h1>"))
        .stdout(predicate::str::contains("<strong>divide</strong>"));

    notez(&home, Some("ana"))
        .args(["view", "1", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cells **divide**."));

    notez(&home, Some("ana"))
        .args(["rm", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note deleted (1): week1"));

    notez(&home, Some("ana"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn notes_are_private_to_their_owner() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path();

    notez(home, Some("ana"))
        .args(["add", "--title", "Secret", "--text", "mine"])
        .assert()
        .success();

    notez(home, None)
        .args(["--owner", "bo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn without_an_owner_note_commands_are_unauthorized() {
    let temp_dir = tempfile::tempdir().unwrap();

    notez(temp_dir.path(), None)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));
}

#[test]
fn binary_file_falls_back_to_upload_without_extractor() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path().join("home");
    let scan = temp_dir.path().join("scan.pdf");
    std::fs::write(&scan, b"%PDF-1.4 fake").unwrap();

    notez(&home, Some("ana"))
        .arg("add")
        .arg(&scan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Note created: scan"))
        .stdout(predicate::str::contains("[pdf] scan.pdf"));

    notez(&home, Some("ana"))
        .args(["view", "1", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[scan.pdf](file://"));

    let blobs = home.join("blobs").join("ana");
    assert_eq!(std::fs::read_dir(blobs).unwrap().count(), 1);
}

#[test]
fn unprocessable_file_is_reported_by_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path().join("home");
    let tool = temp_dir.path().join("tool.exe");
    std::fs::write(&tool, [0u8, 1, 2]).unwrap();

    notez(&home, Some("ana"))
        .arg("add")
        .arg(&tool)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "tool.exe: no extraction service configured (upload fallback: Unsupported file type",
        ))
        .stderr(predicate::str::contains("Please provide title and content"));
}

#[test]
fn preview_does_not_store_anything() {
    let temp_dir = tempfile::tempdir().unwrap();
    let home = temp_dir.path().join("home");
    let source = temp_dir.path().join("draft.txt");
    std::fs::write(&source, "  just text  \n").unwrap();

    notez(&home, Some("ana"))
        .arg("preview")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("draft"))
        .stdout(predicate::str::contains("just text"));

    notez(&home, Some("ana"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));
}

#[test]
fn render_reads_stdin() {
    let temp_dir = tempfile::tempdir().unwrap();

    notez(temp_dir.path(), None)
        .arg("render")
        .write_stdin("**hi** <script>\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<p><strong>hi</strong> &lt;script&gt;</p>",
        ));
}
