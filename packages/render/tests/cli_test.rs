//! Tests for the `dccode-render` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn copy_fixtures(to: &Path) {
    let from = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/code");
    for entry in walkdir::WalkDir::new(&from) {
        let entry = entry.unwrap();
        let target = to.join(entry.path().strip_prefix(&from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(target).unwrap();
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

fn cli() -> Command {
    Command::cargo_bin("dccode-render").unwrap()
}

#[test]
fn test_index_render_lookup() {
    let dir = TempDir::new().unwrap();
    copy_fixtures(dir.path());

    cli()
        .arg("index")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages: 5"));
    assert!(dir.path().join("section_index.json").exists());
    assert!(dir.path().join("by_title/1.json").exists());

    cli()
        .args(["render", "--workers", "2", "--link-root", "dc/"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered: 5"));
    let page = fs::read_to_string(dir.path().join("Title-1/Chapter-1/1-101.html")).unwrap();
    assert!(page.contains("href='/dc/Title-1/Chapter-1/1-102.html'"));

    cli()
        .arg("lookup")
        .arg(dir.path())
        .arg("§ 1-102")
        .assert()
        .success()
        .stdout("Title-1/Chapter-1/1-102.html\n");
}

#[test]
fn test_render_reports_failures() {
    let dir = TempDir::new().unwrap();
    copy_fixtures(dir.path());
    fs::write(dir.path().join("Title-1/broken.xml"), "<level><text>").unwrap();

    cli()
        .arg("render")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Title-1/broken.xml"))
        .stderr(predicate::str::contains("1 of 6 files failed"));
}

#[test]
fn test_missing_basedir_fails() {
    cli()
        .args(["index", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_unknown_citation_fails() {
    let dir = TempDir::new().unwrap();
    copy_fixtures(dir.path());
    cli().arg("index").arg(dir.path()).assert().success();

    cli()
        .arg("lookup")
        .arg(dir.path())
        .arg("no citation here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a code citation"));
}
