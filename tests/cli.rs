//! End-to-end runs of the `urlqr` binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn urlqr(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("urlqr").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SPDLOG_RS_LEVEL")
        .env_remove("CLICOLOR_FORCE");
    cmd
}

#[test]
fn exports_png_from_flags() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .args(["--url", "http://example.com", "--out", "result.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported QR Code!"))
        .stdout(predicate::str::contains("result.png"))
        .stderr(predicate::str::is_empty());

    let bytes = fs::read(dir.path().join("result.png")).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn prompts_for_missing_values() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .write_stdin("http://example.com\nqr\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("URL: File name: "))
        .stdout(predicate::str::contains("qr.eps"));

    let eps = fs::read_to_string(dir.path().join("qr.eps")).unwrap();
    assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
}

#[test]
fn unsupported_extension_becomes_eps() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .args(["-u", "http://example.com", "-o", "out.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("out.eps"));

    assert!(dir.path().join("out.eps").exists());
    assert!(!dir.path().join("out.jpg").exists());
}

#[test]
fn home_directory_is_expanded() {
    let dir = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    urlqr(&dir)
        .env("HOME", home.path())
        .args(["-u", "http://example.com", "-o", "~/code.svg"])
        .assert()
        .success();

    let svg = fs::read_to_string(home.path().join("code.svg")).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn vector_pdf_export() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .args(["--fast", "-o", "code.pdf", "-u", "http://example.com"])
        .assert()
        .success();

    let pdf = fs::read(dir.path().join("code.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
}

#[test]
fn write_failure_is_reported() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .args(["-u", "http://example.com", "-o", "missing/dir/code.png"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ERROR: Writing file!"))
        .stderr(predicate::str::contains("missing/dir/code.png"));
}

#[test]
fn closed_stdin_fails() {
    let dir = TempDir::new().unwrap();

    urlqr(&dir)
        .args(["-o", "code.png"])
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::contains("URL: "));

    assert!(!dir.path().join("code.png").exists());
}
