// vim: tw=80
//! End-to-end runs of the seqmock-gen binary

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SRC: &str = r#"
pub struct Store;

impl Store {
    pub fn get(&self, key: &str) -> Option<u32> { None }
    pub fn put(&self, key: &str, value: u32) {}
}

pub struct Sealed;

impl Sealed {
    fn hidden(&self) {}
}
"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("store.rs");
    fs::write(&src, SRC).unwrap();
    (dir, src)
}

fn cmd() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("seqmock-gen").unwrap()
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect()
}

#[test]
fn writes_one_file_per_type() {
    let (dir, src) = setup();
    let out = dir.path().join("mocks");
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(&out)
        .arg("--mocksuffix")
        .arg("Store")
        .assert()
        .success();
    let text = read(&out, "store_mock.rs");
    assert!(text.starts_with("// Code generated by seqmock-gen; DO NOT EDIT."));
    assert!(text.contains("pub struct StoreMock"));
    assert!(text.contains("Mocks for package mocks, revision 3."));
    assert!(squash(&text).contains("#![cfg(feature=\"mock\")]"));
    assert!(text.lines().count() > 20, "{}", text);
}

#[test]
fn noformat() {
    let (dir, src) = setup();
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(dir.path())
        .args(["--noformat", "Store"])
        .assert()
        .success();
    let text = read(dir.path(), "store_mock.rs");
    assert_eq!(3, text.lines().count(), "{}", text);
    assert!(text.contains("pub struct Store"));
}

#[test]
fn explicit_names_and_options() {
    let (dir, src) = setup();
    let out = dir.path().join("out");
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(&out)
        .args(["--package", "fakes", "--revision", "1", "--fortest"])
        .arg("Store:FakeStore")
        .assert()
        .success();
    let text = read(&out, "fakestore_mock_test.rs");
    assert!(text.contains("pub struct FakeStore"));
    assert!(text.contains("Mocks for package fakes, revision 1."));
    assert!(squash(&text).contains("#![cfg(test)]"));
}

#[test]
fn partial_failure() {
    let (dir, src) = setup();
    let out = dir.path().join("mocks");
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(&out)
        .args(["Missing", "Store", "Sealed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("#1 - not found type: Missing"))
        .stderr(predicate::str::contains(
            "#2 - failed to generate mock for Sealed: no methods in type: \
             Sealed"));
    // Store still gets its mock
    assert!(out.join("store_mock.rs").exists());
    assert!(!out.join("sealed_mock.rs").exists());
}

#[test]
fn unknown_revision() {
    let (dir, src) = setup();
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(dir.path())
        .args(["--revision", "4", "Store"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mock revision: 4"));
    assert!(!dir.path().join("store_mock.rs").exists());
}

#[test]
fn unparsable_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("bad.rs");
    fs::write(&src, "impl {").unwrap();
    cmd().arg("--source").arg(&src)
        .arg("--outdir").arg(dir.path())
        .arg("Store")
        .assert()
        .failure()
        .stderr(predicate::str::contains("can't parse"));
}

#[test]
fn verbose_logs_successes() {
    let (dir, src) = setup();
    cmd().env_remove("RUST_LOG")
        .arg("--source").arg(&src)
        .arg("--outdir").arg(dir.path())
        .args(["--verbose", "Store"])
        .assert()
        .success()
        .stderr(predicate::str::contains("generated mock"));
}
