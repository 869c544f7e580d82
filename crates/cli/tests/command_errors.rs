use std::fs;

use tempfile::tempdir;

/// Every DB-backed command must fail cleanly when no case exists at root.
#[test]
fn db_commands_fail_without_an_initialized_case() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    for args in [
        vec!["case-info"],
        vec!["list-bundles"],
        vec!["list-runs"],
        vec!["add-bundle", "--path", "whatever"],
        vec!["run", "--bundle", "acq-001"],
    ] {
        assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
            .args(&args)
            .arg("--root")
            .arg(root)
            .assert()
            .failure();
    }
}

/// run must fail when the bundle name was never registered.
#[test]
fn run_fails_for_unknown_bundle() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("init-case")
        .arg("--root")
        .arg(root)
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("run")
        .arg("--root")
        .arg(root)
        .arg("--bundle")
        .arg("never-registered")
        .assert()
        .failure();
}

/// run must fail when the indicator file cannot be loaded.
#[test]
fn run_fails_for_unreadable_indicator_file() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("init-case")
        .arg("--root")
        .arg(root)
        .assert()
        .success();
    fs::create_dir_all(root.join("bundles/acq-001")).expect("bundle dir");
    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("add-bundle")
        .arg("--root")
        .arg(root)
        .arg("--path")
        .arg("bundles/acq-001")
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("run")
        .arg("--root")
        .arg(root)
        .arg("--bundle")
        .arg("acq-001")
        .arg("--iocs")
        .arg("missing-iocs.json")
        .assert()
        .failure();
}

/// run must fail when a registered bundle's directory disappeared.
#[test]
fn run_fails_when_bundle_directory_is_gone() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("init-case")
        .arg("--root")
        .arg(root)
        .assert()
        .success();
    fs::create_dir_all(root.join("bundles/acq-001")).expect("bundle dir");
    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("add-bundle")
        .arg("--root")
        .arg(root)
        .arg("--path")
        .arg("bundles/acq-001")
        .assert()
        .success();

    fs::remove_dir_all(root.join("bundles/acq-001")).expect("remove bundle");

    assert_cmd::cargo::cargo_bin_cmd!("droid-triage")
        .arg("run")
        .arg("--root")
        .arg(root)
        .arg("--bundle")
        .arg("acq-001")
        .assert()
        .failure();
}
