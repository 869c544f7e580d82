use std::fs;
use std::path::Path;

use droid_triage::{canonicalize_or_current, infer_case_name, sha256_file};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn infer_case_name_uses_last_path_component() {
    assert_eq!(infer_case_name(Path::new("/tmp/pegasus-2024")), "pegasus-2024");
    assert_eq!(infer_case_name(Path::new("C:/work/device-triage")), "device-triage");
}

#[test]
fn infer_case_name_falls_back_when_missing() {
    assert_eq!(infer_case_name(Path::new("/")), "unnamed-case");
}

#[test]
fn sha256_file_matches_known_vector() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("abc.txt");
    fs::write(&path, "abc").expect("write");

    let digest = sha256_file(&path).expect("hash");
    assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

#[test]
fn sha256_file_fails_for_missing_file() {
    let tmp = tempdir().expect("tempdir");
    assert!(sha256_file(&tmp.path().join("gone.txt")).is_err());
}
