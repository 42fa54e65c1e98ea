// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use super::*;

fn allowlist() -> Vec<PathBuf> {
    vec![PathBuf::from("/home/u/projects")]
}

#[test]
fn accepts_exact_entry() {
    assert!(is_allowed(Path::new("/home/u/projects"), &allowlist()));
}

#[test]
fn accepts_subdirectory() {
    assert!(is_allowed(Path::new("/home/u/projects/x"), &allowlist()));
}

#[test]
fn rejects_sibling_with_shared_prefix_but_no_separator() {
    assert!(!is_allowed(Path::new("/home/u/projects-evil"), &allowlist()));
}

#[test]
fn rejects_unrelated_path() {
    assert!(!is_allowed(Path::new("/etc"), &allowlist()));
}

#[test]
fn normalizes_dot_dot_before_comparing() {
    assert!(is_allowed(Path::new("/home/u/projects/x/../y"), &allowlist()));
    assert!(!is_allowed(Path::new("/home/u/projects/../../etc"), &allowlist()));
}

#[test]
fn rejects_a_symlink_that_escapes_the_allowlisted_directory() {
    let root = tempfile::tempdir().unwrap();
    let allowed_dir = root.path().join("allowed");
    let outside_dir = root.path().join("outside");
    std::fs::create_dir(&allowed_dir).unwrap();
    std::fs::create_dir(&outside_dir).unwrap();

    let escape = allowed_dir.join("escape");
    std::os::unix::fs::symlink(&outside_dir, &escape).unwrap();

    assert!(is_allowed(&allowed_dir, &[allowed_dir.clone()]));
    assert!(!is_allowed(&escape, &[allowed_dir]));
}
