#![allow(dead_code)]

use lower_bounds::{Declaration, RuntimeVersion};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory holding one constraint file
pub fn setup_constraints_dir(filename: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(filename);
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Path to a shipped constraint file under testing/
pub fn shipped_constraints(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testing")
        .join(filename)
}

/// The project's declared dependencies with their lower bounds, mirroring
/// the packaging metadata the constraint files must stay in sync with.
pub fn project_declarations() -> Vec<Declaration> {
    let ranges = [
        "sqlalchemy >= 1.4.16, < 2.0.0dev",
        "google-auth >= 1.25.0, < 3.0.0dev",
        "google-cloud-bigquery >= 2.25.1, < 4.0.0dev",
        "google-cloud-bigquery-storage >= 2.0.0, < 3.0.0dev",
        "google-api-core >= 1.31.5, < 3.0.0dev",
        "grpcio >= 1.47.0, < 2.0.0dev",
        "pyarrow >= 3.0.0",
        "packaging >= 14.3",
    ];
    let mut declarations: Vec<Declaration> = ranges
        .iter()
        .map(|r| Declaration::parse(r).unwrap())
        .collect();

    // Stdlib backport, only needed before the runtime grew the module.
    declarations.push(
        Declaration::parse("dataclasses >= 0.6, < 1.0.0")
            .unwrap()
            .only_below(RuntimeVersion::new(3, 7)),
    );
    declarations
}

/// Common assertion helper for error messages
pub fn assert_error_contains(error_string: &str, expected_messages: &[&str]) {
    for msg in expected_messages {
        assert!(
            error_string.contains(msg),
            "Expected error to contain '{msg}', but got: {error_string}"
        );
    }
}
