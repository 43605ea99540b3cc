//! Conformance tests that run YAML fixtures against nestmock
//!
//! Run with: cargo test -p nestmock-test --test conformance --features fixtures

#![cfg(feature = "fixtures")]

use nestmock_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()));
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_matching() {
    run_fixture_file("01_matching.yaml");
}

#[test]
fn test_diagnostics() {
    run_fixture_file("02_diagnostics.yaml");
}

#[test]
fn test_usage_errors() {
    run_fixture_file("03_usage_errors.yaml");
}

#[test]
fn test_every_fixture_file_is_covered() {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec!["01_matching.yaml", "02_diagnostics.yaml", "03_usage_errors.yaml"]
    );
}
