//! Composed-mode integration tests: glob expansion, pairing, and source
//! attribution.

use oas_tools::checker::{check_backward_compatibility, CheckConfig};
use oas_tools::diff::{composed_diffs, expand_glob, DiffConfig};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

#[test]
fn glob_expansion_is_sorted() {
    let files = expand_glob(&format!("{FIXTURES}/composed/base/*.yaml")).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["pets.yaml", "users.yaml"]);
}

#[test]
fn empty_glob_is_rejected() {
    let err = expand_glob(&format!("{FIXTURES}/composed/missing/*.yaml")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn pairs_are_matched_by_file_name() {
    let pairs = composed_diffs(
        &DiffConfig::new(),
        &format!("{FIXTURES}/composed/base/*.yaml"),
        &format!("{FIXTURES}/composed/revision/*.yaml"),
    )
    .unwrap();

    assert_eq!(pairs.len(), 2);
    let pets = pairs.iter().find(|p| p.source == "pets.yaml").unwrap();
    let users = pairs.iter().find(|p| p.source == "users.yaml").unwrap();
    assert!(!pets.diff.is_empty());
    assert!(users.diff.is_empty());
}

#[test]
fn findings_name_the_file_they_came_from() {
    let pairs = composed_diffs(
        &DiffConfig::new(),
        &format!("{FIXTURES}/composed/base/*.yaml"),
        &format!("{FIXTURES}/composed/revision/*.yaml"),
    )
    .unwrap();

    let pets = pairs.iter().find(|p| p.source == "pets.yaml").unwrap();
    let changes =
        check_backward_compatibility(&pets.diff, &pets.sources, &CheckConfig::default());

    let required = changes
        .iter()
        .find(|c| c.id == "request-parameter-became-required")
        .unwrap();
    assert_eq!(required.source, "pets.yaml");
    assert_eq!(required.path, "/pets");
    assert_eq!(required.operation, "GET");
}
