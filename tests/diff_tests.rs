//! Structural diff integration tests over the YAML fixtures.

use oas_tools::diff::{get_diff, DiffConfig};
use oas_tools::model::Spec;
use oas_tools::parsers::parse_spec;
use std::path::Path;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn load(name: &str) -> Spec {
    parse_spec(&Path::new(FIXTURES).join(name)).expect("fixture parses")
}

#[test]
fn self_diff_is_empty_despite_cyclic_schema() {
    // Pet.friends references Pet; identity must hold anyway.
    let base = load("base.yaml");
    let diff = get_diff(&DiffConfig::new(), &base, &base).unwrap();
    assert!(diff.is_empty());
}

#[test]
fn diff_partitions_paths_and_operations() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();

    let paths = diff.paths.as_ref().unwrap();
    assert!(paths.added.contains("/api/owners"));
    assert!(paths.deleted.is_empty());

    let ops = paths.modified["/api/pets"].operations.as_ref().unwrap();
    assert!(ops.deleted.contains("DELETE"));
    assert!(ops.modified.contains_key("GET"));
}

#[test]
fn parameter_min_items_edge_is_unset_to_set() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();

    let paths = diff.paths.unwrap();
    let ops = paths.modified["/api/pets"].operations.as_ref().unwrap();
    let params = ops.modified["GET"].parameters.as_ref().unwrap();
    let filter = &params.modified["query"]["filter"];
    let min_items = filter.schema.as_ref().unwrap().min_items.as_ref().unwrap();
    assert!(min_items.from_unset());
    assert_eq!(min_items.to, serde_json::json!(2));
}

#[test]
fn response_header_and_required_property_removals_surface() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();

    let paths = diff.paths.unwrap();
    let ops = paths.modified["/api/pets"].operations.as_ref().unwrap();
    let responses = ops.modified["GET"].responses.as_ref().unwrap();
    let ok = &responses.modified["200"];

    assert!(ok.headers.as_ref().unwrap().deleted.contains("X-Rate-Limit"));

    // PetList -> items -> Pet: name left both properties and required
    let schema = ok.content.as_ref().unwrap().modified["application/json"]
        .schema
        .as_ref()
        .unwrap();
    let pet = schema.properties.as_ref().unwrap().modified["items"]
        .items
        .as_ref()
        .unwrap();
    assert!(pet.properties.as_ref().unwrap().deleted.contains("name"));
    assert_eq!(pet.required.as_ref().unwrap().deleted, vec!["name"]);
}

#[test]
fn diff_direction_swaps_added_and_deleted() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let config = DiffConfig::new();

    let forward = get_diff(&config, &base, &rev).unwrap();
    let backward = get_diff(&config, &rev, &base).unwrap();

    let fwd = forward.paths.unwrap();
    let bwd = backward.paths.unwrap();
    assert_eq!(fwd.added, bwd.deleted);
    assert_eq!(fwd.deleted, bwd.added);
}

#[test]
fn path_filter_limits_the_comparison() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let config = DiffConfig::new().with_path_filter("^/api/pets").unwrap();

    let diff = get_diff(&config, &base, &rev).unwrap();
    let paths = diff.paths.unwrap();
    assert!(paths.added.is_empty());
    assert!(paths.modified.contains_key("/api/pets"));
}

#[test]
fn diff_serializes_without_empty_nodes() {
    let base = load("base.yaml");
    let rev = load("revision.yaml");
    let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();

    let json = serde_json::to_value(&diff).unwrap();
    // unchanged facets are absent, not null
    let get = &json["paths"]["modified"]["/api/pets"]["operations"]["modified"]["GET"];
    assert!(get.get("summary").is_none());
    assert!(get.get("tags").is_none());
    assert!(get["parameters"]["modified"]["query"]["filter"]["schema"]["minItems"]["from"]
        .is_null());
}
