//! Rules for response changes.

use crate::checker::{modified_operations, Change, CheckConfig};
use crate::diff::{Diff, OperationsSources, SchemaDiff};

fn is_success(status: &str) -> bool {
    status.starts_with('2')
}

pub(crate) fn success_status_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    status_removed(diff, sources, config, "response-success-status-removed", true)
}

pub(crate) fn non_success_status_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    status_removed(
        diff,
        sources,
        config,
        "response-non-success-status-removed",
        false,
    )
}

fn status_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
    id: &'static str,
    success: bool,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(responses) = &op.responses else {
            continue;
        };
        for status in &responses.deleted {
            if is_success(status) == success {
                changes.push(Change::api(
                    id,
                    config,
                    &[status],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    }
    changes
}

/// Property names that were removed while also leaving the `required` list,
/// collected from the whole nested schema diff.
fn removed_required_properties(schema: &SchemaDiff, out: &mut Vec<String>) {
    if let (Some(properties), Some(required)) = (&schema.properties, &schema.required) {
        for name in &properties.deleted {
            if required.deleted.contains(name) {
                out.push(name.clone());
            }
        }
    }
    if let Some(items) = &schema.items {
        removed_required_properties(items, out);
    }
    if let Some(properties) = &schema.properties {
        for nested in properties.modified.values() {
            removed_required_properties(nested, out);
        }
    }
    for subschemas in [&schema.all_of, &schema.one_of, &schema.any_of]
        .into_iter()
        .flatten()
    {
        for nested in subschemas.modified.values() {
            removed_required_properties(nested, out);
        }
    }
}

pub(crate) fn required_property_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(responses) = &op.responses else {
            continue;
        };
        for (status, response) in &responses.modified {
            let Some(content) = &response.content else {
                continue;
            };
            for media_type in content.modified.values() {
                let Some(schema) = &media_type.schema else {
                    continue;
                };
                let mut removed = Vec::new();
                removed_required_properties(schema, &mut removed);
                for property in removed {
                    changes.push(Change::api(
                        "response-required-property-removed",
                        config,
                        &[&property, status],
                        path,
                        method,
                        None,
                        sources,
                    ));
                }
            }
        }
    }
    changes
}

pub(crate) fn header_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(responses) = &op.responses else {
            continue;
        };
        for (status, response) in &responses.modified {
            let Some(headers) = &response.headers else {
                continue;
            };
            for header in &headers.deleted {
                changes.push(Change::api(
                    "response-header-removed",
                    config,
                    &[header, status],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    }
    changes
}

pub(crate) fn media_type_added(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(responses) = &op.responses else {
            continue;
        };
        for (status, response) in &responses.modified {
            let Some(content) = &response.content else {
                continue;
            };
            for media_type in &content.added {
                changes.push(Change::api(
                    "response-media-type-added",
                    config,
                    &[media_type, status],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    }
    changes
}
