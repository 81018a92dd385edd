//! Rules for request parameter changes.
//!
//! These rules walk the modified operations and inspect the parameter
//! partition. Most schema-facet rules compare numeric bounds through
//! [`ValueDiff::as_f64_pair`], so integer and float specs behave the same.

use super::display_value;
use crate::checker::{modified_operations, Change, CheckConfig};
use crate::diff::{Diff, OperationsSources, ParameterDiff};

/// Walk every modified parameter of every modified operation.
fn for_each_modified_parameter(
    diff: &Diff,
    mut visit: impl FnMut(&str, &str, &str, &str, &ParameterDiff),
) {
    for (path, method, op) in modified_operations(diff) {
        let Some(params) = &op.parameters else {
            continue;
        };
        for (location, name, param) in params.iter_modified() {
            visit(path, method, location, name, param);
        }
    }
}

pub(crate) fn parameter_became_required(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        if let Some(required) = &param.required {
            if required.to == serde_json::Value::Bool(true) {
                changes.push(Change::api(
                    "request-parameter-became-required",
                    config,
                    &[location, name],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    });
    changes
}

pub(crate) fn new_required_parameter(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(params) = &op.parameters else {
            continue;
        };
        for (location, names) in &params.added_required {
            for name in names {
                changes.push(Change::api(
                    "new-required-request-parameter",
                    config,
                    &[location, name],
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

pub(crate) fn parameter_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(params) = &op.parameters else {
            continue;
        };
        for (location, names) in &params.deleted {
            for name in names {
                changes.push(Change::api(
                    "request-parameter-removed",
                    config,
                    &[location, name],
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

pub(crate) fn parameter_type_changed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(schema) = &param.schema else {
            return;
        };
        // A format change alone narrows the accepted values just like a type
        // change does.
        for facet in [&schema.schema_type, &schema.format]
            .into_iter()
            .filter_map(Option::as_ref)
        {
            changes.push(Change::api(
                "request-parameter-type-changed",
                config,
                &[
                    location,
                    name,
                    &display_value(&facet.from),
                    &display_value(&facet.to),
                ],
                path,
                method,
                None,
                sources,
            ));
        }
    });
    changes
}

pub(crate) fn parameter_min_items_set(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(min_items) = param.schema.as_ref().and_then(|s| s.min_items.as_ref()) else {
            return;
        };
        if min_items.from_unset() && !min_items.to_unset() {
            changes.push(Change::api(
                "request-parameter-min-items-set",
                config,
                &[location, name, &display_value(&min_items.to)],
                path,
                method,
                None,
                sources,
            ));
        }
    });
    changes
}

pub(crate) fn parameter_min_items_increased(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(min_items) = param.schema.as_ref().and_then(|s| s.min_items.as_ref()) else {
            return;
        };
        if let Some((from, to)) = min_items.as_f64_pair() {
            if to > from {
                changes.push(Change::api(
                    "request-parameter-min-items-increased",
                    config,
                    &[
                        location,
                        name,
                        &display_value(&min_items.from),
                        &display_value(&min_items.to),
                    ],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    });
    changes
}

pub(crate) fn parameter_max_length_decreased(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(max_length) = param.schema.as_ref().and_then(|s| s.max_length.as_ref()) else {
            return;
        };
        if let Some((from, to)) = max_length.as_f64_pair() {
            if to < from {
                changes.push(Change::api(
                    "request-parameter-max-length-decreased",
                    config,
                    &[
                        location,
                        name,
                        &display_value(&max_length.from),
                        &display_value(&max_length.to),
                    ],
                    path,
                    method,
                    None,
                    sources,
                ));
            }
        }
    });
    changes
}

pub(crate) fn parameter_max_set(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(maximum) = param.schema.as_ref().and_then(|s| s.maximum.as_ref()) else {
            return;
        };
        if maximum.from_unset() && !maximum.to_unset() {
            changes.push(Change::api(
                "request-parameter-max-set",
                config,
                &[location, name, &display_value(&maximum.to)],
                path,
                method,
                None,
                sources,
            ));
        }
    });
    changes
}

pub(crate) fn parameter_pattern_changed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(pattern) = param.schema.as_ref().and_then(|s| s.pattern.as_ref()) else {
            return;
        };
        if !pattern.from_unset() && !pattern.to_unset() {
            changes.push(Change::api(
                "request-parameter-pattern-changed",
                config,
                &[
                    location,
                    name,
                    &display_value(&pattern.from),
                    &display_value(&pattern.to),
                ],
                path,
                method,
                None,
                sources,
            ));
        }
    });
    changes
}

pub(crate) fn parameter_enum_value_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for_each_modified_parameter(diff, |path, method, location, name, param| {
        let Some(enum_values) = param.schema.as_ref().and_then(|s| s.enum_values.as_ref())
        else {
            return;
        };
        for value in &enum_values.deleted {
            changes.push(Change::api(
                "request-parameter-enum-value-removed",
                config,
                &[location, name, &display_value(value)],
                path,
                method,
                None,
                sources,
            ));
        }
    });
    changes
}
