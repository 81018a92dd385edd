//! Rules for added and removed endpoints.

use super::display_value;
use crate::checker::{modified_operations, Change, CheckConfig};
use crate::diff::{Diff, OperationsSources};

pub(crate) fn path_removed_without_deprecation(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let Some(paths) = &diff.paths else {
        return Vec::new();
    };
    let mut changes = Vec::new();
    for (path, operations) in &paths.deleted_operations {
        for (method, meta) in operations {
            if !meta.deprecated {
                changes.push(Change::api(
                    "api-path-removed-without-deprecation",
                    config,
                    &[],
                    path,
                    method,
                    meta.operation_id.as_deref(),
                    sources,
                ));
            }
        }
    }
    changes
}

pub(crate) fn operation_removed_without_deprecation(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let Some(paths) = &diff.paths else {
        return Vec::new();
    };
    let mut changes = Vec::new();
    for (path, item) in &paths.modified {
        let Some(ops) = &item.operations else {
            continue;
        };
        for (method, meta) in &ops.deleted_meta {
            if !meta.deprecated {
                changes.push(Change::api(
                    "api-removed-without-deprecation",
                    config,
                    &[],
                    path,
                    method,
                    meta.operation_id.as_deref(),
                    sources,
                ));
            }
        }
    }
    changes
}

pub(crate) fn path_added(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let Some(paths) = &diff.paths else {
        return Vec::new();
    };
    let mut changes = Vec::new();
    for (path, operations) in &paths.added_operations {
        for (method, meta) in operations {
            changes.push(Change::api(
                "api-path-added",
                config,
                &[],
                path,
                method,
                meta.operation_id.as_deref(),
                sources,
            ));
        }
    }
    changes
}

pub(crate) fn operation_added(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let Some(paths) = &diff.paths else {
        return Vec::new();
    };
    let mut changes = Vec::new();
    for (path, item) in &paths.modified {
        let Some(ops) = &item.operations else {
            continue;
        };
        for (method, meta) in &ops.added_meta {
            changes.push(Change::api(
                "api-operation-added",
                config,
                &[],
                path,
                method,
                meta.operation_id.as_deref(),
                sources,
            ));
        }
    }
    changes
}

pub(crate) fn operation_id_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        if let Some(id_diff) = &op.operation_id {
            if id_diff.to_unset() {
                changes.push(Change::api(
                    "api-operation-id-removed",
                    config,
                    &[&display_value(&id_diff.from)],
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
