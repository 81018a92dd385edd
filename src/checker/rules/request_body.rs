//! Rules for request body changes.

use crate::checker::{modified_operations, Change, CheckConfig};
use crate::diff::{Diff, OperationsSources};

pub(crate) fn body_became_required(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(body) = &op.request_body else {
            continue;
        };
        // Covers both an existing optional body becoming required and a new
        // required body appearing (the unset-to-true edge).
        if let Some(required) = &body.required {
            if required.to == serde_json::Value::Bool(true) {
                changes.push(Change::api(
                    "request-body-became-required",
                    config,
                    &[],
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

pub(crate) fn media_type_removed(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (path, method, op) in modified_operations(diff) {
        let Some(content) = op.request_body.as_ref().and_then(|b| b.content.as_ref()) else {
            continue;
        };
        for media_type in &content.deleted {
            changes.push(Change::api(
                "request-media-type-removed",
                config,
                &[media_type],
                path,
                method,
                None,
                sources,
            ));
        }
    }
    changes
}
