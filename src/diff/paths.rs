//! Document-level diff assembly.
//!
//! Endpoints are matched by a normalized path key: configured prefixes are
//! stripped and added per side, and unless `include_path_params` is set the
//! path parameter names are folded away, so `/pets/{id}` and `/pets/{petId}`
//! compare as the same endpoint. Reported paths keep each side's original
//! spelling.

use super::parameter::{parameters_diff, ParametersDiff};
use super::primitives::{
    extensions_diff, value_diff, value_diff_conditional, MapDiff, StringsDiff, ValueDiff,
};
use super::request_body::{request_body_diff, RequestBodyDiff};
use super::response::{response_diff, ResponseDiff};
use super::security::{security_schemes_diff, SecuritySchemeDiff};
use super::server::{servers_diff, ServerDiff};
use super::{DiffConfig, DiffContext};
use crate::error::Result;
use crate::model::{Operation, Parameter, PathItem, RefOr, Spec};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Root of the diff tree for one document pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<MapDiff<ServerDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<MapDiff<SecuritySchemeDiff>>,
}

impl Diff {
    /// True when the two documents are semantically identical under the
    /// current configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partition of the two path maps. Keys are the original path spellings:
/// the revision's for added and modified entries, the base's for deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathsDiff {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub added: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, PathItemDiff>,
    /// Operations of each added path (checker provenance, not wire data).
    #[serde(skip)]
    pub added_operations: BTreeMap<String, Vec<(String, OperationMeta)>>,
    /// Operations of each deleted path, with base-side metadata.
    #[serde(skip)]
    pub deleted_operations: BTreeMap<String, Vec<(String, OperationMeta)>>,
}

impl PathsDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// A diff between two path items matched as the same endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItemDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<OperationsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl PathItemDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partition of the operations of one endpoint, keyed by HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationsDiff {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub added: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, OperationDiff>,
    /// Revision-side metadata of added operations.
    #[serde(skip)]
    pub added_meta: BTreeMap<String, OperationMeta>,
    /// Base-side metadata of deleted operations.
    #[serde(skip)]
    pub deleted_meta: BTreeMap<String, OperationMeta>,
}

impl OperationsDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// A diff between two operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<MapDiff<ResponseDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
    /// Revision-side metadata of the operation (checker provenance).
    #[serde(skip)]
    pub revision_meta: OperationMeta,
}

impl OperationDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.operation_id.is_none()
            && self.deprecated.is_none()
            && self.tags.is_none()
            && self.parameters.is_none()
            && self.request_body.is_none()
            && self.responses.is_none()
            && self.security.is_none()
            && self.extensions.is_none()
    }
}

/// Non-diff operation facts the checkers need: identity and lifecycle
/// markers read from the document itself, not from a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationMeta {
    pub operation_id: Option<String>,
    pub sunset: Option<String>,
    pub stability: Option<String>,
    pub deprecated: bool,
}

impl OperationMeta {
    fn of(op: &Operation) -> Self {
        Self {
            operation_id: op.operation_id.clone(),
            sunset: op.sunset().map(str::to_string),
            stability: op.stability_level().map(str::to_string),
            deprecated: op.deprecated,
        }
    }
}

/// Maps each endpoint to the file it came from, so composed-mode findings
/// can name their source document.
#[derive(Debug, Clone, Default)]
pub struct OperationsSources {
    default_source: String,
    by_endpoint: BTreeMap<(String, String), String>,
}

impl OperationsSources {
    /// All endpoints share one source (plain two-file comparison).
    #[must_use]
    pub fn single(source: impl Into<String>) -> Self {
        Self {
            default_source: source.into(),
            by_endpoint: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, path: &str, method: &str, source: &str) {
        self.by_endpoint
            .insert((path.to_string(), method.to_string()), source.to_string());
    }

    #[must_use]
    pub fn get(&self, path: &str, method: &str) -> &str {
        self.by_endpoint
            .get(&(path.to_string(), method.to_string()))
            .map_or(self.default_source.as_str(), String::as_str)
    }
}

/// Compare two parsed documents under `config`.
pub fn get_diff(config: &DiffConfig, base: &Spec, rev: &Spec) -> Result<Diff> {
    let ctx = DiffContext::new(config, base, rev);

    let servers = if config.is_excluded("servers") {
        None
    } else {
        servers_diff(&ctx, &base.servers, &rev.servers)?
    };
    let security_schemes = if config.is_excluded("security") {
        None
    } else {
        security_schemes_diff(
            &ctx,
            &base.components.security_schemes,
            &rev.components.security_schemes,
        )?
    };

    Ok(Diff {
        paths: paths_diff(&ctx)?,
        servers,
        security_schemes,
    })
}

/// Fold `{name}` segments into bare `{}` so parameter renames do not break
/// endpoint matching.
fn fold_path_params(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_param = false;
    for c in path.chars() {
        match c {
            '{' => {
                in_param = true;
                out.push('{');
            }
            '}' => {
                in_param = false;
                out.push('}');
            }
            _ if in_param => {}
            _ => out.push(c),
        }
    }
    out
}

fn normalize_path(config: &DiffConfig, path: &str, strip: &str, add: &str) -> String {
    let stripped = if !strip.is_empty() {
        path.strip_prefix(strip).unwrap_or(path)
    } else {
        path
    };
    let prefixed = format!("{add}{stripped}");
    if config.include_path_params {
        prefixed
    } else {
        fold_path_params(&prefixed)
    }
}

/// Index one side's paths by normalized key, keeping the original spelling
/// for reporting. Paths rejected by the path filter are dropped.
fn index_paths<'a>(
    config: &DiffConfig,
    spec: &'a Spec,
    strip: &str,
    add: &str,
) -> BTreeMap<String, (&'a str, &'a PathItem)> {
    let mut index = BTreeMap::new();
    for (path, item) in &spec.paths {
        if let Some(filter) = &config.path_filter {
            if !filter.is_match(path) {
                continue;
            }
        }
        let key = normalize_path(config, path, strip, add);
        index.insert(key, (path.as_str(), item));
    }
    index
}

fn paths_diff(ctx: &DiffContext) -> Result<Option<PathsDiff>> {
    let config = ctx.config;
    let base = index_paths(
        config,
        ctx.base,
        &config.path_strip_prefix_base,
        &config.path_prefix_base,
    );
    let rev = index_paths(
        config,
        ctx.rev,
        &config.path_strip_prefix_revision,
        &config.path_prefix_revision,
    );

    let mut result = PathsDiff::default();

    for (key, (base_path, base_item)) in &base {
        match rev.get(key) {
            None => {
                result.deleted.insert((*base_path).to_string());
                result.deleted_operations.insert(
                    (*base_path).to_string(),
                    base_item
                        .operations()
                        .map(|(m, op)| (m.to_string(), OperationMeta::of(op)))
                        .collect(),
                );
            }
            Some((rev_path, rev_item)) => {
                if let Some(diff) = path_item_diff(ctx, base_item, rev_item)? {
                    result.modified.insert((*rev_path).to_string(), diff);
                }
            }
        }
    }
    for (key, (rev_path, rev_item)) in &rev {
        if !base.contains_key(key) {
            result.added.insert((*rev_path).to_string());
            result.added_operations.insert(
                (*rev_path).to_string(),
                rev_item
                    .operations()
                    .map(|(m, op)| (m.to_string(), OperationMeta::of(op)))
                    .collect(),
            );
        }
    }

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

fn path_item_diff(
    ctx: &DiffContext,
    base: &PathItem,
    rev: &PathItem,
) -> Result<Option<PathItemDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = PathItemDiff {
        summary: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.summary,
            &rev.summary,
        ),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        operations: operations_diff(ctx, base, rev)?,
        extensions: if trim || config.is_excluded("extensions") {
            None
        } else {
            extensions_diff(&base.extensions, &rev.extensions)
        },
    };

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

fn operations_diff(
    ctx: &DiffContext,
    base: &PathItem,
    rev: &PathItem,
) -> Result<Option<OperationsDiff>> {
    let mut result = OperationsDiff::default();

    for (method, base_op) in base.operations() {
        match rev.operation(method) {
            None => {
                result.deleted.insert(method.to_string());
                result
                    .deleted_meta
                    .insert(method.to_string(), OperationMeta::of(base_op));
            }
            Some(rev_op) => {
                if let Some(diff) =
                    operation_diff(ctx, &base.parameters, base_op, &rev.parameters, rev_op)?
                {
                    result.modified.insert(method.to_string(), diff);
                }
            }
        }
    }
    for (method, rev_op) in rev.operations() {
        if base.operation(method).is_none() {
            result.added.insert(method.to_string());
            result
                .added_meta
                .insert(method.to_string(), OperationMeta::of(rev_op));
        }
    }

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

/// Path-level parameters apply to every operation; an operation-level
/// parameter with the same (location, name) overrides them.
fn merged_parameters(path_level: &[RefOr<Parameter>], op: &Operation) -> Vec<RefOr<Parameter>> {
    path_level
        .iter()
        .chain(op.parameters.iter())
        .cloned()
        .collect()
}

fn operation_diff(
    ctx: &DiffContext,
    base_path_params: &[RefOr<Parameter>],
    base: &Operation,
    rev_path_params: &[RefOr<Parameter>],
    rev: &Operation,
) -> Result<Option<OperationDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let base_params = merged_parameters(base_path_params, base);
    let rev_params = merged_parameters(rev_path_params, rev);

    let responses = MapDiff::diff(&base.responses, &rev.responses, |b, r| {
        let b = ctx.base.resolve_response(b)?;
        let r = ctx.rev.resolve_response(r)?;
        response_diff(ctx, b, r)
    })?;

    let result = OperationDiff {
        summary: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.summary,
            &rev.summary,
        ),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        operation_id: value_diff(&base.operation_id, &rev.operation_id),
        deprecated: value_diff(&base.deprecated, &rev.deprecated),
        tags: StringsDiff::diff(&base.tags, &rev.tags),
        parameters: parameters_diff(ctx, &base_params, &rev_params)?,
        request_body: request_body_diff(ctx, base.request_body.as_ref(), rev.request_body.as_ref())?,
        responses,
        security: value_diff_conditional(
            config.is_excluded("security"),
            &base.security,
            &rev.security,
        ),
        extensions: if trim || config.is_excluded("extensions") {
            None
        } else {
            extensions_diff(&base.extensions, &rev.extensions)
        },
        revision_meta: OperationMeta::of(rev),
    };

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Response;

    fn spec_with_path(path: &str, item: PathItem) -> Spec {
        let mut spec = Spec {
            openapi: "3.0.0".to_string(),
            ..Spec::default()
        };
        spec.paths.insert(path.to_string(), item);
        spec
    }

    fn get_op() -> Operation {
        let mut op = Operation::default();
        op.responses
            .insert("200".to_string(), RefOr::item(Response::default()));
        op
    }

    #[test]
    fn test_self_diff_is_empty() {
        let spec = spec_with_path(
            "/pets/{id}",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let diff = get_diff(&DiffConfig::new(), &spec, &spec).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_path_param_rename_matches_same_endpoint() {
        let base = spec_with_path(
            "/pets/{id}",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let rev = spec_with_path(
            "/pets/{petId}",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_include_path_params_keeps_names_distinct() {
        let base = spec_with_path(
            "/pets/{id}",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let rev = spec_with_path(
            "/pets/{petId}",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let config = DiffConfig {
            include_path_params: true,
            ..DiffConfig::new()
        };
        let diff = get_diff(&config, &base, &rev).unwrap();
        let paths = diff.paths.unwrap();
        assert!(paths.added.contains("/pets/{petId}"));
        assert!(paths.deleted.contains("/pets/{id}"));
    }

    #[test]
    fn test_strip_prefix_aligns_versioned_base() {
        let base = spec_with_path(
            "/api/v1/pets",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let rev = spec_with_path(
            "/pets",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let config = DiffConfig {
            path_strip_prefix_base: "/api/v1".to_string(),
            ..DiffConfig::new()
        };
        assert!(get_diff(&config, &base, &rev).unwrap().is_empty());
    }

    #[test]
    fn test_removed_operation_keeps_base_metadata() {
        let mut deprecated_op = get_op();
        deprecated_op.deprecated = true;
        let base = spec_with_path(
            "/pets",
            PathItem {
                get: Some(get_op()),
                delete: Some(deprecated_op),
                ..PathItem::default()
            },
        );
        let rev = spec_with_path(
            "/pets",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();
        let ops = diff.paths.unwrap().modified["/pets"]
            .operations
            .clone()
            .unwrap();
        assert!(ops.deleted.contains("DELETE"));
        assert!(ops.deleted_meta["DELETE"].deprecated);
    }

    #[test]
    fn test_path_level_parameter_merged_into_operation() {
        let param = RefOr::item(Parameter {
            name: "tenant".to_string(),
            location: "header".to_string(),
            required: true,
            ..Parameter::default()
        });
        let base = spec_with_path(
            "/pets",
            PathItem {
                get: Some(get_op()),
                parameters: vec![param],
                ..PathItem::default()
            },
        );
        let rev = spec_with_path(
            "/pets",
            PathItem {
                get: Some(get_op()),
                ..PathItem::default()
            },
        );
        let diff = get_diff(&DiffConfig::new(), &base, &rev).unwrap();
        let ops = diff.paths.unwrap().modified["/pets"]
            .operations
            .clone()
            .unwrap();
        let params = ops.modified["GET"].parameters.as_ref().unwrap();
        assert!(params.deleted["header"].contains("tenant"));
    }

    #[test]
    fn test_sources_fall_back_to_default() {
        let mut sources = OperationsSources::single("base.yaml");
        sources.insert("/pets", "GET", "pets.yaml");
        assert_eq!(sources.get("/pets", "GET"), "pets.yaml");
        assert_eq!(sources.get("/other", "GET"), "base.yaml");
    }
}
