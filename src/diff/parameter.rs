//! Parameter diff composer.
//!
//! Parameters are keyed by (location, name); [`ParametersDiff`] keeps the
//! two-level partition so checkers can report the location ("query", "path",
//! "header", "cookie") alongside the parameter name.

use super::media_type::{content_diff, MediaTypeDiff};
use super::primitives::{extensions_diff, value_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::schema::{opt_schema_diff, RefChain, SchemaDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::{Parameter, RefOr};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A diff between two parameter objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MapDiff<MediaTypeDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl ParameterDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partition of two parameter lists, keyed by location then name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParametersDiff {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub added: BTreeMap<String, BTreeSet<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub deleted: BTreeMap<String, BTreeSet<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<String, BTreeMap<String, ParameterDiff>>,
    /// Added parameters that the revision marks required (provenance for
    /// the new-required-request-parameter rule; not part of the wire diff).
    #[serde(skip)]
    pub added_required: BTreeMap<String, BTreeSet<String>>,
}

impl ParametersDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// Iterate modified parameters as (location, name, diff).
    pub fn iter_modified(&self) -> impl Iterator<Item = (&str, &str, &ParameterDiff)> {
        self.modified.iter().flat_map(|(location, by_name)| {
            by_name
                .iter()
                .map(move |(name, diff)| (location.as_str(), name.as_str(), diff))
        })
    }
}

pub(crate) fn parameter_diff(
    ctx: &DiffContext,
    base: &Parameter,
    rev: &Parameter,
) -> Result<Option<ParameterDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = ParameterDiff {
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        required: value_diff(&base.required, &rev.required),
        deprecated: value_diff(&base.deprecated, &rev.deprecated),
        style: value_diff(&base.style, &rev.style),
        explode: value_diff(&base.explode, &rev.explode),
        example: value_diff_conditional(
            trim || config.is_excluded("examples"),
            &base.example,
            &rev.example,
        ),
        schema: opt_schema_diff(
            ctx,
            &RefChain::new(config.max_circular_refs),
            base.schema.as_ref(),
            rev.schema.as_ref(),
        )?,
        content: content_diff(ctx, &base.content, &rev.content)?,
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

/// Diff two parameter lists, resolving `$ref` entries and keying by
/// (location, name). Returns `None` when nothing changed.
pub(crate) fn parameters_diff(
    ctx: &DiffContext,
    base: &[RefOr<Parameter>],
    rev: &[RefOr<Parameter>],
) -> Result<Option<ParametersDiff>> {
    let mut base_by_key: BTreeMap<(String, String), &Parameter> = BTreeMap::new();
    for node in base {
        let p = ctx.base.resolve_parameter(node)?;
        base_by_key.insert((p.location.clone(), p.name.clone()), p);
    }
    let mut rev_by_key: BTreeMap<(String, String), &Parameter> = BTreeMap::new();
    for node in rev {
        let p = ctx.rev.resolve_parameter(node)?;
        rev_by_key.insert((p.location.clone(), p.name.clone()), p);
    }

    let mut result = ParametersDiff::default();

    for ((location, name), base_param) in &base_by_key {
        match rev_by_key.get(&(location.clone(), name.clone())) {
            None => {
                result
                    .deleted
                    .entry(location.clone())
                    .or_default()
                    .insert(name.clone());
            }
            Some(rev_param) => {
                if let Some(diff) = parameter_diff(ctx, base_param, rev_param)? {
                    result
                        .modified
                        .entry(location.clone())
                        .or_default()
                        .insert(name.clone(), diff);
                }
            }
        }
    }
    for ((location, name), rev_param) in &rev_by_key {
        if !base_by_key.contains_key(&(location.clone(), name.clone())) {
            result
                .added
                .entry(location.clone())
                .or_default()
                .insert(name.clone());
            if rev_param.required {
                result
                    .added_required
                    .entry(location.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }
    }

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffConfig;
    use crate::model::{Schema, Spec};

    fn query_param(name: &str, required: bool, min_items: Option<u64>) -> RefOr<Parameter> {
        RefOr::item(Parameter {
            name: name.to_string(),
            location: "query".to_string(),
            required,
            schema: Some(RefOr::item(Schema {
                min_items,
                ..Schema::default()
            })),
            ..Parameter::default()
        })
    }

    #[test]
    fn test_parameters_keyed_by_location_and_name() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = vec![query_param("filter", false, None)];
        let rev = vec![
            query_param("filter", false, Some(2)),
            query_param("page", true, None),
        ];

        let diff = parameters_diff(&ctx, &base, &rev).unwrap().unwrap();
        assert!(diff.added["query"].contains("page"));
        assert!(diff.added_required["query"].contains("page"));
        let filter = &diff.modified["query"]["filter"];
        assert!(filter.schema.as_ref().unwrap().min_items.is_some());
    }

    #[test]
    fn test_dropping_an_empty_schema_is_not_a_change() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        // `schema: {}` constrains nothing; removing it must not mark the
        // parameter modified with an empty schema node.
        let base = vec![query_param("filter", false, None)];
        let rev = vec![RefOr::item(Parameter {
            name: "filter".to_string(),
            location: "query".to_string(),
            ..Parameter::default()
        })];

        assert!(parameters_diff(&ctx, &base, &rev).unwrap().is_none());
    }

    #[test]
    fn test_identical_parameters_have_no_diff() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let params = vec![query_param("filter", false, Some(1))];
        assert!(parameters_diff(&ctx, &params, &params).unwrap().is_none());
    }
}
