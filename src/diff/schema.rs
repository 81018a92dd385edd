//! Recursive type-schema comparison.
//!
//! Schemas may reference themselves directly or mutually, so traversal
//! carries an explicit chain of visited reference pairs plus a remaining
//! expansion budget taken from [`DiffConfig`](super::DiffConfig). When a
//! reference pair repeats on the chain, or the budget runs out, the engine
//! stops recursing and falls back to a shallow comparison of the two
//! reference names, recorded in `circular_ref`. Equal names produce no diff,
//! which keeps self-diff identity intact for cyclic documents; differing
//! references are still surfaced. Beyond the bound the engine is
//! approximate, not unsound.

use super::primitives::{
    value_diff, value_diff_conditional, MapDiff, StringsDiff, ValueDiff, ValuesDiff,
};
use super::DiffContext;
use crate::error::Result;
use crate::model::{RefOr, Schema};
use serde::Serialize;
use std::collections::BTreeMap;

/// A diff between two schema nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiff {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ValueDiff>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<ValuesDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<MapDiff<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<SubschemasDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<SubschemasDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<SubschemasDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
    /// Set when traversal stopped at the circular reference bound; holds the
    /// reference names the two sides pointed at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular_ref: Option<ValueDiff>,
}

impl SchemaDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Positional diff of a composition array (`allOf`/`oneOf`/`anyOf`).
///
/// Members are paired positionally when lengths match; otherwise the
/// overlapping prefix is paired positionally and the non-overlapping tail is
/// reported as added or deleted indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubschemasDiff {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<usize>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub modified: BTreeMap<usize, SchemaDiff>,
}

impl SubschemasDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }
}

/// Chain-local traversal state. Cloned per branch so sibling branches each
/// get the full budget of the current chain position.
#[derive(Debug, Clone)]
pub(crate) struct RefChain {
    chain: Vec<(String, String)>,
    budget: usize,
}

impl RefChain {
    pub(crate) fn new(budget: usize) -> Self {
        Self {
            chain: Vec::new(),
            budget,
        }
    }
}

/// Diff two optional schema nodes.
pub(crate) fn opt_schema_diff(
    ctx: &DiffContext,
    chain: &RefChain,
    base: Option<&RefOr<Schema>>,
    rev: Option<&RefOr<Schema>>,
) -> Result<Option<SchemaDiff>> {
    match (base, rev) {
        (None, None) => Ok(None),
        (Some(b), Some(r)) => schema_diff(ctx, chain, b, r),
        // Schema added or removed entirely: modeled as a type transition
        // from/to "unset" so checkers can see the edge. An untyped schema
        // yields no transition, and no diff node.
        (Some(b), None) => {
            let (schema, _) = ctx.base.resolve_schema(b)?;
            let result = SchemaDiff {
                schema_type: value_diff(&schema.schema_type, &None),
                ..SchemaDiff::default()
            };
            Ok((!result.is_empty()).then_some(result))
        }
        (None, Some(r)) => {
            let (schema, _) = ctx.rev.resolve_schema(r)?;
            let result = SchemaDiff {
                schema_type: value_diff(&None, &schema.schema_type),
                ..SchemaDiff::default()
            };
            Ok((!result.is_empty()).then_some(result))
        }
    }
}

/// Diff two schema nodes, resolving references with cycle bounding.
pub(crate) fn schema_diff(
    ctx: &DiffContext,
    chain: &RefChain,
    base: &RefOr<Schema>,
    rev: &RefOr<Schema>,
) -> Result<Option<SchemaDiff>> {
    let base_ref = base.reference();
    let rev_ref = rev.reference();

    if base_ref.is_some() || rev_ref.is_some() {
        let pair = (
            base_ref.unwrap_or_default().to_string(),
            rev_ref.unwrap_or_default().to_string(),
        );

        if chain.chain.contains(&pair) || chain.budget == 0 {
            // Depth bound reached: compare the reference names shallowly
            // instead of recursing. Equal names carry no information.
            return Ok(value_diff(&pair.0, &pair.1).map(|marker| SchemaDiff {
                circular_ref: Some(marker),
                ..SchemaDiff::default()
            }));
        }

        let mut chain = chain.clone();
        chain.chain.push(pair);
        chain.budget -= 1;

        let (base_schema, _) = ctx.base.resolve_schema(base)?;
        let (rev_schema, _) = ctx.rev.resolve_schema(rev)?;
        return schema_diff_internal(ctx, &chain, base_schema, rev_schema);
    }

    let (base_schema, _) = ctx.base.resolve_schema(base)?;
    let (rev_schema, _) = ctx.rev.resolve_schema(rev)?;
    schema_diff_internal(ctx, chain, base_schema, rev_schema)
}

fn schema_diff_internal(
    ctx: &DiffContext,
    chain: &RefChain,
    base: &Schema,
    rev: &Schema,
) -> Result<Option<SchemaDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let mut result = SchemaDiff {
        schema_type: value_diff(&base.schema_type, &rev.schema_type),
        format: value_diff(&base.format, &rev.format),
        title: value_diff_conditional(trim, &base.title, &rev.title),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        default: value_diff(&base.default, &rev.default),
        nullable: value_diff(&base.nullable, &rev.nullable),
        deprecated: value_diff(&base.deprecated, &rev.deprecated),
        read_only: value_diff(&base.read_only, &rev.read_only),
        write_only: value_diff(&base.write_only, &rev.write_only),
        example: value_diff_conditional(
            trim || config.is_excluded("examples"),
            &base.example,
            &rev.example,
        ),
        pattern: value_diff(&base.pattern, &rev.pattern),
        enum_values: ValuesDiff::diff(
            base.enum_values.as_deref().unwrap_or_default(),
            rev.enum_values.as_deref().unwrap_or_default(),
        ),
        multiple_of: value_diff(&base.multiple_of, &rev.multiple_of),
        minimum: value_diff(&base.minimum, &rev.minimum),
        maximum: value_diff(&base.maximum, &rev.maximum),
        exclusive_minimum: value_diff(&base.exclusive_minimum, &rev.exclusive_minimum),
        exclusive_maximum: value_diff(&base.exclusive_maximum, &rev.exclusive_maximum),
        min_length: value_diff(&base.min_length, &rev.min_length),
        max_length: value_diff(&base.max_length, &rev.max_length),
        min_items: value_diff(&base.min_items, &rev.min_items),
        max_items: value_diff(&base.max_items, &rev.max_items),
        unique_items: value_diff(&base.unique_items, &rev.unique_items),
        min_properties: value_diff(&base.min_properties, &rev.min_properties),
        max_properties: value_diff(&base.max_properties, &rev.max_properties),
        required: StringsDiff::diff(&base.required, &rev.required),
        extensions: if trim || config.is_excluded("extensions") {
            None
        } else {
            super::primitives::extensions_diff(&base.extensions, &rev.extensions)
        },
        ..SchemaDiff::default()
    };

    result.items =
        opt_schema_diff(ctx, chain, base.items.as_deref(), rev.items.as_deref())?.map(Box::new);
    result.additional_properties = opt_schema_diff(
        ctx,
        chain,
        base.additional_properties.as_deref(),
        rev.additional_properties.as_deref(),
    )?
    .map(Box::new);

    result.properties = MapDiff::diff(&base.properties, &rev.properties, |b, r| {
        schema_diff(ctx, chain, b, r)
    })?;

    result.all_of = subschemas_diff(ctx, chain, &base.all_of, &rev.all_of)?;
    result.one_of = subschemas_diff(ctx, chain, &base.one_of, &rev.one_of)?;
    result.any_of = subschemas_diff(ctx, chain, &base.any_of, &rev.any_of)?;

    Ok(if result.is_empty() {
        None
    } else {
        Some(result)
    })
}

fn subschemas_diff(
    ctx: &DiffContext,
    chain: &RefChain,
    base: &[RefOr<Schema>],
    rev: &[RefOr<Schema>],
) -> Result<Option<SubschemasDiff>> {
    let mut result = SubschemasDiff::default();
    let overlap = base.len().min(rev.len());

    for i in 0..overlap {
        if let Some(diff) = schema_diff(ctx, chain, &base[i], &rev[i])? {
            result.modified.insert(i, diff);
        }
    }
    result.deleted = (overlap..base.len()).collect();
    result.added = (overlap..rev.len()).collect();

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
    use crate::model::{RefObject, Spec};

    fn node_ref(name: &str) -> RefOr<Schema> {
        RefOr::Ref(RefObject {
            reference: format!("#/components/schemas/{name}"),
        })
    }

    fn spec_with(name: &str, schema: Schema) -> Spec {
        let mut spec = Spec::default();
        spec.components
            .schemas
            .insert(name.to_string(), RefOr::item(schema));
        spec
    }

    fn self_referential(name: &str, description: &str) -> Spec {
        let mut schema = Schema {
            schema_type: Some("object".to_string()),
            description: Some(description.to_string()),
            ..Schema::default()
        };
        schema
            .properties
            .insert("next".to_string(), node_ref(name));
        spec_with(name, schema)
    }

    #[test]
    fn test_scalar_facets() {
        let config = DiffConfig::new();
        let base_spec = Spec::default();
        let ctx = DiffContext::new(&config, &base_spec, &base_spec);

        let base = RefOr::item(Schema {
            min_items: None,
            ..Schema::default()
        });
        let rev = RefOr::item(Schema {
            min_items: Some(2),
            ..Schema::default()
        });

        let diff = schema_diff(&ctx, &RefChain::new(5), &base, &rev)
            .unwrap()
            .unwrap();
        let min_items = diff.min_items.unwrap();
        assert!(min_items.from_unset());
        assert_eq!(min_items.to, serde_json::json!(2));
    }

    #[test]
    fn test_removed_untyped_schema_yields_no_diff() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = RefOr::item(Schema::default());
        let diff = opt_schema_diff(&ctx, &RefChain::new(5), Some(&base), None).unwrap();
        assert!(diff.is_none());
    }

    #[test]
    fn test_removed_typed_schema_reports_type_unset() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = RefOr::item(Schema {
            schema_type: Some("string".to_string()),
            ..Schema::default()
        });
        let diff = opt_schema_diff(&ctx, &RefChain::new(5), Some(&base), None)
            .unwrap()
            .unwrap();
        let transition = diff.schema_type.unwrap();
        assert_eq!(transition.from, serde_json::json!("string"));
        assert!(transition.to_unset());
    }

    #[test]
    fn test_added_untyped_schema_yields_no_diff() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let rev = RefOr::item(Schema::default());
        let diff = opt_schema_diff(&ctx, &RefChain::new(5), None, Some(&rev)).unwrap();
        assert!(diff.is_none());
    }

    #[test]
    fn test_self_diff_of_cyclic_schema_is_empty() {
        let config = DiffConfig::new();
        let spec = self_referential("Node", "a node");
        let ctx = DiffContext::new(&config, &spec, &spec);

        let diff = schema_diff(&ctx, &RefChain::new(5), &node_ref("Node"), &node_ref("Node"))
            .unwrap();
        assert!(diff.is_none());
    }

    #[test]
    fn test_cyclic_schema_facet_change_is_reported() {
        let config = DiffConfig::new();
        let base = self_referential("Node", "old");
        let rev = self_referential("Node", "new");
        let ctx = DiffContext::new(&config, &base, &rev);

        let diff = schema_diff(&ctx, &RefChain::new(5), &node_ref("Node"), &node_ref("Node"))
            .unwrap()
            .unwrap();
        // The facet examined before the cycle closed is reported once; the
        // repeated reference pair terminates the branch.
        assert!(diff.description.is_some());
    }

    #[test]
    fn test_zero_budget_marks_differing_refs_circular() {
        let config = DiffConfig::new();
        let base = self_referential("NodeA", "x");
        let rev = self_referential("NodeB", "x");
        let ctx = DiffContext::new(&config, &base, &rev);

        let diff = schema_diff(&ctx, &RefChain::new(0), &node_ref("NodeA"), &node_ref("NodeB"))
            .unwrap()
            .unwrap();
        let marker = diff.circular_ref.unwrap();
        assert_eq!(marker.from, serde_json::json!("#/components/schemas/NodeA"));
        assert_eq!(marker.to, serde_json::json!("#/components/schemas/NodeB"));
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let config = DiffConfig::new();
        let mut spec = Spec::default();
        let mut a = Schema::default();
        a.properties.insert("b".to_string(), node_ref("B"));
        let mut b = Schema::default();
        b.properties.insert("a".to_string(), node_ref("A"));
        spec.components
            .schemas
            .insert("A".to_string(), RefOr::item(a));
        spec.components
            .schemas
            .insert("B".to_string(), RefOr::item(b));

        let ctx = DiffContext::new(&config, &spec, &spec);
        let diff = schema_diff(&ctx, &RefChain::new(5), &node_ref("A"), &node_ref("A")).unwrap();
        assert!(diff.is_none());
    }

    #[test]
    fn test_composition_positional_pairing() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = RefOr::item(Schema {
            one_of: vec![
                RefOr::item(Schema {
                    schema_type: Some("string".to_string()),
                    ..Schema::default()
                }),
                RefOr::item(Schema {
                    schema_type: Some("integer".to_string()),
                    ..Schema::default()
                }),
            ],
            ..Schema::default()
        });
        let rev = RefOr::item(Schema {
            one_of: vec![RefOr::item(Schema {
                schema_type: Some("boolean".to_string()),
                ..Schema::default()
            })],
            ..Schema::default()
        });

        let diff = schema_diff(&ctx, &RefChain::new(5), &base, &rev)
            .unwrap()
            .unwrap();
        let one_of = diff.one_of.unwrap();
        assert!(one_of.modified.contains_key(&0));
        assert_eq!(one_of.deleted, vec![1]);
        assert!(one_of.added.is_empty());
    }
}
