//! Header diff composer.

use super::media_type::{content_diff, MediaTypeDiff};
use super::primitives::{extensions_diff, value_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::schema::{opt_schema_diff, RefChain, SchemaDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::{Header, RefOr};
use indexmap::IndexMap;
use serde::Serialize;

/// A diff between two header objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MapDiff<MediaTypeDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl HeaderDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn header_diff(
    ctx: &DiffContext,
    base: &Header,
    rev: &Header,
) -> Result<Option<HeaderDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = HeaderDiff {
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        required: value_diff(&base.required, &rev.required),
        deprecated: value_diff(&base.deprecated, &rev.deprecated),
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

/// Diff a headers map, resolving `$ref` entries on both sides.
pub(crate) fn headers_diff(
    ctx: &DiffContext,
    base: &IndexMap<String, RefOr<Header>>,
    rev: &IndexMap<String, RefOr<Header>>,
) -> Result<Option<MapDiff<HeaderDiff>>> {
    MapDiff::diff(base, rev, |b, r| {
        let b = ctx.base.resolve_header(b)?;
        let r = ctx.rev.resolve_header(r)?;
        header_diff(ctx, b, r)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffConfig;
    use crate::model::Spec;

    #[test]
    fn test_required_change_detected() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = Header::default();
        let rev = Header {
            required: true,
            ..Header::default()
        };
        let diff = header_diff(&ctx, &base, &rev).unwrap().unwrap();
        assert_eq!(diff.required.unwrap().to, serde_json::json!(true));
    }

    #[test]
    fn test_breaking_only_trims_description() {
        let config = DiffConfig {
            breaking_only: true,
            ..DiffConfig::new()
        };
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = Header {
            description: Some("old".to_string()),
            ..Header::default()
        };
        let rev = Header {
            description: Some("new".to_string()),
            ..Header::default()
        };
        assert!(header_diff(&ctx, &base, &rev).unwrap().is_none());
    }
}
