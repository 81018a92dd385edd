//! Media type diff composer.

use super::primitives::{extensions_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::schema::{opt_schema_diff, RefChain, SchemaDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::MediaType;
use indexmap::IndexMap;
use serde::Serialize;

/// A diff between two media type objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaTypeDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl MediaTypeDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn media_type_diff(
    ctx: &DiffContext,
    base: &MediaType,
    rev: &MediaType,
) -> Result<Option<MediaTypeDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = MediaTypeDiff {
        schema: opt_schema_diff(
            ctx,
            &RefChain::new(config.max_circular_refs),
            base.schema.as_ref(),
            rev.schema.as_ref(),
        )?,
        example: value_diff_conditional(
            trim || config.is_excluded("examples"),
            &base.example,
            &rev.example,
        ),
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

/// Diff a content map (media type by content type).
pub(crate) fn content_diff(
    ctx: &DiffContext,
    base: &IndexMap<String, MediaType>,
    rev: &IndexMap<String, MediaType>,
) -> Result<Option<MapDiff<MediaTypeDiff>>> {
    MapDiff::diff(base, rev, |b, r| media_type_diff(ctx, b, r))
}
