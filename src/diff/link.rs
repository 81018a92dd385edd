//! Link diff composer.

use super::primitives::{extensions_diff, value_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::server::{server_diff, ServerDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::{Link, RefOr};
use indexmap::IndexMap;
use serde::Serialize;

/// A diff between two link objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_ref: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl LinkDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn link_diff(ctx: &DiffContext, base: &Link, rev: &Link) -> Result<Option<LinkDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = LinkDiff {
        operation_id: value_diff(&base.operation_id, &rev.operation_id),
        operation_ref: value_diff(&base.operation_ref, &rev.operation_ref),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        parameters: value_diff(&base.parameters, &rev.parameters),
        request_body: value_diff(&base.request_body, &rev.request_body),
        server: match (&base.server, &rev.server) {
            (Some(b), Some(r)) => server_diff(ctx, b, r),
            (None, None) => None,
            (b, r) => value_diff(&b.as_ref().map(|s| &s.url), &r.as_ref().map(|s| &s.url)).map(
                |url| ServerDiff {
                    url: Some(url),
                    ..ServerDiff::default()
                },
            ),
        },
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

/// Diff a links map, resolving `$ref` entries on both sides.
pub(crate) fn links_diff(
    ctx: &DiffContext,
    base: &IndexMap<String, RefOr<Link>>,
    rev: &IndexMap<String, RefOr<Link>>,
) -> Result<Option<MapDiff<LinkDiff>>> {
    MapDiff::diff(base, rev, |b, r| {
        let b = ctx.base.resolve_link(b)?;
        let r = ctx.rev.resolve_link(r)?;
        link_diff(ctx, b, r)
    })
}
