//! Response diff composer.

use super::header::{headers_diff, HeaderDiff};
use super::link::{links_diff, LinkDiff};
use super::media_type::{content_diff, MediaTypeDiff};
use super::primitives::{extensions_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::Response;
use serde::Serialize;

/// A diff between two response objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<MapDiff<HeaderDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MapDiff<MediaTypeDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<MapDiff<LinkDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl ResponseDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn response_diff(
    ctx: &DiffContext,
    base: &Response,
    rev: &Response,
) -> Result<Option<ResponseDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = ResponseDiff {
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        headers: headers_diff(ctx, &base.headers, &rev.headers)?,
        content: content_diff(ctx, &base.content, &rev.content)?,
        links: links_diff(ctx, &base.links, &rev.links)?,
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
