//! Request body diff composer.

use super::media_type::{content_diff, MediaTypeDiff};
use super::primitives::{extensions_diff, value_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::{RefOr, RequestBody};
use serde::Serialize;

/// A diff between two request body objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestBodyDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MapDiff<MediaTypeDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl RequestBodyDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn request_body_diff(
    ctx: &DiffContext,
    base: Option<&RefOr<RequestBody>>,
    rev: Option<&RefOr<RequestBody>>,
) -> Result<Option<RequestBodyDiff>> {
    let (base, rev) = match (base, rev) {
        (None, None) => return Ok(None),
        (Some(b), Some(r)) => (
            ctx.base.resolve_request_body(b)?,
            ctx.rev.resolve_request_body(r)?,
        ),
        // Body added or removed entirely: surface as a required-flag edge so
        // the change is visible without inventing a sub-diff for one side.
        (Some(b), None) => {
            let b = ctx.base.resolve_request_body(b)?;
            return Ok(Some(RequestBodyDiff {
                required: value_diff(&Some(b.required), &None),
                ..RequestBodyDiff::default()
            }));
        }
        (None, Some(r)) => {
            let r = ctx.rev.resolve_request_body(r)?;
            return Ok(Some(RequestBodyDiff {
                required: value_diff(&None, &Some(r.required)),
                ..RequestBodyDiff::default()
            }));
        }
    };

    let config = ctx.config;
    let trim = config.breaking_only;

    let result = RequestBodyDiff {
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        required: value_diff(&base.required, &rev.required),
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
