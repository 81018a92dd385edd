//! Security scheme diff composer.

use super::primitives::{extensions_diff, value_diff, value_diff_conditional, MapDiff, ValueDiff};
use super::DiffContext;
use crate::error::Result;
use crate::model::{RefOr, SecurityScheme};
use indexmap::IndexMap;
use serde::Serialize;

/// A diff between two security scheme objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeDiff {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ValueDiff>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl SecuritySchemeDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn security_scheme_diff(
    ctx: &DiffContext,
    base: &SecurityScheme,
    rev: &SecurityScheme,
) -> Result<Option<SecuritySchemeDiff>> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let result = SecuritySchemeDiff {
        scheme_type: value_diff(&base.scheme_type, &rev.scheme_type),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        name: value_diff(&base.name, &rev.name),
        location: value_diff(&base.location, &rev.location),
        scheme: value_diff(&base.scheme, &rev.scheme),
        bearer_format: value_diff(&base.bearer_format, &rev.bearer_format),
        open_id_connect_url: value_diff(&base.open_id_connect_url, &rev.open_id_connect_url),
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

/// Diff the `#/components/securitySchemes` maps.
pub(crate) fn security_schemes_diff(
    ctx: &DiffContext,
    base: &IndexMap<String, RefOr<SecurityScheme>>,
    rev: &IndexMap<String, RefOr<SecurityScheme>>,
) -> Result<Option<MapDiff<SecuritySchemeDiff>>> {
    MapDiff::diff(base, rev, |b, r| {
        let b = ctx.base.resolve_security_scheme(b)?;
        let r = ctx.rev.resolve_security_scheme(r)?;
        security_scheme_diff(ctx, b, r)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffConfig;
    use crate::model::Spec;

    #[test]
    fn test_scheme_type_change() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let base = SecurityScheme {
            scheme_type: "apiKey".to_string(),
            ..SecurityScheme::default()
        };
        let rev = SecurityScheme {
            scheme_type: "http".to_string(),
            scheme: Some("bearer".to_string()),
            ..SecurityScheme::default()
        };
        let diff = security_scheme_diff(&ctx, &base, &rev).unwrap().unwrap();
        assert!(diff.scheme_type.is_some());
        assert!(diff.scheme.is_some());
    }
}
