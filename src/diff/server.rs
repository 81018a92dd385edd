//! Server diff composer.

use super::primitives::{
    extensions_diff, value_diff, value_diff_conditional, MapDiff, StringsDiff, ValueDiff,
};
use super::DiffContext;
use crate::error::Result;
use crate::model::{Server, ServerVariable};
use serde::Serialize;

/// A diff between two server objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<MapDiff<VariableDiff>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ValueDiff>,
}

impl ServerDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A diff between two server variable objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableDiff {
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<StringsDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ValueDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<ValueDiff>,
}

impl VariableDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn variable_diff(
    ctx: &DiffContext,
    base: &ServerVariable,
    rev: &ServerVariable,
) -> Option<VariableDiff> {
    let result = VariableDiff {
        enum_values: StringsDiff::diff(&base.enum_values, &rev.enum_values),
        default: value_diff(&base.default, &rev.default),
        description: value_diff_conditional(
            ctx.config.breaking_only || ctx.config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
    };
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

pub(crate) fn server_diff(ctx: &DiffContext, base: &Server, rev: &Server) -> Option<ServerDiff> {
    let config = ctx.config;
    let trim = config.breaking_only;

    let variables = MapDiff::diff(&base.variables, &rev.variables, |b, r| {
        Ok(variable_diff(ctx, b, r))
    })
    .unwrap_or_default();

    let result = ServerDiff {
        url: value_diff(&base.url, &rev.url),
        description: value_diff_conditional(
            trim || config.is_excluded("description"),
            &base.description,
            &rev.description,
        ),
        variables,
        extensions: if trim || config.is_excluded("extensions") {
            None
        } else {
            extensions_diff(&base.extensions, &rev.extensions)
        },
    };

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// Diff two server lists, keyed by URL.
pub(crate) fn servers_diff(
    ctx: &DiffContext,
    base: &[Server],
    rev: &[Server],
) -> Result<Option<MapDiff<ServerDiff>>> {
    let key_by_url = |servers: &[Server]| {
        servers
            .iter()
            .map(|s| (s.url.clone(), s.clone()))
            .collect::<indexmap::IndexMap<String, Server>>()
    };
    MapDiff::diff(&key_by_url(base), &key_by_url(rev), |b, r| {
        Ok(server_diff(ctx, b, r))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffConfig;
    use crate::model::Spec;

    #[test]
    fn test_variable_default_change() {
        let config = DiffConfig::new();
        let spec = Spec::default();
        let ctx = DiffContext::new(&config, &spec, &spec);

        let mut base = Server {
            url: "https://{env}.example.com".to_string(),
            ..Server::default()
        };
        base.variables.insert(
            "env".to_string(),
            ServerVariable {
                default: "staging".to_string(),
                ..ServerVariable::default()
            },
        );
        let mut rev = base.clone();
        rev.variables.get_mut("env").unwrap().default = "prod".to_string();

        let diff = server_diff(&ctx, &base, &rev).unwrap();
        let vars = diff.variables.unwrap();
        assert!(vars.modified["env"].default.is_some());
    }
}
