//! Breaking-change and changelog checker framework.
//!
//! Rules are pure functions over the diff tree: each one walks the part of
//! the tree it understands and emits findings. The framework owns rule
//! selection (severity floor, optional rules), severity assignment, and the
//! final deterministic ordering, so rules stay independent of each other and
//! of the requested report level.

pub mod ignore;
pub mod localize;
mod rules;

pub use localize::{Lang, Localizer};

use crate::diff::{Diff, OperationDiff, OperationsSources};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, clap::ValueEnum)]
pub enum Level {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warn,
    #[serde(rename = "error")]
    Err,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warning"),
            Self::Err => write!(f, "error"),
        }
    }
}

/// One finding produced by a rule.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub id: &'static str,
    pub level: Level,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operation: String,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl Change {
    /// Build a finding for one endpoint. The level is assigned by the
    /// runner from the owning rule, so rules never set it themselves.
    pub(crate) fn api(
        id: &'static str,
        config: &CheckConfig,
        args: &[&str],
        path: &str,
        operation: &str,
        operation_id: Option<&str>,
        sources: &OperationsSources,
    ) -> Self {
        Self {
            id,
            level: Level::Info,
            text: config.localizer.localize(id, args),
            comment: config
                .localizer
                .localize_optional(&format!("{id}-comment"), &[]),
            operation: operation.to_string(),
            operation_id: operation_id.map(str::to_string),
            path: path.to_string(),
            source: sources.get(path, operation).to_string(),
        }
    }
}

/// An ordered collection of findings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Changes(Vec<Change>);

impl Changes {
    fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            (&a.path, &a.operation, a.id, &a.source)
                .cmp(&(&b.path, &b.operation, b.id, &b.source))
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.0.iter()
    }

    /// Number of findings at exactly this level.
    #[must_use]
    pub fn count_at(&self, level: Level) -> usize {
        self.0.iter().filter(|c| c.level == level).count()
    }

    /// True if any finding is at or above this level.
    #[must_use]
    pub fn has_level_or_higher(&self, level: Level) -> bool {
        self.0.iter().any(|c| c.level >= level)
    }

    /// Drop findings rejected by the predicate (ignore-file suppression).
    pub fn retain<F: FnMut(&Change) -> bool>(&mut self, f: F) {
        self.0.retain(f);
    }

    /// Merge findings from another run (composed mode).
    pub fn extend(&mut self, other: Changes) {
        self.0.extend(other.0);
        self.sort();
    }
}

#[cfg(test)]
impl FromIterator<Change> for Changes {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut changes = Self(iter.into_iter().collect());
        changes.sort();
        changes
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Checker configuration: message language, optional-rule opt-ins, and
/// deprecation grace periods.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub localizer: Localizer,
    /// Ids of optional rules enabled via `--include-checks`
    pub include_checks: BTreeSet<String>,
    /// Minimum days between deprecation and sunset for beta operations
    pub deprecation_days_beta: i64,
    /// Minimum days between deprecation and sunset for stable operations
    pub deprecation_days_stable: i64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            localizer: Localizer::default(),
            include_checks: BTreeSet::new(),
            deprecation_days_beta: 31,
            deprecation_days_stable: 180,
        }
    }
}

impl CheckConfig {
    /// Enable optional rules by id, rejecting unknown ids up front.
    pub fn with_include_checks(mut self, ids: &[String]) -> crate::error::Result<Self> {
        for id in ids {
            if !RULES.iter().any(|r| r.id == id) {
                return Err(crate::error::OasDiffError::invalid_usage(format!(
                    "unknown check id {id:?}"
                )));
            }
            self.include_checks.insert(id.clone());
        }
        Ok(self)
    }
}

type CheckFn = fn(&Diff, &OperationsSources, &CheckConfig) -> Vec<Change>;

/// A registered rule: stable id, default severity, and the check itself.
struct Rule {
    id: &'static str,
    default_level: Level,
    /// Optional rules run only when opted into via `include_checks`
    optional: bool,
    run: CheckFn,
}

const fn required(id: &'static str, default_level: Level, run: CheckFn) -> Rule {
    Rule {
        id,
        default_level,
        optional: false,
        run,
    }
}

const fn optional(id: &'static str, default_level: Level, run: CheckFn) -> Rule {
    Rule {
        id,
        default_level,
        optional: true,
        run,
    }
}

static RULES: &[Rule] = &[
    required(
        "api-path-removed-without-deprecation",
        Level::Err,
        rules::paths::path_removed_without_deprecation,
    ),
    required(
        "api-removed-without-deprecation",
        Level::Err,
        rules::paths::operation_removed_without_deprecation,
    ),
    required("api-path-added", Level::Info, rules::paths::path_added),
    required(
        "api-operation-added",
        Level::Info,
        rules::paths::operation_added,
    ),
    optional(
        "api-operation-id-removed",
        Level::Err,
        rules::paths::operation_id_removed,
    ),
    required(
        "request-parameter-became-required",
        Level::Err,
        rules::request_params::parameter_became_required,
    ),
    required(
        "new-required-request-parameter",
        Level::Err,
        rules::request_params::new_required_parameter,
    ),
    required(
        "request-parameter-removed",
        Level::Warn,
        rules::request_params::parameter_removed,
    ),
    required(
        "request-parameter-type-changed",
        Level::Err,
        rules::request_params::parameter_type_changed,
    ),
    required(
        "request-parameter-min-items-set",
        Level::Warn,
        rules::request_params::parameter_min_items_set,
    ),
    required(
        "request-parameter-min-items-increased",
        Level::Err,
        rules::request_params::parameter_min_items_increased,
    ),
    required(
        "request-parameter-max-length-decreased",
        Level::Err,
        rules::request_params::parameter_max_length_decreased,
    ),
    required(
        "request-parameter-max-set",
        Level::Warn,
        rules::request_params::parameter_max_set,
    ),
    required(
        "request-parameter-pattern-changed",
        Level::Warn,
        rules::request_params::parameter_pattern_changed,
    ),
    required(
        "request-parameter-enum-value-removed",
        Level::Err,
        rules::request_params::parameter_enum_value_removed,
    ),
    required(
        "request-body-became-required",
        Level::Err,
        rules::request_body::body_became_required,
    ),
    required(
        "request-media-type-removed",
        Level::Err,
        rules::request_body::media_type_removed,
    ),
    required(
        "response-success-status-removed",
        Level::Err,
        rules::responses::success_status_removed,
    ),
    optional(
        "response-non-success-status-removed",
        Level::Err,
        rules::responses::non_success_status_removed,
    ),
    required(
        "response-required-property-removed",
        Level::Err,
        rules::responses::required_property_removed,
    ),
    required(
        "response-header-removed",
        Level::Err,
        rules::responses::header_removed,
    ),
    required(
        "response-media-type-added",
        Level::Info,
        rules::responses::media_type_added,
    ),
    required(
        "api-sunset-date-too-small",
        Level::Err,
        rules::deprecation::sunset_date_too_small,
    ),
    optional(
        "api-deprecated-without-sunset",
        Level::Err,
        rules::deprecation::deprecated_without_sunset,
    ),
];

/// All registered rule ids, for CLI help and validation.
pub fn rule_ids() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|r| r.id)
}

/// Run every applicable rule against the diff, keeping only findings at or
/// above `floor`. Rules whose default level is below the floor are not run
/// at all.
pub fn check_backward_compatibility_until_level(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
    floor: Level,
) -> Changes {
    let mut all = Vec::new();
    for rule in RULES {
        if rule.optional && !config.include_checks.contains(rule.id) {
            continue;
        }
        if rule.default_level < floor {
            continue;
        }
        let mut found = (rule.run)(diff, sources, config);
        for change in &mut found {
            change.level = rule.default_level;
        }
        all.append(&mut found);
    }
    tracing::debug!(findings = all.len(), floor = %floor, "checker run complete");
    let mut changes = Changes(all);
    changes.sort();
    changes
}

/// Convenience entry point for breaking-change mode: warnings and errors.
pub fn check_backward_compatibility(
    diff: &Diff,
    sources: &OperationsSources,
    config: &CheckConfig,
) -> Changes {
    check_backward_compatibility_until_level(diff, sources, config, Level::Warn)
}

/// Walk every modified operation as (path, method, diff).
pub(crate) fn modified_operations(
    diff: &Diff,
) -> impl Iterator<Item = (&str, &str, &OperationDiff)> {
    diff.paths.iter().flat_map(|paths| {
        paths.modified.iter().flat_map(|(path, item)| {
            item.operations.iter().flat_map(move |ops| {
                ops.modified
                    .iter()
                    .map(move |(method, op)| (path.as_str(), method.as_str(), op))
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Err);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&Level::Err).unwrap(), "\"error\"");
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for id in rule_ids() {
            assert!(seen.insert(id), "duplicate rule id {id}");
        }
    }

    #[test]
    fn test_unknown_include_check_rejected() {
        let err = CheckConfig::default()
            .with_include_checks(&["no-such-rule".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("no-such-rule"));
    }

    #[test]
    fn test_empty_diff_yields_no_findings() {
        let changes = check_backward_compatibility(
            &Diff::default(),
            &OperationsSources::single("a.yaml"),
            &CheckConfig::default(),
        );
        assert!(changes.is_empty());
    }
}
