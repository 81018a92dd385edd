//! Report rendering.
//!
//! Findings render as human-readable text by default, or as JSON/YAML for
//! machine consumers. The raw diff tree renders fully as JSON/YAML; its text
//! form is an endpoints summary.

use crate::checker::{Changes, Level, Localizer};
use crate::diff::{Diff, PairDiff};
use crate::error::{OasDiffError, ReportErrorKind, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;

/// Output format for reports.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        OasDiffError::report(
            "rendering JSON",
            ReportErrorKind::JsonSerialization(e.to_string()),
        )
    })
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        OasDiffError::report(
            "rendering YAML",
            ReportErrorKind::YamlSerialization(e.to_string()),
        )
    })
}

/// Render a changelog (or breaking-changes) report.
pub fn render_changelog(
    changes: &Changes,
    format: ReportFormat,
    localizer: &Localizer,
) -> Result<String> {
    match format {
        ReportFormat::Json => to_json(changes),
        ReportFormat::Yaml => to_yaml(changes),
        ReportFormat::Text => Ok(render_text(changes, localizer)),
    }
}

fn render_text(changes: &Changes, localizer: &Localizer) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        localizer.localize(
            "total-changes",
            &[
                &changes.len().to_string(),
                &changes.count_at(Level::Err).to_string(),
                &changes.count_at(Level::Warn).to_string(),
                &changes.count_at(Level::Info).to_string(),
            ],
        )
    );
    for change in changes {
        let _ = writeln!(out);
        if change.source.is_empty() {
            let _ = writeln!(out, "{}\t[{}]", change.level, change.id);
        } else {
            let _ = writeln!(out, "{}\t[{}]\tat {}", change.level, change.id, change.source);
        }
        if !change.path.is_empty() {
            let _ = writeln!(out, "\tin API {} {}", change.operation, change.path);
        }
        let _ = writeln!(out, "\t\t{}", change.text);
        if !change.comment.is_empty() {
            let _ = writeln!(out, "\t\t{}", change.comment);
        }
    }
    out
}

/// Render the raw diff tree. The text form is an endpoints summary; the
/// structured formats carry the full tree.
pub fn render_diff(diff: &Diff, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => to_json(diff),
        ReportFormat::Yaml => to_yaml(diff),
        ReportFormat::Text => Ok(render_diff_text(diff)),
    }
}

/// Render the composed list of per-file diffs.
pub fn render_composed_diff(pairs: &[PairDiff], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => to_json(&pairs),
        ReportFormat::Yaml => to_yaml(&pairs),
        ReportFormat::Text => {
            let mut out = String::new();
            for pair in pairs {
                let _ = writeln!(out, "{}:", pair.source);
                out.push_str(&render_diff_text(&pair.diff));
                let _ = writeln!(out);
            }
            Ok(out)
        }
    }
}

fn render_diff_text(diff: &Diff) -> String {
    if diff.is_empty() {
        return "no changes\n".to_string();
    }
    let mut out = String::new();
    if let Some(paths) = &diff.paths {
        for (path, operations) in &paths.added_operations {
            for (method, _) in operations {
                let _ = writeln!(out, "added endpoint\t{method} {path}");
            }
        }
        for (path, operations) in &paths.deleted_operations {
            for (method, _) in operations {
                let _ = writeln!(out, "deleted endpoint\t{method} {path}");
            }
        }
        for (path, item) in &paths.modified {
            let Some(ops) = &item.operations else {
                continue;
            };
            for method in &ops.added {
                let _ = writeln!(out, "added endpoint\t{method} {path}");
            }
            for method in &ops.deleted {
                let _ = writeln!(out, "deleted endpoint\t{method} {path}");
            }
            for method in ops.modified.keys() {
                let _ = writeln!(out, "modified endpoint\t{method} {path}");
            }
        }
    }
    if diff.servers.is_some() {
        let _ = writeln!(out, "modified servers");
    }
    if diff.security_schemes.is_some() {
        let _ = writeln!(out, "modified security schemes");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{Change, CheckConfig};
    use crate::diff::{Diff, OperationsSources};

    fn one_warning() -> Changes {
        let config = CheckConfig::default();
        let sources = OperationsSources::single("base.yaml");
        let mut change = Change::api(
            "request-parameter-removed",
            &config,
            &["query", "filter"],
            "/pets",
            "GET",
            None,
            &sources,
        );
        change.level = Level::Warn;
        std::iter::once(change).collect()
    }

    #[test]
    fn test_text_report_includes_title_and_finding() {
        let text = render_changelog(&one_warning(), ReportFormat::Text, &Localizer::default())
            .unwrap();
        assert!(text.starts_with("1 changes: 0 error, 1 warning, 0 info"));
        assert!(text.contains("[request-parameter-removed]"));
        assert!(text.contains("in API GET /pets"));
        assert!(text.contains("deleted the query request parameter filter"));
    }

    #[test]
    fn test_json_report_round_trips_level_names() {
        let json = render_changelog(&one_warning(), ReportFormat::Json, &Localizer::default())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["level"], "warning");
        assert_eq!(parsed[0]["operation"], "GET");
    }

    #[test]
    fn test_empty_diff_text_summary() {
        let text = render_diff(&Diff::default(), ReportFormat::Text).unwrap();
        assert_eq!(text, "no changes\n");
    }

    #[test]
    fn test_diff_yaml_renders() {
        let yaml = render_diff(&Diff::default(), ReportFormat::Yaml).unwrap();
        assert!(!yaml.is_empty());
    }

    #[test]
    fn test_composed_text_summary_names_each_file() {
        let pairs = vec![PairDiff {
            source: "pets.yaml".to_string(),
            diff: Diff::default(),
            sources: OperationsSources::single("pets.yaml"),
        }];
        let text = render_composed_diff(&pairs, ReportFormat::Text).unwrap();
        assert!(text.starts_with("pets.yaml:"));
        assert!(text.contains("no changes"));
    }
}
