//! Suppression (ignore) files.
//!
//! One file per severity: a line suppresses a finding of that severity when
//! it contains the finding's rule id and its `METHOD /path` fingerprint,
//! matched case-insensitively. Free text around those tokens is allowed, so
//! a line can double as the justification for the suppression. A line that
//! names no known rule id is a usage error rather than a silent no-op.

use crate::checker::{rule_ids, Changes, Level};
use crate::error::{OasDiffError, Result};
use std::path::Path;

/// Drop findings of `level` that are suppressed by the ignore file at `path`.
pub fn process_ignored(changes: &mut Changes, level: Level, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| OasDiffError::io(path, e))?;

    let mut entries: Vec<(&'static str, String)> = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lower = line.to_lowercase();
        let Some(id) = rule_ids().find(|id| lower.contains(id)) else {
            return Err(OasDiffError::ignore_file(
                level.to_string(),
                path,
                format!("line {}: does not name a known check id", index + 1),
            ));
        };
        entries.push((id, lower));
    }

    let before = changes.len();
    changes.retain(|change| {
        if change.level != level {
            return true;
        }
        let fingerprint = format!(
            "{} {}",
            change.operation.to_lowercase(),
            change.path.to_lowercase()
        );
        !entries
            .iter()
            .any(|(id, line)| *id == change.id && line.contains(&fingerprint))
    });
    tracing::debug!(
        level = %level,
        suppressed = before - changes.len(),
        file = %path.display(),
        "applied ignore file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{Change, CheckConfig};
    use crate::diff::OperationsSources;
    use std::io::Write;

    fn sample_changes() -> Changes {
        let config = CheckConfig::default();
        let sources = OperationsSources::single("base.yaml");
        let mut removed = Change::api(
            "request-parameter-removed",
            &config,
            &["query", "filter"],
            "/pets",
            "GET",
            None,
            &sources,
        );
        removed.level = Level::Warn;
        let mut required = Change::api(
            "request-parameter-became-required",
            &config,
            &["query", "page"],
            "/pets",
            "GET",
            None,
            &sources,
        );
        required.level = Level::Err;
        [removed, required].into_iter().collect()
    }

    fn write_ignore(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_suppresses_matching_level_only() {
        let mut changes = sample_changes();
        let file = write_ignore(
            "request-parameter-removed GET /pets - agreed with the client team\n\
             request-parameter-became-required GET /pets\n",
        );
        process_ignored(&mut changes, Level::Warn, file.path()).unwrap();
        // only the warning is suppressed; the error line is ignored at this level
        assert_eq!(changes.len(), 1);
        assert!(changes.has_level_or_higher(Level::Err));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let mut changes = sample_changes();
        let file = write_ignore("REQUEST-PARAMETER-REMOVED get /PETS\n");
        process_ignored(&mut changes, Level::Warn, file.path()).unwrap();
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_unknown_rule_id_is_error() {
        let mut changes = sample_changes();
        let file = write_ignore("some free text without a check id\n");
        let err = process_ignored(&mut changes, Level::Warn, file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let mut changes = sample_changes();
        let file = write_ignore("# a comment\n\nrequest-parameter-removed GET /pets\n");
        process_ignored(&mut changes, Level::Warn, file.path()).unwrap();
        assert_eq!(changes.len(), 1);
    }
}
