//! Composed mode: compare two sets of documents matched by glob patterns.
//!
//! Contracts split across many files are common in large APIs. Each side's
//! glob is expanded, files are paired by file name, and every matched pair is
//! diffed independently (in parallel). Files present on only one side are
//! skipped with a warning; they are not comparison errors.

use super::paths::{get_diff, Diff, OperationsSources};
use super::DiffConfig;
use crate::error::{LoadErrorKind, OasDiffError, Result};
use crate::parsers::parse_spec;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The diff of one matched file pair.
#[derive(Debug, Serialize)]
pub struct PairDiff {
    /// File name shared by the pair
    pub source: String,
    pub diff: Diff,
    #[serde(skip)]
    pub sources: OperationsSources,
}

/// Expand a glob pattern into a sorted file list.
///
/// A pattern that matches nothing is a usage error: silently comparing an
/// empty contract against a populated one would report every endpoint as
/// removed.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| {
        OasDiffError::load(
            format!("expanding {pattern:?}"),
            LoadErrorKind::InvalidGlob(e.to_string()),
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            OasDiffError::load(
                format!("expanding {pattern:?}"),
                LoadErrorKind::InvalidGlob(e.to_string()),
            )
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(OasDiffError::load(
            "expanding composed glob",
            LoadErrorKind::EmptyGlob(pattern.to_string()),
        ));
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Index expanded files by file name. Duplicate names within one side keep
/// the last match; the sorted expansion makes the winner deterministic.
fn index_by_name(files: Vec<PathBuf>) -> BTreeMap<String, PathBuf> {
    files
        .into_iter()
        .map(|path| (file_name(&path), path))
        .collect()
}

/// Expand both globs, pair files by name, and diff every pair.
///
/// Pairs are independent, so they are compared in parallel; the output is
/// ordered by file name regardless of completion order.
pub fn composed_diffs(
    config: &DiffConfig,
    base_glob: &str,
    rev_glob: &str,
) -> Result<Vec<PairDiff>> {
    let base_files = index_by_name(expand_glob(base_glob)?);
    let rev_files = index_by_name(expand_glob(rev_glob)?);

    for name in base_files.keys() {
        if !rev_files.contains_key(name) {
            tracing::warn!(file = %name, "file only present on base side, skipping");
        }
    }
    for name in rev_files.keys() {
        if !base_files.contains_key(name) {
            tracing::warn!(file = %name, "file only present on revision side, skipping");
        }
    }

    let pairs: Vec<(String, PathBuf, PathBuf)> = base_files
        .into_iter()
        .filter_map(|(name, base_path)| {
            rev_files
                .get(&name)
                .map(|rev_path| (name, base_path, rev_path.clone()))
        })
        .collect();

    pairs
        .into_par_iter()
        .map(|(name, base_path, rev_path)| {
            let base = parse_spec(&base_path)?;
            let rev = parse_spec(&rev_path)?;
            let diff = get_diff(config, &base, &rev)?;
            tracing::debug!(file = %name, empty = diff.is_empty(), "compared file pair");
            Ok(PairDiff {
                sources: OperationsSources::single(&name),
                source: name,
                diff,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_glob_is_usage_error() {
        let err = expand_glob("/nonexistent-dir-for-tests/*.yaml").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("load"));
    }

    #[test]
    fn test_invalid_glob_is_usage_error() {
        assert!(expand_glob("[").is_err());
    }

    #[test]
    fn test_file_name_pairing_key() {
        assert_eq!(file_name(Path::new("/a/b/pets.yaml")), "pets.yaml");
        assert_eq!(file_name(Path::new("pets.yaml")), "pets.yaml");
    }
}
