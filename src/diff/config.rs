//! Comparison configuration.

use crate::error::{OasDiffError, Result};
use regex::Regex;
use std::collections::BTreeSet;

/// Elements that may be excluded from comparison via `--exclude-elements`.
pub const EXCLUDE_ELEMENTS: [&str; 5] = [
    "description",
    "examples",
    "extensions",
    "servers",
    "security",
];

/// Immutable comparison configuration, constructed once per run from merged
/// defaults and user overrides.
#[derive(Debug, Default)]
pub struct DiffConfig {
    /// Elements excluded from the diff entirely
    pub exclude_elements: BTreeSet<String>,
    /// Null out facets known to be non-breaking (descriptions, examples,
    /// vendor extensions)
    pub breaking_only: bool,
    /// Maximum reference-chain expansions before the schema diff engine
    /// marks the node circular and stops
    pub max_circular_refs: usize,
    /// Prefix added to base paths before matching
    pub path_prefix_base: String,
    /// Prefix added to revision paths before matching
    pub path_prefix_revision: String,
    /// Prefix stripped from base paths before matching
    pub path_strip_prefix_base: String,
    /// Prefix stripped from revision paths before matching
    pub path_strip_prefix_revision: String,
    /// Fold path parameter names into the endpoint match key
    pub include_path_params: bool,
    /// Only compare paths matching this regular expression
    pub path_filter: Option<Regex>,
}

impl DiffConfig {
    /// Default circular reference bound, matching the CLI default.
    pub const DEFAULT_MAX_CIRCULAR_REFS: usize = 5;

    #[must_use]
    pub fn new() -> Self {
        Self {
            max_circular_refs: Self::DEFAULT_MAX_CIRCULAR_REFS,
            ..Self::default()
        }
    }

    /// Set the excluded elements, validating each against [`EXCLUDE_ELEMENTS`].
    pub fn with_exclude_elements(mut self, elements: &[String]) -> Result<Self> {
        for element in elements {
            if !EXCLUDE_ELEMENTS.contains(&element.as_str()) {
                return Err(OasDiffError::invalid_usage(format!(
                    "invalid exclude-elements value {element:?}, expected one of: {}",
                    EXCLUDE_ELEMENTS.join(", ")
                )));
            }
            self.exclude_elements.insert(element.clone());
        }
        Ok(self)
    }

    /// Set the path filter from a regular expression string.
    pub fn with_path_filter(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            OasDiffError::invalid_usage(format!("invalid match-path regex {pattern:?}: {e}"))
        })?;
        self.path_filter = Some(regex);
        Ok(self)
    }

    pub(crate) fn is_excluded(&self, element: &str) -> bool {
        self.exclude_elements.contains(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_circular_bound() {
        assert_eq!(DiffConfig::new().max_circular_refs, 5);
    }

    #[test]
    fn test_unknown_exclude_element_rejected() {
        let err = DiffConfig::new()
            .with_exclude_elements(&["bogus".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_invalid_path_filter_rejected() {
        assert!(DiffConfig::new().with_path_filter("[").is_err());
    }
}
