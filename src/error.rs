//! Unified error types for oas-tools.
//!
//! Structural and usage errors abort the whole run and map to the
//! invalid-usage exit code, which keeps "could not compare" distinct from
//! "compared and found breaking changes". A circular reference bound being
//! reached is never an error; the schema diff engine models it as a
//! `circular_ref` marker on the diff node.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for oas-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OasDiffError {
    /// Errors while loading or parsing an OpenAPI document
    #[error("failed to load OpenAPI document: {context}")]
    Load {
        context: String,
        #[source]
        source: LoadErrorKind,
    },

    /// Errors during diff computation
    #[error("diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// Errors during changelog/report rendering
    #[error("report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// Malformed suppression (ignore) file
    #[error("cannot process {kind} ignore file {path:?}: {message}")]
    IgnoreFile {
        kind: String,
        path: PathBuf,
        message: String,
    },

    /// Bad flag values or combinations, reported before any comparison work
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific load error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoadErrorKind {
    #[error("unknown document format - expected a JSON or YAML OpenAPI document")]
    UnknownFormat,

    #[error("invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("invalid YAML structure: {0}")]
    InvalidYaml(String),

    #[error("not an OpenAPI document: {0}")]
    NotOpenApi(String),

    #[error("glob pattern matched no files: {0}")]
    EmptyGlob(String),

    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),
}

/// Specific diff error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("unsupported reference target: {0}")]
    UnsupportedReference(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(String),

    #[error("YAML serialization failed: {0}")]
    YamlSerialization(String),
}

/// Convenient Result type for oas-tools operations
pub type Result<T> = std::result::Result<T, OasDiffError>;

impl OasDiffError {
    /// Create a load error with context
    pub fn load(context: impl Into<String>, source: LoadErrorKind) -> Self {
        Self::Load {
            context: context.into(),
            source,
        }
    }

    /// Create a diff error for an unresolved `$ref`
    pub fn unresolved_ref(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self::Diff {
            context: format!("while resolving {reference}"),
            source: DiffErrorKind::UnresolvedReference(reference),
        }
    }

    /// Create a report error with context
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an ignore-file error
    pub fn ignore_file(
        kind: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::IgnoreFile {
            kind: kind.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-usage error
    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage(message.into())
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Exit code this error maps to at the process boundary.
    ///
    /// All structural/usage errors share the invalid-usage code so callers
    /// can distinguish them from "compared and found problems" (exit 1).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl From<std::io::Error> for OasDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for OasDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::load(
            "JSON deserialization",
            LoadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for OasDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::load(
            "YAML deserialization",
            LoadErrorKind::InvalidYaml(err.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OasDiffError::load("at spec.yaml", LoadErrorKind::UnknownFormat);
        assert!(err.to_string().contains("spec.yaml"));

        let err = OasDiffError::unresolved_ref("#/components/schemas/Missing");
        assert!(err.to_string().contains("#/components/schemas/Missing"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = OasDiffError::io("/path/to/spec.yaml", io_err);
        assert!(err.to_string().contains("/path/to/spec.yaml"));
    }

    #[test]
    fn test_usage_errors_share_exit_code() {
        assert_eq!(OasDiffError::invalid_usage("bad flags").exit_code(), 2);
        assert_eq!(
            OasDiffError::ignore_file("warn", "/tmp/ignore.txt", "bad line").exit_code(),
            2
        );
    }
}
