//! OpenAPI document loading.
//!
//! Thin I/O layer: reads a file, detects JSON vs YAML from the content, and
//! deserializes into the normalized [`Spec`] model. Everything downstream of
//! here operates on the in-memory model only.

use crate::error::{LoadErrorKind, OasDiffError, Result};
use crate::model::Spec;
use std::path::Path;

/// Parse an OpenAPI document from a file path.
pub fn parse_spec(path: &Path) -> Result<Spec> {
    let content =
        std::fs::read_to_string(path).map_err(|e| OasDiffError::io(path.to_path_buf(), e))?;
    parse_spec_str(&content).map_err(|e| match e {
        OasDiffError::Load { context, source } => OasDiffError::Load {
            context: format!("{} (at {})", context, path.display()),
            source,
        },
        other => other,
    })
}

/// Parse an OpenAPI document from a string, auto-detecting JSON vs YAML.
pub fn parse_spec_str(content: &str) -> Result<Spec> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Err(OasDiffError::load(
            "empty document",
            LoadErrorKind::UnknownFormat,
        ));
    }

    let spec: Spec = if trimmed.starts_with('{') {
        serde_json::from_str(content)
            .map_err(|e| OasDiffError::load("parsing JSON", LoadErrorKind::InvalidJson(e.to_string())))?
    } else {
        // YAML is a superset of JSON, so this branch also covers documents
        // with a leading comment or document marker.
        serde_yaml::from_str(content)
            .map_err(|e| OasDiffError::load("parsing YAML", LoadErrorKind::InvalidYaml(e.to_string())))?
    };

    if spec.openapi.is_empty() {
        return Err(OasDiffError::load(
            "validating document",
            LoadErrorKind::NotOpenApi("missing 'openapi' version field".to_string()),
        ));
    }

    tracing::debug!(
        version = %spec.openapi,
        paths = spec.paths.len(),
        "parsed OpenAPI document"
    );

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r"
openapi: 3.0.3
info:
  title: api
  version: '1.0'
paths:
  /pets:
    get:
      responses:
        '200':
          description: ok
";

    #[test]
    fn test_parse_yaml() {
        let spec = parse_spec_str(MINIMAL_YAML).unwrap();
        assert_eq!(spec.openapi, "3.0.3");
        assert!(spec.paths.contains_key("/pets"));
        assert!(spec.paths["/pets"].get.is_some());
    }

    #[test]
    fn test_parse_json() {
        let spec = parse_spec_str(
            r#"{"openapi":"3.0.0","info":{"title":"api","version":"1"},"paths":{}}"#,
        )
        .unwrap();
        assert_eq!(spec.openapi, "3.0.0");
    }

    #[test]
    fn test_missing_openapi_field_rejected() {
        let err = parse_spec_str(r#"{"info":{"title":"api","version":"1"},"paths":{}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("load"));
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(parse_spec_str("   ").is_err());
    }
}
