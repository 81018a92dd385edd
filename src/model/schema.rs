//! Type-schema model.

use super::RefOr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An OpenAPI 3.0 schema object.
///
/// Composition arrays and `properties` hold [`RefOr`] nodes so that
/// self-referential schemas stay representable; the diff engine resolves and
/// bounds them at traversal time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub nullable: bool,
    pub deprecated: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub example: Option<Value>,

    // Validation facets
    pub pattern: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub required: Vec<String>,

    // Structure
    pub items: Option<Box<RefOr<Schema>>>,
    pub properties: IndexMap<String, RefOr<Schema>>,
    pub additional_properties: Option<Box<RefOr<Schema>>>,

    // Composition
    pub all_of: Vec<RefOr<Schema>>,
    pub one_of: Vec<RefOr<Schema>>,
    pub any_of: Vec<RefOr<Schema>>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_schema() {
        let schema: Schema = serde_yaml::from_str(
            r"
type: object
required: [id]
properties:
  id:
    type: integer
    format: int64
  tags:
    type: array
    minItems: 2
    items:
      type: string
",
        )
        .unwrap();

        assert_eq!(schema.schema_type.as_deref(), Some("object"));
        assert_eq!(schema.required, vec!["id"]);
        let tags = match &schema.properties["tags"] {
            RefOr::Item(s) => s,
            RefOr::Ref(_) => panic!("expected inline schema"),
        };
        assert_eq!(tags.min_items, Some(2));
    }

    #[test]
    fn test_deserialize_self_reference() {
        let schema: Schema = serde_yaml::from_str(
            r"
type: object
properties:
  next:
    $ref: '#/components/schemas/Node'
",
        )
        .unwrap();

        assert_eq!(
            schema.properties["next"].reference(),
            Some("#/components/schemas/Node")
        );
    }
}
