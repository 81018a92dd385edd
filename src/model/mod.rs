//! Normalized OpenAPI document model.
//!
//! Both JSON and YAML documents deserialize into these types. The model keeps
//! `$ref` objects unresolved ([`RefOr`]); the diff engine resolves them
//! against [`Components`] on demand so that self-referential schema graphs
//! can be walked with an explicit visited tracker instead of materialized
//! cyclic pointers.

mod schema;

pub use schema::Schema;

use crate::error::{OasDiffError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Either an inline object or a `$ref` into `#/components/...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(RefObject),
    Item(Box<T>),
}

/// A raw `$ref` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefObject {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl<T> RefOr<T> {
    pub fn item(value: T) -> Self {
        Self::Item(Box::new(value))
    }

    /// The reference string, if this is a `$ref`.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Ref(r) => Some(&r.reference),
            Self::Item(_) => None,
        }
    }
}

/// Root of a parsed OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spec {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
    pub security: Vec<IndexMap<String, Vec<String>>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    pub schemas: IndexMap<String, RefOr<Schema>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub links: IndexMap<String, RefOr<Link>>,
    pub security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    pub parameters: Vec<RefOr<Parameter>>,
    pub servers: Vec<Server>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl PathItem {
    /// Operations present on this path item, in canonical method order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
            ("TRACE", &self.trace),
        ]
        .into_iter()
        .filter_map(|(m, op)| op.as_ref().map(|op| (m, op)))
    }

    /// Look up one operation by upper-case HTTP method.
    #[must_use]
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method {
            "GET" => self.get.as_ref(),
            "PUT" => self.put.as_ref(),
            "POST" => self.post.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            "HEAD" => self.head.as_ref(),
            "PATCH" => self.patch.as_ref(),
            "TRACE" => self.trace.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    pub responses: IndexMap<String, RefOr<Response>>,
    pub deprecated: bool,
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    pub servers: Vec<Server>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// Value of the `x-sunset` extension, if present.
    #[must_use]
    pub fn sunset(&self) -> Option<&str> {
        self.extensions.get("x-sunset").and_then(Value::as_str)
    }

    /// Value of the `x-stability-level` extension (e.g. `beta`, `stable`).
    #[must_use]
    pub fn stability_level(&self) -> Option<&str> {
        self.extensions
            .get("x-stability-level")
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub description: Option<String>,
    pub required: bool,
    pub deprecated: bool,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    pub content: IndexMap<String, MediaType>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub content: IndexMap<String, MediaType>,
    pub required: bool,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: Option<String>,
    pub headers: IndexMap<String, RefOr<Header>>,
    pub content: IndexMap<String, MediaType>,
    pub links: IndexMap<String, RefOr<Link>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaType {
    pub schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub description: Option<String>,
    pub required: bool,
    pub deprecated: bool,
    pub example: Option<Value>,
    pub schema: Option<RefOr<Schema>>,
    pub content: IndexMap<String, MediaType>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    pub operation_ref: Option<String>,
    pub operation_id: Option<String>,
    pub parameters: IndexMap<String, Value>,
    pub request_body: Option<Value>,
    pub description: Option<String>,
    pub server: Option<Server>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
    pub variables: IndexMap<String, ServerVariable>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerVariable {
    #[serde(rename = "enum")]
    pub enum_values: Vec<String>,
    pub default: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub description: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "in")]
    pub location: Option<String>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub open_id_connect_url: Option<String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

// Reference chains ($ref pointing at another $ref) are legal but rare;
// resolution follows at most this many hops before reporting an error.
const MAX_REF_HOPS: usize = 16;

macro_rules! resolver {
    ($fn_name:ident, $ty:ty, $section:literal, $field:ident) => {
        /// Resolve a possibly-referenced element against `#/components/`.
        pub fn $fn_name<'a>(&'a self, node: &'a RefOr<$ty>) -> Result<&'a $ty> {
            let mut current = node;
            for _ in 0..MAX_REF_HOPS {
                match current {
                    RefOr::Item(item) => return Ok(item),
                    RefOr::Ref(r) => {
                        let name = component_name(&r.reference, $section)?;
                        current = self
                            .components
                            .$field
                            .get(name)
                            .ok_or_else(|| OasDiffError::unresolved_ref(&r.reference))?;
                    }
                }
            }
            Err(OasDiffError::unresolved_ref(
                node.reference().unwrap_or_default(),
            ))
        }
    };
}

impl Spec {
    resolver!(resolve_parameter, Parameter, "parameters", parameters);
    resolver!(resolve_response, Response, "responses", responses);
    resolver!(
        resolve_request_body,
        RequestBody,
        "requestBodies",
        request_bodies
    );
    resolver!(resolve_header, Header, "headers", headers);
    resolver!(resolve_link, Link, "links", links);
    resolver!(
        resolve_security_scheme,
        SecurityScheme,
        "securitySchemes",
        security_schemes
    );

    /// Resolve a schema node, also returning the last reference followed
    /// (the cycle-tracking key for the schema diff engine).
    pub fn resolve_schema<'a>(
        &'a self,
        node: &'a RefOr<Schema>,
    ) -> Result<(&'a Schema, Option<&'a str>)> {
        let mut current = node;
        let mut last_ref: Option<&'a str> = None;
        for _ in 0..MAX_REF_HOPS {
            match current {
                RefOr::Item(item) => return Ok((item, last_ref)),
                RefOr::Ref(r) => {
                    let name = component_name(&r.reference, "schemas")?;
                    last_ref = Some(&r.reference);
                    current = self
                        .components
                        .schemas
                        .get(name)
                        .ok_or_else(|| OasDiffError::unresolved_ref(&r.reference))?;
                }
            }
        }
        Err(OasDiffError::unresolved_ref(
            node.reference().unwrap_or_default(),
        ))
    }
}

/// Extract the component name from a local `#/components/<section>/<name>` ref.
fn component_name<'a>(reference: &'a str, section: &str) -> Result<&'a str> {
    let prefix = format!("#/components/{section}/");
    reference
        .strip_prefix(prefix.as_str())
        .ok_or_else(|| OasDiffError::unresolved_ref(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_schema(name: &str, schema: Schema) -> Spec {
        let mut spec = Spec::default();
        spec.components
            .schemas
            .insert(name.to_string(), RefOr::item(schema));
        spec
    }

    #[test]
    fn test_resolve_schema_follows_ref() {
        let schema = Schema {
            schema_type: Some("string".to_string()),
            ..Schema::default()
        };
        let spec = spec_with_schema("Pet", schema);

        let node = RefOr::<Schema>::Ref(RefObject {
            reference: "#/components/schemas/Pet".to_string(),
        });
        let (resolved, reference) = spec.resolve_schema(&node).unwrap();
        assert_eq!(resolved.schema_type.as_deref(), Some("string"));
        assert_eq!(reference, Some("#/components/schemas/Pet"));
    }

    #[test]
    fn test_resolve_schema_missing_ref_is_error() {
        let spec = Spec::default();
        let node = RefOr::<Schema>::Ref(RefObject {
            reference: "#/components/schemas/Missing".to_string(),
        });
        assert!(spec.resolve_schema(&node).is_err());
    }

    #[test]
    fn test_path_item_operations_order() {
        let item = PathItem {
            post: Some(Operation::default()),
            get: Some(Operation::default()),
            ..PathItem::default()
        };
        let methods: Vec<&str> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(methods, vec!["GET", "POST"]);
    }

    #[test]
    fn test_operation_sunset_extension() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "deprecated": true,
            "x-sunset": "2026-12-31"
        }))
        .unwrap();
        assert_eq!(op.sunset(), Some("2026-12-31"));
        assert!(op.deprecated);
    }
}
