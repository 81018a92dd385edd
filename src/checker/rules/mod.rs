//! Rule implementations, grouped by the part of the contract they inspect.

pub(super) mod deprecation;
pub(super) mod paths;
pub(super) mod request_body;
pub(super) mod request_params;
pub(super) mod responses;

use serde_json::Value;

/// Render a diff value for interpolation into a finding text. Strings are
/// shown bare, everything else (numbers, null, arrays) as JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "unset".to_string(),
        other => other.to_string(),
    }
}
