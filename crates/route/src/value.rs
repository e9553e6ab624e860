//! Conversions between serde shapes and the loosely typed [`ParamMap`].

use crate::{ParamMap, RouteError};
use serde::Serialize;
use serde_json::Value;

/// Returns whether a parameter value counts as present.
///
/// `null`, `false`, `0` and the empty string are treated as absent, so a placeholder bound to one
/// of them is reported as missing.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain string form of a parameter value, without any escaping.
///
/// Strings are used verbatim, arrays are joined with `,` and objects are written as compact json.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Serializes a params or query shape into a [`ParamMap`].
///
/// Shapes serializing to `null` (such as `()` or `None`) mean "no map" and yield `Ok(None)`.
pub fn to_param_map<T: Serialize + ?Sized>(shape: &'static str, value: &T) -> Result<Option<ParamMap>, RouteError> {
    match serde_json::to_value(value).map_err(|e| RouteError::serialize(shape, e))? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(RouteError::not_a_map(shape, kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
