//! Small accessors over the untyped JSON card document.

use serde_json::Value;

pub(crate) fn str_field<'a>(json: &'a Value, key: &str) -> Option<&'a str> {
    json.get(key).and_then(Value::as_str)
}

pub(crate) fn string(json: &Value, key: &str) -> Option<String> {
    str_field(json, key).map(str::to_string)
}

pub(crate) fn flag(json: &Value, key: &str) -> bool {
    json.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn array<'a>(json: &'a Value, key: &str) -> &'a [Value] {
    json.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Present and not `null`.
pub(crate) fn has_value(json: &Value, key: &str) -> bool {
    json.get(key).is_some_and(|value| !value.is_null())
}

/// The `@type` discriminator of a node.
pub(crate) fn type_name(json: &Value) -> Option<&str> {
    str_field(json, "@type")
}

pub(crate) const MISSING_TYPE: &str = "(missing @type)";
