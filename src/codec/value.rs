//! Application values understood by the codec.
//!
//! `Value` is a closed set. Anything arriving from a dynamic source
//! (JSON on the command line, for instance) goes through `TryFrom`, which
//! is where unsupported input types are rejected.

use serde_json::{json, Value as JsonValue};

use super::errors::CodecError;

/// A typed value that can be stored as a row key or cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// Signed 64-bit integer
    Int64(i64),
    /// Opaque byte string, stored unchanged
    Bytes(Vec<u8>),
    /// Unicode text, stored as UTF-8
    Text(String),
    /// Ordered composite of non-tuple values
    Tuple(Vec<Value>),
}

impl Value {
    /// Build a `Bytes` value.
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(b.into())
    }

    /// Build a `Text` value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Build a `Tuple` value.
    pub fn tuple(elements: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(elements.into_iter().collect())
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int64(_) => "int64",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON rendering. Byte strings become `{"bytes": "<hex>"}` so that
    /// the output parses back into the same variant.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int64(n) => json!(n),
            Value::Bytes(b) => json!({ "bytes": hex::encode(b) }),
            Value::Text(s) => json!(s),
            Value::Tuple(elements) => {
                JsonValue::Array(elements.iter().map(Value::to_json).collect())
            }
        }
    }

    fn from_json(value: &JsonValue, nested: bool) -> Result<Self, CodecError> {
        match value {
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Int64)
                .ok_or_else(|| CodecError::UnsupportedType(format!("number {}", n))),
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            JsonValue::Array(items) => {
                if nested {
                    return Err(CodecError::UnsupportedType("tuple inside tuple".into()));
                }
                let elements = items
                    .iter()
                    .map(|item| Value::from_json(item, true))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Tuple(elements))
            }
            JsonValue::Object(map) => match (map.len(), map.get("bytes")) {
                (1, Some(JsonValue::String(h))) => hex::decode(h)
                    .map(Value::Bytes)
                    .map_err(|e| CodecError::malformed(format!("bytes literal: {}", e))),
                _ => Err(CodecError::UnsupportedType("object".into())),
            },
            JsonValue::Bool(_) => Err(CodecError::UnsupportedType("bool".into())),
            JsonValue::Null => Err(CodecError::UnsupportedType("null".into())),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl TryFrom<&JsonValue> for Value {
    type Error = CodecError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        Value::from_json(value, false)
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = CodecError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Value::from_json(&value, false)
    }
}
