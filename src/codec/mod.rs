//! Typed value codec
//!
//! Maps `Value`s to self-describing tagged byte strings and back.
//!
//! | Variant | Tag | Payload |
//! |---|---|---|
//! | `Int64` | `int` | 8 bytes, see [`IntEncoding`] |
//! | `Bytes` | `str` | unchanged |
//! | `Text` | `unicode` | UTF-8 |
//! | `Tuple` | `tuple:<tags>` | hex cells joined by tab |
//!
//! # Ordering
//!
//! The store sorts rows by raw key bytes. Strings order naturally.
//! Integers order naturally only under [`IntEncoding::OrderPreserving`];
//! [`IntEncoding::LittleEndian`] exists to read and write rows produced by
//! the legacy client and does not preserve numeric order.

mod errors;
mod tagged;
mod tuple;
mod value;

pub use errors::{CodecError, CodecResult};
pub use tagged::{TaggedBytes, TAG_INT, TAG_STR, TAG_TUPLE, TAG_UNICODE};
pub(crate) use tuple::CELL_SEPARATOR;
pub use value::Value;

use serde::{Deserialize, Serialize};

const SIGN_BIT: u64 = 1 << 63;

/// Fixed-width integer payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntEncoding {
    /// Big-endian with the sign bit flipped; byte order equals numeric order.
    #[default]
    OrderPreserving,
    /// Little-endian two's complement, byte-compatible with legacy rows.
    LittleEndian,
}

impl IntEncoding {
    pub fn encode(self, n: i64) -> [u8; 8] {
        match self {
            IntEncoding::OrderPreserving => ((n as u64) ^ SIGN_BIT).to_be_bytes(),
            IntEncoding::LittleEndian => n.to_le_bytes(),
        }
    }

    pub fn decode(self, bytes: [u8; 8]) -> i64 {
        match self {
            IntEncoding::OrderPreserving => (u64::from_be_bytes(bytes) ^ SIGN_BIT) as i64,
            IntEncoding::LittleEndian => i64::from_le_bytes(bytes),
        }
    }
}

/// Encoder/decoder for tagged values.
///
/// Writers and readers of the same table must agree on `int_encoding`;
/// the tag does not record it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueCodec {
    int_encoding: IntEncoding,
}

impl ValueCodec {
    pub fn new(int_encoding: IntEncoding) -> Self {
        Self { int_encoding }
    }

    pub fn int_encoding(&self) -> IntEncoding {
        self.int_encoding
    }

    /// Encode a value into its tagged form.
    pub fn encode(&self, value: &Value) -> CodecResult<TaggedBytes> {
        match value {
            Value::Tuple(elements) => self.encode_tuple(elements, None),
            scalar => {
                let (tag, payload) = self.encode_scalar(scalar)?;
                Ok(TaggedBytes::new(tag, payload))
            }
        }
    }

    /// Decode a tagged value, dispatching on the tag alone.
    pub fn decode(&self, tagged: &TaggedBytes) -> CodecResult<Value> {
        match tagged.tuple_tags() {
            Some(tags) => self.decode_tuple(tags, tagged.payload()).map(Value::Tuple),
            None => self.decode_scalar(tagged.tag(), tagged.payload()),
        }
    }

    /// Encode straight to the serialized `tag:payload` bytes.
    pub fn encode_bytes(&self, value: &Value) -> CodecResult<Vec<u8>> {
        Ok(self.encode(value)?.to_bytes())
    }

    /// Parse and decode serialized `tag:payload` bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> CodecResult<Value> {
        self.decode(&TaggedBytes::parse(bytes)?)
    }

    pub(crate) fn encode_scalar(&self, value: &Value) -> CodecResult<(&'static str, Vec<u8>)> {
        match value {
            Value::Int64(n) => Ok((TAG_INT, self.int_encoding.encode(*n).to_vec())),
            Value::Bytes(b) => Ok((TAG_STR, b.clone())),
            Value::Text(s) => Ok((TAG_UNICODE, s.as_bytes().to_vec())),
            Value::Tuple(_) => Err(CodecError::UnsupportedType("tuple inside tuple".into())),
        }
    }

    pub(crate) fn decode_scalar(&self, tag: &str, payload: &[u8]) -> CodecResult<Value> {
        match tag {
            TAG_INT => {
                let bytes: [u8; 8] = payload.try_into().map_err(|_| {
                    CodecError::malformed(format!("int payload is {} bytes, expected 8", payload.len()))
                })?;
                Ok(Value::Int64(self.int_encoding.decode(bytes)))
            }
            TAG_STR => Ok(Value::Bytes(payload.to_vec())),
            TAG_UNICODE => String::from_utf8(payload.to_vec())
                .map(Value::Text)
                .map_err(|_| CodecError::malformed("unicode payload is not valid UTF-8")),
            other => Err(CodecError::UnknownTag(other.to_string())),
        }
    }
}
