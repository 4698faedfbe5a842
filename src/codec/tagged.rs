//! Tagged byte strings
//!
//! Serialized form:
//!
//! ```text
//! <tag> ':' <payload>
//! ```
//!
//! Scalar tags never contain `:`. Tuple tags are `tuple:<t1>,<t2>,...`,
//! so parsing splits on the first `:` and, for tuples only, on the next
//! one as well. Payload bytes are never inspected for separators.

use super::errors::{CodecError, CodecResult};

/// Tag for `Int64` values
pub const TAG_INT: &str = "int";
/// Tag for raw byte strings
pub const TAG_STR: &str = "str";
/// Tag for Unicode text
pub const TAG_UNICODE: &str = "unicode";
/// Head of every tuple tag
pub const TAG_TUPLE: &str = "tuple";

const SEPARATOR: u8 = b':';

/// A type tag paired with its type-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedBytes {
    tag: String,
    payload: Vec<u8>,
}

impl TaggedBytes {
    pub fn new(tag: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            tag: tag.into(),
            payload,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Element tag list of a tuple tag, or `None` for scalar tags.
    pub fn tuple_tags(&self) -> Option<&str> {
        self.tag
            .strip_prefix(TAG_TUPLE)
            .and_then(|rest| rest.strip_prefix(':'))
    }

    /// Serialize as `tag ++ ':' ++ payload`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.tag.len() + 1 + self.payload.len());
        buf.extend_from_slice(self.tag.as_bytes());
        buf.push(SEPARATOR);
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Parse a serialized tagged byte string.
    pub fn parse(bytes: &[u8]) -> CodecResult<Self> {
        let (head, rest) = split_once(bytes)
            .ok_or_else(|| CodecError::malformed("missing tag separator"))?;
        let head = tag_str(head)?;

        if head != TAG_TUPLE {
            return Ok(Self::new(head, rest.to_vec()));
        }

        let (tags, payload) = split_once(rest)
            .ok_or_else(|| CodecError::malformed("missing tuple payload separator"))?;
        let tags = tag_str(tags)?;
        Ok(Self::new(format!("{}:{}", TAG_TUPLE, tags), payload.to_vec()))
    }
}

fn split_once(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == SEPARATOR)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn tag_str(bytes: &[u8]) -> CodecResult<&str> {
    std::str::from_utf8(bytes).map_err(|_| CodecError::malformed("tag is not valid UTF-8"))
}
