//! Composite (tuple) encoding
//!
//! ```text
//! tag:     tuple:<tag_1>,<tag_2>,...,<tag_n>
//! payload: hex(p_1) '\t' hex(p_2) '\t' ... '\t' hex(p_n)
//! ```
//!
//! Cells are hex-encoded so the tab separator can never occur inside one.
//! With a cell limit `k`, the tag still lists every element but only the
//! first `k` cells are written; truncation is on whole cells, which makes
//! the result a byte prefix of the full encoding.

use super::errors::{CodecError, CodecResult};
use super::tagged::{TaggedBytes, TAG_TUPLE};
use super::value::Value;
use super::ValueCodec;

pub(crate) const CELL_SEPARATOR: u8 = b'\t';

impl ValueCodec {
    /// Encode tuple elements, keeping at most `limit` payload cells.
    ///
    /// Elements that are themselves tuples are rejected.
    pub fn encode_tuple(&self, elements: &[Value], limit: Option<usize>) -> CodecResult<TaggedBytes> {
        let mut tags = Vec::with_capacity(elements.len());
        let mut cells = Vec::with_capacity(elements.len());

        for element in elements {
            let (tag, payload) = self.encode_scalar(element)?;
            tags.push(tag);
            cells.push(hex::encode(payload));
        }

        if let Some(limit) = limit {
            cells.truncate(limit);
        }

        let tag = format!("{}:{}", TAG_TUPLE, tags.join(","));
        let payload = cells.join("\t").into_bytes();
        Ok(TaggedBytes::new(tag, payload))
    }

    /// Decode a tuple from its element tag list and cell payload.
    pub fn decode_tuple(&self, tags: &str, payload: &[u8]) -> CodecResult<Vec<Value>> {
        if tags.is_empty() {
            if payload.is_empty() {
                return Ok(Vec::new());
            }
            return Err(CodecError::TupleArityMismatch {
                tags: 0,
                cells: payload.split(|&b| b == CELL_SEPARATOR).count(),
            });
        }

        let tags: Vec<&str> = tags.split(',').collect();
        let cells: Vec<&[u8]> = payload.split(|&b| b == CELL_SEPARATOR).collect();
        if tags.len() != cells.len() {
            return Err(CodecError::TupleArityMismatch {
                tags: tags.len(),
                cells: cells.len(),
            });
        }

        tags.into_iter()
            .zip(cells)
            .map(|(tag, cell)| {
                let raw = hex::decode(cell)
                    .map_err(|e| CodecError::malformed(format!("tuple cell: {}", e)))?;
                self.decode_scalar(tag, &raw)
            })
            .collect()
    }
}
