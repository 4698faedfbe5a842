//! # Codec Errors
//!
//! Encode-time and decode-time failures of the tagged value codec.
//! None of these are retried; decode errors indicate corruption or
//! version skew between writers and readers.

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Tagged value codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Value outside the encodable set (including tuples nested in tuples)
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Tag not in the codec vocabulary
    #[error("Unknown tag: '{0}'")]
    UnknownTag(String),

    /// Structurally broken tagged bytes
    #[error("Malformed tagged bytes: {0}")]
    Malformed(String),

    /// Tuple tag list and cell list disagree in length
    #[error("Tuple arity mismatch: {tags} tags, {cells} cells")]
    TupleArityMismatch { tags: usize, cells: usize },
}

impl CodecError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::UnsupportedType(_) => "HBASTA_CODEC_UNSUPPORTED_TYPE",
            CodecError::UnknownTag(_) => "HBASTA_CODEC_UNKNOWN_TAG",
            CodecError::Malformed(_) => "HBASTA_CODEC_MALFORMED",
            CodecError::TupleArityMismatch { .. } => "HBASTA_CODEC_TUPLE_ARITY_MISMATCH",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::Malformed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CodecError::UnsupportedType("float".into()).code(),
            "HBASTA_CODEC_UNSUPPORTED_TYPE"
        );
        assert_eq!(
            CodecError::UnknownTag("blob".into()).code(),
            "HBASTA_CODEC_UNKNOWN_TAG"
        );
        assert_eq!(
            CodecError::TupleArityMismatch { tags: 2, cells: 1 }.code(),
            "HBASTA_CODEC_TUPLE_ARITY_MISMATCH"
        );
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::TupleArityMismatch { tags: 3, cells: 2 };
        let display = err.to_string();
        assert!(display.contains("3 tags"));
        assert!(display.contains("2 cells"));
    }
}
