//! # Client Errors
//!
//! Everything the client facade can fail with. Codec and store failures
//! are wrapped unchanged; nothing here is retried or replaced by a default.

use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Propagated from the store collaborator
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Contradictory or incomplete scan bounds
    #[error("Invalid scan arguments: {0}")]
    InvalidScanArguments(String),

    /// Mutation attempted while a cache session is active
    #[error("Cannot {operation} while a cache session is active")]
    WriteDuringCacheSession { operation: &'static str },

    /// Row returned by the store does not fit the column-family layout
    #[error("Malformed row: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Codec(e) => e.code(),
            ClientError::Store(e) => e.code(),
            ClientError::InvalidScanArguments(_) => "HBASTA_CLIENT_INVALID_SCAN_ARGUMENTS",
            ClientError::WriteDuringCacheSession { .. } => "HBASTA_CLIENT_WRITE_DURING_CACHE_SESSION",
            ClientError::Malformed(_) => "HBASTA_CLIENT_MALFORMED_ROW",
            ClientError::Config(_) => "HBASTA_CLIENT_CONFIG",
        }
    }

    pub(crate) fn invalid_scan(reason: impl Into<String>) -> Self {
        ClientError::InvalidScanArguments(reason.into())
    }
}
