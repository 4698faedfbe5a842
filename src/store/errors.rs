//! # Store Errors
//!
//! Failures reported by the remote store collaborator. They are never
//! retried here; reconnection policy belongs to the transport.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Remote store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Data operations on a disabled table, or dropping an enabled one
    #[error("Table '{table}' is {state}")]
    TableState { table: String, state: &'static str },

    #[error("Unknown column family in column '{0}'")]
    UnknownFamily(String),

    #[error("Scanner not found: {0}")]
    ScannerNotFound(u64),

    /// Transport or server-side failure
    #[error("Remote error: {0}")]
    Remote(String),
}

impl StoreError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TableNotFound(_) => "HBASTA_STORE_TABLE_NOT_FOUND",
            StoreError::TableExists(_) => "HBASTA_STORE_TABLE_EXISTS",
            StoreError::TableState { .. } => "HBASTA_STORE_TABLE_STATE",
            StoreError::UnknownFamily(_) => "HBASTA_STORE_UNKNOWN_FAMILY",
            StoreError::ScannerNotFound(_) => "HBASTA_STORE_SCANNER_NOT_FOUND",
            StoreError::Remote(_) => "HBASTA_STORE_REMOTE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(StoreError::TableNotFound("t".into()).code(), "HBASTA_STORE_TABLE_NOT_FOUND");
        assert_eq!(StoreError::Remote("reset".into()).code(), "HBASTA_STORE_REMOTE");
    }

    #[test]
    fn test_table_state_display() {
        let err = StoreError::TableState {
            table: "users".into(),
            state: "disabled",
        };
        assert_eq!(err.to_string(), "Table 'users' is disabled");
    }
}
