//! Client configuration
//!
//! Loaded from a JSON file; every field has a default, so `{}` is a valid
//! configuration.
//!
//! ```json
//! {
//!   "column_family": "fam",
//!   "scan_batch_size": 100,
//!   "int_encoding": "order_preserving",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::{IntEncoding, ValueCodec};
use crate::observability::{Event, Logger, Severity};

use super::errors::{ClientError, ClientResult};
use super::row::{ColumnFamily, RowCodec, DEFAULT_FAMILY};

/// Client configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Column family holding every logical column
    #[serde(default = "default_column_family")]
    pub column_family: String,

    /// Rows requested per scanner fetch
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,

    /// Integer payload layout; must match whoever wrote the table
    #[serde(default)]
    pub int_encoding: IntEncoding,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_column_family() -> String {
    DEFAULT_FAMILY.to_string()
}
fn default_scan_batch_size() -> usize {
    100
}
fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            column_family: default_column_family(),
            scan_batch_size: default_scan_batch_size(),
            int_encoding: IntEncoding::default(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("Failed to read config: {}", e)))?;
        let config = Self::from_json(&content)?;
        Logger::event(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ClientResult<Self> {
        let config: ClientConfig = serde_json::from_str(content)
            .map_err(|e| ClientError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.scan_batch_size == 0 {
            return Err(ClientError::Config("scan_batch_size must be > 0".into()));
        }
        ColumnFamily::new(self.column_family.as_str())?;
        Ok(())
    }

    pub fn codec(&self) -> ValueCodec {
        ValueCodec::new(self.int_encoding)
    }

    pub fn row_codec(&self) -> ClientResult<RowCodec> {
        Ok(RowCodec::new(
            self.codec(),
            ColumnFamily::new(self.column_family.as_str())?,
        ))
    }

    /// Apply `log_level` to the process-wide logger.
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.log_level);
    }
}
