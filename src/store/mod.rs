//! Remote store collaborator
//!
//! The store keeps opaque byte keys in byte-lexicographic order, with
//! cells addressed by `family:qualifier` column names. This module only
//! describes the calls the client layer makes; the wire transport lives
//! behind [`StoreClient`] implementations.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::fmt;

/// A row as the store returns it: encoded key and fully qualified cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub key: Vec<u8>,
    pub columns: BTreeMap<String, Vec<u8>>,
}

impl RawRow {
    pub fn new(key: Vec<u8>, columns: BTreeMap<String, Vec<u8>>) -> Self {
        Self { key, columns }
    }
}

/// Handle of an open remote scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScannerId(pub u64);

impl fmt::Display for ScannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calls consumed from the remote store.
///
/// Column lists name fully qualified columns; an entry ending in `:`
/// selects the whole family, and an empty list selects every column.
pub trait StoreClient: Send + Sync + fmt::Debug {
    /// Create a table with the given column families
    fn create_table(&self, table: &str, families: &[String]) -> StoreResult<()>;

    fn enable_table(&self, table: &str) -> StoreResult<()>;

    fn disable_table(&self, table: &str) -> StoreResult<()>;

    /// Delete a (disabled) table
    fn drop_table(&self, table: &str) -> StoreResult<()>;

    fn is_table_enabled(&self, table: &str) -> StoreResult<bool>;

    fn table_names(&self) -> StoreResult<Vec<String>>;

    /// Fetch one row; `None` when no selected cell exists
    fn get_row(&self, table: &str, key: &[u8], columns: &[String]) -> StoreResult<Option<RawRow>>;

    /// Write cells into a row
    fn put_row(&self, table: &str, key: &[u8], cells: &BTreeMap<String, Vec<u8>>) -> StoreResult<()>;

    /// Remove every cell of a row
    fn delete_row(&self, table: &str, key: &[u8]) -> StoreResult<()>;

    /// Atomically add `delta` to a counter cell and return the new value
    fn increment_counter(&self, table: &str, key: &[u8], column: &str, delta: i64) -> StoreResult<i64>;

    /// Open a scanner over `[start, stop)`, `stop = None` meaning end of table
    fn open_scanner(
        &self,
        table: &str,
        start: &[u8],
        stop: Option<&[u8]>,
        columns: &[String],
        batch_size: usize,
    ) -> StoreResult<ScannerId>;

    /// Next rows in key order; fewer than `max_rows` signals exhaustion
    fn fetch_next(&self, scanner: ScannerId, max_rows: usize) -> StoreResult<Vec<RawRow>>;

    fn close_scanner(&self, scanner: ScannerId) -> StoreResult<()>;
}
