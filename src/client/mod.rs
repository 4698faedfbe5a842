//! Typed client facade
//!
//! Wraps a [`StoreClient`] with the value codec, the column-family
//! convention, scan sessions and the session result cache.
//!
//! # Example
//!
//! ```ignore
//! use hbasta::client::{Client, ScanRequest};
//! use hbasta::codec::Value;
//! use hbasta::store::MemoryStore;
//!
//! let mut client = Client::new(MemoryStore::new());
//! client.create_table("users")?;
//! client.add_row("users", &Value::bytes("1"), &[("name", Value::text("ada"))])?;
//!
//! client.begin_cache_session();
//! let row = client.get_row("users", &Value::bytes("1"), &[])?;
//! client.end_cache_session();
//!
//! for row in client.scan("users", ScanRequest::with_prefix(Value::bytes("1")))? {
//!     println!("{:?}", row?);
//! }
//! ```

mod config;
mod errors;
mod row;
mod scan;

pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use row::{ColumnFamily, Row, RowCodec, DEFAULT_FAMILY};
pub use scan::{KeyPrefix, ScanRequest, ScanRows, ScanSession};

use crate::cache::{CacheKey, CacheStats, CachedResult, ResultCache};
use crate::codec::{Value, ValueCodec};
use crate::store::StoreClient;

/// Typed client over a remote store.
///
/// Reads go through the result cache; while a cache session is active
/// every mutating call fails with `WriteDuringCacheSession` before any
/// store call is made.
#[derive(Debug)]
pub struct Client<S: StoreClient> {
    store: S,
    rows: RowCodec,
    batch_size: usize,
    cache: ResultCache,
}

impl<S: StoreClient> Client<S> {
    /// Client with the default configuration.
    pub fn new(store: S) -> Self {
        let config = ClientConfig::default();
        Self {
            store,
            rows: RowCodec::default(),
            batch_size: config.scan_batch_size,
            cache: ResultCache::new(),
        }
    }

    pub fn with_config(store: S, config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            store,
            rows: config.row_codec()?,
            batch_size: config.scan_batch_size,
            cache: ResultCache::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &ValueCodec {
        self.rows.codec()
    }

    pub fn column_family(&self) -> &ColumnFamily {
        self.rows.family()
    }

    // =========================================================================
    // Cache session
    // =========================================================================

    /// Start memoizing reads and refusing writes. No-op if already active.
    pub fn begin_cache_session(&mut self) {
        self.cache.begin_session();
    }

    /// Discard every cached result and allow writes again.
    pub fn end_cache_session(&mut self) {
        self.cache.end_session();
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_enabled()
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    // =========================================================================
    // Table administration
    // =========================================================================

    /// Create a table holding the client's column family.
    pub fn create_table(&mut self, table: &str) -> ClientResult<()> {
        self.cache.ensure_writable("create_table")?;
        let families = [self.rows.family().name().to_string()];
        Ok(self.store.create_table(table, &families)?)
    }

    pub fn enable_table(&mut self, table: &str) -> ClientResult<()> {
        self.cache.ensure_writable("enable_table")?;
        Ok(self.store.enable_table(table)?)
    }

    pub fn disable_table(&mut self, table: &str) -> ClientResult<()> {
        self.cache.ensure_writable("disable_table")?;
        Ok(self.store.disable_table(table)?)
    }

    /// Delete a table. The store requires it to be disabled first.
    pub fn drop_table(&mut self, table: &str) -> ClientResult<()> {
        self.cache.ensure_writable("drop_table")?;
        Ok(self.store.drop_table(table)?)
    }

    pub fn is_table_enabled(&self, table: &str) -> ClientResult<bool> {
        Ok(self.store.is_table_enabled(table)?)
    }

    pub fn table_names(&self) -> ClientResult<Vec<String>> {
        Ok(self.store.table_names()?)
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Write typed cells into the row at `key`.
    pub fn add_row(&mut self, table: &str, key: &Value, columns: &[(&str, Value)]) -> ClientResult<()> {
        self.cache.ensure_writable("add_row")?;
        let key = self.rows.encode_key(key)?;
        let cells = self.rows.encode_cells(columns)?;
        Ok(self.store.put_row(table, &key, &cells)?)
    }

    /// Read one row; no columns means every column of the family.
    pub fn get_row(&mut self, table: &str, key: &Value, columns: &[&str]) -> ClientResult<Option<Row>> {
        let encoded = self.rows.encode_key(key)?;
        let selector = self.rows.family().selector(columns);
        let cache_key = CacheKey::get(table, encoded.clone(), &selector);

        let (store, rows) = (&self.store, &self.rows);
        self.cache
            .get_or_load(cache_key, || {
                let row = store
                    .get_row(table, &encoded, &selector)?
                    .map(|raw| rows.decode_row(raw))
                    .transpose()?;
                Ok(CachedResult::Row(row))
            })?
            .into_row()
    }

    /// Read several rows, one result per key in the same order.
    pub fn get_rows(&mut self, table: &str, keys: &[Value], columns: &[&str]) -> ClientResult<Vec<Option<Row>>> {
        let encoded = keys
            .iter()
            .map(|k| self.rows.encode_key(k))
            .collect::<ClientResult<Vec<_>>>()?;
        let selector = self.rows.family().selector(columns);
        let cache_key = CacheKey::multi_get(table, encoded.clone(), &selector);

        let (store, rows) = (&self.store, &self.rows);
        self.cache
            .get_or_load(cache_key, || {
                let mut results = Vec::with_capacity(encoded.len());
                for key in &encoded {
                    let row = store
                        .get_row(table, key, &selector)?
                        .map(|raw| rows.decode_row(raw))
                        .transpose()?;
                    results.push(row);
                }
                Ok(CachedResult::Rows(results))
            })?
            .into_rows()
    }

    /// Remove every cell of the row at `key`.
    pub fn delete_row(&mut self, table: &str, key: &Value) -> ClientResult<()> {
        self.cache.ensure_writable("delete_row")?;
        let key = self.rows.encode_key(key)?;
        Ok(self.store.delete_row(table, &key)?)
    }

    /// Atomically add `delta` to a counter column and return the new value.
    ///
    /// Counter cells hold the store's native 64-bit counter, not a tagged
    /// value; read them back through this call, not `get_row`.
    pub fn atomic_increment(&mut self, table: &str, key: &Value, column: &str, delta: i64) -> ClientResult<i64> {
        self.cache.ensure_writable("atomic_increment")?;
        let key = self.rows.encode_key(key)?;
        let column = self.rows.family().qualify(column);
        Ok(self.store.increment_counter(table, &key, &column, delta)?)
    }

    /// `atomic_increment` by one.
    pub fn increment(&mut self, table: &str, key: &Value, column: &str) -> ClientResult<i64> {
        self.atomic_increment(table, key, column, 1)
    }

    // =========================================================================
    // Scans
    // =========================================================================

    /// Scan rows in key order.
    ///
    /// Without a cache session this streams lazily from one remote scanner.
    /// With one, the scan is drained on first use and later identical scans
    /// replay the stored rows.
    pub fn scan(&mut self, table: &str, request: ScanRequest) -> ClientResult<ScanRows<'_, S>> {
        let (range, batch_size) = request.resolve(self.rows.codec(), self.batch_size)?;
        let selector = self.rows.family().selector(request.requested_columns());

        if !self.cache.is_enabled() {
            let session = ScanSession::open(
                &self.store,
                table,
                &range,
                &selector,
                batch_size,
                self.rows.clone(),
            )?;
            return Ok(ScanRows::Live(session));
        }

        let cache_key = CacheKey::scan(table, &range, &selector);
        let (store, rows) = (&self.store, &self.rows);
        let cached = self
            .cache
            .get_or_load(cache_key, || {
                ScanSession::open(store, table, &range, &selector, batch_size, rows.clone())?
                    .collect::<ClientResult<Vec<_>>>()
                    .map(CachedResult::Scan)
            })?
            .into_scan()?;
        Ok(ScanRows::Cached(cached.into_iter()))
    }
}
