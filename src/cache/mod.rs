//! Session-scoped read cache
//!
//! - Opt-in: starts `Disabled`; `begin_session` / `end_session` bracket it
//! - While enabled, reads are memoized by canonical operation signature
//! - Entries are never evicted or updated; the whole map is dropped at
//!   `end_session`
//! - While enabled, every mutation is refused before it reaches the store.
//!   There is no invalidation, so writes and caching never overlap.
//!
//! Not synchronized; the owning client is single-threaded.

use std::collections::HashMap;
use std::fmt;

use crate::client::{ClientError, ClientResult, Row};
use crate::observability::{Event, Logger};
use crate::range::KeyRange;

/// Cache lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Disabled,
    Enabled,
}

/// Kind of read operation a cache entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadKind {
    Get,
    MultiGet,
    Scan,
}

impl ReadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadKind::Get => "get",
            ReadKind::MultiGet => "multi_get",
            ReadKind::Scan => "scan",
        }
    }
}

impl fmt::Display for ReadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical signature of a read.
///
/// Keys are in encoded form; column names are sorted and de-duplicated so
/// that `["b", "a", "a"]` and `["a", "b"]` hit the same entry. Scan batch
/// size is deliberately absent: it does not change the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: ReadKind,
    table: String,
    keys: Vec<Vec<u8>>,
    stop: Option<Vec<u8>>,
    columns: Vec<String>,
}

impl CacheKey {
    pub fn get(table: &str, key: Vec<u8>, columns: &[String]) -> Self {
        Self::build(ReadKind::Get, table, vec![key], None, columns)
    }

    pub fn multi_get(table: &str, keys: Vec<Vec<u8>>, columns: &[String]) -> Self {
        Self::build(ReadKind::MultiGet, table, keys, None, columns)
    }

    pub fn scan(table: &str, range: &KeyRange, columns: &[String]) -> Self {
        Self::build(
            ReadKind::Scan,
            table,
            vec![range.start.clone()],
            range.stop.clone(),
            columns,
        )
    }

    fn build(
        kind: ReadKind,
        table: &str,
        keys: Vec<Vec<u8>>,
        stop: Option<Vec<u8>>,
        columns: &[String],
    ) -> Self {
        let mut columns = columns.to_vec();
        columns.sort();
        columns.dedup();
        Self {
            kind,
            table: table.to_string(),
            keys,
            stop,
            columns,
        }
    }

    pub fn kind(&self) -> ReadKind {
        self.kind
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// A fully materialized, decoded read result
#[derive(Debug, Clone, PartialEq)]
pub enum CachedResult {
    Row(Option<Row>),
    Rows(Vec<Option<Row>>),
    Scan(Vec<Row>),
}

impl CachedResult {
    pub fn into_row(self) -> ClientResult<Option<Row>> {
        match self {
            CachedResult::Row(row) => Ok(row),
            _ => Err(kind_mismatch(ReadKind::Get)),
        }
    }

    pub fn into_rows(self) -> ClientResult<Vec<Option<Row>>> {
        match self {
            CachedResult::Rows(rows) => Ok(rows),
            _ => Err(kind_mismatch(ReadKind::MultiGet)),
        }
    }

    pub fn into_scan(self) -> ClientResult<Vec<Row>> {
        match self {
            CachedResult::Scan(rows) => Ok(rows),
            _ => Err(kind_mismatch(ReadKind::Scan)),
        }
    }
}

fn kind_mismatch(expected: ReadKind) -> ClientError {
    ClientError::Malformed(format!("cache entry is not a {} result", expected))
}

/// Cache statistics. Passive only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Mutations refused during a session
    pub rejected_writes: u64,
    /// Sessions started
    pub sessions: u64,
}

/// Read-through result cache with a write guard.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Option<HashMap<CacheKey, CachedResult>>,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CacheState {
        if self.entries.is_some() {
            CacheState::Enabled
        } else {
            CacheState::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Enter the `Enabled` state with an empty map. No-op when already enabled.
    pub fn begin_session(&mut self) {
        if self.entries.is_none() {
            self.entries = Some(HashMap::new());
            self.stats.sessions += 1;
            Logger::event(Event::CacheSessionBegin, &[]);
        }
    }

    /// Drop every entry and return to `Disabled`.
    ///
    /// Returns the number of entries discarded, or `None` when no session
    /// was active.
    pub fn end_session(&mut self) -> Option<usize> {
        let discarded = self.entries.take()?.len();
        Logger::event(Event::CacheSessionEnd, &[("discarded", &discarded.to_string())]);
        Some(discarded)
    }

    /// Number of cached entries (zero when disabled).
    pub fn len(&self) -> usize {
        self.entries.as_ref().map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Fail with `WriteDuringCacheSession` if a session is active.
    pub fn ensure_writable(&mut self, operation: &'static str) -> ClientResult<()> {
        if self.is_enabled() {
            self.stats.rejected_writes += 1;
            Logger::event(Event::WriteRejected, &[("operation", operation)]);
            return Err(ClientError::WriteDuringCacheSession { operation });
        }
        Ok(())
    }

    /// Return the cached result for `key`, or run `load`, store and return its result.
    ///
    /// When disabled, `load` always runs and nothing is stored. Failed loads
    /// are not cached.
    pub fn get_or_load<F>(&mut self, key: CacheKey, load: F) -> ClientResult<CachedResult>
    where
        F: FnOnce() -> ClientResult<CachedResult>,
    {
        let Some(entries) = self.entries.as_mut() else {
            return load();
        };

        if let Some(hit) = entries.get(&key) {
            self.stats.hits += 1;
            Logger::event(
                Event::CacheHit,
                &[("kind", key.kind.as_str()), ("table", &key.table)],
            );
            return Ok(hit.clone());
        }

        self.stats.misses += 1;
        Logger::event(
            Event::CacheMiss,
            &[("kind", key.kind.as_str()), ("table", &key.table)],
        );
        let result = load()?;
        entries.insert(key, result.clone());
        Ok(result)
    }
}
