//! Scans
//!
//! A [`ScanRequest`] names where a scan starts and stops; resolving it
//! against the codec yields an encoded [`KeyRange`]. A [`ScanSession`]
//! then walks that range through one remote scanner, in batches, as a
//! lazy single-pass iterator.
//!
//! The remote scanner is released on every exit path: after the final
//! short batch, after a fetch or decode error, or when the session is
//! dropped unfinished.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::codec::{Value, ValueCodec, CELL_SEPARATOR};
use crate::observability::{Event, Logger};
use crate::range::KeyRange;
use crate::store::{RawRow, ScannerId, StoreClient};

use super::errors::{ClientError, ClientResult};
use super::row::{Row, RowCodec};

/// Start of a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Encoded form of a single value; for byte or text keys this is a
    /// plain string prefix.
    Value(Value),
    /// The first `len` elements of a composite key. Matching stops at the
    /// cell boundary: `("user",)` does not match `("username", 1)`.
    Tuple { elements: Vec<Value>, len: usize },
}

impl KeyPrefix {
    /// Prefix over the first `len` elements of `elements`.
    pub fn tuple(elements: impl IntoIterator<Item = Value>, len: usize) -> Self {
        KeyPrefix::Tuple {
            elements: elements.into_iter().collect(),
            len,
        }
    }

    fn encode(&self, codec: &ValueCodec) -> ClientResult<Vec<u8>> {
        match self {
            KeyPrefix::Value(value) => Ok(codec.encode_bytes(value)?),
            KeyPrefix::Tuple { elements, len } => {
                if *len > elements.len() {
                    return Err(ClientError::invalid_scan(format!(
                        "tuple prefix length {} exceeds {} elements",
                        len,
                        elements.len()
                    )));
                }
                let mut prefix = codec.encode_tuple(elements, Some(*len))?.to_bytes();
                if *len > 0 && *len < elements.len() {
                    prefix.push(CELL_SEPARATOR);
                }
                Ok(prefix)
            }
        }
    }
}

impl From<Value> for KeyPrefix {
    fn from(value: Value) -> Self {
        KeyPrefix::Value(value)
    }
}

/// Parameters of a scan.
///
/// Exactly one of `start_key` / `start_prefix` must be set, and a prefix
/// excludes an explicit `stop_key`; the prefix determines its own stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    start_key: Option<Value>,
    start_prefix: Option<KeyPrefix>,
    stop_key: Option<Value>,
    columns: Vec<String>,
    batch_size: Option<usize>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan from `key` (inclusive).
    pub fn from_key(key: impl Into<Value>) -> Self {
        Self::new().start_key(key)
    }

    /// Scan every key with the given prefix.
    pub fn with_prefix(prefix: impl Into<KeyPrefix>) -> Self {
        Self::new().start_prefix(prefix)
    }

    pub fn start_key(mut self, key: impl Into<Value>) -> Self {
        self.start_key = Some(key.into());
        self
    }

    pub fn start_prefix(mut self, prefix: impl Into<KeyPrefix>) -> Self {
        self.start_prefix = Some(prefix.into());
        self
    }

    /// Stop before `key` (exclusive).
    pub fn stop_key(mut self, key: impl Into<Value>) -> Self {
        self.stop_key = Some(key.into());
        self
    }

    /// Logical columns to return; none means the whole family.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Rows per remote fetch; defaults to the client configuration.
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    pub fn requested_columns(&self) -> &[String] {
        &self.columns
    }

    /// Validate and encode the bounds.
    pub fn resolve(&self, codec: &ValueCodec, default_batch_size: usize) -> ClientResult<(KeyRange, usize)> {
        let batch_size = self.batch_size.unwrap_or(default_batch_size);
        if batch_size == 0 {
            return Err(ClientError::invalid_scan("batch size must be > 0"));
        }

        let range = match (&self.start_key, &self.start_prefix, &self.stop_key) {
            (Some(_), Some(_), _) => {
                return Err(ClientError::invalid_scan(
                    "start key and start prefix are mutually exclusive",
                ))
            }
            (None, None, _) => {
                return Err(ClientError::invalid_scan(
                    "one of start key or start prefix is required",
                ))
            }
            (None, Some(_), Some(_)) => {
                return Err(ClientError::invalid_scan(
                    "start prefix and stop key are mutually exclusive",
                ))
            }
            (None, Some(prefix), None) => KeyRange::prefix(prefix.encode(codec)?),
            (Some(start), None, stop) => KeyRange::new(
                codec.encode_bytes(start)?,
                stop.as_ref().map(|s| codec.encode_bytes(s)).transpose()?,
            ),
        };
        Ok((range, batch_size))
    }
}

/// A lazy scan over one remote scanner.
///
/// Yields decoded rows in store key order. After the first error the
/// session is finished and yields nothing more.
#[derive(Debug)]
pub struct ScanSession<'a, S: StoreClient> {
    store: &'a S,
    rows: RowCodec,
    scanner: Option<ScannerId>,
    buffer: VecDeque<RawRow>,
    batch_size: usize,
    pending: Option<ClientError>,
}

impl<'a, S: StoreClient> ScanSession<'a, S> {
    /// Open a remote scanner over `range`. `columns` are qualified store columns.
    pub fn open(
        store: &'a S,
        table: &str,
        range: &KeyRange,
        columns: &[String],
        batch_size: usize,
        rows: RowCodec,
    ) -> ClientResult<Self> {
        let scanner = store.open_scanner(
            table,
            &range.start,
            range.stop.as_deref(),
            columns,
            batch_size,
        )?;
        Logger::event(
            Event::ScannerOpened,
            &[("scanner", &scanner.to_string()), ("table", table)],
        );

        Ok(Self {
            store,
            rows,
            scanner: Some(scanner),
            buffer: VecDeque::new(),
            batch_size,
            pending: None,
        })
    }

    /// Whether the remote scanner is still held.
    pub fn is_open(&self) -> bool {
        self.scanner.is_some()
    }

    /// Release the remote scanner now, reporting a failed close.
    pub fn close(mut self) -> ClientResult<()> {
        self.buffer.clear();
        self.release()
    }

    fn release(&mut self) -> ClientResult<()> {
        if let Some(scanner) = self.scanner.take() {
            self.store.close_scanner(scanner)?;
            Logger::event(Event::ScannerClosed, &[("scanner", &scanner.to_string())]);
        }
        Ok(())
    }

    /// Release on a path that is already reporting an error.
    fn release_quietly(&mut self) {
        let scanner = self.scanner;
        if let Err(e) = self.release() {
            let id = scanner.map(|s| s.to_string()).unwrap_or_default();
            Logger::event(
                Event::ScannerCloseFailed,
                &[("error", &e.to_string()), ("scanner", &id)],
            );
        }
    }

    fn fail(&mut self, err: ClientError) -> Option<ClientResult<Row>> {
        self.buffer.clear();
        self.release_quietly();
        Some(Err(err))
    }

    fn refill(&mut self) -> ClientResult<()> {
        let Some(scanner) = self.scanner else {
            return Ok(());
        };
        let batch = self.store.fetch_next(scanner, self.batch_size)?;
        let last = batch.len() < self.batch_size;
        self.buffer.extend(batch);
        if last {
            if let Err(e) = self.release() {
                // Surface the close failure after the rows already fetched.
                self.pending = Some(e);
            }
        }
        Ok(())
    }
}

impl<S: StoreClient> Iterator for ScanSession<'_, S> {
    type Item = ClientResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() {
            if let Err(e) = self.refill() {
                return self.fail(e);
            }
        }

        match self.buffer.pop_front() {
            Some(raw) => match self.rows.decode_row(raw) {
                Ok(row) => Some(Ok(row)),
                Err(e) => self.fail(e),
            },
            None => self.pending.take().map(Err),
        }
    }
}

impl<S: StoreClient> FusedIterator for ScanSession<'_, S> {}

impl<S: StoreClient> Drop for ScanSession<'_, S> {
    fn drop(&mut self) {
        self.release_quietly();
    }
}

/// Rows of a scan: streamed from the store, or replayed from the cache.
#[derive(Debug)]
pub enum ScanRows<'a, S: StoreClient> {
    Live(ScanSession<'a, S>),
    Cached(std::vec::IntoIter<Row>),
}

impl<S: StoreClient> ScanRows<'_, S> {
    pub fn is_cached(&self) -> bool {
        matches!(self, ScanRows::Cached(_))
    }
}

impl<S: StoreClient> Iterator for ScanRows<'_, S> {
    type Item = ClientResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ScanRows::Live(session) => session.next(),
            ScanRows::Cached(rows) => rows.next().map(Ok),
        }
    }
}
