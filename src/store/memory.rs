//! In-process store
//!
//! A complete [`StoreClient`] over ordered maps. Used for local runs and
//! as the collaborator in tests: it counts every call by operation name,
//! tracks scanner handles, and can fail a chosen operation once.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::{StoreError, StoreResult};
use super::{RawRow, ScannerId, StoreClient};

type Cells = BTreeMap<String, Vec<u8>>;

#[derive(Debug)]
struct Table {
    families: BTreeSet<String>,
    enabled: bool,
    rows: BTreeMap<Vec<u8>, Cells>,
}

impl Table {
    fn check_family(&self, column: &str) -> StoreResult<()> {
        match column.split_once(':') {
            Some((family, _)) if self.families.contains(family) => Ok(()),
            _ => Err(StoreError::UnknownFamily(column.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<String, Table>,
    scanners: BTreeMap<u64, VecDeque<RawRow>>,
    next_scanner: u64,
    scanners_closed: usize,
    calls: BTreeMap<&'static str, usize>,
    injected: Option<(&'static str, String)>,
}

impl Inner {
    fn record(&mut self, op: &'static str) -> StoreResult<()> {
        *self.calls.entry(op).or_insert(0) += 1;
        match self.injected.take() {
            Some((target, message)) if target == op => Err(StoreError::Remote(message)),
            other => {
                self.injected = other;
                Ok(())
            }
        }
    }

    fn table(&self, name: &str) -> StoreResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    fn enabled_table(&self, name: &str) -> StoreResult<&Table> {
        let table = self.table(name)?;
        if !table.enabled {
            return Err(disabled(name));
        }
        Ok(table)
    }

    fn enabled_table_mut(&mut self, name: &str) -> StoreResult<&mut Table> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        if !table.enabled {
            return Err(disabled(name));
        }
        Ok(table)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> StoreResult<()> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))?;
        table.enabled = enabled;
        Ok(())
    }
}

fn disabled(table: &str) -> StoreError {
    StoreError::TableState {
        table: table.to_string(),
        state: "disabled",
    }
}

fn select(cells: &Cells, columns: &[String]) -> Cells {
    if columns.is_empty() {
        return cells.clone();
    }
    cells
        .iter()
        .filter(|(name, _)| {
            columns.iter().any(|wanted| {
                if wanted.ends_with(':') {
                    name.starts_with(wanted.as_str())
                } else {
                    *name == wanted
                }
            })
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// In-memory, thread-safe store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of calls made to one operation, e.g. `"get_row"`.
    pub fn calls(&self, op: &str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// Number of calls made to any operation.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Scanners opened and not yet closed.
    pub fn open_scanners(&self) -> usize {
        self.lock().scanners.len()
    }

    /// Scanners closed so far.
    pub fn closed_scanners(&self) -> usize {
        self.lock().scanners_closed
    }

    /// Make the next call to `op` fail with a remote error.
    pub fn fail_next(&self, op: &'static str, message: impl Into<String>) {
        self.lock().injected = Some((op, message.into()));
    }
}

impl StoreClient for MemoryStore {
    fn create_table(&self, table: &str, families: &[String]) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("create_table")?;
        if inner.tables.contains_key(table) {
            return Err(StoreError::TableExists(table.to_string()));
        }
        inner.tables.insert(
            table.to_string(),
            Table {
                families: families.iter().cloned().collect(),
                enabled: true,
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn enable_table(&self, table: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("enable_table")?;
        inner.set_enabled(table, true)
    }

    fn disable_table(&self, table: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("disable_table")?;
        inner.set_enabled(table, false)
    }

    fn drop_table(&self, table: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("drop_table")?;
        if inner.table(table)?.enabled {
            return Err(StoreError::TableState {
                table: table.to_string(),
                state: "enabled",
            });
        }
        inner.tables.remove(table);
        Ok(())
    }

    fn is_table_enabled(&self, table: &str) -> StoreResult<bool> {
        let mut inner = self.lock();
        inner.record("is_table_enabled")?;
        Ok(inner.table(table)?.enabled)
    }

    fn table_names(&self) -> StoreResult<Vec<String>> {
        let mut inner = self.lock();
        inner.record("table_names")?;
        Ok(inner.tables.keys().cloned().collect())
    }

    fn get_row(&self, table: &str, key: &[u8], columns: &[String]) -> StoreResult<Option<RawRow>> {
        let mut inner = self.lock();
        inner.record("get_row")?;
        let row = inner
            .enabled_table(table)?
            .rows
            .get(key)
            .map(|cells| select(cells, columns))
            .filter(|cells| !cells.is_empty())
            .map(|cells| RawRow::new(key.to_vec(), cells));
        Ok(row)
    }

    fn put_row(&self, table: &str, key: &[u8], cells: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("put_row")?;
        let table = inner.enabled_table_mut(table)?;
        for column in cells.keys() {
            table.check_family(column)?;
        }
        table
            .rows
            .entry(key.to_vec())
            .or_default()
            .extend(cells.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    fn delete_row(&self, table: &str, key: &[u8]) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("delete_row")?;
        inner.enabled_table_mut(table)?.rows.remove(key);
        Ok(())
    }

    fn increment_counter(&self, table: &str, key: &[u8], column: &str, delta: i64) -> StoreResult<i64> {
        let mut inner = self.lock();
        inner.record("increment_counter")?;
        let table = inner.enabled_table_mut(table)?;
        table.check_family(column)?;

        let cell = table
            .rows
            .entry(key.to_vec())
            .or_default()
            .entry(column.to_string())
            .or_insert_with(|| 0i64.to_be_bytes().to_vec());
        let current: [u8; 8] = cell.as_slice().try_into().map_err(|_| {
            StoreError::Remote(format!("column '{}' does not hold a 64-bit counter", column))
        })?;
        let next = i64::from_be_bytes(current).wrapping_add(delta);
        *cell = next.to_be_bytes().to_vec();
        Ok(next)
    }

    fn open_scanner(
        &self,
        table: &str,
        start: &[u8],
        stop: Option<&[u8]>,
        columns: &[String],
        _batch_size: usize,
    ) -> StoreResult<ScannerId> {
        let mut inner = self.lock();
        inner.record("open_scanner")?;

        let upper = match stop {
            Some(stop) if stop <= start => None,
            Some(stop) => Some(Excluded(stop)),
            None => Some(Unbounded),
        };
        let rows: VecDeque<RawRow> = match upper {
            Some(upper) => inner
                .enabled_table(table)?
                .rows
                .range::<[u8], _>((Included(start), upper))
                .map(|(key, cells)| RawRow::new(key.clone(), select(cells, columns)))
                .filter(|row| !row.columns.is_empty())
                .collect(),
            None => {
                inner.enabled_table(table)?;
                VecDeque::new()
            }
        };

        let id = inner.next_scanner;
        inner.next_scanner += 1;
        inner.scanners.insert(id, rows);
        Ok(ScannerId(id))
    }

    fn fetch_next(&self, scanner: ScannerId, max_rows: usize) -> StoreResult<Vec<RawRow>> {
        let mut inner = self.lock();
        inner.record("fetch_next")?;
        let rows = inner
            .scanners
            .get_mut(&scanner.0)
            .ok_or(StoreError::ScannerNotFound(scanner.0))?;
        let n = max_rows.min(rows.len());
        Ok(rows.drain(..n).collect())
    }

    fn close_scanner(&self, scanner: ScannerId) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.record("close_scanner")?;
        inner
            .scanners
            .remove(&scanner.0)
            .ok_or(StoreError::ScannerNotFound(scanner.0))?;
        inner.scanners_closed += 1;
        Ok(())
    }
}
