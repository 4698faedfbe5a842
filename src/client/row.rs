//! Rows at the client/store boundary
//!
//! Logical column names are stored as `<family>:<name>`. The prefix is
//! added on the way out and stripped on the way in; it is not part of the
//! value codec.

use std::collections::BTreeMap;

use crate::codec::{Value, ValueCodec};
use crate::store::RawRow;

use super::errors::{ClientError, ClientResult};

pub const DEFAULT_FAMILY: &str = "fam";

/// A decoded row: typed key and typed cells by logical column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: Value,
    pub columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(key: Value, columns: BTreeMap<String, Value>) -> Self {
        Self { key, columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

/// The column family every logical column lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFamily {
    name: String,
    prefix: String,
}

impl ColumnFamily {
    pub fn new(name: impl Into<String>) -> ClientResult<Self> {
        let name = name.into();
        if name.is_empty() || name.contains(':') {
            return Err(ClientError::Config(format!(
                "invalid column family '{}': must be non-empty and contain no ':'",
                name
            )));
        }
        let prefix = format!("{}:", name);
        Ok(Self { name, prefix })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<family>:<column>`
    pub fn qualify(&self, column: &str) -> String {
        format!("{}{}", self.prefix, column)
    }

    /// Logical name of a qualified column.
    pub fn strip<'a>(&self, qualified: &'a str) -> ClientResult<&'a str> {
        qualified.strip_prefix(self.prefix.as_str()).ok_or_else(|| {
            ClientError::Malformed(format!(
                "column '{}' is outside family '{}'",
                qualified, self.name
            ))
        })
    }

    /// Store column selector; no columns means the whole family.
    pub fn selector<S: AsRef<str>>(&self, columns: &[S]) -> Vec<String> {
        if columns.is_empty() {
            return vec![self.prefix.clone()];
        }
        columns.iter().map(|c| self.qualify(c.as_ref())).collect()
    }
}

impl Default for ColumnFamily {
    fn default() -> Self {
        Self {
            name: DEFAULT_FAMILY.to_string(),
            prefix: format!("{}:", DEFAULT_FAMILY),
        }
    }
}

/// Value codec plus column family: everything needed to move a row
/// across the store boundary.
#[derive(Debug, Clone, Default)]
pub struct RowCodec {
    codec: ValueCodec,
    family: ColumnFamily,
}

impl RowCodec {
    pub fn new(codec: ValueCodec, family: ColumnFamily) -> Self {
        Self { codec, family }
    }

    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    pub fn family(&self) -> &ColumnFamily {
        &self.family
    }

    pub fn encode_key(&self, key: &Value) -> ClientResult<Vec<u8>> {
        Ok(self.codec.encode_bytes(key)?)
    }

    pub fn encode_cells(&self, columns: &[(&str, Value)]) -> ClientResult<BTreeMap<String, Vec<u8>>> {
        columns
            .iter()
            .map(|(name, value)| -> ClientResult<(String, Vec<u8>)> {
                Ok((self.family.qualify(name), self.codec.encode_bytes(value)?))
            })
            .collect()
    }

    pub fn decode_row(&self, raw: RawRow) -> ClientResult<Row> {
        let key = self.codec.decode_bytes(&raw.key)?;
        let columns = raw
            .columns
            .iter()
            .map(|(qualified, cell)| -> ClientResult<(String, Value)> {
                let name = self.family.strip(qualified)?;
                Ok((name.to_string(), self.codec.decode_bytes(cell)?))
            })
            .collect::<ClientResult<BTreeMap<_, _>>>()?;
        Ok(Row::new(key, columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_validation() {
        assert!(ColumnFamily::new("cf").is_ok());
        assert!(ColumnFamily::new("").is_err());
        assert!(ColumnFamily::new("a:b").is_err());
    }

    #[test]
    fn test_qualify_and_strip() {
        let family = ColumnFamily::new("x").unwrap();
        assert_eq!(family.qualify("name"), "x:name");
        assert_eq!(family.strip("x:name").unwrap(), "name");
        assert!(family.strip("y:name").is_err());
    }

    #[test]
    fn test_selector() {
        let family = ColumnFamily::default();
        assert_eq!(family.selector::<&str>(&[]), vec!["fam:".to_string()]);
        assert_eq!(family.selector(&["a", "b"]), vec!["fam:a".to_string(), "fam:b".to_string()]);
    }

    #[test]
    fn test_row_round_trip() {
        let rows = RowCodec::default();
        let cells = rows
            .encode_cells(&[("name", Value::text("ada")), ("age", Value::Int64(36))])
            .unwrap();
        assert!(cells.contains_key("fam:name"));

        let raw = RawRow::new(rows.encode_key(&Value::bytes(b"k".to_vec())).unwrap(), cells);
        let row = rows.decode_row(raw).unwrap();
        assert_eq!(row.key, Value::bytes(b"k".to_vec()));
        assert_eq!(row.get("name"), Some(&Value::text("ada")));
        assert_eq!(row.get("age"), Some(&Value::Int64(36)));
    }

    #[test]
    fn test_foreign_column_is_malformed() {
        let rows = RowCodec::default();
        let mut cells = BTreeMap::new();
        cells.insert("other:a".to_string(), b"str:1".to_vec());
        let raw = RawRow::new(b"str:k".to_vec(), cells);
        assert!(matches!(rows.decode_row(raw), Err(ClientError::Malformed(_))));
    }
}
