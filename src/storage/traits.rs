//! Record store trait definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// SQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// SQL type name.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition used when creating a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnSpec {
    /// Create a plain column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
        }
    }

    /// Create a primary key column.
    pub fn primary_key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: true,
        }
    }
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ColumnValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view. Reals with no fractional part are accepted.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ColumnValue::Integer(i) => Some(*i),
            ColumnValue::Real(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Real view. Integers are widened.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ColumnValue::Real(f) => Some(*f),
            ColumnValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Real(value)
    }
}

/// An ordered list of column/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, ColumnValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a column, replacing any existing value for it.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ColumnValue>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &ColumnValue> {
        self.columns.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Conjunction of column equality tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    terms: Vec<(String, ColumnValue)>,
}

impl Condition {
    /// Single equality test.
    pub fn eq(name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        Self {
            terms: vec![(name.into(), value.into())],
        }
    }

    /// Add another equality test.
    pub fn and(mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.terms.push((name.into(), value.into()));
        self
    }

    pub fn terms(&self) -> &[(String, ColumnValue)] {
        &self.terms
    }

    /// Whether a row satisfies every term. Missing columns never match.
    pub fn matches(&self, row: &Row) -> bool {
        self.terms
            .iter()
            .all(|(name, value)| row.get(name) == Some(value))
    }
}

/// Check that a table or column name is safe to splice into SQL.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Reject unsafe identifiers.
pub fn check_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier(name.to_string()).into())
    }
}

/// Generic single-table record store.
///
/// Every method is a single unit of work against the store. Failures of the
/// store itself are returned as errors; "nothing matched" is reported through
/// the return value.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a table if it does not exist yet.
    async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<()>;

    /// Check whether a table exists.
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Insert a row unconditionally.
    async fn insert(&self, table: &str, row: &Row) -> Result<()>;

    /// Insert a row only if no existing row matches `absent`.
    ///
    /// The check and the insert are atomic. Returns whether the row was
    /// inserted.
    async fn insert_if_absent(&self, table: &str, row: &Row, absent: &Condition) -> Result<bool>;

    /// Set `values` on every row matching `condition`. Returns rows affected.
    async fn update(&self, table: &str, values: &Row, condition: &Condition) -> Result<u64>;

    /// Delete every row matching `condition`. Returns rows affected.
    async fn delete(&self, table: &str, condition: &Condition) -> Result<u64>;

    /// Fetch rows in insertion order, optionally filtered.
    async fn fetch(&self, table: &str, condition: Option<&Condition>) -> Result<Vec<Row>>;

    /// Check whether any row matches `condition`.
    async fn exists(&self, table: &str, condition: &Condition) -> Result<bool>;
}
