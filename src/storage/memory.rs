//! In-memory record store.
//!
//! Used by tests and by the `memory` storage backend. Each operation holds
//! the table lock for its whole duration, so check-then-act sequences inside
//! one call are atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{check_identifier, ColumnSpec, Condition, RecordStore, Row};
use crate::error::{Result, StorageError};

struct MemoryTable {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
}

impl MemoryTable {
    fn check_columns<'a>(&self, names: impl Iterator<Item = &'a str>) -> Result<()> {
        for name in names {
            if !self.columns.iter().any(|c| c.name == name) {
                return Err(StorageError::SchemaMismatch(format!("no such column: {}", name)).into());
            }
        }
        Ok(())
    }

    fn primary_key(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    fn push(&mut self, row: &Row) -> Result<()> {
        self.check_columns(row.names())?;

        if let Some(key) = self.primary_key() {
            if let Some(value) = row.get(key) {
                if self.rows.iter().any(|r| r.get(key) == Some(value)) {
                    return Err(StorageError::Query(format!(
                        "UNIQUE constraint failed: {}",
                        key
                    ))
                    .into());
                }
            }
        }

        // Store every declared column so fetches have a stable shape.
        let mut stored = Row::new();
        for column in &self.columns {
            let value = row
                .get(&column.name)
                .cloned()
                .unwrap_or(super::ColumnValue::Null);
            stored.set(column.name.clone(), value);
        }
        self.rows.push(stored);
        Ok(())
    }
}

/// In-memory record store.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown(table: &str) -> crate::error::CalendarError {
    StorageError::UnknownTable(table.to_string()).into()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        check_identifier(table)?;
        for column in columns {
            check_identifier(&column.name)?;
        }

        let mut tables = self.tables.write();
        tables
            .entry(table.to_string())
            .or_insert_with(|| MemoryTable {
                columns: columns.to_vec(),
                rows: Vec::new(),
            });
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.read().contains_key(table))
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<()> {
        let mut tables = self.tables.write();
        let t = tables.get_mut(table).ok_or_else(|| unknown(table))?;
        t.push(row)
    }

    async fn insert_if_absent(&self, table: &str, row: &Row, absent: &Condition) -> Result<bool> {
        let mut tables = self.tables.write();
        let t = tables.get_mut(table).ok_or_else(|| unknown(table))?;
        t.check_columns(absent.terms().iter().map(|(n, _)| n.as_str()))?;

        if t.rows.iter().any(|r| absent.matches(r)) {
            return Ok(false);
        }
        t.push(row)?;
        Ok(true)
    }

    async fn update(&self, table: &str, values: &Row, condition: &Condition) -> Result<u64> {
        let mut tables = self.tables.write();
        let t = tables.get_mut(table).ok_or_else(|| unknown(table))?;
        t.check_columns(values.names())?;
        t.check_columns(condition.terms().iter().map(|(n, _)| n.as_str()))?;

        let mut affected = 0;
        for row in t.rows.iter_mut().filter(|r| condition.matches(r)) {
            for (name, value) in values.iter() {
                row.set(name, value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, table: &str, condition: &Condition) -> Result<u64> {
        let mut tables = self.tables.write();
        let t = tables.get_mut(table).ok_or_else(|| unknown(table))?;
        t.check_columns(condition.terms().iter().map(|(n, _)| n.as_str()))?;

        let before = t.rows.len();
        t.rows.retain(|r| !condition.matches(r));
        Ok((before - t.rows.len()) as u64)
    }

    async fn fetch(&self, table: &str, condition: Option<&Condition>) -> Result<Vec<Row>> {
        let tables = self.tables.read();
        let t = tables.get(table).ok_or_else(|| unknown(table))?;
        if let Some(c) = condition {
            t.check_columns(c.terms().iter().map(|(n, _)| n.as_str()))?;
        }

        Ok(t.rows
            .iter()
            .filter(|r| condition.map(|c| c.matches(r)).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn exists(&self, table: &str, condition: &Condition) -> Result<bool> {
        let tables = self.tables.read();
        let t = tables.get(table).ok_or_else(|| unknown(table))?;
        t.check_columns(condition.terms().iter().map(|(n, _)| n.as_str()))?;
        Ok(t.rows.iter().any(|r| condition.matches(r)))
    }
}
