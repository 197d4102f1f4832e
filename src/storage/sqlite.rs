//! SQLite record store.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{query::Query, Column, Row as _, Sqlite, TypeInfo, ValueRef};
use tracing::debug;

use super::traits::{check_identifier, ColumnSpec, ColumnValue, Condition, RecordStore, Row};
use crate::error::{CalendarError, Result, StorageError};

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Record store backed by a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) a database file.
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        debug!("Opened SQLite database at {}", path.as_ref().display());
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// A single pooled connection is kept alive for the lifetime of the
    /// store, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying database pool.
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q ColumnValue) -> SqliteQuery<'q> {
    match value {
        ColumnValue::Null => query.bind(None::<String>),
        ColumnValue::Integer(i) => query.bind(*i),
        ColumnValue::Real(f) => query.bind(*f),
        ColumnValue::Text(s) => query.bind(s.as_str()),
    }
}

fn check_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<()> {
    for name in names {
        check_identifier(name)?;
    }
    Ok(())
}

/// Build `a = ? AND b = ?` for a condition.
fn where_clause(condition: &Condition) -> Result<String> {
    check_names(condition.terms().iter().map(|(n, _)| n.as_str()))?;
    if condition.terms().is_empty() {
        return Ok("1 = 1".to_string());
    }
    Ok(condition
        .terms()
        .iter()
        .map(|(n, _)| format!("{} = ?", n))
        .collect::<Vec<_>>()
        .join(" AND "))
}

/// Map driver errors, calling out a missing table distinctly.
fn map_error(table: &str, err: sqlx::Error) -> CalendarError {
    if let sqlx::Error::Database(db) = &err {
        if db.message().starts_with("no such table") {
            return StorageError::UnknownTable(table.to_string()).into();
        }
        if db.message().starts_with("no such column") || db.message().contains("has no column") {
            return StorageError::SchemaMismatch(db.message().to_string()).into();
        }
    }
    StorageError::from(err).into()
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i).map_err(StorageError::from)?;
        let value = if raw.is_null() {
            ColumnValue::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" => ColumnValue::Integer(row.try_get(i).map_err(StorageError::from)?),
                "REAL" => ColumnValue::Real(row.try_get(i).map_err(StorageError::from)?),
                "TEXT" => ColumnValue::Text(row.try_get(i).map_err(StorageError::from)?),
                other => {
                    return Err(StorageError::SchemaMismatch(format!(
                        "column {} has unsupported type {}",
                        column.name(),
                        other
                    ))
                    .into())
                }
            }
        };
        out.set(column.name(), value);
    }
    Ok(out)
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        check_identifier(table)?;
        check_names(columns.iter().map(|c| c.name.as_str()))?;

        let defs = columns
            .iter()
            .map(|c| {
                if c.primary_key {
                    format!("{} {} PRIMARY KEY", c.name, c.column_type.as_sql())
                } else {
                    format!("{} {}", c.name, c.column_type.as_sql())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!("CREATE TABLE IF NOT EXISTS {} ({})", table, defs);
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(row.is_some())
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<()> {
        check_identifier(table)?;
        check_names(row.names())?;

        let names = row.names().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; row.len()].join(", ");
        let sql = format!("INSERT INTO {} ({}) VALUES ({})", table, names, placeholders);

        let mut q = sqlx::query(&sql);
        for value in row.values() {
            q = bind_value(q, value);
        }
        q.execute(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(())
    }

    async fn insert_if_absent(&self, table: &str, row: &Row, absent: &Condition) -> Result<bool> {
        check_identifier(table)?;
        check_names(row.names())?;

        let names = row.names().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; row.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({names}) SELECT {placeholders} \
             WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {cond})",
            table = table,
            names = names,
            placeholders = placeholders,
            cond = where_clause(absent)?,
        );

        let mut q = sqlx::query(&sql);
        for value in row.values() {
            q = bind_value(q, value);
        }
        for (_, value) in absent.terms() {
            q = bind_value(q, value);
        }
        let result = q
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, table: &str, values: &Row, condition: &Condition) -> Result<u64> {
        check_identifier(table)?;
        check_names(values.names())?;
        if values.is_empty() {
            return Ok(0);
        }

        let assignments = values
            .names()
            .map(|n| format!("{} = ?", n))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            assignments,
            where_clause(condition)?
        );

        let mut q = sqlx::query(&sql);
        for value in values.values() {
            q = bind_value(q, value);
        }
        for (_, value) in condition.terms() {
            q = bind_value(q, value);
        }
        let result = q
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, table: &str, condition: &Condition) -> Result<u64> {
        check_identifier(table)?;
        let sql = format!("DELETE FROM {} WHERE {}", table, where_clause(condition)?);

        let mut q = sqlx::query(&sql);
        for (_, value) in condition.terms() {
            q = bind_value(q, value);
        }
        let result = q
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(result.rows_affected())
    }

    async fn fetch(&self, table: &str, condition: Option<&Condition>) -> Result<Vec<Row>> {
        check_identifier(table)?;
        let sql = match condition {
            Some(c) => format!("SELECT * FROM {} WHERE {} ORDER BY rowid", table, where_clause(c)?),
            None => format!("SELECT * FROM {} ORDER BY rowid", table),
        };

        let mut q = sqlx::query(&sql);
        if let Some(c) = condition {
            for (_, value) in c.terms() {
                q = bind_value(q, value);
            }
        }
        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;

        rows.iter().map(decode_row).collect()
    }

    async fn exists(&self, table: &str, condition: &Condition) -> Result<bool> {
        check_identifier(table)?;
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} LIMIT 1",
            table,
            where_clause(condition)?
        );

        let mut q = sqlx::query(&sql);
        for (_, value) in condition.terms() {
            q = bind_value(q, value);
        }
        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error(table, e))?;
        Ok(row.is_some())
    }
}
