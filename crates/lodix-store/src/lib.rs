#![forbid(unsafe_code)]
//! SQLite persistence for orders, shipments and carriers.
//!
//! Each collection is one table holding the full serialized document in a
//! `body` column; filter predicates reach into it with `json_extract`. The
//! `created_at_ms` column exists only so listings can sort newest-first
//! without comparing RFC 3339 strings.

mod carriers;
mod orders;
mod shipments;

pub use shipments::ShipmentRecord;

use lodix_model::{TransitionError, ValidationError};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use tokio::sync::Mutex;

pub const SCHEMA_VERSION: i64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("stored document is unreadable: {0}")]
    InvalidDocument(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl From<TransitionError> for StoreError {
    fn from(err: TransitionError) -> Self {
        Self::IllegalTransition {
            from: err.from,
            to: err.to,
        }
    }
}

/// Row counts surfaced by the detailed health endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCounts {
    pub orders: u64,
    pub shipments: u64,
    pub carriers: u64,
}

/// One SQLite connection guarded by an async mutex. Every public operation
/// takes the lock for its whole duration, so multi-statement sequences such
/// as shipment creation are serialized without extra locking.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA busy_timeout=5000;
            CREATE TABLE IF NOT EXISTS orders (
              id TEXT PRIMARY KEY,
              body TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL
            ) WITHOUT ROWID;
            CREATE TABLE IF NOT EXISTS shipments (
              id TEXT PRIMARY KEY,
              body TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL
            ) WITHOUT ROWID;
            CREATE TABLE IF NOT EXISTS carriers (
              id TEXT PRIMARY KEY,
              body TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL
            ) WITHOUT ROWID;
            CREATE INDEX IF NOT EXISTS orders_status
              ON orders (json_extract(body, '$.status'));
            CREATE INDEX IF NOT EXISTS shipments_order
              ON shipments (json_extract(body, '$.orderId'));
            CREATE INDEX IF NOT EXISTS shipments_status
              ON shipments (json_extract(body, '$.status'));
            CREATE INDEX IF NOT EXISTS carriers_active
              ON carriers (json_extract(body, '$.availability.isActive'));
            ",
        )?;
        conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Liveness probe: one trivial query through the real connection.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    pub async fn document_counts(&self) -> Result<DocumentCounts, StoreError> {
        let conn = self.conn.lock().await;
        let count = |table: &str| -> Result<u64, rusqlite::Error> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n as u64)
        };
        Ok(DocumentCounts {
            orders: count("orders")?,
            shipments: count("shipments")?,
            carriers: count("carriers")?,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|err| StoreError::InvalidDocument(err.to_string()))
}

fn encode<T: Serialize>(doc: &T) -> Result<String, StoreError> {
    serde_json::to_string(doc).map_err(|err| StoreError::InvalidDocument(err.to_string()))
}

/// Shallow field overwrite. The merged document is re-deserialized by the
/// caller, so type errors introduced by the patch surface as validation
/// failures rather than stored corruption.
fn merge_patch(
    body: &str,
    patch: serde_json::Map<String, serde_json::Value>,
) -> Result<serde_json::Value, StoreError> {
    let mut value: serde_json::Value = decode(body)?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidDocument("document root is not an object".to_string()))?;
    for (name, field) in patch {
        obj.insert(name, field);
    }
    obj.insert(
        "updatedAt".to_string(),
        serde_json::json!(chrono::Utc::now()),
    );
    Ok(value)
}

fn decode_patched<T: serde::de::DeserializeOwned>(
    merged: serde_json::Value,
) -> Result<T, StoreError> {
    serde_json::from_value(merged)
        .map_err(|err| StoreError::Validation(ValidationError(err.to_string())))
}

/// WHERE-clause accumulator shared by the list queries.
#[derive(Default)]
struct Predicates {
    clauses: Vec<String>,
    params: Vec<SqlValue>,
}

impl Predicates {
    fn text(&mut self, clause: &str, value: &str) {
        self.clauses.push(clause.to_string());
        self.params.push(SqlValue::Text(value.to_string()));
    }

    /// One value bound to both sides of an OR over two extracted columns.
    fn either(&mut self, left: &str, right: &str, value: &str) {
        self.clauses.push(format!("({left} = ? OR {right} = ?)"));
        self.params.push(SqlValue::Text(value.to_string()));
        self.params.push(SqlValue::Text(value.to_string()));
    }

    fn flag(&mut self, clause: &str, value: bool) {
        self.clauses.push(clause.to_string());
        self.params.push(SqlValue::Integer(i64::from(value)));
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn count_rows(
    conn: &Connection,
    table: &str,
    predicates: &Predicates,
) -> Result<u64, StoreError> {
    let sql = format!("SELECT COUNT(*) FROM {table}{}", predicates.where_sql());
    let total: i64 = conn.query_row(
        &sql,
        rusqlite::params_from_iter(predicates.params.iter()),
        |row| row.get(0),
    )?;
    Ok(total as u64)
}
