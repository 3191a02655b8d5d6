//! SQLite audit store implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::{AuditRecord, Error, Result};

type RowTuple = (String, String, String, String, i64, Option<String>, String);

/// SQLite-backed audit store.
///
/// The connection is guarded internally so one store can be shared across
/// concurrent execution requests.
pub struct AuditStore {
    conn: Mutex<Connection>,
}

impl AuditStore {
    /// Open or create an audit store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Create an in-memory audit store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS executions (
                id TEXT PRIMARY KEY,
                trace_id TEXT NOT NULL,
                tool TEXT NOT NULL,
                decision TEXT NOT NULL,
                success INTEGER NOT NULL,
                detail TEXT,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_executions_trace
                ON executions(trace_id, timestamp);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Poisoned)
    }

    /// Append a record to the store.
    pub fn record(&self, record: &AuditRecord) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO executions (id, trace_id, tool, decision, success, detail, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.trace_id,
                record.tool,
                record.decision,
                record.success as i64,
                record.detail,
                record.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load all records sharing a trace id, ordered by timestamp.
    pub fn by_trace(&self, trace_id: &str) -> Result<Vec<AuditRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, trace_id, tool, decision, success, detail, timestamp FROM executions
             WHERE trace_id = ?1 ORDER BY timestamp",
        )?;
        let records = stmt
            .query_map([trace_id], row_to_tuple)?
            .filter_map(|r| r.ok())
            .filter_map(tuple_to_record)
            .collect();
        Ok(records)
    }

    /// Load the most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, trace_id, tool, decision, success, detail, timestamp FROM executions
             ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let records = stmt
            .query_map([limit as i64], row_to_tuple)?
            .filter_map(|r| r.ok())
            .filter_map(tuple_to_record)
            .collect();
        Ok(records)
    }
}

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<RowTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn tuple_to_record(
    (id, trace_id, tool, decision, success, detail, timestamp): RowTuple,
) -> Option<AuditRecord> {
    Some(AuditRecord {
        id: id.parse().ok()?,
        trace_id,
        tool,
        decision,
        success: success != 0,
        detail,
        timestamp: timestamp.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_load_by_trace() {
        let store = AuditStore::in_memory().unwrap();
        store
            .record(&AuditRecord::new("t-1", "echo", "auto", true))
            .unwrap();
        store
            .record(&AuditRecord::new("t-1", "delete", "deny", false).with_detail("path blocked"))
            .unwrap();
        store
            .record(&AuditRecord::new("t-2", "exec", "review", false))
            .unwrap();

        let records = store.by_trace("t-1").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tool, "echo");
        assert!(records[0].success);
        assert_eq!(records[1].detail.as_deref(), Some("path blocked"));
    }

    #[test]
    fn recent_respects_limit() {
        let store = AuditStore::in_memory().unwrap();
        for i in 0..5 {
            store
                .record(&AuditRecord::new(format!("t-{i}"), "echo", "auto", true))
                .unwrap();
        }
        assert_eq!(store.recent(3).unwrap().len(), 3);
    }

    #[test]
    fn unknown_trace_is_empty() {
        let store = AuditStore::in_memory().unwrap();
        assert!(store.by_trace("missing").unwrap().is_empty());
    }
}
