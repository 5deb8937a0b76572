//! SQLite-based audit log of FHIR interactions
//!
//! Separate file for easy management and rotation.

use crate::error::Result;
use rusqlite::{Connection, params};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Read,
    Search,
    Create,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Read => "read",
            Operation::Search => "search",
            Operation::Create => "create",
        }
    }
}

/// One audit record; `error` is set when the interaction failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: String,
    pub operation: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub query_string: Option<String>,
    pub user_id: Option<String>,
    pub client_ip: Option<String>,
    pub error: Option<String>,
}

impl AuditEntry {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

pub struct AuditLog {
    conn: Connection,
}

#[allow(clippy::result_large_err)]
impl AuditLog {
    /// Open the audit log (create if not exists)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let audit = Self { conn };
        audit.initialize()?;
        Ok(audit)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL DEFAULT (datetime('now')),
                operation TEXT NOT NULL,
                resource_type TEXT,
                resource_id TEXT,
                query_string TEXT,
                user_id TEXT,
                client_ip TEXT,
                result TEXT NOT NULL,
                error_message TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_resource ON audit_log(resource_type, resource_id);
            CREATE INDEX IF NOT EXISTS idx_audit_user ON audit_log(user_id);
            "#,
        )?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log(
        &self,
        operation: Operation,
        resource_type: Option<&str>,
        resource_id: Option<&str>,
        query_string: Option<&str>,
        user_id: Option<&str>,
        client_ip: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<()> {
        let result = if error_message.is_none() { "success" } else { "error" };

        self.conn.execute(
            r#"
            INSERT INTO audit_log
            (operation, resource_type, resource_id, query_string,
             user_id, client_ip, result, error_message)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                operation.as_str(),
                resource_type,
                resource_id,
                query_string,
                user_id,
                client_ip,
                result,
                error_message,
            ],
        )?;

        Ok(())
    }

    pub fn log_success(
        &self,
        operation: Operation,
        resource_type: &str,
        resource_id: Option<&str>,
        user_id: Option<&str>,
        client_ip: Option<&str>,
    ) -> Result<()> {
        self.log(operation, Some(resource_type), resource_id, None, user_id, client_ip, None)
    }

    pub fn log_error(
        &self,
        operation: Operation,
        resource_type: Option<&str>,
        resource_id: Option<&str>,
        user_id: Option<&str>,
        client_ip: Option<&str>,
        error: &str,
    ) -> Result<()> {
        self.log(operation, resource_type, resource_id, None, user_id, client_ip, Some(error))
    }

    /// Most recent entries first
    pub fn recent_entries(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT timestamp, operation, resource_type, resource_id,
                   query_string, user_id, client_ip, error_message
            FROM audit_log
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(AuditEntry {
                timestamp: row.get(0)?,
                operation: row.get(1)?,
                resource_type: row.get(2)?,
                resource_id: row.get(3)?,
                query_string: row.get(4)?,
                user_id: row.get(5)?,
                client_ip: row.get(6)?,
                error: row.get(7)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
