//! Chat message history

use chrono::Utc;
use rusqlite::params;

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::ChatLogEntry;

impl Database {
    /// Record a handled chat message and the reply sent back
    pub fn log_chat_message(
        &self,
        owner: &str,
        message: &str,
        kind: &str,
        response: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO chat_messages (owner, message, kind, response, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![owner, message, kind, response, format_datetime(&Utc::now())],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent chat messages for an owner, newest first
    pub fn list_chat_messages(&self, owner: &str, limit: i64) -> Result<Vec<ChatLogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, owner, message, kind, response, created_at
             FROM chat_messages WHERE owner = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )?;

        let rows = stmt
            .query_map(params![owner, limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, owner, message, kind, response, created_at)| {
                Ok(ChatLogEntry {
                    id,
                    owner,
                    message,
                    kind,
                    response,
                    created_at: parse_datetime(&created_at)?,
                })
            })
            .collect()
    }
}
