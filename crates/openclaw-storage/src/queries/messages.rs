// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations.

use openclaw_core::types::Message;
use openclaw_core::RelayError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

pub(crate) fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        task_id: row.get(1)?,
        role: row.get(2)?,
        content: row.get(3)?,
        metadata: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const MESSAGE_COLUMNS: &str = "id, task_id, role, content, metadata, created_at";

/// Insert a new message. Runs on the caller's connection so the adapter
/// can pair it with the task touch in one transaction.
pub(crate) fn insert_message(conn: &rusqlite::Connection, msg: &Message) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO messages (id, task_id, role, content, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            msg.id,
            msg.task_id,
            msg.role,
            msg.content,
            msg.metadata,
            msg.created_at,
        ],
    )?;
    Ok(())
}

/// Up to `limit` messages for a task, most recent first. Ties on `created_at`
/// break by insertion order (rowid).
pub async fn recent_messages(
    db: &Database,
    task_id: &str,
    limit: i64,
) -> Result<Vec<Message>, RelayError> {
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE task_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![task_id, limit], message_from_row)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}
