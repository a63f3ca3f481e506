// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment row operations.

use openclaw_core::types::Attachment;
use openclaw_core::RelayError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Insert a batch of attachment rows in one transaction, preserving order.
pub async fn insert_attachments(
    db: &Database,
    attachments: Vec<Attachment>,
) -> Result<(), RelayError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for att in &attachments {
                tx.execute(
                    "INSERT INTO attachments
                         (id, message_id, file_name, file_type, file_size, storage_key, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        att.id,
                        att.message_id,
                        att.file_name,
                        att.file_type,
                        att.file_size,
                        att.storage_key,
                        att.created_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All attachments for a message in creation order.
pub async fn attachments_for_message(
    db: &Database,
    message_id: &str,
) -> Result<Vec<Attachment>, RelayError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, message_id, file_name, file_type, file_size, storage_key, created_at
                 FROM attachments WHERE message_id = ?1 ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map(params![message_id], |row| {
                Ok(Attachment {
                    id: row.get(0)?,
                    message_id: row.get(1)?,
                    file_name: row.get(2)?,
                    file_type: row.get(3)?,
                    file_size: row.get(4)?,
                    storage_key: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?;
            let mut attachments = Vec::new();
            for row in rows {
                attachments.push(row?);
            }
            Ok(attachments)
        })
        .await
        .map_err(map_tr_err)
}
