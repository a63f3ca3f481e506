// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stored BYOK credential operations.
//!
//! Values are opaque ciphertext; decryption belongs to the credential vault.

use openclaw_core::RelayError;
use rusqlite::params;
use uuid::Uuid;

use crate::database::{map_tr_err, Database};
use crate::queries::now;

/// Whether a stored credential exists for the user/provider pair.
pub async fn has_credential(
    db: &Database,
    user_id: &str,
    provider: &str,
) -> Result<bool, RelayError> {
    let user_id = user_id.to_string();
    let provider = provider.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM api_keys WHERE user_id = ?1 AND provider = ?2",
                params![user_id, provider],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// The stored ciphertext, if any.
pub async fn get_credential(
    db: &Database,
    user_id: &str,
    provider: &str,
) -> Result<Option<String>, RelayError> {
    let user_id = user_id.to_string();
    let provider = provider.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT ciphertext FROM api_keys WHERE user_id = ?1 AND provider = ?2",
            )?;
            let mut rows = stmt.query_map(params![user_id, provider], |row| row.get(0))?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Upsert the ciphertext for a user/provider pair.
pub async fn put_credential(
    db: &Database,
    user_id: &str,
    provider: &str,
    ciphertext: &str,
) -> Result<(), RelayError> {
    let id = Uuid::new_v4().to_string();
    let user_id = user_id.to_string();
    let provider = provider.to_string();
    let ciphertext = ciphertext.to_string();
    let ts = now();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO api_keys (id, user_id, provider, ciphertext, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT (user_id, provider)
                 DO UPDATE SET ciphertext = excluded.ciphertext,
                               updated_at = excluded.updated_at",
                params![id, user_id, provider, ciphertext, ts],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
