// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD operations.

use openclaw_core::types::Task;
use openclaw_core::RelayError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

pub(crate) fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const TASK_COLUMNS: &str = "id, user_id, title, status, created_at, updated_at";

/// Insert a new task row. Runs on the caller's connection so the adapter
/// can pair it with other writes in one transaction.
pub(crate) fn insert_task(conn: &rusqlite::Connection, task: &Task) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO tasks (id, user_id, title, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            task.id,
            task.user_id,
            task.title,
            task.status,
            task.created_at,
            task.updated_at,
        ],
    )?;
    Ok(())
}

/// Ownership-scoped lookup; `None` for both absence and foreign ownership.
pub async fn get_task(
    db: &Database,
    task_id: &str,
    user_id: &str,
) -> Result<Option<Task>, RelayError> {
    let task_id = task_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"
            ))?;
            let mut rows = stmt.query_map(params![task_id, user_id], task_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// All tasks for a user, most recently updated first.
pub async fn list_tasks(db: &Database, user_id: &str) -> Result<Vec<Task>, RelayError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1
                 ORDER BY updated_at DESC"
            ))?;
            let rows = stmt.query_map(params![user_id], task_from_row)?;
            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(row?);
            }
            Ok(tasks)
        })
        .await
        .map_err(map_tr_err)
}

/// Set a task's status. Returns the number of rows updated (0 when the task
/// is absent or owned by someone else).
pub async fn update_status(
    db: &Database,
    task_id: &str,
    user_id: &str,
    status: &str,
    updated_at: &str,
) -> Result<usize, RelayError> {
    let task_id = task_id.to_string();
    let user_id = user_id.to_string();
    let status = status.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND user_id = ?4",
                params![status, updated_at, task_id, user_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a task; messages and attachments cascade. Returns rows deleted.
pub async fn delete_task(
    db: &Database,
    task_id: &str,
    user_id: &str,
) -> Result<usize, RelayError> {
    let task_id = task_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![task_id, user_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// Bump a task's `updated_at`. MAX() keeps it monotonic if clocks skew.
/// Runs on the caller's connection, inside the adapter's turn transactions.
pub(crate) fn touch_task(
    conn: &rusqlite::Connection,
    task_id: &str,
    updated_at: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE tasks SET updated_at = MAX(updated_at, ?1) WHERE id = ?2",
        params![updated_at, task_id],
    )
}
