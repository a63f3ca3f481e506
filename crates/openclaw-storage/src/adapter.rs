// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `TaskStore` implementation backed by WAL-mode SQLite.
//!
//! Everything delegates to the query modules; the multi-row operations
//! (`create_task_with_message`, `create_message`, `complete_turn`) compose
//! connection-level helpers inside a single transaction on the serialized
//! connection, so a crash can never leave half a turn behind.

use async_trait::async_trait;
use uuid::Uuid;

use openclaw_core::traits::TaskStore;
use openclaw_core::types::{Attachment, AttachmentInput, Message, Role, Task, TaskStatus};
use openclaw_core::RelayError;

use crate::database::{map_tr_err, Database};
use crate::queries::{self, now};

/// SQLite-backed task store.
pub struct SqliteTaskStore {
    db: Database,
}

impl SqliteTaskStore {
    /// Open the database at `path` and wrap it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, RelayError> {
        Ok(Self {
            db: Database::open(path, wal_mode).await?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn close(self) -> Result<(), RelayError> {
        self.db.close().await
    }
}

fn new_task(user_id: &str, title: &str, ts: &str) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: title.to_string(),
        status: TaskStatus::Active.to_string(),
        created_at: ts.to_string(),
        updated_at: ts.to_string(),
    }
}

fn new_message(
    task_id: &str,
    role: Role,
    content: &str,
    metadata: Option<serde_json::Value>,
    ts: &str,
) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        task_id: task_id.to_string(),
        role: role.to_string(),
        content: content.to_string(),
        metadata: metadata.map(|m| m.to_string()),
        created_at: ts.to_string(),
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn get_task(&self, task_id: &str, user_id: &str) -> Result<Option<Task>, RelayError> {
        queries::tasks::get_task(&self.db, task_id, user_id).await
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, RelayError> {
        queries::tasks::list_tasks(&self.db, user_id).await
    }

    async fn update_task_status(
        &self,
        task_id: &str,
        user_id: &str,
        status: TaskStatus,
    ) -> Result<(), RelayError> {
        let n = queries::tasks::update_status(
            &self.db,
            task_id,
            user_id,
            &status.to_string(),
            &now(),
        )
        .await?;
        if n == 0 {
            return Err(RelayError::NotFound("task".into()));
        }
        Ok(())
    }

    async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<(), RelayError> {
        let n = queries::tasks::delete_task(&self.db, task_id, user_id).await?;
        if n == 0 {
            return Err(RelayError::NotFound("task".into()));
        }
        Ok(())
    }

    async fn create_task_with_message(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(Task, Message), RelayError> {
        let ts = now();
        let task = new_task(user_id, title, &ts);
        let message = new_message(&task.id, Role::User, content, metadata, &ts);

        let task_row = task.clone();
        let message_row = message.clone();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                queries::tasks::insert_task(&tx, &task_row)?;
                queries::messages::insert_message(&tx, &message_row)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        Ok((task, message))
    }

    async fn create_message(
        &self,
        task_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError> {
        let ts = now();
        let message = new_message(task_id, role, content, metadata, &ts);
        let message_row = message.clone();
        let ts_row = ts;
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                queries::messages::insert_message(&tx, &message_row)?;
                queries::tasks::touch_task(&tx, &message_row.task_id, &ts_row)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(message)
    }

    async fn load_recent_messages(
        &self,
        task_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, RelayError> {
        queries::messages::recent_messages(&self.db, task_id, limit).await
    }

    async fn complete_turn(
        &self,
        task_id: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError> {
        let ts = now();
        let message = new_message(task_id, Role::Assistant, content, metadata, &ts);
        let message_row = message.clone();
        let ts_row = ts;
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                queries::messages::insert_message(&tx, &message_row)?;
                queries::tasks::touch_task(&tx, &message_row.task_id, &ts_row)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(message)
    }

    async fn create_attachments(
        &self,
        message_id: &str,
        attachments: &[AttachmentInput],
    ) -> Result<Vec<Attachment>, RelayError> {
        let ts = now();
        let rows: Vec<Attachment> = attachments
            .iter()
            .map(|input| Attachment {
                id: Uuid::new_v4().to_string(),
                message_id: message_id.to_string(),
                file_name: input.file_name.clone(),
                file_type: input.file_type.clone(),
                file_size: input.file_size,
                storage_key: input.storage_key.clone(),
                created_at: ts.clone(),
            })
            .collect();
        queries::attachments::insert_attachments(&self.db, rows.clone()).await?;
        Ok(rows)
    }

    async fn has_credential(&self, user_id: &str, provider: &str) -> Result<bool, RelayError> {
        queries::credentials::has_credential(&self.db, user_id, provider).await
    }

    async fn get_credential(
        &self,
        user_id: &str,
        provider: &str,
    ) -> Result<Option<String>, RelayError> {
        queries::credentials::get_credential(&self.db, user_id, provider).await
    }

    async fn put_credential(
        &self,
        user_id: &str,
        provider: &str,
        ciphertext: &str,
    ) -> Result<(), RelayError> {
        queries::credentials::put_credential(&self.db, user_id, provider, ciphertext).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_store() -> (SqliteTaskStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteTaskStore::open(db_path.to_str().unwrap(), true)
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn create_task_with_message_is_atomic_pair() {
        let (store, _dir) = setup_store().await;
        let (task, message) = store
            .create_task_with_message(
                "u1",
                "hello world",
                "hello world",
                Some(serde_json::json!({"hasAttachments": true})),
            )
            .await
            .unwrap();

        assert_eq!(task.user_id, "u1");
        assert_eq!(message.task_id, task.id);
        assert_eq!(message.role, "user");
        assert_eq!(
            message.metadata.as_deref(),
            Some(r#"{"hasAttachments":true}"#)
        );

        let messages = store.load_recent_messages(&task.id, 10).await.unwrap();
        assert_eq!(messages.len(), 1);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn complete_turn_persists_reply_and_bumps_task() {
        let (store, _dir) = setup_store().await;
        let (task, _) = store
            .create_task_with_message("u1", "t", "hi", None)
            .await
            .unwrap();
        let before = store.get_task(&task.id, "u1").await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let reply = store
            .complete_turn(&task.id, "partial reply", Some(serde_json::json!({"error": true})))
            .await
            .unwrap();
        assert_eq!(reply.role, "assistant");
        assert_eq!(reply.metadata.as_deref(), Some(r#"{"error":true}"#));

        let after = store.get_task(&task.id, "u1").await.unwrap().unwrap();
        assert!(after.updated_at > before.updated_at);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_message_persists_and_bumps_task() {
        let (store, _dir) = setup_store().await;
        let (task, _) = store
            .create_task_with_message("u1", "t", "hi", None)
            .await
            .unwrap();
        let before = store.get_task(&task.id, "u1").await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let msg = store
            .create_message(&task.id, Role::User, "again", None)
            .await
            .unwrap();
        assert_eq!(msg.role, "user");

        let messages = store.load_recent_messages(&task.id, 10).await.unwrap();
        assert_eq!(messages.len(), 2);
        let after = store.get_task(&task.id, "u1").await.unwrap().unwrap();
        assert!(after.updated_at > before.updated_at);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn complete_turn_against_missing_task_fails_without_residue() {
        let (store, _dir) = setup_store().await;
        assert!(store.complete_turn("missing", "x", None).await.is_err());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn attachments_preserve_input_order() {
        let (store, _dir) = setup_store().await;
        let (_, message) = store
            .create_task_with_message("u1", "t", "hi", None)
            .await
            .unwrap();

        let inputs: Vec<AttachmentInput> = (0..3)
            .map(|i| AttachmentInput {
                file_name: format!("f{i}.txt"),
                file_type: "text/plain".to_string(),
                file_size: 100,
                storage_key: format!("up/f{i}"),
            })
            .collect();
        store.create_attachments(&message.id, &inputs).await.unwrap();

        let rows = queries::attachments::attachments_for_message(store.database(), &message.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].file_name, "f0.txt");
        assert_eq!(rows[2].file_name, "f2.txt");
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_task_cascades() {
        let (store, _dir) = setup_store().await;
        let (task, message) = store
            .create_task_with_message("u1", "t", "hi", None)
            .await
            .unwrap();
        store
            .create_attachments(
                &message.id,
                &[AttachmentInput {
                    file_name: "a.png".into(),
                    file_type: "image/png".into(),
                    file_size: 10,
                    storage_key: "up/a".into(),
                }],
            )
            .await
            .unwrap();

        store.delete_task(&task.id, "u1").await.unwrap();
        assert!(store.load_recent_messages(&task.id, 10).await.unwrap().is_empty());
        let rows = queries::attachments::attachments_for_message(store.database(), &message.id)
            .await
            .unwrap();
        assert!(rows.is_empty());
        store.close().await.unwrap();
    }
}
