// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `TaskStore` for deterministic testing.
//!
//! Behaviorally equivalent to the SQLite adapter for the operations the
//! relay exercises, plus call-recording hooks for asserting persistence
//! happened exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use openclaw_core::error::RelayError;
use openclaw_core::traits::TaskStore;
use openclaw_core::types::{Attachment, AttachmentInput, Message, Role, Task, TaskStatus};

#[derive(Default)]
struct Inner {
    tasks: HashMap<String, Task>,
    /// Insertion order doubles as creation order.
    messages: Vec<Message>,
    attachments: Vec<Attachment>,
    credentials: HashMap<(String, String), String>,
    complete_turn_calls: usize,
}

/// An in-memory task store backed by a mutex-guarded map.
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<Mutex<Inner>>,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `complete_turn` was called, for exactly-once asserts.
    pub async fn complete_turn_calls(&self) -> usize {
        self.inner.lock().await.complete_turn_calls
    }

    /// All messages for a task in creation order.
    pub async fn messages_for(&self, task_id: &str) -> Vec<Message> {
        self.inner
            .lock()
            .await
            .messages
            .iter()
            .filter(|m| m.task_id == task_id)
            .cloned()
            .collect()
    }

    /// Direct task lookup ignoring ownership, for test assertions only.
    pub async fn task(&self, task_id: &str) -> Option<Task> {
        self.inner.lock().await.tasks.get(task_id).cloned()
    }

    /// All attachment rows for a message in creation order.
    pub async fn attachments_for(&self, message_id: &str) -> Vec<Attachment> {
        self.inner
            .lock()
            .await
            .attachments
            .iter()
            .filter(|a| a.message_id == message_id)
            .cloned()
            .collect()
    }
}

impl Inner {
    fn insert_message(
        &mut self,
        task_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Message {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            metadata: metadata.map(|m| m.to_string()),
            created_at: now(),
        };
        self.messages.push(message.clone());
        if let Some(task) = self.tasks.get_mut(task_id) {
            task.updated_at = now();
        }
        message
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn get_task(&self, task_id: &str, user_id: &str) -> Result<Option<Task>, RelayError> {
        Ok(self
            .inner
            .lock()
            .await
            .tasks
            .get(task_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, RelayError> {
        let inner = self.inner.lock().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(tasks)
    }

    async fn update_task_status(
        &self,
        task_id: &str,
        user_id: &str,
        status: TaskStatus,
    ) -> Result<(), RelayError> {
        let mut inner = self.inner.lock().await;
        match inner.tasks.get_mut(task_id).filter(|t| t.user_id == user_id) {
            Some(task) => {
                task.status = status.to_string();
                task.updated_at = now();
                Ok(())
            }
            None => Err(RelayError::NotFound("task".into())),
        }
    }

    async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<(), RelayError> {
        let mut inner = self.inner.lock().await;
        let owned = inner
            .tasks
            .get(task_id)
            .is_some_and(|t| t.user_id == user_id);
        if !owned {
            return Err(RelayError::NotFound("task".into()));
        }
        inner.tasks.remove(task_id);
        let message_ids: Vec<String> = inner
            .messages
            .iter()
            .filter(|m| m.task_id == task_id)
            .map(|m| m.id.clone())
            .collect();
        inner.messages.retain(|m| m.task_id != task_id);
        inner
            .attachments
            .retain(|a| !message_ids.contains(&a.message_id));
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
        let task = Task {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            status: TaskStatus::Active.to_string(),
            created_at: ts.clone(),
            updated_at: ts,
        };
        let mut inner = self.inner.lock().await;
        inner.tasks.insert(task.id.clone(), task.clone());
        let message = inner.insert_message(&task.id, Role::User, content, metadata);
        Ok((task, message))
    }

    async fn create_message(
        &self,
        task_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError> {
        let mut inner = self.inner.lock().await;
        if !inner.tasks.contains_key(task_id) {
            return Err(RelayError::NotFound("task".into()));
        }
        Ok(inner.insert_message(task_id, role, content, metadata))
    }

    async fn load_recent_messages(
        &self,
        task_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, RelayError> {
        Ok(self
            .inner
            .lock()
            .await
            .messages
            .iter()
            .filter(|m| m.task_id == task_id)
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn complete_turn(
        &self,
        task_id: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError> {
        let mut inner = self.inner.lock().await;
        inner.complete_turn_calls += 1;
        if !inner.tasks.contains_key(task_id) {
            return Err(RelayError::NotFound("task".into()));
        }
        Ok(inner.insert_message(task_id, Role::Assistant, content, metadata))
    }

    async fn create_attachments(
        &self,
        message_id: &str,
        attachments: &[AttachmentInput],
    ) -> Result<Vec<Attachment>, RelayError> {
        let mut inner = self.inner.lock().await;
        let mut created = Vec::with_capacity(attachments.len());
        for input in attachments {
            let attachment = Attachment {
                id: Uuid::new_v4().to_string(),
                message_id: message_id.to_string(),
                file_name: input.file_name.clone(),
                file_type: input.file_type.clone(),
                file_size: input.file_size,
                storage_key: input.storage_key.clone(),
                created_at: now(),
            };
            inner.attachments.push(attachment.clone());
            created.push(attachment);
        }
        Ok(created)
    }

    async fn has_credential(&self, user_id: &str, provider: &str) -> Result<bool, RelayError> {
        Ok(self
            .inner
            .lock()
            .await
            .credentials
            .contains_key(&(user_id.to_string(), provider.to_string())))
    }

    async fn get_credential(
        &self,
        user_id: &str,
        provider: &str,
    ) -> Result<Option<String>, RelayError> {
        Ok(self
            .inner
            .lock()
            .await
            .credentials
            .get(&(user_id.to_string(), provider.to_string()))
            .cloned())
    }

    async fn put_credential(
        &self,
        user_id: &str,
        provider: &str,
        ciphertext: &str,
    ) -> Result<(), RelayError> {
        self.inner.lock().await.credentials.insert(
            (user_id.to_string(), provider.to_string()),
            ciphertext.to_string(),
        );
        Ok(())
    }
}
