// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task/message store trait -- durable storage for tasks, messages,
//! attachments, and stored provider credentials.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::{Attachment, AttachmentInput, Message, Role, Task, TaskStatus};

/// Durable storage for the relay's conversation state.
///
/// All read queries are ownership-scoped: a task id alone is never enough to
/// reach another user's data. Writes to a single task are serialized by the
/// backend; the paired write in [`complete_turn`] relies on the backend's
/// native transaction guarantee.
///
/// [`complete_turn`]: TaskStore::complete_turn
#[async_trait]
pub trait TaskStore: Send + Sync {
    // --- Task operations ---

    /// Ownership-scoped lookup. Returns `None` for both absence and
    /// foreign ownership.
    async fn get_task(&self, task_id: &str, user_id: &str) -> Result<Option<Task>, RelayError>;

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, RelayError>;

    async fn update_task_status(
        &self,
        task_id: &str,
        user_id: &str,
        status: TaskStatus,
    ) -> Result<(), RelayError>;

    /// Deletes a task; messages and attachment rows cascade.
    async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<(), RelayError>;

    // --- Message operations ---

    /// Creates a task and its first user message as a single atomic unit.
    async fn create_task_with_message(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<(Task, Message), RelayError>;

    async fn create_message(
        &self,
        task_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError>;

    /// Returns up to `limit` messages for the task, most recent first.
    async fn load_recent_messages(
        &self,
        task_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, RelayError>;

    /// The atomic paired write at the end of a turn: create the assistant
    /// message with the accumulated text and bump the task's `updated_at`,
    /// both in one transaction. Called at most once per turn by the relay.
    async fn complete_turn(
        &self,
        task_id: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Message, RelayError>;

    // --- Attachment operations ---

    /// Creates attachment rows for an existing message, preserving input order.
    async fn create_attachments(
        &self,
        message_id: &str,
        attachments: &[AttachmentInput],
    ) -> Result<Vec<Attachment>, RelayError>;

    // --- Credential operations ---

    /// One existence check per resolve call -- the resolver's only store access.
    async fn has_credential(&self, user_id: &str, provider: &str) -> Result<bool, RelayError>;

    /// Returns the stored ciphertext for the user's provider key, if any.
    /// The store never interprets the ciphertext; decryption belongs to the
    /// credential vault.
    async fn get_credential(
        &self,
        user_id: &str,
        provider: &str,
    ) -> Result<Option<String>, RelayError>;

    /// Upserts the ciphertext for a user's provider key.
    async fn put_credential(
        &self,
        user_id: &str,
        provider: &str,
        ciphertext: &str,
    ) -> Result<(), RelayError>;
}
