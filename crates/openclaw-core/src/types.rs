// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the relay pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a task (conversation thread).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Archived,
}

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A conversation thread owned by exactly one user.
///
/// Created on the first message of a conversation; `updated_at` is bumped on
/// every new message (user or assistant) and never moves backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One turn in a task. Immutable once created -- streaming updates happen
/// client-side only until the final persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub task_id: String,
    pub role: String,
    pub content: String,
    /// Free-form JSON metadata, e.g. `{"hasAttachments":true}` or `{"error":true}`.
    pub metadata: Option<String>,
    pub created_at: String,
}

/// A stored file associated with a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub message_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    /// Opaque key into the file store. Access URLs are derived on read and
    /// never persisted.
    pub storage_key: String,
    pub created_at: String,
}

/// Client-supplied attachment descriptor for a turn-initiation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInput {
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_key: String,
}

impl AttachmentInput {
    /// True for attachments sent upstream as image references rather than
    /// inlined document text.
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}

// --- Upstream conversation shapes ---

/// One ordered turn of the conversation sent to the completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: TurnContent,
}

impl ChatTurn {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: TurnContent::Text(text.into()),
        }
    }
}

/// Content of a turn -- plain text, or a multi-part structure when image
/// attachments are present.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single part of a multi-part turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text { text: String },
    /// Time-limited access URL resolved from the file store at assembly time.
    ImageUrl { url: String },
}

// --- Stream events ---

/// Typed event decoded from the upstream completion stream.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamEvent {
    /// A content delta to append to the in-progress assistant reply.
    Delta(String),
    /// The in-band sentinel: the provider has no more content for this turn.
    Done,
}

/// Client-facing event envelope for the chat response stream.
///
/// Serializes to the exact wire shapes the web client consumes:
/// `{taskId,...}`, `{"content":...}`, `{"done":true,"id":...}`, `{"error":...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatEvent {
    #[serde(rename_all = "camelCase")]
    TaskCreated {
        task_id: String,
        title: String,
        created_at: String,
        updated_at: String,
    },
    Content {
        content: String,
    },
    Done {
        done: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Error {
        error: String,
    },
}

impl ChatEvent {
    /// Terminal success event. `id` is the persisted assistant message
    /// identifier, omitted when nothing was ever produced.
    pub fn done(id: Option<String>) -> Self {
        ChatEvent::Done { done: true, id }
    }

    pub fn task_created(task: &Task) -> Self {
        ChatEvent::TaskCreated {
            task_id: task.id.clone(),
            title: task.title.clone(),
            created_at: task.created_at.clone(),
            updated_at: task.updated_at.clone(),
        }
    }
}
