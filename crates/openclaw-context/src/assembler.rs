// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The context assembler.

use std::str::FromStr;

use tracing::warn;

use openclaw_core::error::RelayError;
use openclaw_core::traits::FileStore;
use openclaw_core::types::{AttachmentInput, ChatTurn, ContentPart, Message, Role, TurnContent};

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are OpenClaw, an AI assistant powering the OpenClaw \
    Platform. You help users with research, analysis, coding, writing, and creative tasks. You \
    are direct, knowledgeable, and thorough. When you don't know something, say so. When a task \
    is complex, break it down into steps. Keep responses well-structured using markdown when \
    helpful. Be concise unless the user asks for depth.";

/// Builds the ordered turn list for one completion request.
///
/// Output ordering is fixed: system turn, history in chronological order,
/// current turn. Callers must not reorder.
pub struct ContextAssembler {
    system_prompt: String,
}

impl ContextAssembler {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Assemble turns for the current request.
    ///
    /// `history` is most-recent-first as loaded from storage; it is reversed
    /// here, and its most recent entry is dropped when it duplicates the
    /// turn about to be appended (the current user message was already
    /// persisted before assembly).
    ///
    /// Document attachments are inlined as text prefixes; a fetch failure
    /// substitutes a placeholder rather than aborting the turn. Image
    /// attachments turn the current turn into a multi-part structure, one
    /// URL reference per image followed by a single trailing text part.
    pub async fn assemble(
        &self,
        files: &dyn FileStore,
        history: &[Message],
        current_text: &str,
        attachments: &[AttachmentInput],
    ) -> Result<Vec<ChatTurn>, RelayError> {
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(ChatTurn::text(Role::System, self.system_prompt.clone()));

        let mut chronological: Vec<&Message> = history.iter().rev().collect();
        if let Some(last) = chronological.last() {
            if last.role == Role::User.to_string() && last.content == current_text {
                chronological.pop();
            }
        }
        for message in chronological {
            match Role::from_str(&message.role) {
                Ok(role) => turns.push(ChatTurn::text(role, message.content.clone())),
                Err(_) => warn!(role = %message.role, "skipping history message with unknown role"),
            }
        }

        turns.push(self.current_turn(files, current_text, attachments).await?);
        Ok(turns)
    }

    async fn current_turn(
        &self,
        files: &dyn FileStore,
        current_text: &str,
        attachments: &[AttachmentInput],
    ) -> Result<ChatTurn, RelayError> {
        if attachments.is_empty() {
            return Ok(ChatTurn::text(Role::User, current_text));
        }

        let (images, documents): (Vec<_>, Vec<_>) =
            attachments.iter().partition(|a| a.is_image());

        let mut doc_prefix = String::new();
        for doc in &documents {
            match files.get_text_content(&doc.storage_key).await {
                Ok(content) => {
                    doc_prefix.push_str(&format!("[Attached: {}]\n{}\n\n", doc.file_name, content));
                }
                Err(err) => {
                    warn!(file = %doc.file_name, %err, "attachment unreadable, inlining placeholder");
                    doc_prefix
                        .push_str(&format!("[Attached: {} — could not read]\n\n", doc.file_name));
                }
            }
        }

        if !images.is_empty() {
            let mut parts = Vec::with_capacity(images.len() + 1);
            for image in &images {
                let url = files.get_signed_url(&image.storage_key).await?;
                parts.push(ContentPart::ImageUrl { url });
            }
            parts.push(ContentPart::Text {
                text: format!("{doc_prefix}{current_text}"),
            });
            return Ok(ChatTurn {
                role: Role::User,
                content: TurnContent::Parts(parts),
            });
        }

        if doc_prefix.is_empty() {
            Ok(ChatTurn::text(Role::User, current_text))
        } else {
            Ok(ChatTurn::text(
                Role::User,
                format!("{doc_prefix}{current_text}"),
            ))
        }
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}
