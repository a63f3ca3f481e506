// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenRouter chat-completions API.

use serde::{Deserialize, Serialize};

use openclaw_core::types::{ChatTurn, ContentPart, TurnContent};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn streaming(model: &str, turns: &[ChatTurn]) -> Self {
        Self {
            model: model.to_string(),
            messages: turns.iter().map(WireMessage::from).collect(),
            stream: true,
        }
    }
}

/// One conversation message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

impl From<&ChatTurn> for WireMessage {
    fn from(turn: &ChatTurn) -> Self {
        let content = match &turn.content {
            TurnContent::Text(text) => WireContent::Text(text.clone()),
            TurnContent::Parts(parts) => {
                WireContent::Parts(parts.iter().map(WirePart::from).collect())
            }
        };
        Self {
            role: turn.role.to_string(),
            content,
        }
    }
}

/// Message content: a bare string, or typed parts for multimodal turns.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

/// One part of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrlRef },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrlRef {
    pub url: String,
}

impl From<&ContentPart> for WirePart {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text { text } => WirePart::Text { text: text.clone() },
            ContentPart::ImageUrl { url } => WirePart::ImageUrl {
                image_url: ImageUrlRef { url: url.clone() },
            },
        }
    }
}

/// One decoded data chunk of the completion stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

impl StreamChunk {
    /// The content delta of the first choice, if present and non-empty.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}
