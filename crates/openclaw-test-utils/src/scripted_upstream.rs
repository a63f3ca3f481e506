// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted `CompletionUpstream` for deterministic relay testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use openclaw_core::error::RelayError;
use openclaw_core::traits::{CompletionUpstream, UpstreamEventStream};
use openclaw_core::types::{ChatTurn, UpstreamEvent};

/// One scripted item on the upstream stream.
pub enum ScriptedItem {
    Delta(&'static str),
    Done,
    /// A mid-stream failure.
    Error(&'static str),
    /// Delay before the next item, for stall/timeout tests.
    Pause(Duration),
}

/// Record of the last `stream_completion` call, for request-shape asserts.
#[derive(Clone)]
pub struct RecordedCall {
    pub api_key: String,
    pub model: String,
    pub turns: Vec<ChatTurn>,
}

/// An upstream whose stream is a fixed script.
///
/// When constructed with [`failing`], the call errors before any stream is
/// produced, modeling pre-stream rejections.
///
/// [`failing`]: ScriptedUpstream::failing
pub struct ScriptedUpstream {
    script: Arc<Mutex<Vec<ScriptedItem>>>,
    pre_stream_error: Option<fn() -> RelayError>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedUpstream {
    pub fn new(script: Vec<ScriptedItem>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            pre_stream_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An upstream that rejects every call before streaming begins.
    pub fn failing(make_error: fn() -> RelayError) -> Self {
        Self {
            script: Arc::new(Mutex::new(Vec::new())),
            pre_stream_error: Some(make_error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CompletionUpstream for ScriptedUpstream {
    async fn stream_completion(
        &self,
        api_key: &SecretString,
        model: &str,
        turns: &[ChatTurn],
    ) -> Result<UpstreamEventStream, RelayError> {
        self.calls.lock().await.push(RecordedCall {
            api_key: api_key.expose_secret().to_string(),
            model: model.to_string(),
            turns: turns.to_vec(),
        });

        if let Some(make_error) = self.pre_stream_error {
            return Err(make_error());
        }

        let script = std::mem::take(&mut *self.script.lock().await);
        let stream = stream::unfold(script.into_iter(), |mut items| async move {
            loop {
                match items.next()? {
                    ScriptedItem::Delta(text) => {
                        return Some((Ok(UpstreamEvent::Delta(text.to_string())), items));
                    }
                    ScriptedItem::Done => return Some((Ok(UpstreamEvent::Done), items)),
                    ScriptedItem::Error(message) => {
                        return Some((
                            Err(RelayError::Upstream {
                                message: message.to_string(),
                                source: None,
                            }),
                            items,
                        ));
                    }
                    ScriptedItem::Pause(duration) => {
                        tokio::time::sleep(duration).await;
                    }
                }
            }
        });
        Ok(Box::pin(stream))
    }
}
