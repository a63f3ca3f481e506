// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-turn stream relay and persistence coordinator.
//!
//! Consumes the upstream event stream, re-frames deltas into client events,
//! accumulates the full reply, and guarantees exactly-once persistence of
//! the assistant message no matter how the stream ends.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use openclaw_core::traits::{TaskStore, UpstreamEventStream};
use openclaw_core::types::{ChatEvent, Message, UpstreamEvent};

/// Error message emitted to the client on any mid-stream failure. Upstream
/// detail stays in the server logs.
const STREAM_INTERRUPTED: &str = "Stream interrupted";

/// Lifecycle of one in-flight turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Reading upstream deltas and forwarding them.
    Streaming,
    /// Sentinel or natural EOF reached; performing the final write.
    Completing,
    /// Timeout, transport failure, or client disconnect; flushing partial
    /// output.
    Interrupted,
    /// Terminal.
    Done,
}

/// How the turn ended, for logging and tests.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The persisted assistant message, if the accumulator was non-empty.
    pub persisted: Option<Message>,
    /// Whether the turn ended through the Interrupted state.
    pub interrupted: bool,
}

/// Coordinates one turn at a time; cheap to clone per request.
#[derive(Clone)]
pub struct TurnCoordinator {
    store: Arc<dyn TaskStore>,
    read_timeout: Duration,
}

impl TurnCoordinator {
    pub fn new(store: Arc<dyn TaskStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    /// Relay `upstream` for `task_id`, delivering client events on `events`.
    ///
    /// Exactly one terminal event (`done` xor `error`) is sent for a turn
    /// that produced output; the send channel closing (client disconnect)
    /// still flushes the partial reply to storage. The final persist runs at
    /// most once regardless of which termination path fires.
    pub async fn relay(
        &self,
        task_id: &str,
        mut upstream: UpstreamEventStream,
        events: mpsc::Sender<ChatEvent>,
    ) -> TurnOutcome {
        let mut state = TurnState::Streaming;
        let mut accumulator = String::new();
        let mut finalized = false;

        while state == TurnState::Streaming {
            match tokio::time::timeout(self.read_timeout, upstream.next()).await {
                Ok(Some(Ok(UpstreamEvent::Delta(delta)))) => {
                    accumulator.push_str(&delta);
                    let event = ChatEvent::Content { content: delta };
                    if events.send(event).await.is_err() {
                        // Client went away; its partial reply must still land
                        // in storage.
                        debug!(task_id, "client disconnected mid-stream");
                        state = TurnState::Interrupted;
                    }
                }
                Ok(Some(Ok(UpstreamEvent::Done))) => {
                    state = TurnState::Completing;
                    let persisted = self
                        .finalize_ok(task_id, &accumulator, &mut finalized)
                        .await;
                    match persisted {
                        Ok(persisted) => {
                            // The sentinel always yields a done event; the id
                            // is omitted when nothing was produced.
                            let id = persisted.as_ref().map(|m| m.id.clone());
                            let _ = events.send(ChatEvent::done(id)).await;
                            return TurnOutcome {
                                persisted,
                                interrupted: false,
                            };
                        }
                        Err(()) => state = TurnState::Interrupted,
                    }
                }
                Ok(Some(Err(err))) => {
                    warn!(task_id, %err, "upstream stream error");
                    state = TurnState::Interrupted;
                }
                Ok(None) => {
                    // EOF without a sentinel. A done event is only sent when
                    // something was actually persisted.
                    state = TurnState::Completing;
                    match self
                        .finalize_ok(task_id, &accumulator, &mut finalized)
                        .await
                    {
                        Ok(persisted) => {
                            if let Some(message) = &persisted {
                                let _ = events.send(ChatEvent::done(Some(message.id.clone()))).await;
                            }
                            return TurnOutcome {
                                persisted,
                                interrupted: false,
                            };
                        }
                        Err(()) => state = TurnState::Interrupted,
                    }
                }
                Err(_) => {
                    warn!(
                        task_id,
                        timeout_secs = self.read_timeout.as_secs(),
                        "upstream read stalled"
                    );
                    state = TurnState::Interrupted;
                }
            }
        }

        // Interrupted path: flush partial output tagged as errored, then a
        // single error event.
        let persisted = self
            .finalize_errored(task_id, &accumulator, &mut finalized)
            .await;
        let _ = events
            .send(ChatEvent::Error {
                error: STREAM_INTERRUPTED.to_string(),
            })
            .await;
        TurnOutcome {
            persisted,
            interrupted: true,
        }
    }

    /// The clean-completion write. `Err(())` means the write itself failed
    /// and the turn must degrade to Interrupted.
    async fn finalize_ok(
        &self,
        task_id: &str,
        accumulator: &str,
        finalized: &mut bool,
    ) -> Result<Option<Message>, ()> {
        if *finalized || accumulator.is_empty() {
            return Ok(None);
        }
        *finalized = true;
        match self.store.complete_turn(task_id, accumulator, None).await {
            Ok(message) => Ok(Some(message)),
            Err(err) => {
                error!(task_id, %err, "failed to persist assistant message");
                Err(())
            }
        }
    }

    /// The interrupted-path write: partial output is persisted with an error
    /// marker so it is never silently discarded.
    async fn finalize_errored(
        &self,
        task_id: &str,
        accumulator: &str,
        finalized: &mut bool,
    ) -> Option<Message> {
        if *finalized || accumulator.is_empty() {
            return None;
        }
        *finalized = true;
        match self
            .store
            .complete_turn(task_id, accumulator, Some(serde_json::json!({"error": true})))
            .await
        {
            Ok(message) => Some(message),
            Err(err) => {
                error!(task_id, %err, "failed to persist partial assistant message");
                None
            }
        }
    }
}
