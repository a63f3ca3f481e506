// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion upstream trait -- the streaming provider seam.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use secrecy::SecretString;

use crate::error::RelayError;
use crate::types::{ChatTurn, UpstreamEvent};

/// A live completion stream. Yields content deltas in arrival order; a
/// `Done` item marks the provider's end-of-stream sentinel. The stream may
/// also end without a sentinel (connection close).
pub type UpstreamEventStream =
    Pin<Box<dyn Stream<Item = Result<UpstreamEvent, RelayError>> + Send>>;

/// A streaming chat-completion provider.
///
/// Credentials are per-request: the same client instance serves platform
/// traffic and BYOK traffic with different keys.
#[async_trait]
pub trait CompletionUpstream: Send + Sync {
    /// Opens a streaming completion for the assembled turns.
    ///
    /// Errors returned here are pre-stream failures (connect errors, non-2xx
    /// responses, empty bodies). Mid-stream failures surface as `Err` items
    /// on the returned stream.
    async fn stream_completion(
        &self,
        api_key: &SecretString,
        model: &str,
        turns: &[ChatTurn],
    ) -> Result<UpstreamEventStream, RelayError>;
}
